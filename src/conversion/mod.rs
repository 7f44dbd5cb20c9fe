//! Post-move container conversion.
//!
//! After every move has finished, each file whose extension differs from the
//! configured format is handed to an external converter (ffmpeg by default).
//! The converter's arguments come from a template in which `{old}` and
//! `{new}` stand for the source and target paths:
//!
//! ```text
//! args_template = "-i {old} -c copy {new}"
//! ```
//!
//! The template is rendered with placeholder tokens and split on whitespace
//! before the real paths are substituted, so paths containing spaces stay a
//! single argument.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::ConversionConfig;
use crate::error::{Error, Result};
use crate::paths;
use crate::prompt::{self, Confirm};
use crate::template;

/// Stand-in for the source path while splitting arguments.
pub const OLD_TOKEN: &str = "SR-OLD";
/// Stand-in for the target path while splitting arguments.
pub const NEW_TOKEN: &str = "SR-NEW";

/// Outcome of a [`convert_all`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Source and converted path for every successful conversion.
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// Files the user chose not to convert.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

/// Whether `path` needs converting to `format`. Case-insensitive; a leading
/// dot on `format` is ignored.
pub fn needs_conversion(path: &Path, format: &str) -> bool {
    !paths::extension_of(path).eq_ignore_ascii_case(format.trim_start_matches('.'))
}

/// `path` with its extension swapped for `format`.
pub fn converted_path(path: &Path, format: &str) -> PathBuf {
    path.with_extension(format.trim_start_matches('.'))
}

/// Render the argument template and substitute the real paths.
pub fn build_args(args_template: &str, old: &Path, new: &Path) -> Result<Vec<String>> {
    let rendered = template::render(
        args_template,
        &serde_json::json!({ "old": OLD_TOKEN, "new": NEW_TOKEN }),
    )?;
    let old = old.to_string_lossy();
    let new = new.to_string_lossy();

    Ok(rendered
        .split_whitespace()
        .map(|arg| {
            arg.split(OLD_TOKEN)
                .map(|part| part.replace(NEW_TOKEN, &new))
                .collect::<Vec<_>>()
                .join(&*old)
        })
        .collect())
}

/// Convert every candidate that is not already in the target format.
///
/// Candidates are processed one at a time, in order. Declining a prompt
/// skips that file only. A missing converter or a failed run is recorded
/// and the remaining files are still tried.
pub async fn convert_all(
    candidates: &[PathBuf],
    config: &ConversionConfig,
    confirm: Arc<dyn Confirm>,
) -> ConversionReport {
    let mut report = ConversionReport::default();
    let mut converter: Option<std::result::Result<PathBuf, String>> = None;

    for old in candidates {
        if !needs_conversion(old, &config.format) {
            debug!("{} is already {}", old.display(), config.format);
            continue;
        }
        let new = converted_path(old, &config.format);

        if !config.auto_convert {
            let question = format!("Convert {} -> {}?", old.display(), new.display());
            if !prompt::ask(&confirm, question).await {
                report.skipped.push(old.clone());
                continue;
            }
        }

        let program = converter.get_or_insert_with(|| {
            which::which(&config.converter)
                .map_err(|e| format!("converter {:?} not found: {}", config.converter, e))
        });
        let program = match program {
            Ok(program) => program.clone(),
            Err(msg) => {
                warn!("Cannot convert {}: {}", old.display(), msg);
                report.failures.push((old.clone(), msg.clone()));
                continue;
            }
        };

        let result = match build_args(&config.args_template, old, &new) {
            Ok(args) => run_converter(&program, &args).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                info!("Converted {} -> {}", old.display(), new.display());
                report.converted.push((old.clone(), new));
            }
            Err(e) => {
                warn!("Conversion of {} failed: {}", old.display(), e);
                report.failures.push((old.clone(), e.to_string()));
            }
        }
    }

    report
}

/// Run the converter with inherited stdio and wait for it.
async fn run_converter(program: &Path, args: &[String]) -> Result<()> {
    info!("Running {} {:?}", program.display(), args);

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| Error::conversion(format!("failed to run {}: {}", program.display(), e)))?;

    if !status.success() {
        return Err(Error::conversion(format!(
            "{} exited with status: {}",
            program.display(),
            status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::AutoAnswer;

    #[test]
    fn test_needs_conversion() {
        assert!(!needs_conversion(Path::new("/a/b.mkv"), "mkv"));
        assert!(!needs_conversion(Path::new("/a/b.MKV"), ".mkv"));
        assert!(needs_conversion(Path::new("/a/b.avi"), "mkv"));
        assert!(needs_conversion(Path::new("/a/b"), "mkv"));
    }

    #[test]
    fn test_converted_path() {
        assert_eq!(
            converted_path(Path::new("/m/Show - S01E01.avi"), "mkv"),
            PathBuf::from("/m/Show - S01E01.mkv")
        );
    }

    #[test]
    fn test_build_args_keeps_paths_whole() {
        let args = build_args(
            "-i {old} -c copy {new}",
            Path::new("/m/My Movie.avi"),
            Path::new("/m/My Movie.mkv"),
        )
        .unwrap();
        assert_eq!(args, vec!["-i", "/m/My Movie.avi", "-c", "copy", "/m/My Movie.mkv"]);
    }

    #[test]
    fn test_build_args_does_not_rescan_paths() {
        let args = build_args(
            "-i {old} --out={new}",
            Path::new("/m/SR-NEW Movie.avi"),
            Path::new("/m/SR-OLD Movie.mkv"),
        )
        .unwrap();
        assert_eq!(args, vec!["-i", "/m/SR-NEW Movie.avi", "--out=/m/SR-OLD Movie.mkv"]);
    }

    #[test]
    fn test_build_args_bad_template() {
        assert!(build_args("-i {source}", Path::new("a"), Path::new("b")).is_err());
    }

    #[tokio::test]
    async fn test_matching_format_never_runs_converter() {
        let config = ConversionConfig {
            auto_convert: true,
            converter: "scenerename-no-such-converter".to_string(),
            ..ConversionConfig::default()
        };
        let report = convert_all(
            &[PathBuf::from("/m/a.mkv"), PathBuf::from("/m/b.MKV")],
            &config,
            Arc::new(AutoAnswer(true)),
        )
        .await;
        assert_eq!(report, ConversionReport::default());
    }

    #[tokio::test]
    async fn test_missing_converter_is_reported() {
        let config = ConversionConfig {
            auto_convert: true,
            converter: "scenerename-no-such-converter".to_string(),
            ..ConversionConfig::default()
        };
        let report = convert_all(&[PathBuf::from("/m/a.avi")], &config, Arc::new(AutoAnswer(true)))
            .await;
        assert_eq!(report.failures.len(), 1);
        assert!(report.converted.is_empty());
    }

    #[tokio::test]
    async fn test_declined_skips_only_that_file() {
        let config = ConversionConfig::default();
        let report = convert_all(
            &[PathBuf::from("/m/a.avi"), PathBuf::from("/m/b.mp4")],
            &config,
            Arc::new(AutoAnswer(false)),
        )
        .await;
        assert_eq!(
            report.skipped,
            vec![PathBuf::from("/m/a.avi"), PathBuf::from("/m/b.mp4")]
        );
    }

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_converter() {
        let dir = tempfile::tempdir().unwrap();
        let converter = script(dir.path(), "fake-convert", "cp \"$2\" \"$3\"");
        let old = dir.path().join("My Movie (2020).avi");
        std::fs::write(&old, b"video").unwrap();

        let config = ConversionConfig {
            auto_convert: true,
            converter: converter.to_string_lossy().into_owned(),
            ..ConversionConfig::default()
        };
        let report = convert_all(&[old.clone()], &config, Arc::new(AutoAnswer(false))).await;

        let new = dir.path().join("My Movie (2020).mkv");
        assert_eq!(report.converted, vec![(old, new.clone())]);
        assert_eq!(std::fs::read(new).unwrap(), b"video");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let converter = script(dir.path(), "fail-convert", "exit 3");

        let config = ConversionConfig {
            auto_convert: true,
            converter: converter.to_string_lossy().into_owned(),
            ..ConversionConfig::default()
        };
        let report =
            convert_all(&[dir.path().join("a.avi")], &config, Arc::new(AutoAnswer(true))).await;

        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].1.contains("exited with status"));
    }
}
