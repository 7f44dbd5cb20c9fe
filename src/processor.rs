//! Run orchestration: parse every input, resolve and move them concurrently,
//! then convert once all moves have finished.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Config;
use crate::conversion::{self, ConversionReport};
use crate::error::{Error, Result};
use crate::media::Media;
use crate::mover::{self, MoveReport, Planner};
use crate::parse::{self, ParsedVideo};
use crate::paths;
use crate::prompt::Confirm;
use crate::services::ServiceRegistry;

/// Render `media` with the default templates and directories.
pub fn local_destination(media: &Media, config: &Config) -> Result<PathBuf> {
    let name = media.render_name(&config.templates)?;
    if name.trim().is_empty() {
        return Err(Error::template(format!(
            "{} template rendered an empty name",
            media.kind()
        )));
    }
    let base = paths::expand_directory(config.directories.for_kind(media.kind()))?;
    Ok(paths::resolve_destination(&base, &name))
}

/// Destination lookup used by the mover: remote lookup first, local render
/// otherwise.
pub struct DestinationPlanner {
    config: Arc<Config>,
    registry: Arc<ServiceRegistry>,
}

impl DestinationPlanner {
    pub fn new(config: Arc<Config>, registry: Arc<ServiceRegistry>) -> Self {
        Self { config, registry }
    }
}

#[async_trait]
impl Planner for DestinationPlanner {
    async fn destination(&self, video: &ParsedVideo) -> Result<PathBuf> {
        if let Some(resolved) = self.registry.resolve(&video.media).await {
            info!(
                "{} matched {:?} as {:?}",
                resolved.service,
                video.media.name(),
                resolved.media.name()
            );
            return Ok(paths::resolve_destination(&resolved.base, &resolved.name));
        }
        local_destination(&video.media, &self.config)
    }
}

/// One line of a dry-run plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub source: PathBuf,
    pub destination: std::result::Result<PathBuf, String>,
}

/// Everything that happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Inputs whose names could not be parsed.
    pub unparsed: Vec<(PathBuf, String)>,
    pub moves: MoveReport,
    pub conversions: ConversionReport,
}

impl RunReport {
    pub fn failure_count(&self) -> usize {
        self.unparsed.len() + self.moves.failures.len() + self.conversions.failures.len()
    }

    pub fn print_summary(&self) {
        println!();
        println!("Moved: {}", self.moves.moved.len());
        for (from, to) in &self.moves.moved {
            println!("  {} -> {}", from.display(), to.display());
        }
        if !self.moves.placed.is_empty() {
            println!("Already in place: {}", self.moves.placed.len());
            for path in &self.moves.placed {
                println!("  {}", path.display());
            }
        }
        if !self.moves.declined.is_empty() {
            println!("Not moved: {}", self.moves.declined.len());
        }
        if !self.conversions.converted.is_empty() {
            println!("Converted: {}", self.conversions.converted.len());
            for (old, new) in &self.conversions.converted {
                println!("  {} -> {}", old.display(), new.display());
            }
        }

        let failures = self
            .unparsed
            .iter()
            .chain(&self.moves.failures)
            .chain(&self.conversions.failures);
        if self.failure_count() > 0 {
            println!("Failures: {}", self.failure_count());
            for (path, error) in failures {
                println!("  {}: {}", path.display(), error);
            }
        }
    }
}

/// Drives a whole run from shared, read-only state.
pub struct Processor {
    config: Arc<Config>,
    registry: Arc<ServiceRegistry>,
    confirm: Arc<dyn Confirm>,
}

impl Processor {
    pub fn new(config: Config, registry: ServiceRegistry, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            confirm,
        }
    }

    /// Parse every input, dropping duplicates and unparseable names.
    pub fn parse_inputs(&self, files: &[PathBuf]) -> (Vec<ParsedVideo>, Vec<(PathBuf, String)>) {
        let mut seen = HashSet::new();
        let mut videos = Vec::new();
        let mut unparsed = Vec::new();

        for file in files {
            match parse::parse_path(file, &self.config.overrides) {
                Ok(video) => {
                    if seen.insert(video.source.clone()) {
                        videos.push(video);
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file.display(), e);
                    unparsed.push((file.clone(), e.to_string()));
                }
            }
        }
        (videos, unparsed)
    }

    fn planner(&self) -> Arc<DestinationPlanner> {
        Arc::new(DestinationPlanner::new(
            Arc::clone(&self.config),
            Arc::clone(&self.registry),
        ))
    }

    /// Compute destinations without touching the filesystem.
    pub async fn plan(&self, files: &[PathBuf]) -> (Vec<PlanEntry>, Vec<(PathBuf, String)>) {
        let (videos, unparsed) = self.parse_inputs(files);
        let planner = self.planner();

        let mut entries = Vec::with_capacity(videos.len());
        for video in &videos {
            entries.push(PlanEntry {
                source: video.source.clone(),
                destination: planner.destination(video).await.map_err(|e| e.to_string()),
            });
        }
        (entries, unparsed)
    }

    /// Move every file, then convert the results.
    pub async fn run(&self, files: &[PathBuf]) -> RunReport {
        let (videos, unparsed) = self.parse_inputs(files);
        info!("Processing {} file(s)", videos.len());

        let moves = mover::move_all(
            videos,
            self.planner(),
            Arc::clone(&self.confirm),
            self.config.skip_prompts,
        )
        .await;

        let conversions = conversion::convert_all(
            &moves.conversion_candidates(),
            &self.config.conversion,
            Arc::clone(&self.confirm),
        )
        .await;

        RunReport {
            unparsed,
            moves,
            conversions,
        }
    }
}

/// Print a dry-run plan.
pub fn print_plan(entries: &[PlanEntry], unparsed: &[(PathBuf, String)]) {
    for entry in entries {
        match &entry.destination {
            Ok(dest) if paths::same_location(&entry.source, dest) => {
                println!("{} (already in place)", entry.source.display());
            }
            Ok(dest) => println!("{} -> {}", entry.source.display(), dest.display()),
            Err(e) => println!("{} !! {}", entry.source.display(), e),
        }
    }
    for (path, error) in unparsed {
        println!("{} !! {}", path.display(), error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::AutoAnswer;
    use std::path::Path;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.default_service = String::new();
        config.skip_prompts = true;
        config.directories.movies = dir.join("Movies").to_string_lossy().into_owned();
        config.directories.shows = dir.join("Shows").to_string_lossy().into_owned();
        config
    }

    #[test]
    fn local_destination_for_show() {
        let config = config_in(Path::new("/lib"));
        let media = Media::show("Show Name", 1, 2).with_ext("mkv");
        let dest = local_destination(&media, &config).unwrap();
        assert_eq!(
            dest,
            Path::new("/lib/Shows/Show Name/Show Name - Season 01/Show Name - S01E02.mkv")
        );
    }

    #[test]
    fn local_destination_template_error() {
        let mut config = config_in(Path::new("/lib"));
        config.templates.movies = "{resolution}".to_string();
        assert!(local_destination(&Media::movie("X", 1), &config).is_err());
    }

    #[test]
    fn parse_inputs_dedupes_and_skips() {
        let config = config_in(Path::new("/lib"));
        let registry = ServiceRegistry::new(&config);
        let processor = Processor::new(config, registry, Arc::new(AutoAnswer(true)));

        let (videos, unparsed) = processor.parse_inputs(&[
            PathBuf::from("/in/Movie.Name.2020.mkv"),
            PathBuf::from("/in/./Movie.Name.2020.mkv"),
            PathBuf::from("/in/1080p.x264.mkv"),
        ]);
        assert_eq!(videos.len(), 1);
        assert_eq!(unparsed.len(), 1);
    }

    #[tokio::test]
    async fn plan_does_not_touch_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Movie.Name.2020.mkv");
        std::fs::write(&src, b"x").unwrap();

        let config = config_in(dir.path());
        let registry = ServiceRegistry::new(&config);
        let processor = Processor::new(config, registry, Arc::new(AutoAnswer(true)));

        let (entries, _) = processor.plan(&[src.clone()]).await;
        assert_eq!(
            entries[0].destination,
            Ok(dir.path().join("Movies/Movie Name (2020).mkv"))
        );
        assert!(src.exists());
        assert!(!dir.path().join("Movies").exists());
    }
}
