//! Concurrent relocation of input files to their destinations.
//!
//! Every file gets its own task. Tasks share nothing mutable: each returns a
//! [`MoveOutcome`] and the join loop in [`move_all`] folds them into a
//! [`MoveReport`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::parse::ParsedVideo;
use crate::paths;
use crate::prompt::{self, Confirm};

/// Computes where a parsed file should go.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn destination(&self, video: &ParsedVideo) -> Result<PathBuf>;
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: PathBuf, to: PathBuf },
    /// Source and destination were the same location; nothing was done.
    AlreadyPlaced(PathBuf),
    /// The user said no; the file stays at its source.
    Declined(PathBuf),
    /// No destination name could be rendered.
    Unrenamable { source: PathBuf, reason: String },
    Failed {
        source: PathBuf,
        dest: PathBuf,
        error: String,
    },
}

/// Merged outcomes of a [`move_all`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub moved: Vec<(PathBuf, PathBuf)>,
    pub placed: Vec<PathBuf>,
    pub declined: Vec<PathBuf>,
    /// Source path and error message for every file that was not relocated
    /// because of an error.
    pub failures: Vec<(PathBuf, String)>,
}

impl MoveReport {
    pub fn record(&mut self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Moved { from, to } => self.moved.push((from, to)),
            MoveOutcome::AlreadyPlaced(path) => self.placed.push(path),
            MoveOutcome::Declined(path) => self.declined.push(path),
            MoveOutcome::Unrenamable { source, reason } => {
                self.failures.push((source, format!("cannot render a name: {reason}")))
            }
            MoveOutcome::Failed { source, error, .. } => self.failures.push((source, error)),
        }
    }

    /// Files that exist after the run and may need converting: moved
    /// destinations, already placed files and declined sources.
    pub fn conversion_candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self.moved.iter().map(|(_, to)| to.clone()).collect();
        candidates.extend(self.placed.iter().cloned());
        candidates.extend(self.declined.iter().cloned());
        candidates.sort();
        candidates
    }
}

/// Relocate every video concurrently and wait for all of them.
pub async fn move_all(
    videos: Vec<ParsedVideo>,
    planner: Arc<dyn Planner>,
    confirm: Arc<dyn Confirm>,
    skip_prompts: bool,
) -> MoveReport {
    let mut tasks = JoinSet::new();
    for video in videos {
        let planner = Arc::clone(&planner);
        let confirm = Arc::clone(&confirm);
        tasks.spawn(async move { relocate(video, planner.as_ref(), &confirm, skip_prompts).await });
    }

    let mut report = MoveReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => report.record(outcome),
            Err(e) => warn!("Move task failed: {}", e),
        }
    }
    report
}

/// Resolve, confirm and move a single file.
pub async fn relocate(
    video: ParsedVideo,
    planner: &dyn Planner,
    confirm: &Arc<dyn Confirm>,
    skip_prompts: bool,
) -> MoveOutcome {
    let source = video.source.clone();
    let dest = match planner.destination(&video).await {
        Ok(dest) => dest,
        Err(e) => {
            warn!("Cannot rename {}: {}", source.display(), e);
            return MoveOutcome::Unrenamable {
                source,
                reason: e.to_string(),
            };
        }
    };

    if paths::same_location(&source, &dest) {
        debug!("{} is already in place", source.display());
        return MoveOutcome::AlreadyPlaced(source);
    }

    if !skip_prompts {
        let question = format!("Move {} -> {}?", source.display(), dest.display());
        if !prompt::ask(confirm, question).await {
            info!("Skipped {}", source.display());
            return MoveOutcome::Declined(source);
        }
    }

    match move_file(&source, &dest).await {
        Ok(()) => {
            info!("Moved {} -> {}", source.display(), dest.display());
            MoveOutcome::Moved {
                from: source,
                to: dest,
            }
        }
        Err(e) => {
            warn!("{}", e);
            MoveOutcome::Failed {
                source,
                dest,
                error: e.to_string(),
            }
        }
    }
}

/// Create the destination's parent directories, then rename. Falls back to
/// copy and remove when the rename fails, e.g. across filesystems.
///
/// An existing destination is never replaced. The destination is claimed
/// with an exclusive create before anything is written, so two sources
/// racing for one name cannot both win. On failure the source is left in
/// place and nothing is left at the destination.
pub async fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::relocate(src, dest, e))?;
    }

    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::relocate(src, dest, already_exists()),
            _ => Error::relocate(src, dest, e),
        })?;

    if let Err(rename_err) = tokio::fs::rename(src, dest).await {
        debug!("Rename failed ({}), copying {} instead", rename_err, src.display());
        if let Err(e) = copy_then_remove(src, dest).await {
            discard(dest).await;
            return Err(Error::relocate(src, dest, e));
        }
    }
    Ok(())
}

async fn copy_then_remove(src: &Path, dest: &Path) -> std::io::Result<()> {
    tokio::fs::copy(src, dest).await?;
    tokio::fs::remove_file(src).await
}

/// Remove a claimed or partially written destination.
async fn discard(dest: &Path) {
    if let Err(e) = tokio::fs::remove_file(dest).await {
        warn!("Cannot remove incomplete {}: {}", dest.display(), e);
    }
}

fn already_exists() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::AlreadyExists, "destination already exists")
}
