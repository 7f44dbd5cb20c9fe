//! Turn filenames into [`Media`] records.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::media::Media;
use crate::overrides::{capitalize_words, Overrides};
use crate::paths;

/// An input file and the metadata parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVideo {
    /// Absolute, normalized source path.
    pub source: PathBuf,
    pub media: Media,
}

/// Parse a bare filename (no directories) into a record.
///
/// The extension is not set here; see [`parse_path`].
pub fn parse_filename(file_name: &str, overrides: &Overrides) -> Result<Media> {
    let release = scenerename_parser::parse(file_name)?;

    let raw = release.title.trim();
    let raw = raw.strip_suffix('-').unwrap_or(raw).trim_end();
    if raw.is_empty() {
        return Err(Error::parse(format!("no title in {file_name:?}")));
    }

    let name = capitalize_words(&overrides.apply(raw));

    let media = if release.is_episode() {
        Media::show(
            name,
            release.season.unwrap_or(0),
            release.episode.unwrap_or(0),
        )
    } else {
        Media::movie(name, release.year.unwrap_or(0))
    };
    tracing::debug!("Parsed {:?} as {:?}", file_name, media);
    Ok(media)
}

/// Parse a path, attaching the absolute source and the file extension.
pub fn parse_path(path: &Path, overrides: &Overrides) -> Result<ParsedVideo> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(|| Error::parse(format!("{} has no file name", path.display())))?;

    let media = parse_filename(&file_name, overrides)?.with_ext(paths::extension_of(path));
    Ok(ParsedVideo {
        source: paths::clean(path),
        media,
    })
}
