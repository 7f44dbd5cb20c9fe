//! Metadata model for a video file.

use serde::{Deserialize, Serialize};

use crate::config::RenameTemplates;
use crate::error::Result;
use crate::template;

/// A feature film.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Movie {
    pub name: String,
    /// Release year, 0 when unknown.
    pub year: u32,
    pub ext: String,
}

/// A single episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Show {
    /// Series name.
    pub name: String,
    pub season: u32,
    pub episode: u32,
    /// Episode title, empty unless a lookup service supplied one.
    pub title: String,
    pub ext: String,
}

/// Metadata extracted from a filename or returned by a lookup service.
///
/// Serializes with a `kind` tag so templates see `kind`, `name`, `year` and
/// `ext` for movies, and `kind`, `name`, `season`, `episode`, `title` and
/// `ext` for shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Media {
    Movie(Movie),
    Show(Show),
}

/// Which template set and default directory a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movies,
    Shows,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movies => write!(f, "movies"),
            MediaKind::Shows => write!(f, "shows"),
        }
    }
}

impl Media {
    pub fn movie(name: impl Into<String>, year: u32) -> Self {
        Media::Movie(Movie {
            name: name.into(),
            year,
            ext: String::new(),
        })
    }

    pub fn show(name: impl Into<String>, season: u32, episode: u32) -> Self {
        Media::Show(Show {
            name: name.into(),
            season,
            episode,
            title: String::new(),
            ext: String::new(),
        })
    }

    /// A record is usable only when it has a name.
    pub fn is_valid(&self) -> bool {
        !self.name().is_empty()
    }

    pub fn name(&self) -> &str {
        match self {
            Media::Movie(m) => &m.name,
            Media::Show(s) => &s.name,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Media::Movie(m) => m.name = name.into(),
            Media::Show(s) => s.name = name.into(),
        }
    }

    pub fn ext(&self) -> &str {
        match self {
            Media::Movie(m) => &m.ext,
            Media::Show(s) => &s.ext,
        }
    }

    pub fn set_ext(&mut self, ext: impl Into<String>) {
        match self {
            Media::Movie(m) => m.ext = ext.into(),
            Media::Show(s) => s.ext = ext.into(),
        }
    }

    /// Builder-style variant of [`Media::set_ext`].
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.set_ext(ext);
        self
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Movie(_) => MediaKind::Movies,
            Media::Show(_) => MediaKind::Shows,
        }
    }

    /// Render this record with the matching template from `templates`.
    pub fn render_name(&self, templates: &RenameTemplates) -> Result<String> {
        template::render(templates.for_kind(self.kind()), self)
    }
}
