//! Error types for the renaming pipeline.
//!
//! Every variant is scoped to a single file: the pipeline reports it and
//! moves on to the next input. Configuration errors are fatal and handled
//! with `anyhow` in `config` and `main`.

use std::path::PathBuf;

/// Error type for scenerename.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The filename could not be tokenized into a title.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A lookup service was unavailable, unreachable or found nothing.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A template was malformed or referenced a missing field.
    #[error("Template error: {0}")]
    Template(String),

    /// Relocating a file failed.
    #[error("Failed to move {} to {}: {source}", .src.display(), .dest.display())]
    Move {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter was missing or exited unsuccessfully.
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    pub fn lookup<S: Into<String>>(msg: S) -> Self {
        Self::Lookup(msg.into())
    }

    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        Self::Conversion(msg.into())
    }

    /// Create a Move error for a failed relocation.
    pub fn relocate(src: impl Into<PathBuf>, dest: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Move {
            src: src.into(),
            dest: dest.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Lookup(err.to_string())
    }
}

impl From<scenerename_parser::ParseError> for Error {
    fn from(err: scenerename_parser::ParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias using the scenerename Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::lookup("movie not found");
        assert_eq!(err.to_string(), "Lookup error: movie not found");

        let err = Error::template("unknown helper `foo`");
        assert_eq!(err.to_string(), "Template error: unknown helper `foo`");
    }

    #[test]
    fn test_move_error_display() {
        let err = Error::relocate(
            "/in/a.mkv",
            "/out/a.mkv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to move /in/a.mkv to /out/a.mkv: denied");
    }

    #[test]
    fn test_from_parse_error() {
        let err: Error = scenerename_parser::ParseError::Empty.into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
