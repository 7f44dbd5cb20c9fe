//! scenerename-parser: release-name tokenizer for video filenames.
//!
//! Extracts the title, year and season/episode markers from scene/P2P
//! release names such as `"Show.Name.S01E02.720p.WEB-DL.mkv"`. Quality tags
//! are recognized only to find where the title ends.
//!
//! # Quick start
//!
//! ```
//! use scenerename_parser::parse;
//!
//! let r = parse("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv").unwrap();
//! assert_eq!(r.title, "The Matrix");
//! assert_eq!(r.year, Some(1999));
//! assert!(!r.is_episode());
//! ```

pub mod tokenizer;
pub mod types;
mod parser;

pub use types::{ParseError, ParsedRelease};

/// Parse a release name into its title, year and episode markers.
///
/// A trailing container extension (`.mkv`, `.mp4`, ...) and leading
/// `[group]` tags are ignored. Fails with [`ParseError::Empty`] for blank
/// input and [`ParseError::NoTitle`] when nothing but markers is present.
///
/// # Examples
///
/// ```
/// let r = scenerename_parser::parse("Show Name - S02E10 - Pilot.mkv").unwrap();
/// assert_eq!(r.title, "Show Name -");
/// assert_eq!(r.season, Some(2));
/// assert_eq!(r.episode, Some(10));
/// ```
pub fn parse(input: &str) -> Result<ParsedRelease, ParseError> {
    parser::parse(input)
}
