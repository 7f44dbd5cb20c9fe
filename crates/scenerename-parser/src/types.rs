//! Output types for the release name parser.

/// Fields extracted from a release filename.
///
/// Only `title` is guaranteed to be non-empty. Everything else is filled on
/// a best-effort basis and stays `None` when the corresponding marker is
/// absent from the input.
///
/// # Examples
///
/// ```
/// use scenerename_parser::parse;
///
/// let r = parse("Show.Name.S01E02.720p.WEB-DL.mkv").unwrap();
/// assert_eq!(r.title, "Show Name");
/// assert_eq!(r.season, Some(1));
/// assert_eq!(r.episode, Some(2));
/// assert_eq!(r.year, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelease {
    /// The title with dots and underscores turned into spaces.
    ///
    /// Separators that sat between the title and the first marker (e.g. the
    /// `-` in `"Show Name - S01E02"`) are kept as-is; callers decide whether
    /// to strip them.
    pub title: String,

    /// Release year (1900--2099).
    pub year: Option<u32>,

    /// Season number from `S01E02`, `S01` or `1x02` style markers.
    pub season: Option<u32>,

    /// Episode number from `S01E02` or `1x02` style markers.
    pub episode: Option<u32>,

    /// Last episode of a multi-episode release (`S01E01E02` gives 2).
    pub episode_end: Option<u32>,
}

impl ParsedRelease {
    /// Create a `ParsedRelease` with only the title populated.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            season: None,
            episode: None,
            episode_end: None,
        }
    }

    /// Whether a season marker was found.
    pub fn is_episode(&self) -> bool {
        self.season.is_some_and(|s| s > 0)
    }
}

/// Reasons a release name could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input was empty or contained only separators.
    #[error("empty release name")]
    Empty,

    /// No title text could be found before the first recognized marker.
    #[error("no title found in {0:?}")]
    NoTitle(String),
}
