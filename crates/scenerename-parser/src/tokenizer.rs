//! Logos-based tokenizer for release filenames.
//!
//! The tokenizer only needs to know enough to find where the title ends and
//! to pull out the year and season/episode markers. Quality tags (resolution,
//! source, codecs, HDR, editions, revisions) are recognized so they can stop
//! the title scan, but their values are not interpreted.

use logos::Logos;

/// Token types emitted by the lexer.
///
/// When several patterns match the same span, the longest match wins and
/// ties are broken by priority, so keyword variants sit above [`Token::Word`]
/// and [`Token::Number`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token<'src> {
    /// `S01E02`, `S01E02E03` or a bare season tag like `S01`.
    #[regex(r"(?i)S\d{1,2}(E\d{1,3})*", priority = 12)]
    SeasonEpisode(&'src str),

    /// `1x02` style season/episode marker.
    #[regex(r"\d{1,2}[xX]\d{2,3}", priority = 12)]
    CrossEpisode(&'src str),

    /// Four-digit year 1900--2099.
    #[regex(r"(19|20)\d{2}", priority = 5)]
    Year(&'src str),

    #[regex(r"(?i)((2160|1080|720|576|480)[pi]|4K|UHD)", priority = 10)]
    Resolution(&'src str),

    #[regex(
        r"(?i)(Blu-?Ray|BRRip|BDRip|WEB-?DL|WEB-?Rip|HDTV|DVDRip|Remux)",
        priority = 8
    )]
    Source(&'src str),

    #[regex(r"(?i)(x264|x265|H\.?264|H\.?265|AVC|HEVC|AV1|VP9|XviD|DivX)", priority = 8)]
    Codec(&'src str),

    #[regex(
        r"(?i)(DTS-?HD(\.?MA)?|DTS|TrueHD|Atmos|E-?AC-?3|DD\+|DDP|AC-?3|DD5\.1|AAC|FLAC|OPUS)",
        priority = 8
    )]
    Audio(&'src str),

    #[regex(r"(?i)(HDR10\+|HDR10|HDR|DoVi|DV|HLG)", priority = 8)]
    Hdr(&'src str),

    #[regex(
        r"(?i)(Directors?[.\s'-]*Cut|Extended|Unrated|Remastered|IMAX|Theatrical)",
        priority = 7
    )]
    Edition(&'src str),

    /// `PROPER`, `REPACK` or a `v2`-style version marker.
    #[regex(r"(?i)(PROPER|REPACK|v[2-9])", priority = 7)]
    Revision(&'src str),

    #[token(".")]
    Dot,

    #[token("-")]
    Hyphen,

    #[token("_")]
    Underscore,

    #[token("(")]
    #[token("[")]
    Open,

    #[token(")")]
    #[token("]")]
    Close,

    /// Anything alphabetic that is not a keyword.
    #[regex(r"[a-zA-Z][a-zA-Z0-9']*", priority = 1)]
    Word(&'src str),

    #[regex(r"\d+", priority = 2)]
    Number(&'src str),
}

impl Token<'_> {
    /// Whether this token marks the end of the title.
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            Token::SeasonEpisode(_)
                | Token::CrossEpisode(_)
                | Token::Year(_)
                | Token::Resolution(_)
                | Token::Source(_)
                | Token::Codec(_)
                | Token::Audio(_)
                | Token::Hdr(_)
                | Token::Edition(_)
                | Token::Revision(_)
        )
    }

    /// Whether this marker is also an ordinary word (`Extended`, `Atmos`,
    /// `Proper`). These end the title only when another marker, or nothing,
    /// follows them.
    pub fn is_weak_marker(&self) -> bool {
        matches!(
            self,
            Token::Audio(_) | Token::Hdr(_) | Token::Edition(_) | Token::Revision(_)
        )
    }

    /// Whether this token only separates words.
    pub fn is_separator(&self) -> bool {
        matches!(
            self,
            Token::Dot | Token::Hyphen | Token::Underscore | Token::Open | Token::Close
        )
    }
}

/// A token together with the byte span it occupies in the input.
#[derive(Debug, Clone)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: std::ops::Range<usize>,
}

/// Tokenize an input string. Characters no pattern accepts are dropped.
pub fn tokenize(input: &str) -> Vec<SpannedToken<'_>> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| SpannedToken { token, span }))
        .collect()
}
