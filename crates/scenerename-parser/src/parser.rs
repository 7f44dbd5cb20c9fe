//! Core parsing logic for release filenames.
//!
//! The parser operates in three phases:
//! 1. Strip the container extension and any leading `[group]` tags.
//! 2. Tokenize the remainder and find the first marker that ends the title.
//! 3. Read the year and season/episode markers from the tail.

use crate::tokenizer::{tokenize, SpannedToken, Token};
use crate::types::{ParseError, ParsedRelease};

/// Container extensions removed before tokenizing.
const CONTAINERS: &[&str] = &[
    "mkv", "mp4", "m4v", "avi", "ts", "m2ts", "mov", "wmv", "webm", "flv", "mpg", "mpeg",
];

/// Parse a release name string into a [`ParsedRelease`].
pub fn parse(input: &str) -> Result<ParsedRelease, ParseError> {
    let name = skip_leading_tags(strip_container(input.trim()));
    if name
        .chars()
        .all(|c| c.is_whitespace() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ParseError::Empty);
    }

    let tokens = tokenize(name);
    let (title, stop) =
        extract_title(name, &tokens).ok_or_else(|| ParseError::NoTitle(input.to_string()))?;

    let mut release = ParsedRelease::new(title);
    extract_markers(&tokens[stop..], &mut release);
    Ok(release)
}

// -------------------------------------------------------------------------
// Pre-processing
// -------------------------------------------------------------------------

fn strip_container(input: &str) -> &str {
    match input.rsplit_once('.') {
        Some((head, ext)) if CONTAINERS.contains(&ext.to_ascii_lowercase().as_str()) => head,
        _ => input,
    }
}

/// Drop `[group]` style prefixes, e.g. `"[SubsPlease] Show - 01"`.
fn skip_leading_tags(mut input: &str) -> &str {
    while let Some(rest) = input.strip_prefix('[') {
        match rest.split_once(']') {
            Some((_, after)) if !after.trim().is_empty() => input = after.trim_start(),
            _ => break,
        }
    }
    input
}

// -------------------------------------------------------------------------
// Title extraction
// -------------------------------------------------------------------------

/// Find the title and the index of the token that terminated it.
///
/// The title is the raw text before the first marker, provided that text
/// holds at least one word. A year immediately followed by another year is
/// treated as part of the title (`Blade.Runner.2049.2017`), and a weak marker
/// followed by more words is too (`The.Extended.Family`). When no marker
/// produces a title, the whole input is used, minus a trailing year.
fn extract_title(input: &str, tokens: &[SpannedToken<'_>]) -> Option<(String, usize)> {
    for (i, st) in tokens.iter().enumerate() {
        if !st.token.is_marker() {
            continue;
        }
        let next = next_significant(&tokens[i + 1..]);
        if matches!(st.token, Token::Year(_))
            && next.is_some_and(|n| matches!(n.token, Token::Year(_)))
        {
            continue;
        }
        if st.token.is_weak_marker() && next.is_some_and(|n| !n.token.is_marker()) {
            continue;
        }
        if !has_title_text(&tokens[..i]) {
            continue;
        }
        let title = clean_title(&input[..st.span.start]);
        if !title.is_empty() {
            return Some((title, i));
        }
    }

    if !has_title_text(tokens) {
        return None;
    }
    if let Some(last) = tokens.iter().rposition(|st| !st.token.is_separator()) {
        if matches!(tokens[last].token, Token::Year(_)) {
            let title = clean_title(&input[..tokens[last].span.start]);
            if !title.is_empty() {
                return Some((title, last));
            }
        }
    }
    let title = clean_title(input);
    (!title.is_empty()).then_some((title, 0))
}

/// Whether a run of tokens holds anything besides quality tags and
/// separators. Years count as text so `1917.2019` keeps its title.
fn has_title_text(tokens: &[SpannedToken<'_>]) -> bool {
    tokens
        .iter()
        .any(|st| matches!(st.token, Token::Year(_) | Token::Word(_) | Token::Number(_)))
}

fn next_significant<'a, 'src>(tokens: &'a [SpannedToken<'src>]) -> Option<&'a SpannedToken<'src>> {
    tokens.iter().find(|st| !st.token.is_separator())
}

/// Turn dots and underscores into spaces and collapse whitespace.
///
/// Hyphens are left alone, including a dangling one before the first marker.
fn clean_title(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c == '(' || c == '[' || c.is_whitespace())
        .to_string()
}

// -------------------------------------------------------------------------
// Marker extraction
// -------------------------------------------------------------------------

fn extract_markers(tokens: &[SpannedToken<'_>], release: &mut ParsedRelease) {
    for st in tokens {
        match &st.token {
            Token::Year(text) if release.year.is_none() => {
                release.year = text.parse().ok();
            }
            Token::SeasonEpisode(text) if release.season.is_none() => {
                parse_season_episode(text, release);
            }
            Token::CrossEpisode(text) if release.season.is_none() => {
                parse_cross_episode(text, release);
            }
            _ => {}
        }
    }
}

/// Parse `S01E02`, `S01E02E03` or `S01`.
fn parse_season_episode(text: &str, release: &mut ParsedRelease) {
    let upper = text.to_ascii_uppercase();
    let Some(body) = upper.strip_prefix('S') else {
        return;
    };

    let mut parts = body.split('E');
    release.season = parts.next().and_then(|s| s.parse().ok());

    let episodes: Vec<u32> = parts.filter_map(|e| e.parse().ok()).collect();
    release.episode = episodes.first().copied();
    if episodes.len() > 1 {
        release.episode_end = episodes.last().copied();
    }
}

/// Parse `1x02`.
fn parse_cross_episode(text: &str, release: &mut ParsedRelease) {
    let upper = text.to_ascii_uppercase();
    if let Some((season, episode)) = upper.split_once('X') {
        release.season = season.parse().ok();
        release.episode = episode.parse().ok();
    }
}
