//! User-defined title overrides.
//!
//! An override maps a case-insensitive substring to a replacement title. When
//! the substring occurs anywhere in a parsed title, the whole title becomes
//! the replacement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pattern to replacement table.
///
/// Serialized as a plain TOML table (`"pattern" = "Replacement"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides(BTreeMap<String, String>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an override. Returns the previous replacement.
    pub fn insert(
        &mut self,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(pattern.into(), replacement.into())
    }

    /// Remove an override by pattern, ignoring case.
    pub fn remove(&mut self, pattern: &str) -> Option<String> {
        let key = self
            .0
            .keys()
            .find(|k| k.eq_ignore_ascii_case(pattern))
            .cloned()?;
        self.0.remove(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the override matching `title`.
    ///
    /// The longest matching pattern wins. Patterns of equal length resolve to
    /// the lexicographically smallest, which is the first one in map order.
    pub fn find(&self, title: &str) -> Option<(&str, &str)> {
        let lowered = title.to_lowercase();
        let mut best: Option<(&str, &str)> = None;
        for (pattern, replacement) in &self.0 {
            if pattern.is_empty() || !lowered.contains(&pattern.to_lowercase()) {
                continue;
            }
            if best.map_or(true, |(b, _)| pattern.len() > b.len()) {
                best = Some((pattern, replacement));
            }
        }
        best
    }

    /// Apply the winning override to `title`, or return it unchanged.
    pub fn apply(&self, title: &str) -> String {
        match self.find(title) {
            Some((pattern, replacement)) => {
                tracing::debug!("Override {:?} matched {:?}", pattern, title);
                capitalize_words(replacement)
            }
            None => title.to_string(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Uppercase the first character of every space-delimited word.
///
/// The rest of each word is left as-is, so `"mr. ROBOT"` becomes
/// `"Mr. ROBOT"`.
pub fn capitalize_words(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
