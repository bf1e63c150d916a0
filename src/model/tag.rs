// File: ./src/model/tag.rs
// Hierarchical tag identifiers (`project/frontend/bugs`)
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DELIMITER: char = '/';

/// A normalized, non-empty tag path. Segments are never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagPath(String);

impl TagPath {
    /// Normalizes raw tag text. A leading `#` and surrounding whitespace are
    /// stripped and empty segments collapse (`a//b` -> `a/b`).
    ///
    /// Returns `None` for empty input and for trailing-delimiter placeholders
    /// such as `a/b/`, which name a hierarchy level but no tag of their own.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if trimmed.ends_with(DELIMITER) {
            return None;
        }

        let segments: Vec<&str> = trimmed
            .split(DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return None;
        }
        let separator = DELIMITER.to_string();
        Some(Self(segments.join(separator.as_str())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(DELIMITER)
    }

    pub fn depth(&self) -> usize {
        depth_of(&self.0)
    }

    /// Every ancestor prefix followed by the path itself, shallowest first:
    /// `a/b/c` yields `a`, `a/b`, `a/b/c`.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        let path = self.0.as_str();
        path.match_indices(DELIMITER)
            .map(move |(idx, _)| &path[..idx])
            .chain(std::iter::once(path))
    }
}

/// Number of segments in an already-normalized path.
pub fn depth_of(path: &str) -> usize {
    path.matches(DELIMITER).count() + 1
}

/// The parent prefix of a normalized path, `None` at the root.
pub fn parent_of(path: &str) -> Option<&str> {
    path.rfind(DELIMITER).map(|idx| &path[..idx])
}

/// Parses a batch of raw tags, silently dropping the malformed ones.
pub fn parse_all<I, S>(raw: I) -> Vec<TagPath>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|t| TagPath::parse(t.as_ref()))
        .collect()
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagPath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TagPath::parse(&value).ok_or_else(|| format!("invalid tag path `{}`", value))
    }
}

impl From<TagPath> for String {
    fn from(tag: TagPath) -> Self {
        tag.0
    }
}
