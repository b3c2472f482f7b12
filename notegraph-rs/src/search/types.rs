//! Query and result types for note search.

use crate::types::NoteSummary;
use serde::{Deserialize, Serialize};

/// A parsed search query. All values are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The input string as given.
    pub raw: String,
    /// Required bare words.
    pub terms: Vec<String>,
    /// Required `"quoted phrases"`, without quotes.
    pub phrases: Vec<String>,
    /// Anything prefixed with `-`.
    pub exclude: Vec<Exclusion>,
    /// Required `tag:#name` tags, without the `#`.
    pub tags: Vec<String>,
}

impl SearchQuery {
    /// Whether the query has at least one term, phrase or tag.
    ///
    /// Queries without one match nothing.
    pub fn has_positive(&self) -> bool {
        !(self.terms.is_empty() && self.phrases.is_empty() && self.tags.is_empty())
    }
}

/// A negated criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Exclusion {
    /// `-word` or `-"phrase"`: rejected if found in the searchable text.
    Text(String),
    /// `-tag:#name`: rejected if the note carries the tag.
    Tag(String),
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub note: NoteSummary,
    pub score: u32,
    /// Text around the first match, with matches wrapped in `<mark>`.
    pub snippet: String,
    /// Matched phrases, then terms, then `#tags`.
    pub matches: Vec<String>,
}
