//! Search query string parsing.
//!
//! Grammar, one token per whitespace-separated word or quoted phrase:
//! ```text
//! -"phrase"   excluded phrase
//! "phrase"    required phrase
//! -tag:#name  excluded tag
//! tag:#name   required tag
//! -word       excluded word
//! word        required word
//! ```
//! The first matching form wins. Matching is case-insensitive.

use crate::search::types::{Exclusion, SearchQuery};
use regex::Regex;
use std::sync::LazyLock;

// -?"..."  - quoted phrase, optionally negated, kept whole
// \S+      - any other run of non-whitespace
static QUERY_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"-?"[^"]*"|\S+"#).unwrap());

const TAG_PREFIX: &str = "tag:";

/// Split a query string into tokens, keeping quoted phrases intact.
pub fn tokenize(input: &str) -> Vec<&str> {
    QUERY_TOKEN
        .find_iter(input)
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse a raw query string. Never fails; unusable tokens are dropped.
pub fn parse_query(input: &str) -> SearchQuery {
    let mut query = SearchQuery {
        raw: input.to_string(),
        ..Default::default()
    };

    for token in tokenize(input) {
        let lower = token.to_lowercase();

        if let Some(phrase) = quoted(lower.strip_prefix('-')) {
            push(&mut query.exclude, phrase, Exclusion::Text);
        } else if let Some(phrase) = quoted(Some(&lower)) {
            push(&mut query.phrases, phrase, String::from);
        } else if let Some(tag) = tag_value(lower.strip_prefix('-')) {
            push(&mut query.exclude, tag, Exclusion::Tag);
        } else if let Some(tag) = tag_value(Some(&lower)) {
            push(&mut query.tags, tag, String::from);
        } else if let Some(word) = lower.strip_prefix('-') {
            push(&mut query.exclude, word, Exclusion::Text);
        } else {
            query.terms.push(lower);
        }
    }

    query
}

fn quoted(token: Option<&str>) -> Option<&str> {
    let token = token?;
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

fn tag_value(token: Option<&str>) -> Option<&str> {
    token?
        .strip_prefix(TAG_PREFIX)
        .map(|t| t.trim_start_matches('#'))
}

fn push<T>(list: &mut Vec<T>, value: &str, wrap: impl Fn(String) -> T) {
    let value = value.trim();
    if !value.is_empty() {
        list.push(wrap(value.to_string()));
    }
}
