//! Block anchors (`^block-id`).

use crate::parser::code_block::{find_code_ranges, is_in_code};
use regex::Regex;
use std::sync::LazyLock;

// The look-around rules (not after `#` or `[`, followed by whitespace or
// end of input) are checked by hand since `regex` has no look-around.
static BLOCK_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^([A-Za-z0-9_-]+)").unwrap());

/// A body with its block anchors replaced by inline HTML markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedBody {
    pub text: String,
    /// Anchor ids in order of first appearance.
    pub block_ids: Vec<String>,
}

/// HTML marker that makes a block addressable as `#block-<id>`.
pub fn anchor_marker(block_id: &str) -> String {
    format!("<span id=\"block-{}\" class=\"block-anchor\"></span>", block_id)
}

/// Replace every `^id` block anchor with an [`anchor_marker`].
///
/// An anchor must not directly follow `#` or `[` (those are link anchors)
/// and must be followed by whitespace or the end of the body. Anchors in
/// code are left alone.
pub fn annotate_block_anchors(markdown: &str) -> AnnotatedBody {
    let code_ranges = find_code_ranges(markdown);
    let mut text = String::with_capacity(markdown.len());
    let mut block_ids: Vec<String> = Vec::new();
    let mut last = 0;

    for cap in BLOCK_ANCHOR.captures_iter(markdown) {
        let Some(full) = cap.get(0) else { continue };
        let id = &cap[1];

        let preceded_by_link = markdown[..full.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c == '#' || c == '[');
        let followed_by_space = markdown[full.end()..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);

        if preceded_by_link || !followed_by_space || is_in_code(full.start(), &code_ranges) {
            continue;
        }

        text.push_str(&markdown[last..full.start()]);
        text.push_str(&anchor_marker(id));
        last = full.end();

        if !block_ids.iter().any(|existing| existing == id) {
            block_ids.push(id.to_string());
        }
    }

    text.push_str(&markdown[last..]);
    AnnotatedBody { text, block_ids }
}
