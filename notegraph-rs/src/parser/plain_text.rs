//! Markdown to plain text, for excerpts and search.

use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::sync::LazyLock;

static ESCAPED_BRACKET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\([\[\]])").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PERIOD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\.").unwrap());

/// Maximum excerpt length in characters, before the ellipsis.
pub const EXCERPT_LENGTH: usize = 180;

/// Strip markdown syntax and raw HTML, collapsing all whitespace.
pub fn markdown_to_plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new_ext(markdown, crate::render::markdown_options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(tag) if is_block(&tag) => text.push(' '),
            _ => {}
        }
    }

    collapse_whitespace(&ESCAPED_BRACKET.replace_all(&text, "$1"))
}

fn is_block(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Paragraph
            | Tag::Heading(..)
            | Tag::BlockQuote
            | Tag::CodeBlock(_)
            | Tag::Item
            | Tag::TableCell
            | Tag::TableRow
            | Tag::TableHead
            | Tag::FootnoteDefinition(_)
    )
}

/// Collapse whitespace runs to single spaces and tighten ` .` to `.`.
pub fn collapse_whitespace(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    SPACE_BEFORE_PERIOD
        .replace_all(&collapsed, ".")
        .trim()
        .to_string()
}

/// First [`EXCERPT_LENGTH`] characters, with `…` when truncated.
pub fn build_excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_LENGTH {
        return text.to_string();
    }
    let head: String = text.chars().take(EXCERPT_LENGTH).collect();
    format!("{}…", head.trim())
}
