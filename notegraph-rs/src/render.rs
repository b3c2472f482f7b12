//! HTML rendering of link-rewritten note bodies.

use crate::parser::heading::annotate_headings;
use crate::types::Heading;
use pulldown_cmark::{Options, Parser, html};

/// Markdown extensions enabled for every parse (GFM-like).
pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Output of [`render_markdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Render markdown to HTML.
///
/// Raw HTML fragments (block anchors, note embeds, broken-link spans) pass
/// through as-is. Headings get the same ids as [`crate::parser::extract_headings`].
pub fn render_markdown(markdown: &str) -> Rendered {
    let parser = Parser::new_ext(markdown, markdown_options());
    let (events, headings) = annotate_headings(parser);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());

    Rendered {
        html: output,
        headings,
    }
}
