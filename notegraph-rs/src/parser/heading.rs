//! Heading extraction and GitHub-style heading slugs.
//!
//! The same event pass is used for the heading list and for the rendered
//! HTML, so `id` attributes always match [`Heading::id`].

use crate::types::Heading;
use pulldown_cmark::{CowStr, Event, Tag};
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;

/// Slug generator matching github-slugger: lowercase, drop punctuation,
/// one hyphen per space, `-1`, `-2`, ... for repeats.
#[derive(Debug, Default)]
pub struct GithubSlugger {
    occurrences: HashMap<String, usize>,
}

impl GithubSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug `text`, unique among everything this slugger has produced.
    pub fn slug(&mut self, text: &str) -> String {
        let original = github_slug(text);
        let mut result = original.clone();

        while self.occurrences.contains_key(&result) {
            let count = self.occurrences.entry(original.clone()).or_insert(0);
            *count += 1;
            result = format!("{}-{}", original, count);
        }

        self.occurrences.insert(result.clone(), 0);
        result
    }
}

/// Slug a single heading text without uniqueness tracking.
pub fn github_slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || is_combining_mark(*c) || matches!(c, '-' | '_' | ' '))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Walk markdown events, giving every non-empty heading a slug `id`.
///
/// Heading start/end tags are replaced by raw HTML carrying the id; the
/// inline events in between pass through untouched.
pub fn annotate_headings<'a, I>(events: I) -> (Vec<Event<'a>>, Vec<Heading>)
where
    I: Iterator<Item = Event<'a>>,
{
    let mut slugger = GithubSlugger::new();
    let mut output = Vec::new();
    let mut headings = Vec::new();
    let mut pending: Option<(u8, Vec<Event<'a>>)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => {
                pending = Some((level as u8, Vec::new()));
            }
            Event::End(Tag::Heading(..)) => {
                let Some((level, inner)) = pending.take() else {
                    continue;
                };
                let title = heading_text(&inner);
                if title.is_empty() {
                    output.push(Event::Html(CowStr::from(format!("<h{}>", level))));
                } else {
                    let id = slugger.slug(&title);
                    output.push(Event::Html(CowStr::from(format!(
                        "<h{} id=\"{}\">",
                        level, id
                    ))));
                    headings.push(Heading { id, title, level });
                }
                output.extend(inner);
                output.push(Event::Html(CowStr::from(format!("</h{}>\n", level))));
            }
            other => match pending.as_mut() {
                Some((_, inner)) => inner.push(other),
                None => output.push(other),
            },
        }
    }

    (output, headings)
}

/// Text content of a heading's inline events (raw HTML excluded).
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Extract the heading list of a markdown document.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let parser = pulldown_cmark::Parser::new_ext(markdown, crate::render::markdown_options());
    annotate_headings(parser).1
}

/// First-wins map from normalized heading text to heading id, used when
/// resolving `[[note#Heading]]`.
pub fn heading_lookup(headings: &[Heading]) -> HashMap<String, String> {
    let mut lookup = HashMap::new();
    for heading in headings {
        lookup
            .entry(crate::parser::slug::lookup_key(&heading.title))
            .or_insert_with(|| heading.id.clone());
    }
    lookup
}
