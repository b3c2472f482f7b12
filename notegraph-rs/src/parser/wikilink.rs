//! Wikilink and embed scanning.

use crate::parser::code_block::{find_code_ranges, is_in_code};
use crate::types::LinkKind;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

// (!)?     - optional embed marker (group 1)
// \[\[     - opening [[
// ([^\[\]]+) - everything up to the closing brackets (group 2)
// \]\]     - closing ]]
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(!)?\[\[([^\[\]]+)\]\]").unwrap());

/// The parsed inside of a `[[...]]` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiTarget {
    /// Everything between the brackets, trimmed.
    pub raw: String,
    /// Display text: the `|label` override, else the target with its anchor.
    pub label: String,
    /// Note name without anchor. `None` means the current note.
    pub target: Option<String>,
    /// Heading text after `#`.
    pub heading: Option<String>,
    /// Block id after `#^` or `^`.
    pub block: Option<String>,
}

impl WikiTarget {
    /// Parse `target#heading|label`, `target#^block`, `target^block`, ...
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut parts = raw.split('|');
        let target_portion = parts.next().unwrap_or(raw);
        let label = parts
            .next()
            .unwrap_or(target_portion)
            .trim()
            .to_string();

        let (name, anchor) = match target_portion.find('#') {
            Some(idx) => (&target_portion[..idx], Some(target_portion[idx + 1..].trim())),
            None => match target_portion.find('^') {
                Some(idx) => (&target_portion[..idx], Some(target_portion[idx..].trim())),
                None => (target_portion, None),
            },
        };

        let name = name.trim();
        let (heading, block) = match anchor.filter(|a| !a.is_empty()) {
            Some(a) if a.starts_with('^') => (None, Some(a.trim_start_matches('^').to_string())),
            Some(a) => (Some(a.trim_start_matches('#').to_string()), None),
            None => (None, None),
        };

        Self {
            raw: raw.to_string(),
            label,
            target: (!name.is_empty()).then(|| name.to_string()),
            heading: heading.filter(|h| !h.is_empty()),
            block: block.filter(|b| !b.is_empty()),
        }
    }
}

/// One wikilink occurrence in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiToken {
    /// Byte range of the whole token, including `!` for embeds.
    pub span: Range<usize>,
    pub kind: LinkKind,
    pub target: WikiTarget,
}

/// Find every wikilink and embed outside code, in order of appearance.
pub fn scan_wikilinks(content: &str) -> Vec<WikiToken> {
    let code_ranges = find_code_ranges(content);
    let mut tokens = Vec::new();

    for cap in WIKILINK.captures_iter(content) {
        let Some(full) = cap.get(0) else { continue };

        if is_in_code(full.start(), &code_ranges) {
            continue;
        }

        let kind = if cap.get(1).is_some() {
            LinkKind::Embed
        } else {
            LinkKind::Link
        };

        tokens.push(WikiToken {
            span: full.range(),
            kind,
            target: WikiTarget::parse(&cap[2]),
        });
    }

    tokens
}

/// Image extensions served as static assets rather than resolved as notes.
pub const ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "avif"];

/// Check if a link target names an image asset.
pub fn is_asset_target(target: &str) -> bool {
    std::path::Path::new(target)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ASSET_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
