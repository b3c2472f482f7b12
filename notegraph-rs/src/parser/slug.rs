//! Note slugs and lookup keys.

use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Slug used when a title reduces to nothing.
pub const FALLBACK_SLUG: &str = "note";

/// Reduce text to `[a-z0-9]` runs joined by single hyphens.
///
/// Diacritics are stripped after canonical decomposition, so `Canción`
/// becomes `cancion`. Characters with no ASCII base letter are dropped.
/// Returns an empty string when nothing survives.
pub fn lookup_key(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        let lower = c.to_ascii_lowercase();
        if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(lower);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slugify a note title, falling back to [`FALLBACK_SLUG`].
pub fn slugify(text: &str) -> String {
    let slug = lookup_key(text);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Hands out unique slugs in first-seen order: `a`, `a-2`, `a-3`, ...
///
/// A suffixed candidate that is already taken, whether handed out as a
/// suffix or claimed as a natural slug, is skipped.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    taken: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `base`, suffixing it if it is already taken.
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }

        let suffix = self.next_suffix.entry(base.to_string()).or_insert(2);
        loop {
            let candidate = format!("{}-{}", base, *suffix);
            *suffix += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
