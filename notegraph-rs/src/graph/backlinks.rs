//! Backlink inversion.

use crate::types::{LinkContext, NoteRecord};
use std::collections::{HashMap, HashSet};

/// Invert resolved outbound links into per-target backlink lists.
///
/// Must run after every note's `outbound` list is final. Each resolved link
/// is copied to its target with `targetSlug`/`targetLabel` describing the
/// linking note. Broken links produce no backlink. Lists are sorted by source
/// title; a note without inbound links maps to nothing.
pub fn invert_links(notes: &[NoteRecord]) -> HashMap<String, Vec<LinkContext>> {
    let known: HashSet<&str> = notes.iter().map(|n| n.id.as_str()).collect();
    let mut backlinks: HashMap<String, Vec<LinkContext>> = HashMap::new();

    for note in notes {
        for link in &note.outbound {
            let Some(target) = link.resolved_target() else {
                continue;
            };
            if !known.contains(target) {
                continue;
            }

            let mut entry = link.clone();
            entry.target_slug = Some(note.slug.clone());
            entry.target_label = note.title.clone();
            backlinks.entry(target.to_string()).or_default().push(entry);
        }
    }

    for list in backlinks.values_mut() {
        sort_by_source_title(list);
    }

    backlinks
}

/// Replace every note's `backlinks` with the inverted outbound set.
pub fn attach_backlinks(notes: &mut [NoteRecord]) {
    let mut inverted = invert_links(notes);
    for note in notes.iter_mut() {
        note.backlinks = inverted.remove(&note.id).unwrap_or_default();
    }
}

/// Case-insensitive title order, ties broken by exact title.
pub fn sort_by_source_title(links: &mut [LinkContext]) {
    links.sort_by(|a, b| {
        a.source_title
            .to_lowercase()
            .cmp(&b.source_title.to_lowercase())
            .then_with(|| a.source_title.cmp(&b.source_title))
    });
}
