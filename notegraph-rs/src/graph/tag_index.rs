//! Tag to note index.

use crate::types::NoteRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage count of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStat {
    pub name: String,
    pub count: usize,
}

/// One `tags.json` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub count: usize,
    pub notes: Vec<String>,
}

/// Tags in the form they were first written, mapped to note ids in note order.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: BTreeMap<String, Vec<String>>,
}

impl TagIndex {
    pub fn build(notes: &[NoteRecord]) -> Self {
        let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for note in notes {
            for tag in &note.tags {
                let ids = tags.entry(tag.clone()).or_default();
                if !ids.contains(&note.id) {
                    ids.push(note.id.clone());
                }
            }
        }
        Self { tags }
    }

    /// Ids of notes carrying `tag` (case-insensitive, leading `#` ignored).
    pub fn notes_with_tag(&self, tag: &str) -> Vec<&str> {
        let wanted = tag.trim_start_matches('#').to_lowercase();
        let mut ids: Vec<&str> = self
            .tags
            .iter()
            .filter(|(name, _)| name.to_lowercase() == wanted)
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Tags by descending count, then name.
    pub fn stats(&self) -> Vec<TagStat> {
        self.entries()
            .into_iter()
            .map(|e| TagStat {
                name: e.name,
                count: e.count,
            })
            .collect()
    }

    /// Full entries in [`TagIndex::stats`] order.
    pub fn entries(&self) -> Vec<TagEntry> {
        let mut entries: Vec<TagEntry> = self
            .tags
            .iter()
            .map(|(name, ids)| TagEntry {
                name: name.clone(),
                count: ids.len(),
                notes: ids.clone(),
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        entries
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
