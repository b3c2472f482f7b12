//! Name lookup used by link resolution.
//!
//! Every note registers its slug, its slug without hyphens, its title, its
//! file stem and each declared alias, all normalized with
//! [`lookup_key`]. When two notes normalize to the same key the note that
//! registered first (lowest id) keeps it; the later one is not reachable by
//! that name.

use crate::note::NoteDraft;
use crate::parser::{heading_lookup, lookup_key};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Resolution-only projection of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Normalized heading text -> heading id.
    pub heading_lookup: HashMap<String, String>,
    pub block_ids: HashSet<String>,
}

impl AliasRecord {
    pub fn from_draft(note: &NoteDraft) -> Self {
        Self {
            id: note.id.clone(),
            slug: note.slug.clone(),
            title: note.title.clone(),
            excerpt: note.excerpt.clone(),
            heading_lookup: heading_lookup(&note.headings),
            block_ids: note.block_ids.iter().cloned().collect(),
        }
    }

    /// Heading id for a `#Heading` anchor, matched on normalized text.
    pub fn heading_id(&self, heading: &str) -> Option<&str> {
        self.heading_lookup
            .get(&lookup_key(heading))
            .map(String::as_str)
    }

    pub fn has_block(&self, block_id: &str) -> bool {
        self.block_ids.contains(block_id)
    }
}

/// Normalized name -> note record.
#[derive(Debug, Default)]
pub struct AliasIndex {
    records: Vec<AliasRecord>,
    keys: HashMap<String, usize>,
}

impl AliasIndex {
    /// Build the index over the complete, id-assigned note set.
    pub fn build(notes: &[NoteDraft]) -> Self {
        let mut index = Self::default();

        for note in notes {
            let position = index.records.len();
            index.records.push(AliasRecord::from_draft(note));

            for candidate in candidate_names(note) {
                let key = lookup_key(&candidate);
                if key.is_empty() {
                    continue;
                }
                match index.keys.get(&key) {
                    Some(&owner) if owner != position => {
                        debug!(
                            key = %key,
                            kept = %index.records[owner].slug,
                            ignored = %note.slug,
                            "alias key already registered"
                        );
                    }
                    Some(_) => {}
                    None => {
                        index.keys.insert(key, position);
                    }
                }
            }
        }

        index
    }

    /// Look a raw name up, normalizing it first.
    pub fn resolve(&self, name: &str) -> Option<&AliasRecord> {
        let key = lookup_key(name);
        if key.is_empty() {
            return None;
        }
        self.keys.get(&key).map(|&i| &self.records[i])
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registered keys pointing at a note, sorted.
    pub fn keys_for(&self, id: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .keys
            .iter()
            .filter(|&(_, &i)| self.records[i].id == id)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}

fn candidate_names(note: &NoteDraft) -> Vec<String> {
    let mut names = vec![
        note.slug.clone(),
        note.slug.replace('-', ""),
        note.title.clone(),
        note.file_stem.clone(),
    ];
    names.extend(note.aliases.iter().cloned());
    names
}
