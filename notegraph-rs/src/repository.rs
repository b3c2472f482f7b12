//! Read-only access to written artifacts.

use crate::error::{NotegraphError, Result};
use crate::export::{
    NOTES_CONTENT_FILE, NOTES_INDEX_FILE, NotesContent, NotesIndex, TAGS_FILE, TagsFile,
    VAULT_FILE, VaultInfo, read_json,
};
use crate::graph::{TagEntry, TagStat};
use crate::types::{NoteRecord, NoteSummary};
use std::path::Path;

/// Compiled notes as a rendering layer sees them.
#[derive(Debug, Clone)]
pub struct Repository {
    info: VaultInfo,
    summaries: Vec<NoteSummary>,
    notes: Vec<NoteRecord>,
    tags: Vec<TagEntry>,
}

impl Repository {
    /// Load `vault.json`, `notes.index.json`, `tags.json` from `data_dir` and
    /// `notes-content.json` from `generated_dir`.
    pub fn open(data_dir: &Path, generated_dir: &Path) -> Result<Self> {
        let info: VaultInfo = read_json(&data_dir.join(VAULT_FILE))?;
        let index: NotesIndex = read_json(&data_dir.join(NOTES_INDEX_FILE))?;
        let tags: TagsFile = read_json(&data_dir.join(TAGS_FILE))?;
        let content: NotesContent = read_json(&generated_dir.join(NOTES_CONTENT_FILE))?;

        Ok(Self {
            info,
            summaries: index.items,
            notes: content.items,
            tags: tags.tags,
        })
    }

    pub fn vault_info(&self) -> &VaultInfo {
        &self.info
    }

    pub fn summaries(&self) -> &[NoteSummary] {
        &self.summaries
    }

    pub fn note_by_slug(&self, slug: &str) -> Result<&NoteRecord> {
        self.notes
            .iter()
            .find(|n| n.slug == slug)
            .ok_or_else(|| NotegraphError::NoteNotFound(slug.to_string()))
    }

    pub fn note_by_id(&self, id: &str) -> Result<&NoteRecord> {
        self.notes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| NotegraphError::NoteNotFound(id.to_string()))
    }

    /// Most recently updated notes first; ties by title.
    pub fn recent(&self, limit: usize) -> Vec<&NoteSummary> {
        let mut notes: Vec<&NoteSummary> = self.summaries.iter().collect();
        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        notes.truncate(limit);
        notes
    }

    /// Tag usage, most used first.
    pub fn tag_stats(&self, limit: Option<usize>) -> Vec<TagStat> {
        self.tags
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|t| TagStat {
                name: t.name.clone(),
                count: t.count,
            })
            .collect()
    }

    /// Summaries of notes carrying a tag (case-insensitive).
    pub fn notes_by_tag(&self, tag: &str) -> Vec<&NoteSummary> {
        let tag = tag.trim_start_matches('#');
        self.summaries
            .iter()
            .filter(|n| n.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }
}
