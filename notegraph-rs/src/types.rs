//! Shared types for notegraph.
//!
//! Everything here is serialized with camelCase keys, which is the shape the
//! rendering layer reads from the JSON artifacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A heading extracted from a note body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// In-page anchor id (GitHub-style slug, unique within the note).
    pub id: String,

    /// Heading text with markdown stripped.
    pub title: String,

    /// Heading level (1-6).
    pub level: u8,
}

/// Whether a reference was written as a link or an embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// `[[target]]`
    Link,
    /// `![[target]]`
    Embed,
}

/// One resolved or unresolved wikilink occurrence.
///
/// In a note's `outbound` list the `target*` fields describe the linked note.
/// In a `backlinks` list they are rewritten to describe the linking note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkContext {
    pub source_id: String,
    pub source_slug: String,
    pub source_title: String,

    /// Whitespace-collapsed text surrounding the occurrence.
    pub preview: String,

    /// Display text of the link.
    pub target_label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    pub kind: LinkKind,

    pub is_broken: bool,
}

impl LinkContext {
    /// Returns the target note id when this link resolved successfully.
    pub fn resolved_target(&self) -> Option<&str> {
        if self.is_broken {
            None
        } else {
            self.target_id.as_deref()
        }
    }
}

/// A fully compiled note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Stable id (`n_01`, `n_02`, ...) assigned in slug order.
    pub id: String,
    pub slug: String,
    pub title: String,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub excerpt: String,
    /// `YYYY-MM-DD`
    pub updated_at: String,
    pub headings: Vec<Heading>,
    pub html: String,
    pub plain_text: String,
    #[serde(default)]
    pub block_ids: Vec<String>,
    pub backlinks: Vec<LinkContext>,
    pub outbound: Vec<LinkContext>,
}

/// The searchable projection of a note (`notes.index.json` item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    #[serde(default)]
    pub plain_text: String,
    pub updated_at: String,
}

impl From<&NoteRecord> for NoteSummary {
    fn from(note: &NoteRecord) -> Self {
        Self {
            id: note.id.clone(),
            slug: note.slug.clone(),
            title: note.title.clone(),
            tags: note.tags.clone(),
            excerpt: note.excerpt.clone(),
            plain_text: note.plain_text.clone(),
            updated_at: note.updated_at.clone(),
        }
    }
}

/// A node of the note graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
}

/// A weighted, directed edge between two notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Number of resolved link occurrences collapsed into this edge.
    pub weight: u32,
}

/// Category of a non-fatal compilation diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A wikilink whose note, heading or block could not be resolved.
    BrokenLink,
    /// An asset embed whose file does not exist under the content root.
    MissingAsset,
}

/// A non-fatal diagnostic produced during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileWarning {
    pub kind: WarningKind,
    pub note_slug: String,
    pub message: String,
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.kind {
            WarningKind::BrokenLink => "link",
            WarningKind::MissingAsset => "asset",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}
