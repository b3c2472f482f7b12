//! JSON artifact shapes and the artifact writer.

use crate::compiler::Compilation;
use crate::config::Config;
use crate::error::Result;
use crate::graph::{NoteGraph, TagEntry};
use crate::types::{LinkContext, LinkKind, NoteRecord, NoteSummary};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const VAULT_FILE: &str = "vault.json";
pub const NOTES_INDEX_FILE: &str = "notes.index.json";
pub const LINKS_FILE: &str = "links.json";
pub const GRAPH_FILE: &str = "graph.json";
pub const TAGS_FILE: &str = "tags.json";
pub const NOTES_CONTENT_FILE: &str = "notes-content.json";

/// `vault.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultInfo {
    pub name: String,
    pub default_lang: String,
    pub note_count: usize,
    pub build: BuildInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    /// RFC 3339, UTC, millisecond precision.
    pub built_at: String,
}

impl VaultInfo {
    pub fn new(config: &Config, note_count: usize) -> Self {
        Self {
            name: config.vault_label(),
            default_lang: config.vault.default_lang.clone(),
            note_count,
            build: BuildInfo {
                version: config.vault.build_version.clone(),
                built_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

/// `notes.index.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesIndex {
    pub items: Vec<NoteSummary>,
}

/// `notes-content.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesContent {
    pub items: Vec<NoteRecord>,
}

/// What a `links.json` edge points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkTarget {
    Note { id: String },
    Heading { id: String, heading: String },
    Block { id: String, block: String },
}

impl LinkTarget {
    /// Target of a resolved link; `None` when broken.
    pub fn of(link: &LinkContext) -> Option<Self> {
        let id = link.resolved_target()?.to_string();
        Some(match (&link.block_id, &link.heading_id) {
            (Some(block), _) => Self::Block {
                id,
                block: block.clone(),
            },
            (None, Some(heading)) => Self::Heading {
                id,
                heading: heading.clone(),
            },
            (None, None) => Self::Note { id },
        })
    }
}

/// One `links.json` edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEdge {
    pub source: String,
    pub target: Option<LinkTarget>,
    pub kind: LinkKind,
    pub is_broken: bool,
}

/// `links.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksFile {
    pub edges: Vec<LinkEdge>,
}

impl LinksFile {
    pub fn build(compilation: &Compilation) -> Self {
        let edges = compilation
            .outbound_links()
            .map(|link| LinkEdge {
                source: link.source_id.clone(),
                target: LinkTarget::of(link),
                kind: link.kind,
                is_broken: link.is_broken,
            })
            .collect();
        Self { edges }
    }
}

/// `tags.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsFile {
    pub tags: Vec<TagEntry>,
}

/// Paths written by [`write_artifacts`].
#[derive(Debug, Clone, Default)]
pub struct WrittenArtifacts {
    pub files: Vec<PathBuf>,
    pub link_edges: usize,
    pub graph_edges: usize,
}

/// Write every artifact of a compilation.
///
/// Public files go to `paths.data_dir`; `notes-content.json` goes to
/// `paths.generated_dir`. Both are created if missing.
pub fn write_artifacts(compilation: &Compilation, config: &Config) -> Result<WrittenArtifacts> {
    let data_dir = &config.paths.data_dir;
    let generated_dir = &config.paths.generated_dir;
    fs::create_dir_all(data_dir)?;
    fs::create_dir_all(generated_dir)?;

    let links = LinksFile::build(compilation);
    let graph: NoteGraph = compilation.graph();
    let mut written = WrittenArtifacts {
        link_edges: links.edges.len(),
        graph_edges: graph.edges.len(),
        ..Default::default()
    };

    let info = VaultInfo::new(config, compilation.notes.len());
    written.files.push(write_json(&data_dir.join(VAULT_FILE), &info)?);

    let index = NotesIndex {
        items: compilation.summaries(),
    };
    written.files.push(write_json(&data_dir.join(NOTES_INDEX_FILE), &index)?);
    written.files.push(write_json(&data_dir.join(LINKS_FILE), &links)?);
    written.files.push(write_json(&data_dir.join(GRAPH_FILE), &graph)?);

    let tags = TagsFile {
        tags: compilation.tag_index().entries(),
    };
    written.files.push(write_json(&data_dir.join(TAGS_FILE), &tags)?);

    let content = NotesContent {
        items: compilation.notes.clone(),
    };
    written
        .files
        .push(write_json(&generated_dir.join(NOTES_CONTENT_FILE), &content)?);

    Ok(written)
}

/// Pretty-print `value` to `path` (two-space indent).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "wrote artifact");
    Ok(path.to_path_buf())
}

/// Read a JSON artifact back.
pub fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(crate::error::NotegraphError::ArtifactNotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
