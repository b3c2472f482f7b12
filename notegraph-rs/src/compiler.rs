//! The compilation pipeline.
//!
//! Phases run in order; within a phase every note is processed in parallel.
//! Name lookup is only built once all notes are normalized, and backlinks only
//! once every note's outbound links are final.

use crate::config::Config;
use crate::error::Result;
use crate::export::AssetLocator;
use crate::graph::{AliasIndex, NoteGraph, TagIndex, attach_backlinks, resolve_note};
use crate::note::{NoteDraft, assign_identities};
use crate::render::render_markdown;
use crate::types::{CompileWarning, LinkContext, NoteRecord, NoteSummary};
use crate::vault::Vault;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Inputs of a compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub content_dir: PathBuf,
    /// Prefix of public asset URLs, e.g. `/vault`.
    pub asset_url_prefix: String,
}

impl From<&Config> for CompileOptions {
    fn from(config: &Config) -> Self {
        Self {
            content_dir: config.content_dir(),
            asset_url_prefix: config.paths.asset_url_prefix.clone(),
        }
    }
}

/// Normalized notes plus the lookup built over them.
#[derive(Debug)]
pub struct Prepared {
    pub vault: Vault,
    /// Sorted by slug, ids assigned.
    pub drafts: Vec<NoteDraft>,
    pub index: AliasIndex,
}

/// Load and normalize every note, then build the alias index.
pub fn prepare(options: &CompileOptions) -> Result<Prepared> {
    let vault = Vault::open(&options.content_dir)?;
    let documents = vault.load_documents()?;
    info!(count = documents.len(), root = %vault.root.display(), "loaded documents");

    let drafts = documents
        .par_iter()
        .map(NoteDraft::from_document)
        .collect::<Result<Vec<_>>>()?;
    let drafts = assign_identities(drafts);
    debug!(count = drafts.len(), "normalized notes");

    let index = AliasIndex::build(&drafts);
    debug!(keys = index.len(), "built alias index");

    Ok(Prepared {
        vault,
        drafts,
        index,
    })
}

/// Result of a compilation run.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    /// Final notes, ordered by id.
    pub notes: Vec<NoteRecord>,
    /// Broken links and missing assets, in note order.
    pub warnings: Vec<CompileWarning>,
    pub elapsed: Duration,
}

impl Compilation {
    pub fn summaries(&self) -> Vec<NoteSummary> {
        self.notes.iter().map(NoteSummary::from).collect()
    }

    pub fn graph(&self) -> NoteGraph {
        NoteGraph::build(&self.notes)
    }

    pub fn tag_index(&self) -> TagIndex {
        TagIndex::build(&self.notes)
    }

    /// Every outbound link in note order.
    pub fn outbound_links(&self) -> impl Iterator<Item = &LinkContext> {
        self.notes.iter().flat_map(|n| n.outbound.iter())
    }

    pub fn broken_links(&self) -> Vec<&LinkContext> {
        self.outbound_links().filter(|l| l.is_broken).collect()
    }

    pub fn note_by_slug(&self, slug: &str) -> Option<&NoteRecord> {
        self.notes.iter().find(|n| n.slug == slug)
    }
}

/// Compile a content folder into final note records.
///
/// Unreadable files and invalid frontmatter abort the run. Unresolved links
/// and missing assets are collected as warnings.
pub fn compile(options: &CompileOptions) -> Result<Compilation> {
    let started = Instant::now();
    let Prepared {
        vault,
        drafts,
        index,
    } = prepare(options)?;
    let assets = AssetLocator::new(&vault.root, &options.asset_url_prefix);

    let compiled: Vec<(NoteRecord, Vec<CompileWarning>)> = drafts
        .into_par_iter()
        .map(|draft| {
            let resolution = resolve_note(&draft, &index, &assets);
            let rendered = render_markdown(&resolution.body);
            debug!(
                slug = %draft.slug,
                links = resolution.outbound.len(),
                "resolved note"
            );

            let record = NoteRecord {
                id: draft.id,
                slug: draft.slug,
                title: draft.title,
                aliases: draft.aliases,
                tags: draft.tags,
                properties: draft.properties,
                excerpt: draft.excerpt,
                updated_at: draft.updated_at,
                headings: rendered.headings,
                html: rendered.html,
                plain_text: draft.plain_text,
                block_ids: draft.block_ids,
                backlinks: Vec::new(),
                outbound: resolution.outbound,
            };
            (record, resolution.warnings)
        })
        .collect();

    let mut notes = Vec::with_capacity(compiled.len());
    let mut warnings = Vec::new();
    for (note, note_warnings) in compiled {
        notes.push(note);
        warnings.extend(note_warnings);
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    attach_backlinks(&mut notes);

    let compilation = Compilation {
        notes,
        warnings,
        elapsed: started.elapsed(),
    };
    info!(
        notes = compilation.notes.len(),
        links = compilation.outbound_links().count(),
        warnings = compilation.warnings.len(),
        "compiled vault"
    );
    Ok(compilation)
}
