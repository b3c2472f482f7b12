//! Note normalization: identity, metadata, anchors, text and headings.

use crate::error::{NotegraphError, Result};
use crate::parser::{
    SlugRegistry, annotate_block_anchors, build_excerpt, extract_headings,
    markdown_to_plain_text, slugify,
};
use crate::types::{Heading, LinkContext};
use crate::vault::RawDocument;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

/// A note between normalization and final output.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    /// Empty until [`assign_identities`] runs.
    pub id: String,
    pub slug: String,
    pub title: String,
    /// Declared aliases, then the file stem and title, deduplicated.
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub updated_at: String,
    pub relative_path: String,
    pub file_stem: String,
    /// Body with block anchors replaced by HTML markers.
    pub body: String,
    pub block_ids: Vec<String>,
    pub plain_text: String,
    pub excerpt: String,
    pub headings: Vec<Heading>,
    pub outbound: Vec<LinkContext>,
    pub backlinks: Vec<LinkContext>,
}

impl NoteDraft {
    /// Normalize one document. Depends on nothing but the document itself.
    ///
    /// `slug` holds the unsuffixed base slug until [`assign_identities`].
    pub fn from_document(raw: &RawDocument) -> Result<Self> {
        let fm = &raw.frontmatter;
        let title = fm.title.clone().unwrap_or_else(|| raw.file_stem.clone());

        let slug_seed = match (&fm.title, fm.aliases.first()) {
            (Some(title), _) => title.as_str(),
            (None, Some(alias)) => alias.as_str(),
            (None, None) => title.as_str(),
        };
        let slug = slugify(slug_seed);

        let mut aliases: Vec<String> = Vec::new();
        for alias in fm.aliases.iter().chain([&raw.file_stem, &title]) {
            if !alias.is_empty() && !aliases.contains(alias) {
                aliases.push(alias.clone());
            }
        }

        let updated_at = match &fm.updated_at {
            Some(value) => normalize_date(value, &raw.path)?,
            None => raw.modified.format("%Y-%m-%d").to_string(),
        };

        let annotated = annotate_block_anchors(&raw.body);
        let plain_text = markdown_to_plain_text(&annotated.text);
        let excerpt = build_excerpt(&plain_text);
        let headings = extract_headings(&annotated.text);

        Ok(Self {
            id: String::new(),
            slug,
            title,
            aliases,
            tags: fm.tags.clone(),
            properties: fm.properties.clone(),
            updated_at,
            relative_path: raw.relative_path.clone(),
            file_stem: raw.file_stem.clone(),
            body: annotated.text,
            block_ids: annotated.block_ids,
            plain_text,
            excerpt,
            headings,
            outbound: Vec::new(),
            backlinks: Vec::new(),
        })
    }
}

#[cfg(test)]
impl NoteDraft {
    /// Draft with identity fields only, for tests of later phases.
    pub(crate) fn stub(id: &str, slug: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            aliases: vec![title.to_string()],
            tags: Vec::new(),
            properties: BTreeMap::new(),
            updated_at: "2024-01-01".to_string(),
            relative_path: format!("{}.md", slug),
            file_stem: slug.to_string(),
            body: String::new(),
            block_ids: Vec::new(),
            plain_text: String::new(),
            excerpt: String::new(),
            headings: Vec::new(),
            outbound: Vec::new(),
            backlinks: Vec::new(),
        }
    }
}

/// Make slugs unique and assign ids.
///
/// Collisions are suffixed `-2`, `-3`, ... in the order the drafts are given
/// (discovery order). Drafts are then sorted by slug and numbered `n_01`,
/// `n_02`, ..., so ids do not depend on discovery order.
pub fn assign_identities(mut drafts: Vec<NoteDraft>) -> Vec<NoteDraft> {
    let mut registry = SlugRegistry::new();
    for draft in &mut drafts {
        draft.slug = registry.claim(&draft.slug);
    }

    drafts.sort_by(|a, b| a.slug.cmp(&b.slug));
    for (index, draft) in drafts.iter_mut().enumerate() {
        draft.id = format!("n_{:02}", index + 1);
    }

    drafts
}

/// Normalize a frontmatter date to `YYYY-MM-DD` (UTC for offset timestamps).
pub fn normalize_date(value: &str, path: &Path) -> Result<String> {
    let value = value.trim();

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(value, "%Y/%m/%d").ok());

    match date {
        Some(date) => Ok(date.format("%Y-%m-%d").to_string()),
        None => Err(NotegraphError::InvalidDate {
            path: path.to_path_buf(),
            value: value.to_string(),
        }),
    }
}
