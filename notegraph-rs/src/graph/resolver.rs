//! Wikilink resolution and body rewriting.
//!
//! Runs in two passes. [`resolve_tokens`] turns every token of a body into a
//! [`LinkDecision`] without touching the text. [`apply_decisions`] then
//! splices the replacement markup in. The first pass holds all of the
//! resolution logic and can be tested on its own.

use crate::export::{AssetLocator, AssetRef};
use crate::graph::alias_index::{AliasIndex, AliasRecord};
use crate::note::NoteDraft;
use crate::parser::{WikiTarget, scan_wikilinks};
use crate::types::{CompileWarning, LinkContext, LinkKind, WarningKind};
use std::ops::Range;

/// Characters of context kept on each side of a link in its preview.
pub const PREVIEW_RADIUS: usize = 80;

/// What to do with one wikilink token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDecision {
    /// Byte range of the token in the source body.
    pub span: Range<usize>,
    pub target: WikiTarget,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An image embed; never a note link.
    Asset { asset: AssetRef, exists: bool },
    /// A note reference, resolved or broken.
    Note {
        context: LinkContext,
        /// Summary of the target, for embeds that resolved.
        embed: Option<EmbedPreview>,
    },
}

/// What a resolved note embed shows inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedPreview {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
}

impl LinkDecision {
    /// Markup that replaces the token.
    pub fn replacement(&self) -> String {
        let label = escape_html(&self.target.label);

        match &self.outcome {
            Outcome::Asset { asset, .. } => format!("![{}]({})", label, asset.public_url),
            Outcome::Note { context, .. } if context.is_broken => format!(
                "<span class=\"broken-link\" title=\"Unresolved link\">{}</span>",
                label
            ),
            Outcome::Note {
                embed: Some(embed), ..
            } => note_embed(embed, &self.target.label),
            Outcome::Note { context, .. } => format!("[{}]({})", label, note_href(context)),
        }
    }

    /// Warning for a broken link or a missing asset.
    pub fn warning(&self, note_slug: &str) -> Option<CompileWarning> {
        match &self.outcome {
            Outcome::Asset {
                asset,
                exists: false,
                ..
            } => Some(CompileWarning {
                kind: WarningKind::MissingAsset,
                note_slug: note_slug.to_string(),
                message: format!(
                    "{} could not find {} referenced in [[{}]]",
                    note_slug, asset.source_path, self.target.raw
                ),
            }),
            Outcome::Note { context, .. } if context.is_broken => Some(CompileWarning {
                kind: WarningKind::BrokenLink,
                note_slug: note_slug.to_string(),
                message: format!(
                    "{} could not resolve [[{}]] ({})",
                    note_slug,
                    self.target.raw,
                    self.target.target.as_deref().unwrap_or("current note")
                ),
            }),
            _ => None,
        }
    }

    /// The link context this token contributes to `outbound`.
    pub fn context(&self) -> Option<&LinkContext> {
        match &self.outcome {
            Outcome::Note { context, .. } => Some(context),
            Outcome::Asset { .. } => None,
        }
    }
}

/// Result of resolving one note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Body with every token replaced.
    pub body: String,
    pub outbound: Vec<LinkContext>,
    pub warnings: Vec<CompileWarning>,
}

/// Resolve and rewrite every wikilink of a note.
pub fn resolve_note(note: &NoteDraft, index: &AliasIndex, assets: &AssetLocator) -> Resolution {
    let decisions = resolve_tokens(note, index, assets);

    Resolution {
        body: apply_decisions(&note.body, &decisions),
        outbound: decisions
            .iter()
            .filter_map(LinkDecision::context)
            .cloned()
            .collect(),
        warnings: decisions
            .iter()
            .filter_map(|d| d.warning(&note.slug))
            .collect(),
    }
}

/// First pass: decide the outcome of every token in the note body.
pub fn resolve_tokens(
    note: &NoteDraft,
    index: &AliasIndex,
    assets: &AssetLocator,
) -> Vec<LinkDecision> {
    scan_wikilinks(&note.body)
        .into_iter()
        .map(|token| {
            // Only embeds can be assets; a plain `[[pic.png]]` is a note link.
            let asset = match token.kind {
                LinkKind::Embed => token.target.target.as_deref().and_then(|t| assets.locate(t)),
                LinkKind::Link => None,
            };

            let outcome = match asset {
                Some(asset) => Outcome::Asset {
                    exists: assets.exists(&asset),
                    asset,
                },
                None => {
                    let preview = preview(&note.body, &token.span);
                    resolve_note_target(note, &token.target, token.kind, preview, index)
                }
            };

            LinkDecision {
                span: token.span,
                target: token.target,
                outcome,
            }
        })
        .collect()
}

fn resolve_note_target(
    note: &NoteDraft,
    target: &WikiTarget,
    kind: LinkKind,
    preview: String,
    index: &AliasIndex,
) -> Outcome {
    let mut context = LinkContext {
        source_id: note.id.clone(),
        source_slug: note.slug.clone(),
        source_title: note.title.clone(),
        preview,
        target_label: target.label.clone(),
        target_slug: None,
        target_id: None,
        heading_id: None,
        block_id: None,
        kind,
        is_broken: true,
    };

    let name = target.target.as_deref().unwrap_or(note.slug.as_str());
    let Some(record) = index.resolve(name) else {
        return Outcome::Note {
            context,
            embed: None,
        };
    };

    context.target_slug = Some(record.slug.clone());
    context.target_id = Some(record.id.clone());

    let heading_ok = match &target.heading {
        Some(heading) => match record.heading_id(heading) {
            Some(id) => {
                context.heading_id = Some(id.to_string());
                true
            }
            None => false,
        },
        None => true,
    };
    let block_ok = match &target.block {
        Some(block) if record.has_block(block) => {
            context.block_id = Some(block.clone());
            true
        }
        Some(_) => false,
        None => true,
    };

    context.is_broken = !(heading_ok && block_ok);
    let embed = (kind == LinkKind::Embed && !context.is_broken).then(|| embed_preview(record));

    Outcome::Note { context, embed }
}

/// Second pass: splice each decision's replacement into the body.
///
/// Decisions must be in body order and must not overlap.
pub fn apply_decisions(body: &str, decisions: &[LinkDecision]) -> String {
    let mut output = String::with_capacity(body.len());
    let mut last = 0;

    for decision in decisions {
        output.push_str(&body[last..decision.span.start]);
        output.push_str(&decision.replacement());
        last = decision.span.end;
    }

    output.push_str(&body[last..]);
    output
}

/// Public URL of a resolved link: `/n/<slug>` with a block or heading anchor.
pub fn note_href(context: &LinkContext) -> String {
    let slug = context.target_slug.as_deref().unwrap_or_default();
    match (&context.block_id, &context.heading_id) {
        (Some(block), _) => format!("/n/{}#block-{}", slug, block),
        (None, Some(heading)) => format!("/n/{}#{}", slug, heading),
        (None, None) => format!("/n/{}", slug),
    }
}

fn embed_preview(record: &AliasRecord) -> EmbedPreview {
    EmbedPreview {
        slug: record.slug.clone(),
        title: record.title.clone(),
        excerpt: record.excerpt.clone(),
    }
}

fn note_embed(embed: &EmbedPreview, label: &str) -> String {
    let label = if label.is_empty() { "Open note" } else { label };
    format!(
        "<aside class=\"note-embed\" data-note=\"{slug}\">\
         <div class=\"note-embed__header\">{title}</div>\
         <p class=\"note-embed__excerpt\">{excerpt}</p>\
         <a class=\"note-embed__link\" href=\"/n/{slug}\">{label}</a>\
         </aside>",
        slug = embed.slug,
        title = escape_html(&embed.title),
        excerpt = escape_html(&embed.excerpt),
        label = escape_html(label),
    )
}

/// Text around a span, whitespace-collapsed. Radius counted in characters.
fn preview(text: &str, span: &Range<usize>) -> String {
    let start_char = text[..span.start].chars().count();
    let end_char = start_char + text[span.clone()].chars().count();
    let from = start_char.saturating_sub(PREVIEW_RADIUS);
    let to = end_char + PREVIEW_RADIUS;

    let window: String = text.chars().skip(from).take(to - from).collect();
    window.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape `& < > "` for use in HTML text and attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Heading;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        notes: Vec<NoteDraft>,
        index: AliasIndex,
        assets: AssetLocator,
    }

    fn fixture(source_body: &str) -> Fixture {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/pic.png"), "png").unwrap();

        let mut source = NoteDraft::stub("n_01", "alpha", "Alpha");
        source.body = source_body.to_string();
        source.headings = vec![Heading {
            id: "intro".to_string(),
            title: "Intro".to_string(),
            level: 1,
        }];

        let mut target = NoteDraft::stub("n_02", "beta", "Beta");
        target.excerpt = "Beta <summary>".to_string();
        target.headings = vec![Heading {
            id: "next-steps".to_string(),
            title: "Next Steps".to_string(),
            level: 2,
        }];
        target.block_ids = vec!["p1".to_string()];

        let notes = vec![source, target];
        let index = AliasIndex::build(&notes);
        let assets = AssetLocator::new(dir.path(), "/vault");
        Fixture {
            _dir: dir,
            notes,
            index,
            assets,
        }
    }

    fn resolve(body: &str) -> Resolution {
        let f = fixture(body);
        resolve_note(&f.notes[0], &f.index, &f.assets)
    }

    #[test]
    fn test_resolved_link() {
        let result = resolve("See [[Beta]] now.");
        assert_eq!(result.body, "See [Beta](/n/beta) now.");
        assert_eq!(result.outbound.len(), 1);

        let link = &result.outbound[0];
        assert_eq!(link.source_id, "n_01");
        assert_eq!(link.target_id.as_deref(), Some("n_02"));
        assert_eq!(link.target_slug.as_deref(), Some("beta"));
        assert_eq!(link.kind, LinkKind::Link);
        assert!(!link.is_broken);
        assert_eq!(link.preview, "See [[Beta]] now.");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_label_override() {
        let result = resolve("[[beta|the <b> note]]");
        assert_eq!(result.body, "[the &lt;b&gt; note](/n/beta)");
        assert_eq!(result.outbound[0].target_label, "the <b> note");
    }

    #[test]
    fn test_heading_anchor() {
        let result = resolve("[[Beta#next steps]]");
        assert_eq!(result.body, "[Beta#next steps](/n/beta#next-steps)");
        assert_eq!(result.outbound[0].heading_id.as_deref(), Some("next-steps"));
    }

    #[test]
    fn test_block_anchor_both_forms() {
        let result = resolve("[[Beta#^p1]] and [[Beta^p1|here]]");
        assert_eq!(result.body, "[Beta#^p1](/n/beta#block-p1) and [here](/n/beta#block-p1)");
        assert!(result.outbound.iter().all(|l| l.block_id.as_deref() == Some("p1")));
    }

    #[test]
    fn test_self_reference() {
        let result = resolve("Back to [[#Intro|top]]");
        assert_eq!(result.body, "Back to [top](/n/alpha#intro)");
        assert_eq!(result.outbound[0].target_id.as_deref(), Some("n_01"));
    }

    #[test]
    fn test_unknown_note_is_broken() {
        let result = resolve("See [[Gamma]].");
        assert_eq!(
            result.body,
            "See <span class=\"broken-link\" title=\"Unresolved link\">Gamma</span>."
        );
        let link = &result.outbound[0];
        assert!(link.is_broken);
        assert_eq!(link.target_id, None);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, WarningKind::BrokenLink);
        assert_eq!(result.warnings[0].message, "alpha could not resolve [[Gamma]] (Gamma)");
    }

    #[test]
    fn test_unknown_heading_or_block_is_broken() {
        let result = resolve("[[Beta#Missing]] [[Beta^zz]]");
        assert_eq!(result.outbound.len(), 2);
        for link in &result.outbound {
            assert!(link.is_broken);
            assert_eq!(link.target_id.as_deref(), Some("n_02"));
            assert_eq!(link.resolved_target(), None);
        }
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_note_embed() {
        let result = resolve("![[Beta]]");
        assert_eq!(
            result.body,
            "<aside class=\"note-embed\" data-note=\"beta\"><div class=\"note-embed__header\">Beta</div><p class=\"note-embed__excerpt\">Beta &lt;summary&gt;</p><a class=\"note-embed__link\" href=\"/n/beta\">Beta</a></aside>"
        );
        assert_eq!(result.outbound[0].kind, LinkKind::Embed);
    }

    #[test]
    fn test_asset_embed() {
        let result = resolve("![[pic.png]] ![[gone.png|Gone]]");
        assert_eq!(result.body, "![pic.png](/vault/assets/pic.png) ![Gone](/vault/assets/gone.png)");
        assert!(result.outbound.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, WarningKind::MissingAsset);
        assert_eq!(
            result.warnings[0].message,
            "alpha could not find assets/gone.png referenced in [[gone.png|Gone]]"
        );
    }

    #[test]
    fn test_plain_link_to_image_is_note_link() {
        let result = resolve("See [[pic.png|diagram]] and ![[pic.png]]");
        assert_eq!(
            result.body,
            "See <span class=\"broken-link\" title=\"Unresolved link\">diagram</span> and ![pic.png](/vault/assets/pic.png)"
        );
        assert_eq!(result.outbound.len(), 1);
        assert!(result.outbound[0].is_broken);
        assert_eq!(result.outbound[0].kind, LinkKind::Link);
        assert_eq!(result.outbound[0].target_label, "diagram");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, WarningKind::BrokenLink);
        assert_eq!(
            result.warnings[0].message,
            "alpha could not resolve [[pic.png|diagram]] (pic.png)"
        );
    }

    #[test]
    fn test_code_untouched() {
        let body = "`[[Beta]]` and\n\n```\n[[Beta]]\n```";
        let result = resolve(body);
        assert_eq!(result.body, body);
        assert!(result.outbound.is_empty());
    }

    #[test]
    fn test_every_token_yields_one_context() {
        let result = resolve("[[Beta]] [[Beta]] [[Nope]] ![[Beta]]");
        assert_eq!(result.outbound.len(), 4);
    }

    #[test]
    fn test_decisions_are_pure() {
        let f = fixture("[[Beta]] and [[Nope]]");
        let decisions = resolve_tokens(&f.notes[0], &f.index, &f.assets);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].span, 0..8);
        assert_eq!(f.notes[0].body, "[[Beta]] and [[Nope]]");
        assert_eq!(apply_decisions(&f.notes[0].body, &[]), f.notes[0].body);
    }

    #[test]
    fn test_preview_radius() {
        let body = format!("{}[[Beta]]{}", "a".repeat(100), "b".repeat(100));
        let result = resolve(&body);
        let expected = format!("{}[[Beta]]{}", "a".repeat(80), "b".repeat(80));
        assert_eq!(result.outbound[0].preview, expected);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & <b> \"c\""), "a &amp; &lt;b&gt; &quot;c&quot;");
    }
}
