//! Parsers for note markdown: frontmatter, anchors, headings and wikilinks.

pub mod block_id;
pub mod code_block;
pub mod frontmatter;
pub mod heading;
pub mod plain_text;
pub mod slug;
pub mod wikilink;

pub use block_id::{AnnotatedBody, anchor_marker, annotate_block_anchors};
pub use code_block::{CodeRange, find_code_ranges, is_in_code};
pub use frontmatter::{Frontmatter, parse_frontmatter, split_frontmatter};
pub use heading::{GithubSlugger, extract_headings, heading_lookup};
pub use plain_text::{build_excerpt, markdown_to_plain_text};
pub use slug::{SlugRegistry, lookup_key, slugify};
pub use wikilink::{WikiTarget, WikiToken, is_asset_target, scan_wikilinks};
