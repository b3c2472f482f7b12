//! Cross-note structure: name lookup, link resolution, backlinks, the note
//! graph and the tag index.

pub mod alias_index;
pub mod backlinks;
mod link_graph;
pub mod resolver;
mod tag_index;

pub use alias_index::{AliasIndex, AliasRecord};
pub use backlinks::{attach_backlinks, invert_links};
pub use link_graph::NoteGraph;
pub use resolver::{LinkDecision, Outcome, Resolution, apply_decisions, resolve_note, resolve_tokens};
pub use tag_index::{TagEntry, TagIndex, TagStat};
