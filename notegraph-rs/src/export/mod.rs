//! Output of a compilation: JSON artifacts and published assets.

mod artifacts;
mod assets;

pub use artifacts::{
    BuildInfo, GRAPH_FILE, LINKS_FILE, LinkEdge, LinkTarget, LinksFile, NOTES_CONTENT_FILE,
    NOTES_INDEX_FILE, NotesContent, NotesIndex, TAGS_FILE, TagsFile, VAULT_FILE, VaultInfo,
    WrittenArtifacts, read_json, write_artifacts, write_json,
};
pub use assets::{AssetLocator, AssetRef, publish_assets};
