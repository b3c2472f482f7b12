//! Node and edge graph of the compiled notes.

use crate::types::{GraphEdge, GraphNode, NoteRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The note graph (`graph.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl NoteGraph {
    /// Build the graph: one node per note, one edge per linked
    /// `(source, target)` pair weighted by the number of resolved links.
    ///
    /// Broken links are ignored. Edges are ordered by source then target id.
    pub fn build(notes: &[NoteRecord]) -> Self {
        let nodes = notes
            .iter()
            .map(|note| GraphNode {
                id: note.id.clone(),
                slug: note.slug.clone(),
                title: note.title.clone(),
                tags: note.tags.clone(),
            })
            .collect();

        let mut weights: BTreeMap<(&str, &str), u32> = BTreeMap::new();
        for note in notes {
            for link in &note.outbound {
                if let Some(target) = link.resolved_target() {
                    *weights.entry((note.id.as_str(), target)).or_insert(0) += 1;
                }
            }
        }

        let edges = weights
            .into_iter()
            .map(|((source, target), weight)| GraphEdge {
                source: source.to_string(),
                target: target.to_string(),
                weight,
            })
            .collect();

        Self { nodes, edges }
    }
}
