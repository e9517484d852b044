use crate::flow::{FlowGraph, Node};
use ahash::AHashMap;

/// Incoming neighbours of every node, built once per resolver.
///
/// Each list keeps edge order, which is what the tie-break rules rely on. A
/// node connected twice by the same source appears twice.
pub(super) struct PredecessorIndex<'a> {
    by_target: AHashMap<&'a str, Vec<&'a Node>>,
}

impl<'a> PredecessorIndex<'a> {
    pub(super) fn new(graph: &'a FlowGraph) -> Self {
        let mut by_target: AHashMap<&'a str, Vec<&'a Node>> = AHashMap::new();
        for edge in graph.edges() {
            if let Some(source) = graph.node(&edge.source) {
                by_target
                    .entry(edge.target.as_str())
                    .or_default()
                    .push(source);
            }
        }
        Self { by_target }
    }

    pub(super) fn of(&self, node_id: &str) -> &[&'a Node] {
        self.by_target
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
