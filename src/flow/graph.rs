use super::conversion::IntoFlow;
use super::definition::{Edge, Node, NodeKind};
use crate::error::GraphError;
use crate::ui::RawFlow;
use ahash::AHashMap;
use serde::Serialize;

/// A read-only snapshot of a user-authored flow.
///
/// Node order is significant: it decides the order in which Email nodes are
/// resolved and therefore the order in which jobs are dispatched. Construction
/// guarantees that node ids are unique and that every edge endpoint exists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: AHashMap<String, usize>,
}

impl FlowGraph {
    /// Builds a graph, rejecting duplicate node ids and edges with a dangling end.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut index = AHashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
        }

        for (edge_index, edge) in edges.iter().enumerate() {
            for end in [&edge.source, &edge.target] {
                if !index.contains_key(end) {
                    return Err(GraphError::MalformedGraph {
                        edge_index,
                        missing_node_id: end.clone(),
                    });
                }
            }
        }

        Ok(Self {
            nodes,
            edges,
            index,
        })
    }

    /// Parses a `{ nodes, edges }` canvas snapshot, backfilling missing node fields.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let raw: RawFlow =
            serde_json::from_str(json).map_err(|e| GraphError::JsonParseError(e.to_string()))?;
        raw.into_flow()
    }

    /// Serializes the graph back into the `{ nodes, edges }` snapshot format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    /// Nodes of one kind, in node order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    pub fn contains_kind(&self, kind: NodeKind) -> bool {
        self.nodes_of_kind(kind).next().is_some()
    }

    /// The id the canvas gives the next node of `kind` it creates: `"{type}-{n+1}"`.
    ///
    /// `n` counts every node in the graph; the first free suffix above it is used.
    pub fn next_node_id(&self, kind: NodeKind) -> String {
        (self.nodes.len() + 1..)
            .map(|n| format!("{}-{}", kind.as_ref(), n))
            .find(|id| !self.index.contains_key(id))
            .unwrap_or_default()
    }
}

impl PartialEq for FlowGraph {
    // The index is derived from `nodes`.
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}
