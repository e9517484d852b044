use super::graph::FlowGraph;
use crate::error::GraphError;

/// A trait for external flow formats that can be converted into a `FlowGraph`.
///
/// This is the ingestion seam for snapshots coming from the canvas, from
/// persistence, or from any other producer. Implementations are responsible
/// for filling in whatever fields their format may omit, so that every
/// `FlowGraph` they produce holds fully-typed nodes.
///
/// # Example
///
/// ```rust,no_run
/// use mailflow::prelude::*;
///
/// struct Campaign {
///     subject: String,
///     recipient: String,
/// }
///
/// impl IntoFlow for Campaign {
///     fn into_flow(self) -> std::result::Result<FlowGraph, GraphError> {
///         FlowGraph::new(
///             vec![
///                 Node::lead_source("lead", &self.recipient),
///                 Node::email("mail", &self.subject, "Hello!"),
///             ],
///             vec![Edge::new("lead", "mail")],
///         )
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a validated-shape flow graph.
    fn into_flow(self) -> Result<FlowGraph, GraphError>;
}
