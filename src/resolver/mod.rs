use crate::error::ResolutionError;
use crate::flow::{DelayData, EmailData, FlowGraph, Node, NodeKind};
use serde::Serialize;

mod predecessors;

use predecessors::PredecessorIndex;

pub const TRACING_TARGET: &str = "mailflow::resolver";

/// Delay applied to an Email node that has no Delay predecessor: one hour.
pub const DEFAULT_DELAY_MS: u64 = 3_600_000;

/// A concrete "send this email to this recipient after this delay" instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledJob {
    pub subject: String,
    pub body: String,
    pub delay_ms: u64,
    pub recipient: String,
    pub source_email_node_id: String,
    /// The Delay node that governed `delay_ms`, if any.
    pub delay_node_id: Option<String>,
}

/// Converts a Delay node's duration to whole milliseconds.
///
/// Fractional results round to the nearest millisecond. Negative or
/// non-finite durations, which validation rejects, resolve to zero.
pub fn delay_ms(data: &DelayData) -> u64 {
    let ms = (data.delay * data.unit.factor_ms() as f64).round();
    if ms.is_finite() && ms > 0.0 {
        ms as u64
    } else {
        0
    }
}

/// Walks a flow graph once per Email node to produce its `ScheduledJob`.
///
/// The resolver is a pure function of the snapshot it was built from.
///
/// # Tie-breaking
///
/// When an Email node has several Delay predecessors, the first one found in
/// *edge order* governs the delay. Likewise the first Lead Source in edge
/// order supplies the recipient; further Lead Sources are ignored. This
/// follows insertion order on the canvas rather than any declared priority.
pub struct GraphResolver<'a> {
    graph: &'a FlowGraph,
    predecessors: PredecessorIndex<'a>,
}

impl<'a> GraphResolver<'a> {
    pub fn new(graph: &'a FlowGraph) -> Self {
        Self {
            graph,
            predecessors: PredecessorIndex::new(graph),
        }
    }

    /// Resolves every Email node in node order, aborting at the first failure.
    pub fn resolve(&self) -> Result<Vec<ScheduledJob>, ResolutionError> {
        self.jobs().collect()
    }

    /// Lazily resolves Email nodes in node order.
    ///
    /// Consumers that interleave resolution with dispatch should stop at the
    /// first `Err`, as `resolve` does.
    pub fn jobs(&self) -> impl Iterator<Item = Result<ScheduledJob, ResolutionError>> + '_ {
        self.graph
            .nodes_of_kind(NodeKind::Email)
            .filter_map(|node| node.as_email().map(|email| (node, email)))
            .map(move |(node, email)| self.resolve_email(node, email))
    }

    fn resolve_email(
        &self,
        node: &Node,
        email: &EmailData,
    ) -> Result<ScheduledJob, ResolutionError> {
        let predecessors = self.predecessors.of(&node.id);

        let mut delays = predecessors
            .iter()
            .filter_map(|p| p.as_delay().map(|data| (p, data)));
        let (delay_ms, delay_node_id) = match delays.next() {
            Some((delay_node, data)) => {
                let ignored = delays.count();
                if ignored > 0 {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        node_id = %node.id,
                        chosen = %delay_node.id,
                        ignored,
                        "Email node has several delay predecessors, using the first by edge order"
                    );
                }
                (delay_ms(data), Some(delay_node.id.clone()))
            }
            None => (DEFAULT_DELAY_MS, None),
        };

        let recipient = predecessors
            .iter()
            .find_map(|p| p.as_lead_source())
            .map(|lead| lead.email.clone())
            .ok_or_else(|| ResolutionError::MissingLeadSource(node.id.clone()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %node.id,
            delay_ms,
            recipient = %recipient,
            "Resolved email node"
        );

        Ok(ScheduledJob {
            subject: email.subject.clone(),
            body: email.body.clone(),
            delay_ms,
            recipient,
            source_email_node_id: node.id.clone(),
            delay_node_id,
        })
    }
}
