//! Per-type default construction for nodes loaded from external snapshots.
//!
//! A snapshot produced by an older canvas, or edited by hand, may omit any
//! data field. Each node type has one function here that starts from the
//! type's defaults and overlays whatever the snapshot did provide.

use super::types::{RawDelayData, RawEdge, RawEmailData, RawFlow, RawLeadSourceData, RawNode};
use crate::error::GraphError;
use crate::flow::{
    DelayData, DelayUnit, Edge, EmailData, FlowGraph, IntoFlow, LeadSourceData, Node, NodeData,
    NodeKind,
};
use serde::de::DeserializeOwned;
use std::str::FromStr;

pub const TRACING_TARGET: &str = "mailflow::ui";

impl IntoFlow for RawFlow {
    fn into_flow(self) -> Result<FlowGraph, GraphError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(backfill_node)
            .collect::<Result<Vec<_>, _>>()?;

        let edges = self.edges.into_iter().map(convert_edge).collect();

        FlowGraph::new(nodes, edges)
    }
}

/// Converts a raw canvas node into a typed node, filling missing fields with defaults.
pub fn backfill_node(raw: RawNode) -> Result<Node, GraphError> {
    let kind = NodeKind::from_str(&raw.node_type).map_err(|_| GraphError::UnknownNodeType {
        node_id: raw.id.clone(),
        type_name: raw.node_type.clone(),
    })?;

    let data = match kind {
        NodeKind::Email => NodeData::Email(backfill_email(parse_data(&raw)?)),
        NodeKind::Delay => NodeData::Delay(backfill_delay(&raw.id, parse_data(&raw)?)?),
        NodeKind::LeadSource => NodeData::LeadSource(backfill_lead_source(parse_data(&raw)?)),
    };

    Ok(Node::new(raw.id, data))
}

/// Absent fields take the default; a field present as `null` is kept as blank
/// text so validation still sees it.
fn text_or(field: Option<Option<String>>, default: String) -> String {
    match field {
        Some(value) => value.unwrap_or_default(),
        None => default,
    }
}

pub fn backfill_email(raw: RawEmailData) -> EmailData {
    let defaults = EmailData::default();
    EmailData {
        subject: text_or(raw.subject, defaults.subject),
        body: text_or(raw.body, defaults.body),
    }
}

pub fn backfill_delay(node_id: &str, raw: RawDelayData) -> Result<DelayData, GraphError> {
    let defaults = DelayData::default();
    let unit = match raw.unit {
        Some(unit) => DelayUnit::from_str(&unit).map_err(|_| GraphError::InvalidDelayUnit {
            node_id: node_id.to_string(),
            unit,
        })?,
        None => defaults.unit,
    };
    // A cleared input is stored as `null`; NaN keeps it failing validation.
    let delay = match raw.delay {
        Some(value) => value.as_f64().unwrap_or(f64::NAN),
        None => defaults.delay,
    };
    Ok(DelayData { delay, unit })
}

pub fn backfill_lead_source(raw: RawLeadSourceData) -> LeadSourceData {
    let defaults = LeadSourceData::default();
    LeadSourceData {
        email: text_or(raw.email, defaults.email),
        source: text_or(raw.source, defaults.source),
        description: text_or(raw.description, defaults.description),
    }
}

fn parse_data<T: DeserializeOwned + Default>(raw: &RawNode) -> Result<T, GraphError> {
    if raw.data.is_null() {
        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %raw.id,
            "Node has no data, using defaults"
        );
        return Ok(T::default());
    }
    serde_json::from_value(raw.data.clone()).map_err(|e| {
        GraphError::JsonParseError(format!("data of node '{}' is invalid: {}", raw.id, e))
    })
}

fn convert_edge(raw: RawEdge) -> Edge {
    Edge {
        id: raw.id,
        source: raw.source,
        target: raw.target,
    }
}
