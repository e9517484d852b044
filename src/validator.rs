//! Pre-flight checks that run before any job is resolved or dispatched.

use crate::error::ValidationError;
use crate::flow::{EmailField, FlowGraph, NodeKind};
use regex::Regex;
use std::sync::LazyLock;
use strum::IntoEnumIterator;

pub const TRACING_TARGET: &str = "mailflow::validator";

/// Something, `@`, something, `.`, something. Each part is printable ASCII
/// other than `@`, either letter case. Whitespace and non-ASCII never match.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:graph:]&&[^@]]+@[[:graph:]&&[^@]]+\.[[:graph:]&&[^@]]+$")
        .expect("email pattern is a valid regex")
});

/// Returns `true` if `address` has the `local@domain.tld` shape accepted for lead sources.
///
/// This is a shape check only, not RFC 822 validation.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}

/// Structural and field-level checks over a whole flow snapshot.
///
/// Rules are evaluated in a fixed order:
///
/// 1. at least one node of every kind exists,
/// 2. every Email subject and body is non-blank,
/// 3. every Delay is a positive, finite number,
/// 4. every Lead Source email has a valid shape.
pub struct FlowValidator<'a> {
    graph: &'a FlowGraph,
}

impl<'a> FlowValidator<'a> {
    pub fn new(graph: &'a FlowGraph) -> Self {
        Self { graph }
    }

    /// Runs the rules in order and stops at the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.check().next() {
            Some(violation) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    node_id = violation.node_id().unwrap_or("-"),
                    error = %violation,
                    "Flow failed validation"
                );
                Err(violation)
            }
            None => Ok(()),
        }
    }

    /// Every violation in the flow, in rule order, for diagnostics.
    pub fn violations(&self) -> Vec<ValidationError> {
        self.check().collect()
    }

    fn check(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.missing_kinds()
            .chain(self.invalid_emails())
            .chain(self.invalid_delays())
            .chain(self.invalid_lead_sources())
    }

    fn missing_kinds(&self) -> impl Iterator<Item = ValidationError> + '_ {
        NodeKind::iter()
            .filter(move |kind| !self.graph.contains_kind(*kind))
            .map(ValidationError::IncompleteFlow)
    }

    fn invalid_emails(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.graph.nodes().iter().flat_map(|node| {
            let email = node.as_email();
            [EmailField::Subject, EmailField::Body]
                .into_iter()
                .filter_map(move |field| {
                    let blank = email?.field(field).trim().is_empty();
                    blank.then(|| ValidationError::InvalidEmailNode {
                        node_id: node.id.clone(),
                        field,
                    })
                })
        })
    }

    fn invalid_delays(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.graph
            .nodes()
            .iter()
            .filter(|node| {
                node.as_delay()
                    .is_some_and(|d| !(d.delay.is_finite() && d.delay > 0.0))
            })
            .map(|node| ValidationError::InvalidDelayNode(node.id.clone()))
    }

    fn invalid_lead_sources(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.graph
            .nodes()
            .iter()
            .filter(|node| {
                node.as_lead_source()
                    .is_some_and(|lead| !is_valid_email(&lead.email))
            })
            .map(|node| ValidationError::InvalidLeadSourceNode(node.id.clone()))
    }
}
