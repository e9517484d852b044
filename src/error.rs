use crate::flow::{EmailField, NodeKind};
use thiserror::Error;

/// Message shown to the user when a save attempt succeeds.
pub const SAVE_SUCCESS_MESSAGE: &str = "Flow saved and emails scheduled successfully!";

/// Message shown to the user when a save attempt fails for any reason.
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save flow and schedule emails";

/// Errors raised while ingesting a flow snapshot into a `FlowGraph`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Failed to parse flow JSON: {0}")]
    JsonParseError(String),

    #[error(
        "Edge {edge_index} references node '{missing_node_id}', which is not part of the flow"
    )]
    MalformedGraph {
        edge_index: usize,
        missing_node_id: String,
    },

    #[error("Node id '{0}' appears more than once in the flow")]
    DuplicateNodeId(String),

    #[error("Node '{node_id}' has an unrecognized type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Delay node '{node_id}' uses an unsupported unit: '{unit}'")]
    InvalidDelayUnit { node_id: String, unit: String },
}

/// Pre-flight failures that block a save before anything is dispatched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("The flow needs at least one {0} node")]
    IncompleteFlow(NodeKind),

    #[error("Email node '{node_id}' has an empty {field}")]
    InvalidEmailNode { node_id: String, field: EmailField },

    #[error("Delay node '{0}' must have a positive delay")]
    InvalidDelayNode(String),

    #[error("Lead source node '{0}' does not have a valid email address")]
    InvalidLeadSourceNode(String),
}

impl ValidationError {
    /// The id of the offending node, if the failure is tied to one.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::IncompleteFlow(_) => None,
            Self::InvalidEmailNode { node_id, .. } => Some(node_id),
            Self::InvalidDelayNode(node_id) | Self::InvalidLeadSourceNode(node_id) => Some(node_id),
        }
    }
}

/// Errors raised while turning an Email node into a `ScheduledJob`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Email node '{0}' is not connected to any lead source")]
    MissingLeadSource(String),
}

/// A single failed submission to the scheduling service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Scheduling service could not be reached: {0}")]
    Transport(String),

    #[error("Scheduling service rejected the job with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to encode job payload: {0}")]
    Encoding(String),
}

/// Errors that stop a dispatch run. Jobs submitted before the failure stay scheduled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("No credential is available to authenticate with the scheduling service")]
    MissingCredential,

    #[error("Submitting the job for email node '{node_id}' failed: {source}")]
    Submission {
        node_id: String,
        /// Email node ids whose jobs were accepted before this failure.
        submitted: Vec<String>,
        #[source]
        source: SubmitError,
    },
}

/// Errors raised by a `FlowStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Flow store I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored flow under key '{key}' could not be encoded: {message}")]
    Encoding { key: String, message: String },

    #[error("Stored flow under key '{key}' is invalid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: GraphError,
    },
}

/// Everything that can make a save attempt fail.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{source}")]
    Resolution {
        #[source]
        source: ResolutionError,
        /// Email node ids whose jobs were accepted before resolution failed.
        submitted: Vec<String>,
    },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SaveError {
    /// The single message shown to the user for this save attempt.
    pub fn user_message(&self) -> &'static str {
        SAVE_FAILURE_MESSAGE
    }

    /// Email node ids whose jobs remain scheduled despite the failure.
    pub fn submitted(&self) -> &[String] {
        match self {
            Self::Resolution { submitted, .. } => submitted,
            Self::Dispatch(DispatchError::Submission { submitted, .. }) => submitted,
            _ => &[],
        }
    }
}
