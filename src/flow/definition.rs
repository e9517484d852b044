use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The three kinds of node a user can place on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum NodeKind {
    Email,
    Delay,
    LeadSource,
}

impl NodeKind {
    /// Human-readable name, as shown in the node palette.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Cold Email",
            Self::Delay => "Wait/Delay",
            Self::LeadSource => "Lead Source",
        }
    }
}

/// Unit of a Delay node's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DelayUnit {
    Minutes,
    Hours,
    #[default]
    Days,
}

impl DelayUnit {
    /// Milliseconds in one unit.
    pub const fn factor_ms(&self) -> u64 {
        match self {
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
        }
    }
}

/// The text fields of an Email node, used to name the failing field in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EmailField {
    Subject,
    Body,
}

/// Content of one message to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailData {
    pub subject: String,
    pub body: String,
}

impl Default for EmailData {
    fn default() -> Self {
        Self {
            subject: "New Email".to_string(),
            body: "Enter your email content here...".to_string(),
        }
    }
}

impl EmailData {
    pub fn field(&self, field: EmailField) -> &str {
        match field {
            EmailField::Subject => &self.subject,
            EmailField::Body => &self.body,
        }
    }
}

/// Wait applied before a connected Email node is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayData {
    pub delay: f64,
    pub unit: DelayUnit,
}

impl Default for DelayData {
    fn default() -> Self {
        Self {
            delay: 1.0,
            unit: DelayUnit::Days,
        }
    }
}

/// Recipient supplier for connected Email nodes.
///
/// Only `email` takes part in resolution; `source` and `description` are
/// descriptive labels carried for the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSourceData {
    pub email: String,
    pub source: String,
    pub description: String,
}

impl Default for LeadSourceData {
    fn default() -> Self {
        Self {
            email: String::new(),
            source: "New Lead Source".to_string(),
            description: "Enter source description...".to_string(),
        }
    }
}

/// Typed payload of a node. Serializes as `{"type": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum NodeData {
    Email(EmailData),
    Delay(DelayData),
    LeadSource(LeadSourceData),
}

impl NodeData {
    /// The data a freshly dropped node of `kind` starts with.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Email => Self::Email(EmailData::default()),
            NodeKind::Delay => Self::Delay(DelayData::default()),
            NodeKind::LeadSource => Self::LeadSource(LeadSourceData::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Email(_) => NodeKind::Email,
            Self::Delay(_) => NodeKind::Delay,
            Self::LeadSource(_) => NodeKind::LeadSource,
        }
    }
}

/// A single node of a flow graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(flatten)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn email(id: impl Into<String>, subject: &str, body: &str) -> Self {
        Self::new(
            id,
            NodeData::Email(EmailData {
                subject: subject.to_string(),
                body: body.to_string(),
            }),
        )
    }

    pub fn delay(id: impl Into<String>, delay: f64, unit: DelayUnit) -> Self {
        Self::new(id, NodeData::Delay(DelayData { delay, unit }))
    }

    pub fn lead_source(id: impl Into<String>, email: &str) -> Self {
        Self::new(
            id,
            NodeData::LeadSource(LeadSourceData {
                email: email.to_string(),
                ..LeadSourceData::default()
            }),
        )
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn as_email(&self) -> Option<&EmailData> {
        match &self.data {
            NodeData::Email(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_delay(&self) -> Option<&DelayData> {
        match &self.data {
            NodeData::Delay(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_lead_source(&self) -> Option<&LeadSourceData> {
        match &self.data {
            NodeData::LeadSource(data) => Some(data),
            _ => None,
        }
    }
}

/// A directed connection from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }
}
