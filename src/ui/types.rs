use serde::{Deserialize, Deserializer};

/// Email node fields as the canvas stores them; any may be missing.
///
/// `None` means the field is absent, `Some(None)` means it is present as `null`.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct RawEmailData {
    #[serde(deserialize_with = "present")]
    pub subject: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub body: Option<Option<String>>,
}

/// Delay node fields as the canvas stores them; any may be missing.
///
/// `delay` is kept untyped: a cleared input is written as `null`, and hand
/// edited snapshots may hold strings.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct RawDelayData {
    #[serde(deserialize_with = "present")]
    pub delay: Option<serde_json::Value>,
    pub unit: Option<String>,
}

/// Lead source node fields as the canvas stores them; any may be missing.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct RawLeadSourceData {
    #[serde(deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub source: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

/// Wraps any field that is present, `null` included, in `Some`.
///
/// Absent fields never reach this function and take the `#[serde(default)]` of `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Canvas node with its untyped data blob
#[derive(Debug, Deserialize, Clone)]
pub struct RawNode {
    pub id: String,
    #[serde(rename = "type", alias = "nodeType")]
    pub node_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Canvas edge connecting two nodes
#[derive(Debug, Deserialize, Clone)]
pub struct RawEdge {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
}

/// Complete canvas snapshot. Missing arrays load as empty.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct RawFlow {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}
