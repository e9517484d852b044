use crate::resolver::ScheduledJob;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer credential used to authenticate with the scheduling service.
///
/// Issued by the auth collaborator and passed in explicitly; its value never
/// appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// `None` when the token is absent or blank, i.e. the user is not signed in.
    pub fn from_optional(token: Option<String>) -> Option<Self> {
        token
            .filter(|t| !t.trim().is_empty())
            .map(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(**redacted**)")
    }
}

/// Body of one submission to the scheduling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub subject: String,
    pub body: String,
    /// Milliseconds to wait before sending.
    pub delay: u64,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_node_id: Option<String>,
}

impl SchedulePayload {
    pub fn from_job(job: &ScheduledJob, flow_id: Option<&str>) -> Self {
        Self {
            subject: job.subject.clone(),
            body: job.body.clone(),
            delay: job.delay_ms,
            to: job.recipient.clone(),
            flow_id: flow_id.map(str::to_string),
            delay_node_id: job.delay_node_id.clone(),
        }
    }
}
