//! Blocking HTTP client for the scheduling service.

use super::{Credential, JobSubmitter, SchedulePayload, TRACING_TARGET};
use crate::error::SubmitError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default base URL of the scheduling service's email API.
pub const DEFAULT_BASE_URL: &str = "https://backend-3yd6.onrender.com/api/emails";

/// Configuration for [`HttpScheduler`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mailflow-cli", derive(clap::Args))]
pub struct HttpSchedulerConfig {
    /// Base URL of the scheduling service; jobs are posted to `{base_url}/schedule`
    #[cfg_attr(
        feature = "mailflow-cli",
        arg(long = "scheduler-url", env = "MAILFLOW_SCHEDULER_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "mailflow-cli",
        arg(long = "http-user-agent", env = "MAILFLOW_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds. Unset means wait indefinitely.
    #[cfg_attr(
        feature = "mailflow-cli",
        arg(long = "http-timeout", env = "MAILFLOW_HTTP_TIMEOUT")
    )]
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for HttpSchedulerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: None,
            timeout_secs: None,
        }
    }
}

impl HttpSchedulerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The endpoint a single job is posted to.
    pub fn schedule_url(&self) -> String {
        format!("{}/schedule", self.base_url.trim_end_matches('/'))
    }
}

/// Posts each job to the scheduling service as JSON with a bearer token.
#[derive(Debug)]
pub struct HttpScheduler {
    http: Client,
    config: HttpSchedulerConfig,
}

impl HttpScheduler {
    pub fn new(config: HttpSchedulerConfig) -> Result<Self, SubmitError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder
            .build()
            .map_err(|e| SubmitError::Transport(format!("could not create HTTP client: {}", e)))?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %config.schedule_url(),
            timeout_secs = ?config.timeout_secs,
            "Created scheduling service client"
        );

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HttpSchedulerConfig {
        &self.config
    }
}

impl JobSubmitter for HttpScheduler {
    fn submit(
        &mut self,
        payload: &SchedulePayload,
        credential: &Credential,
    ) -> Result<(), SubmitError> {
        let body =
            serde_json::to_vec(payload).map_err(|e| SubmitError::Encoding(e.to_string()))?;

        let response = self
            .http
            .post(self.config.schedule_url())
            .bearer_auth(credential.expose())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            to = %payload.to,
            "Scheduling service accepted job"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: HttpSchedulerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout().is_none());
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_schedule_url_trims_trailing_slash() {
        let config = HttpSchedulerConfig::new("http://localhost:8080/api/emails/");
        assert_eq!(
            config.schedule_url(),
            "http://localhost:8080/api/emails/schedule"
        );
    }

    #[test]
    fn test_client_creation() {
        let config = HttpSchedulerConfig {
            timeout_secs: Some(5),
            ..HttpSchedulerConfig::default()
        };
        let scheduler = HttpScheduler::new(config).unwrap();
        assert_eq!(scheduler.config().timeout(), Some(Duration::from_secs(5)));
    }
}
