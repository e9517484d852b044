//! The save pipeline behind the canvas "Save Flow" action.

use crate::dispatch::{Credential, DispatchReceipt, JobSubmitter, SchedulingDispatcher};
use crate::error::{SAVE_SUCCESS_MESSAGE, SaveError, StoreError};
use crate::flow::FlowGraph;
use crate::resolver::GraphResolver;
use crate::store::{DEFAULT_FLOW_KEY, FlowStore};
use crate::validator::FlowValidator;

pub const TRACING_TARGET: &str = "mailflow::session";

/// Where a save persists its snapshot and how it tags dispatched jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Key the snapshot is stored under.
    pub key: String,
    /// Forwarded as `flowId` in every payload.
    pub flow_id: Option<String>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_FLOW_KEY.to_string(),
            flow_id: None,
        }
    }
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Email node ids whose jobs were scheduled, in dispatch order.
    pub submitted: Vec<String>,
}

impl SaveReport {
    /// The message shown to the user.
    pub fn message(&self) -> &'static str {
        SAVE_SUCCESS_MESSAGE
    }
}

/// Validates, persists, resolves and dispatches a flow snapshot.
///
/// A save runs in this order:
///
/// 1. validation; a failure persists and dispatches nothing,
/// 2. the snapshot is stored under [`SaveOptions::key`],
/// 3. a credential must be available,
/// 4. each Email node, in node order, is resolved and then submitted.
///
/// Step 4 interleaves resolution with dispatch, so a resolution failure on a
/// later Email node leaves the jobs of earlier nodes scheduled; the error
/// lists them. Nothing is rolled back or retried.
///
/// The session only reads the snapshot it is given. Callers must not let the
/// canvas edit the flow while a save is running.
pub struct FlowSession<St, Su> {
    store: St,
    submitter: Su,
    credential: Option<Credential>,
    options: SaveOptions,
}

impl<St: FlowStore, Su: JobSubmitter> FlowSession<St, Su> {
    pub fn new(store: St, submitter: Su) -> Self {
        Self {
            store,
            submitter,
            credential: None,
            options: SaveOptions::default(),
        }
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_options(mut self, options: SaveOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the credential, e.g. after the user signs in or out.
    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }

    pub fn options(&self) -> &SaveOptions {
        &self.options
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Loads the previously saved flow, or an empty one if nothing was saved.
    pub fn load(&self) -> Result<FlowGraph, StoreError> {
        Ok(self.store.load(&self.options.key)?.unwrap_or_default())
    }

    /// Parses a raw canvas snapshot and saves it.
    pub fn save_json(&mut self, json: &str) -> Result<SaveReport, SaveError> {
        let graph = FlowGraph::from_json(json)?;
        self.save(&graph)
    }

    pub fn save(&mut self, graph: &FlowGraph) -> Result<SaveReport, SaveError> {
        match self.run_save(graph) {
            Ok(report) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    key = %self.options.key,
                    submitted = report.submitted.len(),
                    "{}",
                    report.message()
                );
                Ok(report)
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    key = %self.options.key,
                    already_submitted = error.submitted().len(),
                    %error,
                    "{}",
                    error.user_message()
                );
                Err(error)
            }
        }
    }

    fn run_save(&mut self, graph: &FlowGraph) -> Result<SaveReport, SaveError> {
        FlowValidator::new(graph).validate()?;
        self.store.store(&self.options.key, graph)?;

        let mut dispatcher = SchedulingDispatcher::new(self.credential.clone());
        if let Some(flow_id) = &self.options.flow_id {
            dispatcher = dispatcher.with_flow_id(flow_id.clone());
        }
        dispatcher.credential()?;

        let resolver = GraphResolver::new(graph);
        let mut receipt = DispatchReceipt::default();
        for job in resolver.jobs() {
            let job = match job {
                Ok(job) => job,
                Err(source) => {
                    return Err(SaveError::Resolution {
                        source,
                        submitted: receipt.into_submitted(),
                    });
                }
            };
            dispatcher.submit_one(&job, &mut self.submitter, &mut receipt)?;
        }

        Ok(SaveReport {
            submitted: receipt.into_submitted(),
        })
    }
}
