use crate::error::{DispatchError, SubmitError};
use crate::resolver::ScheduledJob;
use itertools::Itertools;

mod payload;

#[cfg(feature = "http")]
pub mod http;

pub use payload::{Credential, SchedulePayload};

pub const TRACING_TARGET: &str = "mailflow::dispatch";

/// The external scheduling service, as seen by the dispatcher.
///
/// One call schedules one job. Implementations block until the service has
/// accepted or refused it. Closures with a matching signature implement this
/// trait, which is convenient in tests.
pub trait JobSubmitter {
    fn submit(&mut self, payload: &SchedulePayload, credential: &Credential)
    -> Result<(), SubmitError>;
}

impl<F> JobSubmitter for F
where
    F: FnMut(&SchedulePayload, &Credential) -> Result<(), SubmitError>,
{
    fn submit(
        &mut self,
        payload: &SchedulePayload,
        credential: &Credential,
    ) -> Result<(), SubmitError> {
        self(payload, credential)
    }
}

/// Email node ids whose jobs the scheduling service accepted, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReceipt {
    submitted: Vec<String>,
}

impl DispatchReceipt {
    pub fn submitted(&self) -> &[String] {
        &self.submitted
    }

    pub fn len(&self) -> usize {
        self.submitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty()
    }

    pub fn into_submitted(self) -> Vec<String> {
        self.submitted
    }
}

/// Submits resolved jobs to the scheduling service one at a time.
///
/// Dispatch is fail-fast and has no undo: the first refused submission stops
/// the run, and jobs accepted before it stay scheduled. There is no retry and
/// no timeout at this level; a submitter that never returns stalls the run.
#[derive(Debug, Clone)]
pub struct SchedulingDispatcher {
    credential: Option<Credential>,
    flow_id: Option<String>,
}

impl SchedulingDispatcher {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential,
            flow_id: None,
        }
    }

    /// Tags every payload with the id of the flow it came from.
    pub fn with_flow_id(mut self, flow_id: impl Into<String>) -> Self {
        self.flow_id = Some(flow_id.into());
        self
    }

    /// The credential, or `MissingCredential` if none was supplied.
    pub fn credential(&self) -> Result<&Credential, DispatchError> {
        self.credential.as_ref().ok_or(DispatchError::MissingCredential)
    }

    /// Submits `jobs` strictly in order, stopping at the first failure.
    pub fn dispatch<S: JobSubmitter>(
        &self,
        jobs: &[ScheduledJob],
        submitter: &mut S,
    ) -> Result<DispatchReceipt, DispatchError> {
        self.credential()?;
        let mut receipt = DispatchReceipt::default();
        for job in jobs {
            self.submit_one(job, submitter, &mut receipt)?;
        }

        tracing::info!(
            target: TRACING_TARGET,
            submitted = receipt.len(),
            nodes = %receipt.submitted().iter().join(", "),
            "Dispatch finished"
        );
        Ok(receipt)
    }

    /// Submits a single job and records it in `receipt` once accepted.
    pub fn submit_one<S: JobSubmitter>(
        &self,
        job: &ScheduledJob,
        submitter: &mut S,
        receipt: &mut DispatchReceipt,
    ) -> Result<(), DispatchError> {
        let credential = self.credential()?;
        let payload = SchedulePayload::from_job(job, self.flow_id.as_deref());

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %job.source_email_node_id,
            to = %payload.to,
            delay_ms = payload.delay,
            "Submitting job"
        );

        if let Err(source) = submitter.submit(&payload, credential) {
            tracing::error!(
                target: TRACING_TARGET,
                node_id = %job.source_email_node_id,
                already_submitted = receipt.len(),
                error = %source,
                "Submission failed, aborting remaining jobs"
            );
            return Err(DispatchError::Submission {
                node_id: job.source_email_node_id.clone(),
                submitted: receipt.submitted.clone(),
                source,
            });
        }

        receipt.submitted.push(job.source_email_node_id.clone());
        Ok(())
    }
}
