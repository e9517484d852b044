//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the mailflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use mailflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let flow = FlowGraph::from_json(&json)?;
//!
//! let submitter = |_: &SchedulePayload, _: &Credential| Ok::<(), SubmitError>(());
//! let mut session = FlowSession::new(JsonFileStore::new("flows"), submitter)
//!     .with_credential(Credential::from_optional(std::env::var("MAILFLOW_TOKEN").ok()));
//! let report = session.save(&flow)?;
//! println!("{}", report.message());
//! # Ok(())
//! # }
//! ```

// Data model and ingestion
pub use crate::flow::{
    DelayData, DelayUnit, Edge, EmailData, EmailField, FlowGraph, IntoFlow, LeadSourceData, Node,
    NodeData, NodeKind,
};
pub use crate::ui::RawFlow;

// Pipeline stages
pub use crate::dispatch::{
    Credential, DispatchReceipt, JobSubmitter, SchedulePayload, SchedulingDispatcher,
};
pub use crate::resolver::{DEFAULT_DELAY_MS, GraphResolver, ScheduledJob};
pub use crate::session::{FlowSession, SaveOptions, SaveReport};
pub use crate::store::{DEFAULT_FLOW_KEY, FlowStore, JsonFileStore, MemoryStore};
pub use crate::validator::{FlowValidator, is_valid_email};

#[cfg(feature = "http")]
pub use crate::dispatch::http::{HttpScheduler, HttpSchedulerConfig};

// Error types
pub use crate::error::{
    DispatchError, GraphError, ResolutionError, SaveError, StoreError, SubmitError,
    ValidationError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
