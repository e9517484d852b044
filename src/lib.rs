//! # Mailflow - Email Flow Resolution and Dispatch Engine
//!
//! **Mailflow** turns a node-based email campaign, drawn on a canvas as a
//! directed graph of Email, Delay and Lead Source nodes, into concrete
//! "send this email to this recipient after this delay" jobs, and submits
//! those jobs to an external scheduling service.
//!
//! ## Core Workflow
//!
//! 1.  **Ingest**: Parse a `{ nodes, edges }` canvas snapshot with `FlowGraph::from_json`,
//!     or implement `IntoFlow` for your own format. Missing node fields are backfilled
//!     with per-type defaults and every edge is checked against the node set.
//! 2.  **Validate**: `FlowValidator` checks that the flow is complete and that every
//!     node's fields are usable. A failing flow is never dispatched.
//! 3.  **Resolve**: `GraphResolver` walks the incoming edges of each Email node, in node
//!     order, to find its governing Delay and its Lead Source, producing a `ScheduledJob`.
//! 4.  **Dispatch**: `SchedulingDispatcher` submits jobs one at a time through a
//!     `JobSubmitter`, stopping at the first failure. Nothing is rolled back.
//!
//! `FlowSession` runs all four steps the way the canvas "Save" action does, and
//! persists the snapshot through a `FlowStore`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mailflow::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let flow = FlowGraph::new(
//!         vec![
//!             Node::lead_source("leadSource-1", "jane@example.com"),
//!             Node::delay("delay-2", 2.0, DelayUnit::Hours),
//!             Node::email("email-3", "Welcome!", "Thanks for signing up."),
//!         ],
//!         vec![
//!             Edge::new("leadSource-1", "email-3"),
//!             Edge::new("delay-2", "email-3"),
//!         ],
//!     )?;
//!
//!     FlowValidator::new(&flow).validate()?;
//!     let jobs = GraphResolver::new(&flow).resolve()?;
//!     assert_eq!(jobs[0].delay_ms, 7_200_000);
//!
//!     // Any closure can stand in for the scheduling service.
//!     let mut submitter = |payload: &SchedulePayload, _: &Credential| {
//!         println!("-> {} in {}ms", payload.to, payload.delay);
//!         Ok::<(), SubmitError>(())
//!     };
//!     let dispatcher = SchedulingDispatcher::new(Some(Credential::new("token")));
//!     let receipt = dispatcher.dispatch(&jobs, &mut submitter)?;
//!     println!("Scheduled {} job(s)", receipt.len());
//!
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod flow;
pub mod prelude;
pub mod resolver;
pub mod session;
pub mod store;
pub mod ui;
pub mod validator;
