//! Common test utilities for building flow graphs and recording submissions.
use mailflow::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// One Lead Source and one 2-hour Delay feeding a single Email node.
#[allow(dead_code)]
pub fn create_simple_flow() -> FlowGraph {
    FlowGraph::new(
        vec![
            Node::email("email-1", "Welcome", "Thanks for joining."),
            Node::delay("delay-2", 2.0, DelayUnit::Hours),
            Node::lead_source("leadSource-3", "a@b.co"),
        ],
        vec![
            Edge::new("delay-2", "email-1"),
            Edge::new("leadSource-3", "email-1"),
        ],
    )
    .expect("simple flow is well-formed")
}

/// Two Email nodes. `email-a` is fully connected; `email-b` has no Lead Source.
///
/// Node order puts `email-a` first.
#[allow(dead_code)]
pub fn create_partially_connected_flow() -> FlowGraph {
    FlowGraph::new(
        vec![
            Node::email("email-a", "First", "First body"),
            Node::email("email-b", "Second", "Second body"),
            Node::delay("delay-1", 10.0, DelayUnit::Minutes),
            Node::lead_source("lead-1", "first@example.com"),
        ],
        vec![
            Edge::new("lead-1", "email-a"),
            Edge::new("delay-1", "email-a"),
            Edge::new("delay-1", "email-b"),
        ],
    )
    .expect("partially connected flow is well-formed")
}

/// Three Email nodes, each with its own lead and a different delay.
#[allow(dead_code)]
pub fn create_sequence_flow() -> FlowGraph {
    FlowGraph::new(
        vec![
            Node::lead_source("lead-1", "one@example.com"),
            Node::lead_source("lead-2", "two@example.com"),
            Node::delay("delay-1", 1.0, DelayUnit::Days),
            Node::email("email-1", "Day one", "Hello"),
            Node::email("email-2", "Hour later", "Again"),
            Node::email("email-3", "Default", "Once more"),
        ],
        vec![
            Edge::new("lead-1", "email-1"),
            Edge::new("delay-1", "email-1"),
            Edge::new("lead-2", "email-2"),
            Edge::new("lead-1", "email-3"),
        ],
    )
    .expect("sequence flow is well-formed")
}

/// Payloads a submitter received, shared with the test body.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct Recorder {
    pub payloads: Rc<RefCell<Vec<SchedulePayload>>>,
    pub tokens: Rc<RefCell<Vec<String>>>,
}

#[allow(dead_code)]
impl Recorder {
    /// A submitter that accepts every job.
    pub fn accepting(&self) -> impl JobSubmitter + use<> {
        self.failing_at(usize::MAX)
    }

    /// A submitter that accepts jobs until the `fail_at`-th call (0-based), which it refuses.
    pub fn failing_at(&self, fail_at: usize) -> impl JobSubmitter + use<> {
        let payloads = Rc::clone(&self.payloads);
        let tokens = Rc::clone(&self.tokens);
        let mut calls = 0;
        move |payload: &SchedulePayload, credential: &Credential| {
            let call = calls;
            calls += 1;
            if call == fail_at {
                return Err(SubmitError::Rejected {
                    status: 503,
                    message: "scheduler unavailable".to_string(),
                });
            }
            payloads.borrow_mut().push(payload.clone());
            tokens.borrow_mut().push(credential.expose().to_string());
            Ok(())
        }
    }

    pub fn recipients(&self) -> Vec<String> {
        self.payloads.borrow().iter().map(|p| p.to.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.payloads.borrow().len()
    }
}
