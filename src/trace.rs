//! Observers for the composition engine.
//!
//! The engine reports what it does to an optional [`ComposeTrace`]. Tracing never influences the
//! outcome of a composition.
use std::sync::Mutex;

use crate::graph::{EdgeId, VertexId};
use crate::membership::Membership;

pub trait ComposeTrace {
    fn on_event(&self, _event: ComposeEvent) {}
}

pub struct NoopTrace;

impl ComposeTrace for NoopTrace {}

pub(crate) static NOOP_TRACE: NoopTrace = NoopTrace;

/// The phases of a composition, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    CopyVerticesFirst,
    ComposeVerticesSecond,
    CopyEdgesFirst,
    ComposeEdgesSecond,
    Finalize,
}

/// Why a composition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The visitor's `init` returned false
    InitRejected,
    /// The visitor's `finalize` returned false
    FinalizeRejected,
    /// An edge would keep a vertex alive that the composed rule deletes
    EndpointDeleted,
    /// A matched endpoint has a membership the edge cannot be attached to
    InconsistentEndpoint {
        vertex: Membership,
        edge: Membership,
    },
    /// Both rules delete, or both require, the same edge
    ParallelEdgeInLeft,
    /// Both rules create, or keep, the same edge
    ParallelEdgeInRight,
    /// A new edge to be deleted touches a vertex that only exists afterwards
    LeftEdgeOnCreatedVertex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeEvent {
    EnterPhase(Phase),
    VertexCopied {
        from_first: bool,
        vertex: VertexId,
        result: VertexId,
        membership: Membership,
    },
    /// A vertex created by the first rule and consumed by the second
    VertexDeleted {
        first: VertexId,
        second: VertexId,
    },
    VertexComposed {
        second: VertexId,
        result: VertexId,
        membership: Membership,
    },
    EdgeCopied {
        from_first: bool,
        edge: EdgeId,
        result: EdgeId,
        membership: Membership,
    },
    /// An edge of the first rule left out because the second rule accounts for it
    EdgeSkipped {
        from_first: bool,
        edge: EdgeId,
    },
    EdgePromoted {
        second: EdgeId,
        result: EdgeId,
    },
    Failure {
        phase: Phase,
        reason: FailureReason,
    },
    Success {
        vertices: usize,
        edges: usize,
    },
}

/// Forwards events to the [`log`] facade.
///
/// Failures and results are logged at `debug` level, everything else at `trace`.
pub struct LogTrace;

impl ComposeTrace for LogTrace {
    fn on_event(&self, event: ComposeEvent) {
        match event {
            ComposeEvent::Failure { phase, reason } => {
                log::debug!(target: "dpo_compose", "composition failure in {phase:?}: {reason:?}")
            }
            ComposeEvent::Success { vertices, edges } => {
                log::debug!(
                    target: "dpo_compose",
                    "composition done: {vertices} vertices, {edges} edges"
                )
            }
            event => log::trace!(target: "dpo_compose", "{event:?}"),
        }
    }
}

/// Collects events in an append-only log that can be shared between threads.
#[derive(Default)]
pub struct RecordingTrace {
    events: Mutex<Vec<ComposeEvent>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event recorded so far.
    pub fn events(&self) -> Vec<ComposeEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The reasons of every recorded failure.
    pub fn failures(&self) -> Vec<FailureReason> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ComposeEvent::Failure { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }
}

impl ComposeTrace for RecordingTrace {
    fn on_event(&self, event: ComposeEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
