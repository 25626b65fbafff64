//! Event types published while nodes handle messages.
//!
//! Every invocation publishes its state changes, exactly one outbound
//! message, an error report when it fails, and optional log lines.

mod invocation;

pub use invocation::*;

use crate::{
    IgcError,
    flow::{OutboundMessage, node::NodeId},
};

/// Id of one invocation of an action node.
pub type InvocationId = String;

/// Generic event wrapper.
#[derive(Debug, Clone)]
pub struct Event<T> {
    inner: T,
}

/// Invocation state change.
#[derive(Debug, Clone)]
pub struct Message {
    pub nid: NodeId,
    pub iid: InvocationId,
    pub event: InvocationEvent,
}

/// The message a node forwards downstream.
#[derive(Debug, Clone)]
pub struct Output {
    pub nid: NodeId,
    pub iid: InvocationId,
    pub message: OutboundMessage,
}

/// A failed invocation, reported alongside its null-payload output.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub nid: NodeId,
    pub iid: InvocationId,
    /// REST operation when resolution succeeded, the node's mode otherwise.
    pub operation: String,
    pub error: IgcError,
    /// Timestamp in milliseconds.
    pub timestamp: i64,
}

/// Log entry emitted during node execution.
#[derive(Debug, Clone)]
pub struct Log {
    pub nid: NodeId,
    pub iid: InvocationId,
    pub content: String,
    /// Timestamp in milliseconds of the log entry.
    pub timestamp: i64,
}

impl<T> std::ops::Deref for Event<T>
where
    T: std::fmt::Debug + Clone,
{
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Event<T>
where
    T: std::fmt::Debug + Clone,
{
    pub fn new(inner: &T) -> Self {
        Self {
            inner: inner.clone(),
        }
    }
}
