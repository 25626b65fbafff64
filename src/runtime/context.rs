use std::sync::Arc;

use crate::{
    IgcError,
    events::{ErrorReport, Event, InvocationEvent, InvocationId, Log, Message, Output},
    flow::{OutboundMessage, node::NodeId},
    runtime::Channel,
    utils,
};

/// Publishing side of one invocation.
#[derive(Clone)]
pub struct Context {
    nid: NodeId,
    iid: InvocationId,
    channel: Arc<Channel>,
}

impl Context {
    pub fn new(
        nid: NodeId,
        iid: InvocationId,
        channel: Arc<Channel>,
    ) -> Self {
        Self {
            nid,
            iid,
            channel,
        }
    }

    pub fn nid(&self) -> &str {
        &self.nid
    }

    pub fn iid(&self) -> &str {
        &self.iid
    }

    pub fn emit_event(
        &self,
        event: InvocationEvent,
    ) {
        let message = Message {
            nid: self.nid.clone(),
            iid: self.iid.clone(),
            event,
        };
        self.channel.publish_event(Event::new(&message));
    }

    pub fn emit_output(
        &self,
        message: &OutboundMessage,
    ) {
        let output = Output {
            nid: self.nid.clone(),
            iid: self.iid.clone(),
            message: message.clone(),
        };
        self.channel.publish_output(Event::new(&output));
    }

    pub fn report_error(
        &self,
        operation: &str,
        error: &IgcError,
    ) {
        let report = ErrorReport {
            nid: self.nid.clone(),
            iid: self.iid.clone(),
            operation: operation.to_string(),
            error: error.clone(),
            timestamp: utils::time::time_millis(),
        };
        self.channel.publish_error(Event::new(&report));
    }

    pub fn emit_log(
        &self,
        content: String,
    ) {
        let log = Log {
            nid: self.nid.clone(),
            iid: self.iid.clone(),
            content,
            timestamp: utils::time::time_millis(),
        };
        self.channel.publish_log(Event::new(&log));
    }
}
