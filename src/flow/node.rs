//! Action nodes: one configured mode bound to one configuration node.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::{
    IgcError, Result,
    connection::ConfigNode,
    events::{ErrorReason, InvocationEvent, InvocationId},
    flow::{
        InboundMessage, OutboundMessage,
        actions::{ActionSpec, ActionType},
        dispatch::dispatch,
        normalize,
    },
    runtime::{Channel, Context},
    utils,
};

/// node id
pub type NodeId = String;

/// Resolve, dispatch and wrap one message, with no host around it.
///
/// The REST client comes from `server`, so a configuration node built with
/// [`ConfigNode::with_client`] runs the whole path against a test double.
pub async fn invoke(
    server: &ConfigNode,
    spec: &ActionSpec,
    msg: &InboundMessage,
) -> Result<OutboundMessage> {
    let call = spec.resolve(msg)?;
    let client = server.client();
    let payload = dispatch(client.as_ref(), &call).await?;
    Ok(OutboundMessage::new(payload))
}

/// A deployed action node.
pub struct ActionNode {
    id: NodeId,
    name: String,
    server: ConfigNode,
    spec: ActionSpec,
    channel: Arc<Channel>,
}

impl ActionNode {
    /// Fails when the node references no configuration node.
    pub fn new(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        server: Option<ConfigNode>,
        spec: ActionSpec,
        channel: Arc<Channel>,
    ) -> Result<Self> {
        let id = id.into();
        let server = server.ok_or_else(|| IgcError::Node(format!("No IGC configuration node present for node '{}'", id)))?;

        Ok(Self {
            id,
            name: name.into(),
            server,
            spec,
            channel,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action_type(&self) -> ActionType {
        self.spec.action_type()
    }

    pub fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    pub fn server(&self) -> &ConfigNode {
        &self.server
    }

    /// Handle one inbound message under a fresh invocation id.
    pub async fn handle(
        &self,
        msg: InboundMessage,
    ) -> Result<OutboundMessage> {
        self.handle_as(utils::longid(), msg).await
    }

    /// Handle one inbound message.
    ///
    /// Always emits exactly one outbound message: the result on success, a
    /// null payload on failure. Failures are also reported on the channel.
    /// The error is returned as `Err` only when the connection has error
    /// throwing enabled.
    pub async fn handle_as(
        &self,
        iid: InvocationId,
        msg: InboundMessage,
    ) -> Result<OutboundMessage> {
        let ctx = Context::new(self.id.clone(), iid, self.channel.clone());
        ctx.emit_event(InvocationEvent::Received(utils::time::time_millis()));
        debug!(nid = %self.id, iid = %ctx.iid(), uses = %self.action_type(), "invocation received");

        let mut operation = self.action_type().to_string();

        ctx.emit_event(InvocationEvent::Resolving);
        let result = match self.spec.resolve(&msg) {
            Ok(call) => {
                operation = call.operation().to_string();
                ctx.emit_event(InvocationEvent::Dispatching(operation.clone()));
                ctx.emit_event(InvocationEvent::AwaitingResponse);
                let client = self.server.client();
                dispatch(client.as_ref(), &call).await
            }
            Err(e) => Err(e),
        };

        ctx.emit_event(InvocationEvent::Normalizing);
        let outcome = normalize::outcome(result);

        match outcome.error {
            None => {
                if let Some(label) = self.action_type().result_label() {
                    ctx.emit_log(format!("{}: {}", label, display_payload(&outcome.message.payload)));
                }
                ctx.emit_output(&outcome.message);
                ctx.emit_event(InvocationEvent::Emitted(utils::time::time_millis()));
                Ok(outcome.message)
            }
            Some(err) => {
                error!(
                    nid = %self.id,
                    iid = %ctx.iid(),
                    operation = %operation,
                    status = ?err.status_code(),
                    headers = ?err.headers(),
                    kind = err.kind(),
                    "{}",
                    err
                );
                ctx.report_error(&operation, &err);
                ctx.emit_output(&outcome.message);

                let reason = if err.is_pre_dispatch() {
                    ErrorReason::Rejected(err.to_string())
                } else {
                    ErrorReason::Failed(err.to_string())
                };
                ctx.emit_event(InvocationEvent::ErrorReported(reason));

                if self.server.connection().disable_error_throw() {
                    Ok(outcome.message)
                } else {
                    Err(err)
                }
            }
        }
    }
}

fn display_payload(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
