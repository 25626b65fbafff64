//! Engine - the host side of igcflow.
//!
//! The engine stands in for the flow runtime the nodes live in:
//! - Registering configuration nodes and deploying action nodes
//! - Routing inbound messages to nodes, one independent task per message
//! - Owning the event channel and the tokio runtime
//! - Graceful shutdown coordination

use std::{
    str::FromStr,
    sync::{Arc, RwLock},
};

use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::{
    IgcError, Result, ShareLock,
    common::{Queue, Registry, Shutdown},
    connection::ConfigNode,
    events::InvocationId,
    flow::{
        ActionNode, InboundMessage, NodeId, OutboundMessage,
        actions::{ActionSpec, ActionType},
    },
    model::FlowModel,
    runtime::Channel,
    utils,
};

/// Size of the queue of messages waiting to be routed.
const INBOX_SIZE: usize = 4096;

struct Invocation {
    nid: NodeId,
    iid: InvocationId,
    msg: InboundMessage,
}

/// The flow host.
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new().config(Config::create("igcflow.toml")?).build()?;
/// engine.launch();
///
/// engine.deploy(&FlowModel::from_json(text)?)?;
///
/// ChannelEvent::channel(engine.channel(), ChannelOptions::with_nid("find".into()))?
///     .on_output(|e| println!("{}", e.message.payload));
///
/// let iid = engine.send("find", json!({ "query": { "types": ["term"] } }))?;
///
/// engine.shutdown();
/// ```
pub struct Engine {
    /// Event channel outputs, reports and logs are published on.
    channel: Arc<Channel>,
    /// Configuration nodes by id.
    servers: Arc<Registry<String, ConfigNode>>,
    /// Deployed action nodes by id.
    nodes: Arc<Registry<NodeId, Arc<ActionNode>>>,
    /// Messages accepted by `send`, waiting to be routed.
    inbox: Arc<Queue<Invocation>>,

    /// Tokio runtime invocations run on.
    runtime: Arc<Runtime>,
    /// Stop signal of the current launch, `None` while stopped.
    shutdown: ShareLock<Option<Arc<Shutdown>>>,
}

impl Engine {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        let channel = Arc::new(Channel::new(runtime.handle().clone()));

        Self {
            channel,
            servers: Arc::new(Registry::new()),
            nodes: Arc::new(Registry::new()),
            inbox: Queue::new(INBOX_SIZE),
            runtime,
            shutdown: Arc::new(RwLock::new(None)),
        }
    }

    /// Starts delivering events and routing messages.
    ///
    /// An engine stopped with `shutdown` can be launched again; messages left
    /// in the inbox are routed by the new launch.
    pub fn launch(&self) {
        let shutdown = {
            let mut current = self.shutdown.write().unwrap();
            if current.is_some() {
                return;
            }
            let shutdown = Arc::new(Shutdown::new());
            *current = Some(shutdown.clone());
            shutdown
        };

        self.channel.listen();

        let inbox = self.inbox.clone();
        let nodes = self.nodes.clone();
        self.runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    Some(inv) = inbox.next_async() => {
                        let Some(node) = nodes.get(&inv.nid) else {
                            warn!(nid = %inv.nid, iid = %inv.iid, "message for an unknown node dropped");
                            continue;
                        };
                        // completions are independent; nothing waits on a previous invocation
                        tokio::spawn(async move {
                            let _ = node.handle_as(inv.iid, inv.msg).await;
                        });
                    }
                }
            }
        });

        info!("igcflow engine launched");
    }

    /// Stops routing and event delivery. In-flight invocations run to
    /// completion but their events are no longer delivered.
    pub fn shutdown(&self) {
        let Some(shutdown) = self.shutdown.write().unwrap().take() else {
            return;
        };

        shutdown.shutdown();
        self.channel.shutdown();
        info!(pending = self.inbox.len(), "igcflow engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.read().unwrap().is_some()
    }

    /// Registers a configuration node, replacing one with the same id.
    pub fn register_server(
        &self,
        server: ConfigNode,
    ) {
        self.servers.set(server.id().to_string(), server);
    }

    pub fn server(
        &self,
        id: &str,
    ) -> Option<ConfigNode> {
        self.servers.get(&id.to_string())
    }

    /// Deploys the flow's configuration nodes and action nodes.
    ///
    /// Every node is built before any is registered, so a flow with one bad
    /// node deploys nothing. Returns the number of action nodes deployed.
    pub fn deploy(
        &self,
        flow: &FlowModel,
    ) -> Result<usize> {
        for server in &flow.servers {
            self.register_server(ConfigNode::new(server)?);
        }

        let mut built: Vec<Arc<ActionNode>> = Vec::with_capacity(flow.nodes.len());
        for model in &flow.nodes {
            if built.iter().any(|n| n.id() == model.id) {
                return Err(IgcError::Node(format!("duplicate node id '{}'", model.id)));
            }

            let uses = ActionType::from_str(&model.uses).map_err(|_| IgcError::Node(format!("invalid 'uses': {}", model.uses)))?;
            let spec = ActionSpec::create(uses, model.action.clone()).map_err(|e| IgcError::Node(format!("node '{}': {}", model.id, e)))?;
            let node = ActionNode::new(model.id.clone(), model.name.clone(), self.server(&model.server), spec, self.channel.clone())?;
            built.push(Arc::new(node));
        }

        let count = built.len();
        self.nodes.extend(built.into_iter().map(|node| (node.id().to_string(), node)));

        info!(flow = %flow.id, nodes = count, total = self.nodes.len(), "flow deployed");
        Ok(count)
    }

    pub fn node(
        &self,
        nid: &str,
    ) -> Option<Arc<ActionNode>> {
        self.nodes.get(&nid.to_string())
    }

    /// Ids of every deployed action node.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys()
    }

    /// Remove a deployed node. Invocations already routed to it finish
    /// normally; later `send`s fail.
    pub fn undeploy(
        &self,
        nid: &str,
    ) -> bool {
        self.nodes.remove(&nid.to_string()).is_some()
    }

    /// Queue a message for a node and return its invocation id right away.
    ///
    /// The outcome arrives on the channel; several messages may be in flight
    /// at once and their outputs can arrive in any order.
    pub fn send(
        &self,
        nid: &str,
        msg: Value,
    ) -> Result<InvocationId> {
        if !self.is_running() {
            return Err(IgcError::Engine("Engine is not running".to_string()));
        }
        if !self.nodes.contains(&nid.to_string()) {
            return Err(IgcError::Engine(format!("node '{}' is not deployed", nid)));
        }

        let iid = utils::longid();
        self.inbox.send(Invocation {
            nid: nid.to_string(),
            iid: iid.clone(),
            msg: InboundMessage::from_json(&msg),
        })?;

        Ok(iid)
    }

    /// Handle one message on a node and wait for its outbound message.
    pub async fn invoke(
        &self,
        nid: &str,
        msg: Value,
    ) -> Result<OutboundMessage> {
        let node = self.node(nid).ok_or_else(|| IgcError::Engine(format!("node '{}' is not deployed", nid)))?;
        node.handle(InboundMessage::from_json(&msg)).await
    }

    /// Returns a reference to the event channel.
    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    pub fn runtime(&self) -> Arc<Runtime> {
        self.runtime.clone()
    }
}
