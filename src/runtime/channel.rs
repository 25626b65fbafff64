use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tracing::debug;

use crate::{
    IgcError, Result, ShareLock,
    common::{Queue, Shutdown},
    events::{ErrorReport, Event, Log, Message, Output},
};

macro_rules! dispatch_event {
    ($handles:expr, $(&$item:ident), +) => {
        let handlers = $handles.read().unwrap();
        for handle in handlers.iter() {
            (handle)($(&$item),+);
        }
    };
}

macro_rules! dispatch_event_async {
    ($handles:expr, $(&$item:ident), +) => {
        let handles = $handles.clone();

        tokio::spawn(async move {
            let handlers = handles.read().unwrap().clone();
            for handle in handlers.iter() {
                (handle)($(&$item),+).await;
            }
        });
    };
}

pub type InvocationEventHandle = Arc<dyn Fn(&Event<Message>) + Send + Sync>;
pub type OutputHandle = Arc<dyn Fn(&Event<Output>) + Send + Sync>;
pub type ErrorHandle = Arc<dyn Fn(&Event<ErrorReport>) + Send + Sync>;
pub type LogHandle = Arc<dyn Fn(&Event<Log>) + Send + Sync>;
pub type OutputHandleAsync = Arc<dyn Fn(&Event<Output>) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// use the glob pattern to match the node id
    /// eg. search*
    pub nid: String,

    /// use the glob pattern to match the invocation id
    pub iid: String,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            nid: "*".to_string(),
            iid: "*".to_string(),
        }
    }
}

impl ChannelOptions {
    pub fn new(
        nid: String,
        iid: String,
    ) -> Self {
        Self {
            nid,
            iid,
        }
    }

    pub fn with_nid(nid: String) -> Self {
        Self {
            nid,
            iid: "*".to_string(),
        }
    }

    pub fn with_iid(iid: String) -> Self {
        Self {
            nid: "*".to_string(),
            iid,
        }
    }
}

/// The message-dispatch abstraction nodes publish to.
///
/// Publishing is fire-and-forget. While the channel listens, every published
/// record is queued without a capacity limit and handed to the handlers
/// registered through [`ChannelEvent`]; nothing is dropped however far the
/// listener falls behind. Records published while nobody listens are
/// discarded.
pub struct Channel {
    event_queue: Arc<Queue<Event<Message>>>,
    output_queue: Arc<Queue<Event<Output>>>,
    error_queue: Arc<Queue<Event<ErrorReport>>>,
    log_queue: Arc<Queue<Event<Log>>>,

    events: ShareLock<Vec<InvocationEventHandle>>,
    outputs: ShareLock<Vec<OutputHandle>>,
    errors: ShareLock<Vec<ErrorHandle>>,
    logs: ShareLock<Vec<LogHandle>>,
    outputs_async: ShareLock<Vec<OutputHandleAsync>>,

    handle: Handle,
    /// Stop signal of the running listener, `None` while not listening.
    listener: ShareLock<Option<Arc<Shutdown>>>,
}

impl Channel {
    pub fn new(handle: Handle) -> Self {
        Self {
            event_queue: Queue::unbounded(),
            output_queue: Queue::unbounded(),
            error_queue: Queue::unbounded(),
            log_queue: Queue::unbounded(),
            events: Arc::new(RwLock::new(Vec::new())),
            outputs: Arc::new(RwLock::new(Vec::new())),
            errors: Arc::new(RwLock::new(Vec::new())),
            logs: Arc::new(RwLock::new(Vec::new())),
            outputs_async: Arc::new(RwLock::new(Vec::new())),
            handle,
            listener: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.read().unwrap().is_some()
    }

    fn publish<T>(
        &self,
        queue: &Queue<T>,
        record: T,
    ) {
        if !self.is_listening() {
            return;
        }
        // the channel holds the receiving end, so an unbounded send cannot fail
        let _ = queue.send(record);
    }

    pub(crate) fn publish_event(
        &self,
        event: Event<Message>,
    ) {
        self.publish(&self.event_queue, event);
    }

    pub(crate) fn publish_output(
        &self,
        output: Event<Output>,
    ) {
        self.publish(&self.output_queue, output);
    }

    pub(crate) fn publish_error(
        &self,
        report: Event<ErrorReport>,
    ) {
        self.publish(&self.error_queue, report);
    }

    pub(crate) fn publish_log(
        &self,
        log: Event<Log>,
    ) {
        self.publish(&self.log_queue, log);
    }

    /// Start delivering published records to the registered handlers.
    ///
    /// Does nothing when already listening; after `shutdown` it starts a
    /// fresh listener.
    pub fn listen(&self) {
        let shutdown = {
            let mut listener = self.listener.write().unwrap();
            if listener.is_some() {
                return;
            }
            let shutdown = Arc::new(Shutdown::new());
            *listener = Some(shutdown.clone());
            shutdown
        };

        let event_queue = self.event_queue.clone();
        let output_queue = self.output_queue.clone();
        let error_queue = self.error_queue.clone();
        let log_queue = self.log_queue.clone();
        let events = self.events.clone();
        let outputs = self.outputs.clone();
        let errors = self.errors.clone();
        let logs = self.logs.clone();
        let outputs_async = self.outputs_async.clone();

        self.handle.spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    Some(e) = event_queue.next_async() => {
                        dispatch_event!(events, &e);
                    }
                    Some(out) = output_queue.next_async() => {
                        let o = out.clone();
                        dispatch_event!(outputs, &o);
                        dispatch_event_async!(outputs_async, &out);
                    }
                    Some(err) = error_queue.next_async() => {
                        dispatch_event!(errors, &err);
                    }
                    Some(log) = log_queue.next_async() => {
                        dispatch_event!(logs, &log);
                    }
                }
            }
            debug!("channel listener stopped");
        });
    }

    /// Stop the listener. Records published afterwards are discarded until
    /// the next `listen`.
    pub fn shutdown(&self) {
        if let Some(shutdown) = self.listener.write().unwrap().take() {
            shutdown.shutdown();
        }
    }
}

/// Subscription handle filtering events by node and invocation id.
#[derive(Clone)]
pub struct ChannelEvent {
    channel: Arc<Channel>,

    glob: (globset::GlobMatcher, globset::GlobMatcher),
}

impl ChannelEvent {
    pub fn channel(
        channel: Arc<Channel>,
        options: ChannelOptions,
    ) -> Result<Self> {
        Ok(Self {
            channel,
            glob: (compile(&options.nid)?, compile(&options.iid)?),
        })
    }

    /// Called with every outbound message, successful or null-payload.
    pub fn on_output(
        &self,
        f: impl Fn(&Event<Output>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.outputs.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.nid, &e.iid) {
                f(e);
            }
        }));
    }

    pub fn on_error(
        &self,
        f: impl Fn(&Event<ErrorReport>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.errors.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.nid, &e.iid) {
                f(e);
            }
        }));
    }

    pub fn on_event(
        &self,
        f: impl Fn(&Event<Message>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.events.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.nid, &e.iid) {
                f(e);
            }
        }));
    }

    pub fn on_log(
        &self,
        f: impl Fn(&Event<Log>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.logs.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.nid, &e.iid) {
                f(e);
            }
        }));
    }

    pub fn on_output_async<F>(
        &self,
        f: F,
    ) where
        F: Fn(&Event<Output>) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        let glob = self.glob.clone();

        self.channel.outputs_async.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.nid, &e.iid) {
                f(e)
            } else {
                Box::pin(async {})
            }
        }));
    }
}

fn compile(pattern: &str) -> Result<globset::GlobMatcher> {
    globset::Glob::new(pattern).map(|g| g.compile_matcher()).map_err(|e| IgcError::Engine(format!("invalid pattern '{}': {}", pattern, e)))
}

fn is_match(
    glob: &(globset::GlobMatcher, globset::GlobMatcher),
    nid: &str,
    iid: &str,
) -> bool {
    let (pat_nid, pat_iid) = glob;
    pat_nid.is_match(nid) && pat_iid.is_match(iid)
}

#[cfg(test)]
mod test {
    use std::{sync::Arc, time::Duration};

    use serde_json::json;
    use tokio::sync::mpsc;

    use super::{Channel, ChannelEvent, ChannelOptions};
    use crate::{flow::OutboundMessage, runtime::Context};

    #[tokio::test]
    async fn test_handlers_filtered_by_invocation() {
        let channel = Arc::new(Channel::new(tokio::runtime::Handle::current()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        ChannelEvent::channel(channel.clone(), ChannelOptions::with_iid("keep-*".to_string())).unwrap().on_output(move |e| {
            let _ = tx.send(e.iid.clone());
        });
        channel.listen();

        Context::new("n1".to_string(), "drop-1".to_string(), channel.clone()).emit_output(&OutboundMessage::null());
        Context::new("n1".to_string(), "keep-1".to_string(), channel.clone()).emit_output(&OutboundMessage::new(json!(1)));

        let iid = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert_eq!(iid, "keep-1");
    }

    #[tokio::test]
    async fn test_async_output_handler() {
        let channel = Arc::new(Channel::new(tokio::runtime::Handle::current()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        ChannelEvent::channel(channel.clone(), ChannelOptions::new("n*".to_string(), "*".to_string())).unwrap().on_output_async(move |e| {
            let tx = tx.clone();
            let payload = e.message.payload.clone();
            Box::pin(async move {
                let _ = tx.send(payload);
            })
        });
        channel.listen();

        Context::new("n1".to_string(), "i1".to_string(), channel.clone()).emit_output(&OutboundMessage::new(json!({"ok": true})));

        let payload = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert_eq!(payload, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_listen_again_after_shutdown() {
        let channel = Arc::new(Channel::new(tokio::runtime::Handle::current()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        ChannelEvent::channel(channel.clone(), ChannelOptions::default()).unwrap().on_output(move |e| {
            let _ = tx.send(e.message.payload.clone());
        });
        let ctx = Context::new("n1".to_string(), "i1".to_string(), channel.clone());

        // nobody listening yet
        ctx.emit_output(&OutboundMessage::new(json!("early")));

        channel.listen();
        channel.shutdown();
        assert!(!channel.is_listening());
        ctx.emit_output(&OutboundMessage::new(json!("stopped")));

        channel.listen();
        ctx.emit_output(&OutboundMessage::new(json!("late")));

        let payload = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert_eq!(payload, json!("late"));
    }

    #[test]
    fn test_invalid_pattern() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let channel = Arc::new(Channel::new(runtime.handle().clone()));
        assert!(ChannelEvent::channel(channel, ChannelOptions::with_nid("[".to_string())).is_err());
    }
}
