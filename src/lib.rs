//! # igcflow
//!
//! igcflow provides flow nodes that talk to the IBM Information Governance
//! Catalog REST API. One node handles one kind of request; each inbound
//! message is resolved against the node's static configuration, dispatched to
//! the catalog and answered with exactly one outbound message.
//!
//! ## Core Features
//!
//! - **Six request modes**: search, get by id, get by URL, create, update and delete
//! - **Message-over-config precedence**: values carried by a message override the node's static fields
//! - **Uniform failure handling**: failures are reported on the event channel and answered with a null payload
//! - **Async execution**: powered by `tokio`; invocations on the same node never wait on each other
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use igcflow::{Config, EngineBuilder, FlowModel};
//!
//! let engine = EngineBuilder::new().config(Config::create("igcflow.toml")?).build()?;
//! engine.launch();
//!
//! engine.deploy(&FlowModel::from_json(json_str)?)?;
//! let iid = engine.send("find", json!({ "query": { "types": ["term"] } }))?;
//! ```

mod builder;
pub mod client;
mod common;
mod config;
pub mod connection;
mod engine;
mod error;
pub mod events;
pub mod flow;
mod model;
pub mod runtime;
mod utils;

use std::sync::{Arc, RwLock};

pub use builder::EngineBuilder;
pub use client::{HttpMethod, HttpRestClient, MockClient, RawResponse, RestClient};
pub use config::{Config, DEFAULT_TIMEOUT, ServerConfig};
pub use connection::{ConfigNode, Connection};
pub use engine::Engine;
pub use error::IgcError;
pub use flow::{
    ActionNode, InboundMessage, OutboundMessage, invoke,
    actions::{ActionSpec, ActionType, ResolvedCall},
};
pub use model::*;
pub use runtime::{Channel, ChannelEvent, ChannelOptions};

/// Result type alias for igcflow operations.
pub type Result<T> = std::result::Result<T, IgcError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
