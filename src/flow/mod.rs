//! Parameter resolution, dispatch and result normalization of the IGC
//! action nodes.

pub mod actions;
pub mod dispatch;
mod message;
pub mod node;
pub mod normalize;
pub mod resolve;

pub use message::{InboundMessage, OutboundMessage};
pub use node::{ActionNode, NodeId, invoke};
