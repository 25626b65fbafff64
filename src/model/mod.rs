mod flow;
mod node;

pub use flow::FlowModel;
pub use node::NodeModel;
