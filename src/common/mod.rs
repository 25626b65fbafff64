mod queue;
mod registry;
mod shutdown;

pub use queue::Queue;
pub use registry::Registry;
pub use shutdown::Shutdown;
