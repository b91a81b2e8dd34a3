pub mod config;
pub mod pipeline;
pub mod shutdown;
pub mod signal;
pub mod source;
pub mod trace;

pub use pipeline::Pipeline;
pub use shutdown::{ShutdownSignal, Trigger};
pub use signal::SignalTo;
pub use source::Source;

#[macro_use]
extern crate tracing;

/// Basic error type, dynamically dispatched and safe to send across threads
pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Basic result type, defined in terms of [`Error`] and generic over `T`
pub type Result<T> = std::result::Result<T, Error>;
