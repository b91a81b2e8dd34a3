#[macro_use]
extern crate tracing;

pub mod config;
pub mod sources;

pub use framework::{Error, Result};
