//! Transport-agnostic layer: endpoints, decoders, configuration.

pub mod config;
pub mod decoder;
pub mod endpoint;

pub use config::*;
pub use decoder::*;
pub use endpoint::*;
