//! Network and data-transfer services.

pub mod data_transfer_service;
pub mod network_service;

pub use data_transfer_service::*;
pub use network_service::*;
