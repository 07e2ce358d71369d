//! async-networking – a thin async HTTP layer.
//!
//! * [`Requestable`] / [`Endpoint`] describe one HTTP operation.
//! * [`DefaultNetworkService`] executes it through an injected
//!   [`NetworkSession`] and maps failures into [`NetworkError`].
//! * [`DefaultDataTransferService`] decodes the body into a typed value and
//!   maps failures into [`DataTransferError`].

pub mod client;
pub mod core;
pub mod error;
pub mod logger;
pub mod transport;

mod util;

pub use crate::client::*;
pub use crate::core::*;
pub use error::*;
pub use logger::*;
pub use transport::{
    DynNetworkSession, NetworkSession, ResponseMeta, SessionError, SessionErrorKind,
    TransportRequest, TransportResponse,
};

#[cfg(feature = "reqwest")]
pub use transport::{ReqwestSession, ReqwestSessionConfig};
