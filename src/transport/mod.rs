//! Transport session contract and the default `reqwest` session.
//!
//! * The network layer hands a fully built [`TransportRequest`] to a
//!   [`NetworkSession`] and awaits exactly one [`TransportResponse`].
//! * Sessions classify their own failures via [`SessionErrorKind`]; nothing
//!   downstream inspects error messages.

pub mod request;

#[cfg(feature = "metrics")]
pub(crate) mod metrics;
#[cfg(feature = "reqwest")]
pub mod reqwest_session;

use crate::error::BoxError;
use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use std::{fmt, sync::Arc};
use thiserror::Error;
use url::Url;

#[cfg(feature = "reqwest")]
pub use reqwest_session::{ReqwestSession, ReqwestSessionConfig};

/// A request ready to be put on the wire.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    /// Final URL including the merged query string.
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Status line and headers of a completed exchange.
#[derive(Clone, Debug)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Raw outcome of a successful exchange.
///
/// `body` is `None` when the server sent no payload.
#[derive(Clone, Debug, Default)]
pub struct TransportResponse {
    pub body: Option<Vec<u8>>,
    pub meta: Option<ResponseMeta>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// No network route to the host.
    NotConnected,
    /// The session aborted the request before it completed.
    Cancelled,
    Other,
}

/// Transport-native failure reported by a [`NetworkSession`].
#[derive(Debug, Error)]
#[error("{kind} transport failure: {source}")]
pub struct SessionError {
    kind: SessionErrorKind,
    #[source]
    source: BoxError,
}

impl SessionError {
    pub fn new(kind: SessionErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn not_connected(source: impl Into<BoxError>) -> Self {
        Self::new(SessionErrorKind::NotConnected, source)
    }

    pub fn cancelled(source: impl Into<BoxError>) -> Self {
        Self::new(SessionErrorKind::Cancelled, source)
    }

    pub fn other(source: impl Into<BoxError>) -> Self {
        Self::new(SessionErrorKind::Other, source)
    }

    #[must_use]
    pub fn kind(&self) -> SessionErrorKind {
        self.kind
    }

    /// Split into the classification and the underlying cause.
    #[must_use]
    pub fn into_parts(self) -> (SessionErrorKind, BoxError) {
        (self.kind, self.source)
    }
}

impl fmt::Display for SessionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotConnected => "not-connected",
            Self::Cancelled => "cancelled",
            Self::Other => "generic",
        })
    }
}

/// Trait implemented by any async HTTP session.
#[async_trait]
pub trait NetworkSession: Send + Sync + 'static {
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse, SessionError>;
}

pub type DynNetworkSession = Arc<dyn NetworkSession>;

#[async_trait]
impl<T: NetworkSession + ?Sized> NetworkSession for Arc<T> {
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse, SessionError> {
        (**self).perform(request).await
    }
}
