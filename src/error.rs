use http::StatusCode;
use std::error::Error as StdError;
use thiserror::Error;

/// Opaque, thread-safe error cause carried by the `Generic`/`Parsing` variants.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Failures produced by the network layer.
///
/// Every transport failure is classified into exactly one variant at the
/// point it leaves [`crate::NetworkService`].
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Non-2xx HTTP response.
    ///
    /// Only populated by an opt-in [`crate::ResponseValidator`] such as
    /// [`crate::RejectNonSuccess`]; the default pipeline never inspects status.
    #[error("HTTP {status}")]
    Http {
        status: StatusCode,
        body: Option<Vec<u8>>,
    },

    #[error("not connected to the network")]
    NotConnected,

    #[error("request cancelled")]
    Cancelled,

    #[error("network request failed: {0}")]
    Generic(#[source] BoxError),

    /// Base URL and endpoint path did not form a valid URL.
    #[error("failed to generate request URL: {0}")]
    UrlGeneration(#[source] url::ParseError),
}

impl NetworkError {
    /// `true` iff this is an [`NetworkError::Http`] carrying exactly `code`.
    #[must_use]
    pub fn has_status_code(&self, code: u16) -> bool {
        match self {
            Self::Http { status, .. } => status.as_u16() == code,
            _ => false,
        }
    }

    /// Wrap any error as [`NetworkError::Generic`].
    pub fn generic(err: impl Into<BoxError>) -> Self {
        Self::Generic(err.into())
    }
}

/// Failures produced by the data-transfer layer.
#[derive(Debug, Error)]
pub enum DataTransferError {
    /// Transport succeeded but returned no body.
    #[error("no response body")]
    NoResponse,

    /// Body present but the decoder rejected it.
    #[error("failed to decode response: {0}")]
    Parsing(#[source] BoxError),

    #[error(transparent)]
    NetworkFailure(#[from] NetworkError),

    /// A network failure re-mapped by a [`crate::DataTransferErrorResolver`].
    #[error("{0}")]
    ResolvedNetworkFailure(#[source] BoxError),
}

impl DataTransferError {
    /// The underlying network error, when the call failed in the network layer.
    #[must_use]
    pub fn network_error(&self) -> Option<&NetworkError> {
        match self {
            Self::NetworkFailure(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors raised while encoding endpoint parameters.
///
/// Surfaced to callers as [`NetworkError::Generic`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodingError {
    #[error("query parameters must serialize to a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
