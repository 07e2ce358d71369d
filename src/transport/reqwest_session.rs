use super::{NetworkSession, ResponseMeta, SessionError, TransportRequest, TransportResponse};
use crate::error::NetworkError;
use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as StdError;
use std::io;
use std::time::Duration;

#[cfg(feature = "rustls")]
fn ensure_rustls_provider() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

#[cfg(not(feature = "rustls"))]
fn ensure_rustls_provider() {}

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for [`ReqwestSession`].
#[derive(Clone, Debug)]
pub struct ReqwestSessionConfig {
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Ignore system proxy environment variables.
    pub no_proxy: bool,
}

impl Default for ReqwestSessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            no_proxy: false,
        }
    }
}

/// Default session built on `reqwest`.
///
/// An unreachable or down network is reported as
/// [`super::SessionErrorKind::NotConnected`]; every other failure is
/// [`super::SessionErrorKind::Other`]. An empty body is reported as `None`.
#[derive(Clone, Debug)]
pub struct ReqwestSession {
    client: Client,
}

impl ReqwestSession {
    pub fn try_new(config: &ReqwestSessionConfig) -> Result<Self, NetworkError> {
        ensure_rustls_provider();

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout);

        if config.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(NetworkError::generic)?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Only a missing network route counts as "not connected"; refused
/// connections, DNS and TLS failures stay generic.
fn classify(err: reqwest::Error) -> SessionError {
    if is_offline(&err) {
        SessionError::not_connected(err)
    } else {
        SessionError::other(err)
    }
}

fn is_offline(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<io::Error>()
            && matches!(
                io.kind(),
                io::ErrorKind::NetworkUnreachable | io::ErrorKind::NetworkDown
            )
        {
            return true;
        }
        current = err.source();
    }
    false
}

#[async_trait]
impl NetworkSession for ReqwestSession {
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse, SessionError> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut req = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(classify)?;
        let meta = ResponseMeta {
            status: resp.status(),
            headers: resp.headers().clone(),
        };
        let body = resp.bytes().await.map_err(classify)?;

        Ok(TransportResponse {
            body: (!body.is_empty()).then(|| body.to_vec()),
            meta: Some(meta),
        })
    }
}
