//! Network layer: executes built requests and classifies transport failures.

use crate::{
    core::{NetworkConfig, Requestable},
    error::NetworkError,
    logger::{LogConfig, NetworkLogger, TracingNetworkLogger},
    transport::{
        DynNetworkSession, NetworkSession, ResponseMeta, SessionError, SessionErrorKind,
        TransportResponse,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(feature = "reqwest")]
use crate::transport::{ReqwestSession, ReqwestSessionConfig};

/// Executes an endpoint and returns the raw response body.
#[async_trait]
pub trait NetworkService: Send + Sync {
    async fn request(&self, endpoint: &dyn Requestable) -> Result<Option<Vec<u8>>, NetworkError>;
}

#[async_trait]
impl<T: NetworkService + ?Sized> NetworkService for Arc<T> {
    async fn request(&self, endpoint: &dyn Requestable) -> Result<Option<Vec<u8>>, NetworkError> {
        (**self).request(endpoint).await
    }
}

/// Hook run on every successful exchange before the body is returned.
///
/// This is where status-code policies plug in; the default service does not
/// look at the status at all.
pub trait ResponseValidator: Send + Sync {
    fn validate(&self, body: Option<&[u8]>, meta: Option<&ResponseMeta>) -> Result<(), NetworkError>;
}

/// Accepts every response regardless of status.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllResponses;

impl ResponseValidator for AcceptAllResponses {
    fn validate(&self, _: Option<&[u8]>, _: Option<&ResponseMeta>) -> Result<(), NetworkError> {
        Ok(())
    }
}

/// Turns any non-2xx status into [`NetworkError::Http`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectNonSuccess;

impl ResponseValidator for RejectNonSuccess {
    fn validate(&self, body: Option<&[u8]>, meta: Option<&ResponseMeta>) -> Result<(), NetworkError> {
        match meta {
            Some(meta) if !meta.status.is_success() => Err(NetworkError::Http {
                status: meta.status,
                body: body.map(<[u8]>::to_vec),
            }),
            _ => Ok(()),
        }
    }
}

/// Configures and constructs [`DefaultNetworkService`].
pub struct DefaultNetworkServiceBuilder {
    config: NetworkConfig,
    session: Option<DynNetworkSession>,
    #[cfg(feature = "reqwest")]
    session_config: ReqwestSessionConfig,
    logger: Arc<dyn NetworkLogger>,
    validator: Arc<dyn ResponseValidator>,
}

impl DefaultNetworkServiceBuilder {
    fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            session: None,
            #[cfg(feature = "reqwest")]
            session_config: ReqwestSessionConfig::default(),
            logger: Arc::new(TracingNetworkLogger::default()),
            validator: Arc::new(AcceptAllResponses),
        }
    }

    /// Use a custom transport session instead of the default `reqwest` one.
    pub fn session(mut self, session: impl NetworkSession) -> Self {
        self.session = Some(Arc::new(session));
        self
    }

    /// Settings for the default `reqwest` session; ignored when a custom
    /// session is supplied.
    #[cfg(feature = "reqwest")]
    pub fn reqwest_config(mut self, config: ReqwestSessionConfig) -> Self {
        self.session_config = config;
        self
    }

    pub fn logger(mut self, logger: impl NetworkLogger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Shorthand for a [`TracingNetworkLogger`] with `config`.
    pub fn log_config(self, config: LogConfig) -> Self {
        self.logger(TracingNetworkLogger::new(config))
    }

    pub fn response_validator(mut self, validator: impl ResponseValidator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Finalise configuration and build the service.
    pub fn build(self) -> Result<DefaultNetworkService, NetworkError> {
        let session = match self.session {
            Some(session) => session,
            #[cfg(feature = "reqwest")]
            None => Arc::new(ReqwestSession::try_new(&self.session_config)?),
            #[cfg(not(feature = "reqwest"))]
            None => return Err(NetworkError::generic("no network session configured")),
        };

        Ok(DefaultNetworkService {
            inner: Arc::new(Inner {
                config: self.config,
                session,
                logger: self.logger,
                validator: self.validator,
            }),
        })
    }
}

/// [`NetworkService`] backed by an injected [`NetworkSession`].
#[derive(Clone)]
pub struct DefaultNetworkService {
    inner: Arc<Inner>,
}

struct Inner {
    config: NetworkConfig,
    session: DynNetworkSession,
    logger: Arc<dyn NetworkLogger>,
    validator: Arc<dyn ResponseValidator>,
}

impl DefaultNetworkService {
    pub fn builder(config: NetworkConfig) -> DefaultNetworkServiceBuilder {
        DefaultNetworkServiceBuilder::new(config)
    }

    /// Service over `session` with the default logger and validator.
    pub fn new(config: NetworkConfig, session: impl NetworkSession) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                session: Arc::new(session),
                logger: Arc::new(TracingNetworkLogger::default()),
                validator: Arc::new(AcceptAllResponses),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.inner.config
    }
}

fn resolve(err: SessionError) -> NetworkError {
    match err.into_parts() {
        (SessionErrorKind::NotConnected, _) => NetworkError::NotConnected,
        (SessionErrorKind::Cancelled, _) => NetworkError::Cancelled,
        (SessionErrorKind::Other, source) => NetworkError::Generic(source),
    }
}

#[async_trait]
impl NetworkService for DefaultNetworkService {
    async fn request(&self, endpoint: &dyn Requestable) -> Result<Option<Vec<u8>>, NetworkError> {
        let inner = &self.inner;

        let request = match endpoint.transport_request(&inner.config) {
            Ok(request) => request,
            Err(err) => {
                inner.logger.log_error(&err);
                return Err(err);
            }
        };

        #[cfg(feature = "metrics")]
        let _inflight = crate::transport::metrics::InFlightGuard::new();
        #[cfg(feature = "metrics")]
        let (method, start) = (request.method.clone(), std::time::Instant::now());

        inner.logger.log_request(&request);

        let (result, _status) = match inner.session.perform(request).await {
            Ok(TransportResponse { body, meta }) => {
                #[cfg(feature = "metrics")]
                crate::transport::metrics::record_body_size(&method, body.as_ref().map(Vec::len));
                inner.logger.log_response(body.as_deref(), meta.as_ref());
                let validated = inner.validator.validate(body.as_deref(), meta.as_ref());
                (validated.map(|()| body), meta.map(|m| m.status))
            }
            Err(err) => (Err(resolve(err)), None),
        };

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_outcome(
            &method,
            _status,
            start.elapsed(),
            result.as_ref().err(),
        );

        if let Err(err) = &result {
            inner.logger.log_error(err);
        }
        result
    }
}
