//! Data-transfer layer: runs the network layer and decodes typed responses.

use crate::{
    client::NetworkService,
    core::ResponseRequestable,
    error::{BoxError, DataTransferError, NetworkError},
    logger::{DataTransferLogger, LogConfig, TracingDataTransferLogger},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches an endpoint and decodes its body into `E::Response`.
#[async_trait]
pub trait DataTransferService: Send + Sync {
    async fn request<E>(&self, endpoint: &E) -> Result<E::Response, DataTransferError>
    where
        E: ResponseRequestable;
}

/// Outcome of [`DataTransferErrorResolver::resolve`].
#[derive(Debug)]
pub enum Resolution {
    /// Keep the network error; surfaces as [`DataTransferError::NetworkFailure`].
    Network(NetworkError),
    /// Domain error; surfaces as [`DataTransferError::ResolvedNetworkFailure`].
    Resolved(BoxError),
}

/// Re-maps network failures into caller-specific errors.
pub trait DataTransferErrorResolver: Send + Sync {
    fn resolve(&self, error: NetworkError) -> Resolution;
}

/// Leaves every network error untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughResolver;

impl DataTransferErrorResolver for PassThroughResolver {
    fn resolve(&self, error: NetworkError) -> Resolution {
        Resolution::Network(error)
    }
}

impl<F> DataTransferErrorResolver for F
where
    F: Fn(NetworkError) -> Resolution + Send + Sync,
{
    fn resolve(&self, error: NetworkError) -> Resolution {
        self(error)
    }
}

/// [`DataTransferService`] on top of any [`NetworkService`].
#[derive(Clone)]
pub struct DefaultDataTransferService {
    network: Arc<dyn NetworkService>,
    logger: Arc<dyn DataTransferLogger>,
    resolver: Arc<dyn DataTransferErrorResolver>,
}

impl DefaultDataTransferService {
    pub fn new(network: impl NetworkService + 'static) -> Self {
        Self {
            network: Arc::new(network),
            logger: Arc::new(TracingDataTransferLogger::default()),
            resolver: Arc::new(PassThroughResolver),
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: impl DataTransferLogger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Shorthand for a [`TracingDataTransferLogger`] with `config`.
    #[must_use]
    pub fn with_log_config(self, config: LogConfig) -> Self {
        self.with_logger(TracingDataTransferLogger::new(config))
    }

    #[must_use]
    pub fn with_error_resolver(mut self, resolver: impl DataTransferErrorResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    fn resolve(&self, error: NetworkError) -> DataTransferError {
        match self.resolver.resolve(error) {
            Resolution::Network(error) => DataTransferError::NetworkFailure(error),
            Resolution::Resolved(error) => DataTransferError::ResolvedNetworkFailure(error),
        }
    }
}

#[async_trait]
impl DataTransferService for DefaultDataTransferService {
    async fn request<E>(&self, endpoint: &E) -> Result<E::Response, DataTransferError>
    where
        E: ResponseRequestable,
    {
        let data = match self.network.request(endpoint).await {
            Ok(data) => data,
            Err(err) => {
                self.logger.log_error(&err);
                return Err(self.resolve(err));
            }
        };

        let Some(data) = data else {
            return Err(DataTransferError::NoResponse);
        };

        endpoint.response_decoder().decode(&data).map_err(|err| {
            self.logger.log_error(&*err);
            DataTransferError::Parsing(err)
        })
    }
}
