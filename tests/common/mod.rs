#![allow(dead_code)]

use async_networking::{
    DataTransferLogger, NetworkConfig, NetworkLogger, NetworkSession, ResponseMeta, SessionError,
    SessionErrorKind, TransportRequest, TransportResponse,
};
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use std::error::Error as StdError;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MockFailure {
    #[error("some error")]
    SomeError,
}

pub fn config() -> NetworkConfig {
    NetworkConfig::parse("https://mock.test.com").unwrap()
}

pub fn meta(status: u16) -> ResponseMeta {
    ResponseMeta {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
    }
}

/// Session returning a canned outcome and recording every request it sees.
#[derive(Clone, Default)]
pub struct SessionMock {
    meta: Option<ResponseMeta>,
    data: Option<Vec<u8>>,
    error: Option<SessionErrorKind>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl SessionMock {
    pub fn data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    pub fn failing(kind: SessionErrorKind) -> Self {
        Self {
            error: Some(kind),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkSession for SessionMock {
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse, SessionError> {
        self.requests.lock().unwrap().push(request);
        if let Some(kind) = self.error {
            return Err(SessionError::new(kind, MockFailure::SomeError));
        }
        Ok(TransportResponse {
            body: self.data.clone(),
            meta: self.meta.clone(),
        })
    }
}

/// Logger capturing the `Display` form of every logged error.
#[derive(Clone, Default)]
pub struct LoggerMock {
    errors: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<usize>>,
}

impl LoggerMock {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn responses(&self) -> usize {
        *self.responses.lock().unwrap()
    }
}

impl NetworkLogger for LoggerMock {
    fn log_request(&self, _: &TransportRequest) {}

    fn log_response(&self, _: Option<&[u8]>, _: Option<&ResponseMeta>) {
        *self.responses.lock().unwrap() += 1;
    }

    fn log_error(&self, error: &(dyn StdError + 'static)) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

impl DataTransferLogger for LoggerMock {
    fn log_error(&self, error: &(dyn StdError + 'static)) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

/// Formatted `tracing` output captured for the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route debug-level events on this thread here until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
