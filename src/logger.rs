//! Debug loggers for the network and data-transfer layers.
//!
//! Loggers are pure side effects: nothing they do can change what a
//! service returns.

use crate::transport::{ResponseMeta, TransportRequest};
use crate::util::{text::render_body, url::sanitize_url_for_log};
use std::error::Error as StdError;

/// Controls the default `tracing` loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    /// Bodies longer than this are truncated in log output.
    pub max_body_bytes: usize,
}

impl Default for LogConfig {
    /// Enabled in debug builds, silent in release builds.
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            max_body_bytes: 4096,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

pub trait NetworkLogger: Send + Sync {
    fn log_request(&self, request: &TransportRequest);
    fn log_response(&self, body: Option<&[u8]>, meta: Option<&ResponseMeta>);
    fn log_error(&self, error: &(dyn StdError + 'static));
}

pub trait DataTransferLogger: Send + Sync {
    fn log_error(&self, error: &(dyn StdError + 'static));
}

/// [`NetworkLogger`] emitting `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNetworkLogger {
    config: LogConfig,
}

impl TracingNetworkLogger {
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }
}

impl NetworkLogger for TracingNetworkLogger {
    fn log_request(&self, request: &TransportRequest) {
        if !self.config.enabled {
            return;
        }
        tracing::debug!(
            http.method = %request.method,
            http.url = %sanitize_url_for_log(&request.url),
            headers = ?request.headers,
            "sending request"
        );
        if let Some(body) = request.body.as_deref() {
            tracing::debug!(body = %render_body(body, self.config.max_body_bytes), "request body");
        }
    }

    fn log_response(&self, body: Option<&[u8]>, meta: Option<&ResponseMeta>) {
        if !self.config.enabled {
            return;
        }
        let status = meta.map(|m| m.status.as_u16());
        match body {
            Some(body) => tracing::debug!(
                http.status = ?status,
                bytes = body.len(),
                body = %render_body(body, self.config.max_body_bytes),
                "received response"
            ),
            None => tracing::debug!(http.status = ?status, "received response without body"),
        }
    }

    fn log_error(&self, error: &(dyn StdError + 'static)) {
        if self.config.enabled {
            tracing::debug!(error = %error, "network request failed");
        }
    }
}

/// [`DataTransferLogger`] emitting `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDataTransferLogger {
    config: LogConfig,
}

impl TracingDataTransferLogger {
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }
}

impl DataTransferLogger for TracingDataTransferLogger {
    fn log_error(&self, error: &(dyn StdError + 'static)) {
        if self.config.enabled {
            tracing::debug!(error = %error, source = ?error.source(), "data transfer failed");
        }
    }
}
