use crate::error::NetworkError;
use http::{Method, StatusCode};
use std::time::Duration;

pub(crate) struct InFlightGuard {
    gauge: metrics::Gauge,
}

impl InFlightGuard {
    pub(crate) fn new() -> Self {
        let gauge = metrics::gauge!("async_networking_inflight");
        gauge.increment(1.0);
        Self { gauge }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.decrement(1.0);
    }
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_informational() {
        "1xx"
    } else {
        "other"
    }
}

fn error_label(err: &NetworkError) -> &'static str {
    match err {
        NetworkError::Http { .. } => "http",
        NetworkError::NotConnected => "not_connected",
        NetworkError::Cancelled => "cancelled",
        NetworkError::Generic(_) => "generic",
        NetworkError::UrlGeneration(_) => "url_generation",
    }
}

fn method_label(method: &Method) -> metrics::SharedString {
    match method {
        &Method::GET => "GET".into(),
        &Method::POST => "POST".into(),
        &Method::PUT => "PUT".into(),
        &Method::PATCH => "PATCH".into(),
        &Method::DELETE => "DELETE".into(),
        other => other.to_string().into(),
    }
}

/// Size of a received body; empty responses are not recorded.
pub(crate) fn record_body_size(method: &Method, bytes: Option<usize>) {
    let Some(bytes) = bytes else {
        return;
    };
    metrics::histogram!(
        "async_networking_response_body_bytes",
        "method" => method_label(method)
    )
    .record(bytes as f64);
}

pub(crate) fn record_outcome(
    method: &Method,
    status: Option<StatusCode>,
    latency: Duration,
    error: Option<&NetworkError>,
) {
    let method = method_label(method);
    let status_class = status.map(status_class).unwrap_or("transport");

    metrics::counter!(
        "async_networking_requests_total",
        "method" => method.clone(),
        "status_class" => status_class
    )
    .increment(1);
    metrics::histogram!(
        "async_networking_request_duration_seconds",
        "method" => method.clone(),
        "status_class" => status_class
    )
    .record(latency);

    if let Some(err) = error {
        metrics::counter!(
            "async_networking_errors_total",
            "method" => method,
            "kind" => error_label(err)
        )
        .increment(1);
    }
}
