//! Type-safe endpoint definitions.

use crate::core::{JsonResponseDecoder, NetworkConfig, ResponseDecoder};
use crate::error::NetworkError;
use crate::transport::{TransportRequest, request::build_transport_request};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{borrow::Cow, fmt, sync::Arc};

/// HTTP methods an endpoint may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a raw body map is put on the wire.
///
/// Encodable body objects are always sent as JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`, every non-ASCII byte percent-encoded.
    FormUrlEncodedAscii,
    /// `application/x-www-form-urlencoded`, non-ASCII text left as raw UTF-8.
    FormUrlEncodedUtf8,
}

/// Query or body parameters of an endpoint.
///
/// A raw map and an encodable object are mutually exclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Parameters {
    #[default]
    None,
    /// Raw key/value map.
    Map(Map<String, Value>),
    /// A serialized object; query objects must serialize to a flat JSON object.
    Encodable(Value),
}

impl Parameters {
    /// Build a raw map from key/value pairs.
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Serialize `value` into an encodable parameter object.
    pub fn encodable<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Encodable(serde_json::to_value(value)?))
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Describes one HTTP operation.
///
/// Implementors only declare the parts of the request; [`Requestable::transport_request`]
/// merges them with a [`NetworkConfig`].
pub trait Requestable: Send + Sync {
    /// Path relative to the base URL, or a full `http(s)://` URL.
    fn path(&self) -> Cow<'_, str>;

    /// Force [`Requestable::path`] to be parsed as a full URL.
    fn is_full_path(&self) -> bool {
        false
    }

    fn method(&self) -> HttpMethod;

    fn header_parameters(&self) -> Cow<'_, HeaderMap> {
        Cow::Owned(HeaderMap::new())
    }

    fn query_parameters(&self) -> Cow<'_, Parameters> {
        Cow::Owned(Parameters::None)
    }

    fn body_parameters(&self) -> Cow<'_, Parameters> {
        Cow::Owned(Parameters::None)
    }

    fn body_encoding(&self) -> BodyEncoding {
        BodyEncoding::Json
    }

    /// Build the transport request for this endpoint.
    fn transport_request(&self, config: &NetworkConfig) -> Result<TransportRequest, NetworkError> {
        build_transport_request(self, config)
    }
}

/// A [`Requestable`] that declares its response type and decoder.
pub trait ResponseRequestable: Requestable {
    type Response: Send;

    fn response_decoder(&self) -> &dyn ResponseDecoder<Self::Response>;
}

/// General-purpose endpoint assembled with a builder API.
pub struct Endpoint<R> {
    path: String,
    is_full_path: bool,
    method: HttpMethod,
    headers: HeaderMap,
    query: Parameters,
    body: Parameters,
    body_encoding: BodyEncoding,
    decoder: Arc<dyn ResponseDecoder<R>>,
}

impl<R: DeserializeOwned> Endpoint<R> {
    /// Endpoint decoding its response as JSON.
    #[must_use]
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self::with_decoder(path, method, JsonResponseDecoder)
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Get)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Post)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Put)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Patch)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Delete)
    }
}

impl<R> Endpoint<R> {
    /// Endpoint with a caller-supplied decoder.
    #[must_use]
    pub fn with_decoder(
        path: impl Into<String>,
        method: HttpMethod,
        decoder: impl ResponseDecoder<R> + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            is_full_path: false,
            method,
            headers: HeaderMap::new(),
            query: Parameters::None,
            body: Parameters::None,
            body_encoding: BodyEncoding::default(),
            decoder: Arc::new(decoder),
        }
    }

    /// Replace the response decoder.
    #[must_use]
    pub fn decoder(mut self, decoder: impl ResponseDecoder<R> + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Treat the path as a full URL, ignoring the configured base URL.
    #[must_use]
    pub fn full_path(mut self) -> Self {
        self.is_full_path = true;
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    #[must_use]
    pub fn query(mut self, query: Parameters) -> Self {
        self.query = query;
        self
    }

    /// Add one raw query pair, replacing an encodable query object if one was set.
    #[must_use]
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Parameters::Map(map) = &mut self.query {
            map.insert(key.into(), value.into());
        } else {
            self.query = Parameters::map([(key, value)]);
        }
        self
    }

    #[must_use]
    pub fn body(mut self, body: Parameters) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }
}

impl<R> Clone for Endpoint<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            is_full_path: self.is_full_path,
            method: self.method,
            headers: self.headers.clone(),
            query: self.query.clone(),
            body: self.body.clone(),
            body_encoding: self.body_encoding,
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl<R> fmt::Debug for Endpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("path", &self.path)
            .field("is_full_path", &self.is_full_path)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("body_encoding", &self.body_encoding)
            .finish_non_exhaustive()
    }
}

impl<R> Requestable for Endpoint<R> {
    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn is_full_path(&self) -> bool {
        self.is_full_path
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn header_parameters(&self) -> Cow<'_, HeaderMap> {
        Cow::Borrowed(&self.headers)
    }

    fn query_parameters(&self) -> Cow<'_, Parameters> {
        Cow::Borrowed(&self.query)
    }

    fn body_parameters(&self) -> Cow<'_, Parameters> {
        Cow::Borrowed(&self.body)
    }

    fn body_encoding(&self) -> BodyEncoding {
        self.body_encoding
    }
}

impl<R: Send> ResponseRequestable for Endpoint<R> {
    type Response = R;

    fn response_decoder(&self) -> &dyn ResponseDecoder<R> {
        self.decoder.as_ref()
    }
}
