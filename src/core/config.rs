//! Network configuration shared by every request of a service.

use crate::util::url::normalize_base_url;
use http::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use url::Url;

/// Base URL plus default headers and query parameters.
///
/// Defaults are merged into every request; endpoint-level headers win on
/// conflict and endpoint-level query parameters overlay the defaults.
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    base_url: Url,
    headers: HeaderMap,
    query_parameters: BTreeMap<String, String>,
}

impl NetworkConfig {
    /// Query pairs already present on `base_url` become default query
    /// parameters; its fragment is dropped.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        let query_parameters = base_url.query_pairs().into_owned().collect();
        base_url.set_query(None);
        base_url.set_fragment(None);
        Self {
            base_url: normalize_base_url(base_url),
            headers: HeaderMap::new(),
            query_parameters,
        }
    }

    /// Parse `raw` as the base URL.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(raw.as_ref())?))
    }

    /// Add a default header applied to every request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a set of default headers applied to every request.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add a default query parameter appended to every request.
    #[must_use]
    pub fn with_query_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(key.into(), value.into());
        self
    }

    /// Base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn query_parameters(&self) -> &BTreeMap<String, String> {
        &self.query_parameters
    }
}
