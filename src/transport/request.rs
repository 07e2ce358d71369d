//! Builds a [`TransportRequest`] from an endpoint and a [`NetworkConfig`].

use super::TransportRequest;
use crate::core::{BodyEncoding, HttpMethod, NetworkConfig, Parameters, Requestable};
use crate::error::{EncodingError, NetworkError};
use crate::util::url::endpoint_url;
use http::{HeaderValue, header::CONTENT_TYPE};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};

/// Bytes kept verbatim in form keys and values.
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*');

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const FORM_UTF8_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

pub(crate) fn build_transport_request<E>(
    endpoint: &E,
    config: &NetworkConfig,
) -> Result<TransportRequest, NetworkError>
where
    E: Requestable + ?Sized,
{
    let mut url = endpoint_url(config.base_url(), &endpoint.path(), endpoint.is_full_path())
        .map_err(NetworkError::UrlGeneration)?;

    let mut query = config.query_parameters().clone();
    query.extend(query_pairs(&endpoint.query_parameters()).map_err(NetworkError::generic)?);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }

    let mut headers = config.headers().clone();
    headers.extend(endpoint.header_parameters().into_owned());

    let method = endpoint.method();
    let body = match method {
        HttpMethod::Get => None,
        _ => encode_body(&endpoint.body_parameters(), endpoint.body_encoding())
            .map_err(NetworkError::generic)?,
    };
    let body = body.map(|(bytes, content_type)| {
        headers.entry(CONTENT_TYPE).or_insert(content_type);
        bytes
    });

    Ok(TransportRequest {
        method: method.into(),
        url,
        headers,
        body,
    })
}

/// Flatten query parameters into string pairs.
pub(crate) fn query_pairs(params: &Parameters) -> Result<Vec<(String, String)>, EncodingError> {
    match params {
        Parameters::None | Parameters::Encodable(Value::Null) => Ok(Vec::new()),
        Parameters::Map(map) | Parameters::Encodable(Value::Object(map)) => Ok(flatten(map)),
        Parameters::Encodable(other) => Err(EncodingError::NotAnObject {
            found: json_type_name(other),
        }),
    }
}

fn encode_body(
    params: &Parameters,
    encoding: BodyEncoding,
) -> Result<Option<(Vec<u8>, HeaderValue)>, EncodingError> {
    let map = match params {
        Parameters::None | Parameters::Encodable(Value::Null) => return Ok(None),
        Parameters::Encodable(value) => {
            return Ok(Some((
                serde_json::to_vec(value)?,
                HeaderValue::from_static(JSON_CONTENT_TYPE),
            )));
        }
        Parameters::Map(map) if map.is_empty() => return Ok(None),
        Parameters::Map(map) => map,
    };

    let encoded = match encoding {
        BodyEncoding::Json => (
            serde_json::to_vec(map)?,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        ),
        BodyEncoding::FormUrlEncodedAscii => (
            form_encode(map, |s| utf8_percent_encode(s, FORM).to_string()).into_bytes(),
            HeaderValue::from_static(FORM_CONTENT_TYPE),
        ),
        BodyEncoding::FormUrlEncodedUtf8 => (
            form_encode(map, encode_ascii_only).into_bytes(),
            HeaderValue::from_static(FORM_UTF8_CONTENT_TYPE),
        ),
    };
    Ok(Some(encoded))
}

fn flatten(map: &Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let value = v
                .as_str()
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| v.to_string());
            (k.clone(), value)
        })
        .collect()
}

fn form_encode(map: &Map<String, Value>, encode: impl Fn(&str) -> String) -> String {
    flatten(map)
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode reserved ASCII only; other characters pass through as UTF-8.
fn encode_ascii_only(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.chars() {
        if c.is_ascii() {
            out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), FORM));
        } else {
            out.push(c);
        }
    }
    out
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Endpoint;
    use http::header::{ACCEPT, AUTHORIZATION};
    use http::{HeaderValue, Method};
    use serde::Serialize;
    use serde_json::json;

    fn config() -> NetworkConfig {
        NetworkConfig::parse("https://mock.test.com/api")
            .unwrap()
            .with_header(ACCEPT, HeaderValue::from_static("text/plain"))
            .with_header(AUTHORIZATION, HeaderValue::from_static("default"))
            .with_query_parameter("api_key", "secret")
    }

    #[derive(Serialize)]
    struct Filter {
        term: String,
        page: u32,
        exact: bool,
        cursor: Option<String>,
    }

    #[test]
    fn merges_query_and_headers_with_endpoint_precedence() {
        let endpoint: Endpoint<Value> = Endpoint::get("users")
            .query_pair("api_key", "override")
            .query_pair("page", 2)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        let req = endpoint.transport_request(&config()).unwrap();

        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.url.as_str(),
            "https://mock.test.com/api/users?api_key=override&page=2"
        );
        assert_eq!(req.headers[ACCEPT], "application/json");
        assert_eq!(req.headers[AUTHORIZATION], "default");
        assert!(req.body.is_none());
    }

    #[test]
    fn encodable_query_object_is_flattened() {
        let filter = Filter {
            term: "a b".into(),
            page: 3,
            exact: true,
            cursor: None,
        };
        let endpoint: Endpoint<Value> =
            Endpoint::get("search").query(Parameters::encodable(&filter).unwrap());

        let req = endpoint.transport_request(&config()).unwrap();
        let pairs: Vec<(String, String)> = req.url.query_pairs().into_owned().collect();

        assert_eq!(
            pairs,
            vec![
                ("api_key".into(), "secret".into()),
                ("exact".into(), "true".into()),
                ("page".into(), "3".into()),
                ("term".into(), "a b".into()),
            ]
        );
    }

    #[test]
    fn non_object_query_encodable_is_a_generic_error() {
        let endpoint: Endpoint<Value> =
            Endpoint::get("search").query(Parameters::Encodable(json!([1, 2])));

        let err = endpoint.transport_request(&config()).unwrap_err();
        let NetworkError::Generic(source) = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert!(matches!(
            source.downcast_ref::<EncodingError>(),
            Some(EncodingError::NotAnObject { found: "array" })
        ));
    }

    #[test]
    fn invalid_full_url_fails_with_url_generation() {
        let endpoint: Endpoint<Value> = Endpoint::get("http://exa mple.com");
        let err = endpoint.transport_request(&config()).unwrap_err();
        assert!(matches!(err, NetworkError::UrlGeneration(_)));
    }

    #[test]
    fn full_path_ignores_base_url_but_keeps_default_query() {
        let endpoint: Endpoint<Value> = Endpoint::get("http://mock.endpoint.com/x?y=1");
        let req = endpoint.transport_request(&config()).unwrap();
        assert_eq!(req.url.as_str(), "http://mock.endpoint.com/x?y=1&api_key=secret");
    }

    #[test]
    fn get_never_carries_a_body() {
        let endpoint: Endpoint<Value> =
            Endpoint::get("users").body(Parameters::map([("name", "x")]));
        let req = endpoint.transport_request(&config()).unwrap();
        assert!(req.body.is_none());
        assert!(req.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn encodable_body_is_json_regardless_of_encoding() {
        let endpoint: Endpoint<Value> = Endpoint::post("users")
            .body(Parameters::Encodable(json!({ "name": "Hello" })))
            .body_encoding(BodyEncoding::FormUrlEncodedAscii);
        let req = endpoint.transport_request(&config()).unwrap();
        assert_eq!(req.body.as_deref(), Some(br#"{"name":"Hello"}"#.as_slice()));
        assert_eq!(req.headers[CONTENT_TYPE], JSON_CONTENT_TYPE);
    }

    #[test]
    fn raw_body_map_follows_body_encoding() {
        let params = Parameters::map([("city", json!("Zürich")), ("n", json!(2))]);

        let json_req = Endpoint::<Value>::put("cities")
            .body(params.clone())
            .transport_request(&config())
            .unwrap();
        assert_eq!(
            json_req.body.as_deref(),
            Some(r#"{"city":"Zürich","n":2}"#.as_bytes())
        );

        let ascii_req = Endpoint::<Value>::patch("cities")
            .body(params.clone())
            .body_encoding(BodyEncoding::FormUrlEncodedAscii)
            .transport_request(&config())
            .unwrap();
        assert_eq!(ascii_req.body.as_deref(), Some(b"city=Z%C3%BCrich&n=2".as_slice()));
        assert_eq!(ascii_req.headers[CONTENT_TYPE], FORM_CONTENT_TYPE);

        let utf8_req = Endpoint::<Value>::post("cities")
            .body(params)
            .body_encoding(BodyEncoding::FormUrlEncodedUtf8)
            .transport_request(&config())
            .unwrap();
        assert_eq!(utf8_req.body.as_deref(), Some("city=Zürich&n=2".as_bytes()));
        assert_eq!(utf8_req.headers[CONTENT_TYPE], FORM_UTF8_CONTENT_TYPE);
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let endpoint: Endpoint<Value> = Endpoint::delete("users/1")
            .header(CONTENT_TYPE, HeaderValue::from_static("application/vnd.api+json"))
            .body(Parameters::map([("reason", "spam")]));
        let req = endpoint.transport_request(&config()).unwrap();
        assert_eq!(req.headers[CONTENT_TYPE], "application/vnd.api+json");
        assert_eq!(req.method, Method::DELETE);
    }

    #[test]
    fn reserved_characters_are_escaped_in_both_form_modes() {
        let ascii = |s: &str| utf8_percent_encode(s, FORM).to_string();

        assert_eq!(ascii("a&b=c d"), "a%26b%3Dc%20d");
        assert_eq!(encode_ascii_only("a&b=c d"), "a%26b%3Dc%20d");

        assert_eq!(ascii("é&"), "%C3%A9%26");
        assert_eq!(encode_ascii_only("é&"), "é%26");

        assert_eq!(ascii("a-b.c_d*"), "a-b.c_d*");
        assert_eq!(encode_ascii_only("a-b.c_d*"), "a-b.c_d*");
    }

    #[test]
    fn empty_body_map_sends_no_body() {
        let req = Endpoint::<Value>::post("ping")
            .body(Parameters::Map(Map::new()))
            .transport_request(&config())
            .unwrap();
        assert!(req.body.is_none());
    }
}
