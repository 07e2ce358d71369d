//! Response decoders turning raw body bytes into typed values.

use crate::error::BoxError;
use serde::de::DeserializeOwned;

/// Converts raw response bytes into `T`.
pub trait ResponseDecoder<T>: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<T, BoxError>;
}

/// Decodes JSON bodies with `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonResponseDecoder;

impl<T: DeserializeOwned> ResponseDecoder<T> for JsonResponseDecoder {
    fn decode(&self, data: &[u8]) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Hands the body back untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawDataResponseDecoder;

impl ResponseDecoder<Vec<u8>> for RawDataResponseDecoder {
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(data.to_vec())
    }
}

/// Decodes the body as UTF-8 text; invalid UTF-8 is an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextResponseDecoder;

impl ResponseDecoder<String> for TextResponseDecoder {
    fn decode(&self, data: &[u8]) -> Result<String, BoxError> {
        Ok(std::str::from_utf8(data)?.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        name: String,
    }

    #[test]
    fn json_decoder_reads_matching_body() {
        let value: Greeting = JsonResponseDecoder.decode(br#"{"name":"Hello"}"#).unwrap();
        assert_eq!(value, Greeting { name: "Hello".into() });
    }

    #[test]
    fn json_decoder_rejects_missing_fields() {
        let result: Result<Greeting, _> = JsonResponseDecoder.decode(br#"{"age":20}"#);
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn text_decoder_rejects_invalid_utf8() {
        assert_eq!(TextResponseDecoder.decode(b"logs").unwrap(), "logs");
        assert!(TextResponseDecoder.decode(&[0xff]).is_err());
    }

    #[test]
    fn raw_decoder_copies_bytes() {
        assert_eq!(RawDataResponseDecoder.decode(&[1, 2, 3]).unwrap(), vec![1, 2, 3]);
    }
}
