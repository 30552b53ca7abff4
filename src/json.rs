//! Helpers for reading JSON request bodies in the API handlers.
//!
//! The handlers read the raw body instead of using axum's `Json` extractor so
//! that every malformed request gets the same `{"error": "..."}` response.

use axum::http::{HeaderMap, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Error;

/// Check that the request declares a JSON body.
pub(crate) fn require_json_content_type(headers: &HeaderMap) -> Result<(), Error> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if is_json {
        Ok(())
    } else {
        Err(Error::UnsupportedContentType)
    }
}

/// Parse `body` as a non-empty JSON object.
///
/// An empty body, `null` and `{}` all count as no data.
pub(crate) fn parse_json_object(body: &[u8]) -> Result<Map<String, Value>, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::NoData);
    }

    match serde_json::from_slice(body) {
        Ok(Value::Null) => Err(Error::NoData),
        Ok(Value::Object(object)) if object.is_empty() => Err(Error::NoData),
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Error::InvalidJson("expected a JSON object".to_owned())),
        Err(error) => Err(Error::InvalidJson(error.to_string())),
    }
}

/// Parse `body` as `T`, treating an empty body as `T::default()`.
pub(crate) fn parse_json_or_default<T>(body: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|error| Error::InvalidJson(error.to_string()))
}
