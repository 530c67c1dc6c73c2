//! Response envelopes.

use crate::error::{Result, SeedlineError};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The full response envelope: status, headers and decoded body.
///
/// Callers must inspect `status` before trusting `body`.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Decoded JSON body; `Value::Null` for empty bodies and plain text wrapped as a string.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Decodes the body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| SeedlineError::malformed(format!("unexpected body shape: {}", e)))
    }

    /// Decodes a single field of the body object into `T`.
    pub fn decode_field<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        let value = self
            .body
            .get(field)
            .ok_or_else(|| SeedlineError::malformed(format!("missing field `{}`", field)))?;
        serde_json::from_value(value.clone())
            .map_err(|e| SeedlineError::malformed(format!("field `{}`: {}", field, e)))
    }
}

/// Discriminated result of an endpoint call.
///
/// Request services return this so views can pattern-match instead of probing
/// status and body by hand.
#[derive(Debug, Clone)]
pub enum ApiOutcome<T> {
    /// Status 200 with a well-formed payload.
    Ok(T),
    /// The backend answered with any other status.
    HttpError { status: u16, body: Value },
    /// No response was received.
    TransportError(String),
    /// Status 200 but the payload did not have the expected shape.
    Malformed(String),
    /// The call failed on this side before or around the exchange (bad
    /// input, file access, storage).
    Local(SeedlineError),
}

impl<T> ApiOutcome<T> {
    /// Builds an outcome from a gateway result and a payload decoder.
    ///
    /// Only status 200 is treated as success; any other status reaching this
    /// point becomes `HttpError` even when it is in the 2xx range.
    pub fn from_response<F>(result: Result<ApiResponse>, decode: F) -> Self
    where
        F: FnOnce(&ApiResponse) -> Result<T>,
    {
        match result {
            Ok(response) if response.status == StatusCode::OK => match decode(&response) {
                Ok(payload) => ApiOutcome::Ok(payload),
                Err(e) => ApiOutcome::Malformed(e.to_string()),
            },
            Ok(response) => ApiOutcome::HttpError {
                status: response.status.as_u16(),
                body: response.body,
            },
            Err(e) => e.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ApiOutcome::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ApiOutcome::Ok(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Ok(payload) => ApiOutcome::Ok(f(payload)),
            ApiOutcome::HttpError { status, body } => ApiOutcome::HttpError { status, body },
            ApiOutcome::TransportError(cause) => ApiOutcome::TransportError(cause),
            ApiOutcome::Malformed(reason) => ApiOutcome::Malformed(reason),
            ApiOutcome::Local(err) => ApiOutcome::Local(err),
        }
    }

    /// Converts back into a plain `Result`.
    pub fn into_result(self) -> Result<T> {
        match self {
            ApiOutcome::Ok(payload) => Ok(payload),
            ApiOutcome::HttpError { status, body } => Err(SeedlineError::http(status, body)),
            ApiOutcome::TransportError(cause) => Err(SeedlineError::Transport(cause)),
            ApiOutcome::Malformed(reason) => Err(SeedlineError::MalformedResponse(reason)),
            ApiOutcome::Local(err) => Err(err),
        }
    }
}

impl<T> From<SeedlineError> for ApiOutcome<T> {
    fn from(err: SeedlineError) -> Self {
        match err {
            SeedlineError::Http { status, body } => ApiOutcome::HttpError { status, body },
            SeedlineError::MalformedResponse(reason) => ApiOutcome::Malformed(reason),
            SeedlineError::Transport(cause) => ApiOutcome::TransportError(cause),
            other => ApiOutcome::Local(other),
        }
    }
}
