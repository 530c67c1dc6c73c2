//! Immutable description of an outbound HTTP call.
//!
//! An [`OutboundRequest`] is built once by a request service, passed through the
//! gateway and then through the interceptor chain. Every transformation after
//! construction (`with_header`, `without_bypass`, ...) returns a modified clone
//! and leaves the original untouched.

use crate::error::{Result, SeedlineError};
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

/// Ordered list of query parameters.
///
/// Built from key/value mappings without a whitelist; keys whose value is
/// null/`None` are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Appends a parameter only when a value is present.
    pub fn push_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// Builds parameters from a JSON object.
    ///
    /// Nulls are skipped, arrays become repeated keys, nested objects are
    /// passed as their JSON text. `null` as a whole yields no parameters.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut params = Self::new();
        let object = match value {
            Value::Null => return Ok(params),
            Value::Object(map) => map,
            other => {
                return Err(SeedlineError::invalid_request(format!(
                    "query parameters must be an object, got {}",
                    other
                )));
            }
        };

        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items.iter().filter(|i| !i.is_null()) {
                        params.pairs.push((key.clone(), scalar_text(item)));
                    }
                }
                other => params.pairs.push((key.clone(), scalar_text(other))),
            }
        }
        Ok(params)
    }

    /// Builds parameters from any serializable filter struct.
    pub fn from_serialize<T: Serialize>(filters: &T) -> Result<Self> {
        Self::from_value(&serde_json::to_value(filters)?)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A single part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

/// Form-like payload for uploads. Holds owned bytes so requests stay clonable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    parts: Vec<MultipartPart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: Option<String>,
    ) -> Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            file_name: file_name.into(),
            bytes,
            mime,
        });
        self
    }

    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }
}

/// An outbound HTTP call.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    url: String,
    query: QueryParams,
    body: RequestBody,
    headers: HeaderMap,
    bypass_auth: bool,
    observe_full_response: bool,
}

impl OutboundRequest {
    /// Creates a request with an empty body and no extra headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: QueryParams::default(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            bypass_auth: false,
            observe_full_response: true,
        }
    }

    // ------------------------------------------------------------------
    // Construction (consuming builders)
    // ------------------------------------------------------------------

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, payload: MultipartPayload) -> Self {
        self.body = RequestBody::Multipart(payload);
        self
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Merges `headers` into the request, replacing same-named entries.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Adds a header from string parts.
    pub fn try_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SeedlineError::invalid_request(format!("bad header name: {}", e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| SeedlineError::invalid_request(format!("bad header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Flags the request so the interceptor forwards it without this client's credential.
    pub fn bypass_auth(mut self) -> Self {
        self.bypass_auth = true;
        self
    }

    // ------------------------------------------------------------------
    // Copy-on-write transformations
    // ------------------------------------------------------------------

    /// Returns a clone with `name` set to `value`, replacing any existing values.
    pub fn with_header(&self, name: HeaderName, value: HeaderValue) -> Self {
        let mut cloned = self.clone();
        cloned.headers.insert(name, value);
        cloned
    }

    /// Returns a clone with `query` replacing the current parameters.
    pub fn with_query(&self, query: QueryParams) -> Self {
        let mut cloned = self.clone();
        cloned.query = query;
        cloned
    }

    /// Returns a clone with the bypass marker stripped.
    pub fn without_bypass(&self) -> Self {
        let mut cloned = self.clone();
        cloned.bypass_auth = false;
        cloned
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_bypass_auth(&self) -> bool {
        self.bypass_auth
    }

    pub fn observes_full_response(&self) -> bool {
        self.observe_full_response
    }
}
