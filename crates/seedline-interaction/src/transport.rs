//! Terminal handler that puts requests on the wire with reqwest.

use crate::handler::RequestHandler;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use seedline_core::request::MultipartPart;
use seedline_core::{
    ApiResponse, MultipartPayload, OutboundRequest, RequestBody, Result, SeedlineError,
};
use serde_json::Value;
use std::time::Duration;

/// HTTP transport backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SeedlineError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build(&self, request: &OutboundRequest) -> Result<RequestBuilder> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .headers(request.header_map().clone());

        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params().pairs());
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(payload) => builder.multipart(to_form(payload)?),
        };

        Ok(builder)
    }
}

fn to_form(payload: &MultipartPayload) -> Result<Form> {
    let mut form = Form::new();
    for part in payload.parts() {
        form = match part {
            MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartPart::File {
                name,
                file_name,
                bytes,
                mime,
            } => {
                let mut file_part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file_part = file_part.mime_str(mime).map_err(|e| {
                        SeedlineError::invalid_request(format!("bad mime type {}: {}", mime, e))
                    })?;
                }
                form.part(name.clone(), file_part)
            }
        };
    }
    Ok(form)
}

/// Decodes a response body: empty means `Null`, non-JSON text is kept as a string.
pub(crate) fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[async_trait]
impl RequestHandler for ReqwestTransport {
    async fn handle(&self, request: OutboundRequest) -> Result<ApiResponse> {
        let builder = self.build(&request)?;

        let response = builder.send().await.map_err(|e| {
            tracing::debug!("[Transport] {} {} failed: {}", request.method(), request.url(), e);
            SeedlineError::transport(e.to_string())
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let body = decode_body(&bytes);

        tracing::trace!(
            "[Transport] {} {} -> {}",
            request.method(),
            request.url(),
            status
        );

        if !status.is_success() {
            return Err(SeedlineError::http(status.as_u16(), body));
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
