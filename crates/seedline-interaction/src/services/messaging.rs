//! Third-party messaging (official-account) API.
//!
//! The provider authenticates with its own `access_token` header, so every
//! request is flagged to bypass this client's credential injection.

use crate::handler::RequestHandler;
use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};
use seedline_core::{
    ApiOutcome, ApiResponse, MultipartPayload, OutboundRequest, QueryParams, Result,
    SeedlineError,
};
use serde_json::{Value, json};
use std::sync::Arc;

const ACCESS_TOKEN_HEADER: &str = "access_token";
const V2: &str = "v2.0/oa";
const V3: &str = "v3.0/oa";

/// Client for the messaging provider.
#[derive(Clone)]
pub struct MessagingService {
    handler: Arc<dyn RequestHandler>,
    base_url: String,
    access_token: Option<String>,
}

impl MessagingService {
    pub fn new(
        handler: Arc<dyn RequestHandler>,
        base_url: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            handler,
            base_url,
            access_token,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<OutboundRequest> {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        let mut request = OutboundRequest::new(method, url).bypass_auth();
        if let Some(token) = &self.access_token {
            let mut value = HeaderValue::from_str(token)
                .map_err(|_| SeedlineError::config("messaging access_token is not a valid header"))?;
            value.set_sensitive(true);
            request = request.with_header(HeaderName::from_static(ACCESS_TOKEN_HEADER), value);
        }
        Ok(request)
    }

    async fn send(&self, request: Result<OutboundRequest>) -> ApiOutcome<Value> {
        let result: Result<ApiResponse> = match request {
            Ok(request) => {
                tracing::debug!("[Messaging] {} {}", request.method(), request.url());
                self.handler.handle(request).await
            }
            Err(e) => Err(e),
        };
        ApiOutcome::from_response(result, |r| Ok(r.body.clone()))
    }

    /// GET an arbitrary provider path.
    pub async fn get(&self, path: &str) -> ApiOutcome<Value> {
        self.send(self.request(Method::GET, path)).await
    }

    /// Recent conversation with a follower (latest ten messages).
    pub async fn conversation(&self, user_id: &str) -> ApiOutcome<Value> {
        let data = json!({"user_id": user_id, "offset": 0, "count": 10}).to_string();
        let request = self
            .request(Method::GET, &format!("{}/conversation", V2))
            .map(|r| r.query(QueryParams::new().push("data", data)));
        self.send(request).await
    }

    /// Sends a plain customer-service text message.
    pub async fn send_text(&self, payload: &Value) -> ApiOutcome<Value> {
        let request = self
            .request(Method::POST, &format!("{}/message/cs", V3))
            .map(|r| r.json(payload.clone()));
        self.send(request).await
    }

    /// Sends a templated message of the given kind (e.g. `transaction`, `promotion`).
    pub async fn send_template(&self, kind: &str, payload: &Value) -> ApiOutcome<Value> {
        let request = self
            .request(Method::POST, &format!("{}/message/{}", V3, kind))
            .map(|r| r.json(payload.clone()));
        self.send(request).await
    }

    /// Remaining message quota.
    pub async fn quota(&self, payload: &Value) -> ApiOutcome<Value> {
        let request = self
            .request(Method::POST, &format!("{}/quota/message", V3))
            .map(|r| r.json(payload.clone()));
        self.send(request).await
    }

    /// Uploads an image attachment.
    pub async fn upload_image(&self, payload: MultipartPayload) -> ApiOutcome<Value> {
        let request = self
            .request(Method::POST, &format!("{}/upload/image", V2))
            .map(|r| r.multipart(payload));
        self.send(request).await
    }
}
