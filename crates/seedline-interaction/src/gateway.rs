//! API gateway: resource actions to fully-qualified calls.
//!
//! Every call goes through the configured [`RequestHandler`] chain and yields
//! the full [`ApiResponse`] envelope. Paths are joined onto the resolved base
//! URL with duplicate slashes collapsed, so `api/v1/` + `/torrent/list`
//! becomes `api/v1/torrent/list`.

use crate::handler::RequestHandler;
use reqwest::Method;
use reqwest::header::HeaderMap;
use seedline_core::config::API_V1;
use seedline_core::{
    ApiResponse, MultipartPayload, OutboundRequest, QueryParams, Result, SeedlineError,
};
use serde_json::Value;
use std::sync::Arc;

/// Prefixes `suffix` with the backend's versioned API root.
pub fn api_path(suffix: &str) -> String {
    format!("{}{}", API_V1, suffix)
}

/// Collapses runs of `/` and strips the leading one.
fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = true;
    for ch in path.chars() {
        if ch == '/' {
            if !previous_slash {
                out.push(ch);
            }
            previous_slash = true;
        } else {
            out.push(ch);
            previous_slash = false;
        }
    }
    out
}

/// Extracts the `id` of an entity for update calls.
fn entity_id(entity: &Value) -> Result<String> {
    match entity.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(SeedlineError::invalid_request(
            "entity has no `id` field to update",
        )),
    }
}

/// Entry point for every backend call.
pub struct ApiGateway {
    handler: Arc<dyn RequestHandler>,
    base_url: String,
}

impl ApiGateway {
    /// Creates a gateway sending through `handler` to `base_url`.
    ///
    /// A trailing slash is added to `base_url` when missing.
    pub fn new(handler: Arc<dyn RequestHandler>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { handler, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL for `path` followed by `suffix`.
    pub fn endpoint(&self, path: &str, suffix: &str) -> String {
        format!(
            "{}{}",
            self.base_url,
            normalize_path(&format!("{}{}", path, suffix))
        )
    }

    /// Sends an already-built request through the handler chain.
    pub async fn send(&self, request: OutboundRequest) -> Result<ApiResponse> {
        tracing::debug!("[Gateway] {} {}", request.method(), request.url());
        let result = self.handler.handle(request).await;
        if let Err(e) = &result {
            tracing::debug!("[Gateway] Call failed: {}", e);
        }
        result
    }

    // ------------------------------------------------------------------
    // Resource actions
    // ------------------------------------------------------------------

    /// POST `resource/create` with `entity` as JSON.
    pub async fn create(&self, resource: &str, entity: &Value) -> Result<ApiResponse> {
        let url = self.endpoint(resource, "/create");
        self.send(OutboundRequest::new(Method::POST, url).json(entity.clone()))
            .await
    }

    /// PUT `resource/update?id=<entity.id>` with `entity` as JSON.
    pub async fn update(&self, resource: &str, entity: &Value) -> Result<ApiResponse> {
        let id = entity_id(entity)?;
        let url = self.endpoint(resource, "/update");
        self.send(
            OutboundRequest::new(Method::PUT, url)
                .query(QueryParams::new().push("id", id))
                .json(entity.clone()),
        )
        .await
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(OutboundRequest::new(Method::GET, self.endpoint(path, "")))
            .await
    }

    pub async fn get_option(
        &self,
        path: &str,
        params: &QueryParams,
        suffix: &str,
    ) -> Result<ApiResponse> {
        self.get_option_with_headers(path, params, suffix, HeaderMap::new())
            .await
    }

    pub async fn get_option_with_headers(
        &self,
        path: &str,
        params: &QueryParams,
        suffix: &str,
        headers: HeaderMap,
    ) -> Result<ApiResponse> {
        let request = OutboundRequest::new(Method::GET, self.endpoint(path, suffix))
            .query(params.clone())
            .headers(headers);
        self.send(request).await
    }

    pub async fn put(&self, path: &str, entity: &Value, suffix: &str) -> Result<ApiResponse> {
        let request =
            OutboundRequest::new(Method::PUT, self.endpoint(path, suffix)).json(entity.clone());
        self.send(request).await
    }

    /// POST with an empty body.
    pub async fn post(&self, path: &str, suffix: &str) -> Result<ApiResponse> {
        self.send(OutboundRequest::new(Method::POST, self.endpoint(path, suffix)))
            .await
    }

    pub async fn post_option(
        &self,
        path: &str,
        entity: &Value,
        suffix: &str,
    ) -> Result<ApiResponse> {
        self.post_option_with_headers(path, entity, suffix, HeaderMap::new())
            .await
    }

    pub async fn post_option_with_headers(
        &self,
        path: &str,
        entity: &Value,
        suffix: &str,
        headers: HeaderMap,
    ) -> Result<ApiResponse> {
        let request = OutboundRequest::new(Method::POST, self.endpoint(path, suffix))
            .json(entity.clone())
            .headers(headers);
        self.send(request).await
    }

    /// DELETE `path?id=<id>`.
    pub async fn delete(&self, path: &str, id: &str) -> Result<ApiResponse> {
        let request = OutboundRequest::new(Method::DELETE, self.endpoint(path, ""))
            .query(QueryParams::new().push("id", id));
        self.send(request).await
    }

    /// DELETE `path/<id>`.
    pub async fn delete_option(&self, path: &str, id: &str) -> Result<ApiResponse> {
        let url = self.endpoint(path, &format!("/{}", id));
        self.send(OutboundRequest::new(Method::DELETE, url)).await
    }

    /// GET `path/search` with `filters` as query parameters.
    pub async fn query(&self, path: &str, filters: &QueryParams) -> Result<ApiResponse> {
        self.get_option(path, filters, "/search").await
    }

    /// POST a multipart body to `path`.
    pub async fn upload_file(&self, path: &str, payload: MultipartPayload) -> Result<ApiResponse> {
        let request =
            OutboundRequest::new(Method::POST, self.endpoint(path, "")).multipart(payload);
        self.send(request).await
    }
}
