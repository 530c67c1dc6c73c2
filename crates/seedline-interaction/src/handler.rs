use async_trait::async_trait;
use seedline_core::{ApiResponse, OutboundRequest, Result};
use std::sync::Arc;

/// One link of the request chain.
///
/// Interceptors wrap the next handler; the transport is the terminal link.
/// A non-2xx response is reported as `SeedlineError::Http`, a missing response
/// as `SeedlineError::Transport`.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: OutboundRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<H> RequestHandler for Arc<H>
where
    H: RequestHandler + ?Sized,
{
    async fn handle(&self, request: OutboundRequest) -> Result<ApiResponse> {
        (**self).handle(request).await
    }
}
