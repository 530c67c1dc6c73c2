use crate::gateway::{ApiGateway, api_path};
use seedline_core::ApiOutcome;
use seedline_core::catalog::ConnectedNodes;
use std::sync::Arc;

/// Distribution nodes known to the tracker.
#[derive(Clone)]
pub struct NodeRequestService {
    gateway: Arc<ApiGateway>,
}

impl NodeRequestService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// GET `api/v1/nodes/connected`.
    pub async fn connected(&self) -> ApiOutcome<ConnectedNodes> {
        let result = self.gateway.get(&api_path("/nodes/connected")).await;
        ApiOutcome::from_response(result, |r| r.decode())
    }
}
