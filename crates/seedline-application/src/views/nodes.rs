use super::list::{ListSource, ListView};
use crate::polling::RefreshSchedule;
use async_trait::async_trait;
use seedline_core::ApiOutcome;
use seedline_core::catalog::NodeInfo;
use seedline_interaction::NodeRequestService;

/// Nodes currently connected to the tracker.
pub struct NodeSource {
    nodes: NodeRequestService,
}

#[async_trait]
impl ListSource for NodeSource {
    type Item = NodeInfo;

    fn name(&self) -> &'static str {
        "nodes"
    }

    /// A reply with `ok: false` is not applied.
    async fn fetch(&self) -> ApiOutcome<Vec<NodeInfo>> {
        match self.nodes.connected().await {
            ApiOutcome::Ok(reply) if reply.ok => ApiOutcome::Ok(reply.connected_nodes),
            ApiOutcome::Ok(_) => ApiOutcome::Malformed("backend reported ok=false".to_string()),
            other => other.map(|reply| reply.connected_nodes),
        }
    }
}

/// Node management screen.
pub struct NodesView {
    list: ListView<NodeSource>,
}

impl NodesView {
    pub fn new(nodes: NodeRequestService, schedule: RefreshSchedule) -> Self {
        Self {
            list: ListView::new(NodeSource { nodes }, schedule),
        }
    }

    pub fn list(&self) -> &ListView<NodeSource> {
        &self.list
    }
}
