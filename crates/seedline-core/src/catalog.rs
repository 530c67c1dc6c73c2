//! Wire models of the file catalog and node endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the shared file catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedFile {
    pub filename: String,
    #[serde(default)]
    pub size: Option<u64>,
    /// Number of nodes currently seeding the file.
    #[serde(default, alias = "seeds", alias = "num_seeds")]
    pub seeders: Option<u64>,
    /// Fields the client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SharedFile {
    pub fn named(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            size: None,
            seeders: None,
            extra: Map::new(),
        }
    }
}

/// Catalog listing: `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileListing {
    pub items: Vec<SharedFile>,
}

/// A distribution node connected to the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default, alias = "id")]
    pub node_id: Option<Value>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Connected-node listing: `{ "ok": bool, "connected_nodes": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectedNodes {
    pub ok: bool,
    #[serde(default)]
    pub connected_nodes: Vec<NodeInfo>,
}

/// Body of a download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub filename: String,
}

/// Generic acknowledgement returned by one-shot actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionReply {
    /// Reads a reply leniently: objects are decoded, bare strings become the
    /// message, anything else yields an empty reply.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Self {
                message: Some(text.clone()),
            },
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}
