//! Graph data model: nodes, edges, paths.
//!
//! All types here are value snapshots produced per query, never live
//! references into the external store.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Traversal direction relative to the node being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// A node snapshot returned by the store. Identity is the `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

/// A directed edge snapshot. `edge_type` determines the base scoring weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl GraphEdge {
    /// Creation timestamp, read from the `timestamp` (or legacy `created_at`)
    /// property. RFC 3339 strings and epoch-millisecond numbers are accepted;
    /// anything malformed yields `None`, which scoring treats as "no recency
    /// boost".
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let value = self
            .properties
            .get("timestamp")
            .or_else(|| self.properties.get("created_at"))?;
        match value {
            serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            serde_json::Value::Number(n) => {
                let millis = n.as_i64()?;
                Utc.timestamp_millis_opt(millis).single()
            }
            _ => None,
        }
    }

    /// The endpoint of this edge that is not `node_id`.
    ///
    /// For a self-loop both endpoints match and the target is returned.
    pub fn other_endpoint(&self, node_id: &str) -> &str {
        if self.source_id == node_id {
            &self.target_id
        } else {
            &self.source_id
        }
    }
}

/// An ordered walk from the traversal seed to a discovered node.
/// `nodes.len() == edges.len() + 1`; query-result artifact, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPath {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphPath {
    /// Path length in edges.
    pub fn length(&self) -> usize {
        self.edges.len()
    }
}

/// One node's adjacency as returned by the store's `traverse` operation:
/// the matching edges plus snapshots of the far endpoints, so traversal
/// never needs a second round trip per neighbor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Neighborhood {
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
}
