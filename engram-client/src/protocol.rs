//! Wire protocol for the graph/vector store — JSON request/response
//! envelopes with forward compatibility. Exact framing beyond this is the
//! store's concern; the engine only requires request/response semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use engram_core::errors::TransportError;
use engram_core::graph::Direction;

/// Current protocol version.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Operations the store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreOperation {
    /// Fetch one node snapshot.
    #[serde(rename = "node")]
    Node,
    /// Fetch adjacency for one node.
    #[serde(rename = "traverse")]
    Traverse,
    /// Node degree at query time.
    #[serde(rename = "degree")]
    Degree,
    /// Nearest-neighbor search over the vector index.
    #[serde(rename = "vectorSearch")]
    VectorSearch,
    /// Health probe.
    #[serde(rename = "health")]
    Health,
}

/// Envelope for all store requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRequest<T> {
    /// Protocol version for forward compatibility.
    pub version: String,
    /// Unique request ID for tracing.
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub operation: StoreOperation,
    pub params: T,
}

impl<T: Serialize> StoreRequest<T> {
    pub fn new(operation: StoreOperation, params: T) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            operation,
            params,
        }
    }
}

/// Envelope for all store responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct StoreResponse<T> {
    #[serde(default)]
    pub request_id: Option<String>,
    pub success: bool,
    /// Error message when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> StoreResponse<T> {
    /// Unwrap the envelope into payload or a typed transport error.
    pub fn into_result(self) -> Result<T, TransportError> {
        if !self.success {
            return Err(TransportError::StoreError {
                message: self
                    .error
                    .unwrap_or_else(|| "store reported failure without detail".to_string()),
            });
        }
        self.data.ok_or_else(|| TransportError::MalformedResponse {
            message: "success response with no data".to_string(),
        })
    }
}

/// Params for `node`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeParams {
    pub node_id: String,
}

/// Params for `traverse` (single-node adjacency).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborParams {
    pub node_id: String,
    pub direction: Direction,
    /// Empty means all edge types.
    #[serde(default)]
    pub edge_types: Vec<String>,
}

/// Params for `degree`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeParams {
    pub node_id: String,
    pub direction: Direction,
}

/// Params for `vectorSearch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSearchParams {
    pub embedding: Vec<f32>,
    pub top_k: usize,
    pub min_similarity: f32,
}

/// Payload of a `node` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub node: Option<engram_core::graph::GraphNode>,
}

/// Payload of a `degree` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeData {
    pub degree: u64,
}

/// Payload of a `vectorSearch` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSearchData {
    pub matches: Vec<engram_core::models::RankedCandidate>,
}

/// Payload of a `health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthData {
    pub healthy: bool,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
