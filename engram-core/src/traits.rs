//! The seam between retrieval logic and the external graph/vector store.

use async_trait::async_trait;

use crate::errors::EngramResult;
use crate::graph::{Direction, GraphNode, Neighborhood};
use crate::models::{HealthStatus, RankedCandidate};

/// Typed operations against the external graph/vector store.
///
/// Implemented by the pooled network client and by in-memory fakes in
/// tests. All operations are single request/response; no streaming.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Fetch a node snapshot by id. `Ok(None)` means the node does not exist.
    async fn fetch_node(&self, id: &str) -> EngramResult<Option<GraphNode>>;

    /// Edges adjacent to `node_id` in the given direction, with far-endpoint
    /// node snapshots. `edge_types` empty means all types.
    async fn neighbors(
        &self,
        node_id: &str,
        direction: Direction,
        edge_types: &[String],
    ) -> EngramResult<Neighborhood>;

    /// Degree of `node_id` in the given direction, at query time.
    async fn degree(&self, node_id: &str, direction: Direction) -> EngramResult<u64>;

    /// Nearest neighbors of `embedding` by cosine similarity, best first.
    async fn vector_search(
        &self,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> EngramResult<Vec<RankedCandidate>>;

    /// Probe the store. Used to decide whether to attempt a query at all.
    async fn health_check(&self) -> EngramResult<HealthStatus>;
}
