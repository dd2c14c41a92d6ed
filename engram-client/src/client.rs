//! StoreClient — typed store operations over the pooled transport, with
//! bounded exponential backoff for transient failures.
//!
//! Retries cover transport faults only (connection refused, 5xx). Store
//! rejections and malformed bodies surface immediately; query-level
//! timeouts are never retried here.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use engram_core::config::StoreConfig;
use engram_core::constants::{INITIAL_BACKOFF_MS, MAX_BACKOFF_MS};
use engram_core::errors::{EngramError, EngramResult, TransportError};
use engram_core::graph::{Direction, GraphNode, Neighborhood};
use engram_core::models::{HealthStatus, RankedCandidate};
use engram_core::traits::GraphStore;

use crate::pool::ConnectionPool;
use crate::protocol::{
    DegreeData, DegreeParams, HealthData, NeighborParams, NodeData, NodeParams, StoreOperation,
    VectorSearchData, VectorSearchParams,
};

/// Client for the external graph/vector store.
///
/// Exclusively owns its connection pool; the pool handle is never exposed
/// upward.
pub struct StoreClient {
    pool: ConnectionPool,
    max_retries: u32,
}

impl StoreClient {
    /// Connect to the store described by `config`.
    pub fn new(config: &StoreConfig) -> EngramResult<Self> {
        Ok(Self {
            pool: ConnectionPool::new(config)?,
            max_retries: config.max_retries,
        })
    }

    /// Execute one operation, retrying transient transport failures with
    /// exponential backoff up to the configured budget.
    async fn request<P, T>(&self, operation: StoreOperation, params: P) -> EngramResult<T>
    where
        P: Serialize + Clone,
        T: DeserializeOwned,
    {
        let mut attempt: u32 = 0;
        let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);

        loop {
            match self.pool.execute(operation, params.clone()).await {
                Ok(data) => return Ok(data),
                Err(EngramError::Transport(e)) if e.is_transient() => {
                    if attempt >= self.max_retries {
                        return Err(TransportError::RetriesExhausted {
                            attempts: attempt + 1,
                            last_error: e.to_string(),
                        }
                        .into());
                    }
                    attempt += 1;
                    warn!(?operation, attempt, error = %e, "transient store failure, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(Duration::from_millis(MAX_BACKOFF_MS));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl GraphStore for StoreClient {
    async fn fetch_node(&self, id: &str) -> EngramResult<Option<GraphNode>> {
        let data: NodeData = self
            .request(
                StoreOperation::Node,
                NodeParams {
                    node_id: id.to_string(),
                },
            )
            .await?;
        Ok(data.node)
    }

    async fn neighbors(
        &self,
        node_id: &str,
        direction: Direction,
        edge_types: &[String],
    ) -> EngramResult<Neighborhood> {
        self.request(
            StoreOperation::Traverse,
            NeighborParams {
                node_id: node_id.to_string(),
                direction,
                edge_types: edge_types.to_vec(),
            },
        )
        .await
    }

    async fn degree(&self, node_id: &str, direction: Direction) -> EngramResult<u64> {
        let data: DegreeData = self
            .request(
                StoreOperation::Degree,
                DegreeParams {
                    node_id: node_id.to_string(),
                    direction,
                },
            )
            .await?;
        Ok(data.degree)
    }

    async fn vector_search(
        &self,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> EngramResult<Vec<RankedCandidate>> {
        let data: VectorSearchData = self
            .request(
                StoreOperation::VectorSearch,
                VectorSearchParams {
                    embedding: embedding.to_vec(),
                    top_k,
                    min_similarity,
                },
            )
            .await?;
        Ok(data.matches)
    }

    async fn health_check(&self) -> EngramResult<HealthStatus> {
        let started = Instant::now();
        let data: HealthData = self
            .request(StoreOperation::Health, serde_json::json!({}))
            .await?;
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(healthy = data.healthy, latency_ms, "store health probe");
        Ok(HealthStatus {
            healthy: data.healthy,
            latency_ms,
            details: data.details,
        })
    }
}
