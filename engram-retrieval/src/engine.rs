//! RetrievalEngine: the facade orchestrating one logical query.
//!
//! cache lookup → concurrent graph traversal ∥ vector search → priority
//! scoring → rank fusion → cache put. A failed leg degrades the call to
//! single-mode results; the call itself fails only when every requested
//! leg failed or the input was invalid.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use engram_client::{StoreClient, VectorSearchClient};
use engram_core::config::{StoreConfig, TraversalOptions};
use engram_core::constants::DEFAULT_RRF_K;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{
    FusedResult, HealthStatus, RetrievalQuery, RetrievalResult, WeightedTraversalResponse,
};
use engram_core::traits::GraphStore;

use crate::cache::{query_fingerprint, ResultCache};
use crate::fusion::fuse;
use crate::traversal::TraversalEngine;

/// The public entry point for hybrid retrieval.
///
/// Owns the result cache and a shared handle to the store; stateless
/// otherwise, so concurrent `retrieve` calls are independent.
pub struct RetrievalEngine {
    store: Arc<dyn GraphStore>,
    traversal: TraversalEngine,
    vector: VectorSearchClient,
    cache: ResultCache,
    rrf_k: u32,
}

impl RetrievalEngine {
    /// Build an engine over an existing store handle, with cache bounds
    /// from `config`.
    pub fn new(store: Arc<dyn GraphStore>, config: &StoreConfig) -> Self {
        Self {
            traversal: TraversalEngine::new(Arc::clone(&store)),
            vector: VectorSearchClient::new(Arc::clone(&store)),
            cache: ResultCache::new(
                Duration::from_millis(config.cache_ttl_ms),
                config.cache_capacity,
            ),
            store,
            rrf_k: DEFAULT_RRF_K,
        }
    }

    /// Connect to the store described by `config` and build an engine on
    /// top of it.
    pub fn connect(config: &StoreConfig) -> EngramResult<Self> {
        let store: Arc<dyn GraphStore> = Arc::new(StoreClient::new(config)?);
        Ok(Self::new(store, config))
    }

    /// Override the RRF smoothing constant (default 60).
    pub fn with_rrf_k(mut self, rrf_k: u32) -> Self {
        self.rrf_k = rrf_k;
        self
    }

    /// Run one hybrid retrieval.
    ///
    /// With both an embedding and a seed node the two legs run
    /// concurrently and are fused; with one of them, retrieval is
    /// single-mode by request (not degraded). `degraded = true` marks a
    /// result where a requested leg failed or timed out and the other
    /// carried the ranking alone.
    pub async fn retrieve(&self, query: &RetrievalQuery) -> EngramResult<RetrievalResult> {
        let started = Instant::now();
        query.options.validate()?;
        if query.embedding.is_none() && query.seed_node_id.is_none() {
            return Err(EngramError::invalid_options(
                "query must supply an embedding, a seed node id, or both",
            ));
        }

        let key = query_fingerprint(query);
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, "retrieval served from cache");
            return Ok(RetrievalResult {
                results: truncated(cached, query.options.limit),
                degraded: false,
                from_cache: true,
                execution_time_ms: started.elapsed().as_millis() as u64,
            });
        }

        let (results, degraded, cacheable) = match (&query.seed_node_id, &query.embedding) {
            (Some(seed_id), Some(embedding)) => {
                self.hybrid(seed_id, embedding, query).await?
            }
            (Some(seed_id), None) => {
                let graph = self.graph_leg(seed_id, &query.options).await?;
                let ranked = graph.ranked_node_ids(seed_id);
                (fuse(&ranked, &[], self.rrf_k), false, graph.complete)
            }
            (None, Some(embedding)) => {
                let ranked = self.vector_leg(embedding, query).await?;
                (fuse(&ranked, &[], self.rrf_k), false, true)
            }
            (None, None) => unreachable!("validated above"),
        };

        if cacheable && !degraded {
            self.cache.put(key, results.clone());
        }

        let execution_time_ms = started.elapsed().as_millis() as u64;
        info!(
            results = results.len(),
            degraded, execution_time_ms, "retrieval complete"
        );
        Ok(RetrievalResult {
            results: truncated(results, query.options.limit),
            degraded,
            from_cache: false,
            execution_time_ms,
        })
    }

    /// Bounded traversal entry point, exposed alongside `retrieve` as the
    /// only public query surfaces.
    pub async fn traverse(
        &self,
        seed_id: &str,
        options: &TraversalOptions,
    ) -> EngramResult<WeightedTraversalResponse> {
        self.traversal.traverse(seed_id, options).await
    }

    /// Probe the underlying store.
    pub async fn health(&self) -> EngramResult<HealthStatus> {
        self.store.health_check().await
    }

    /// Drop all cached rankings.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Both legs concurrently, joined before fusion. Returns
    /// (results, degraded, cacheable).
    async fn hybrid(
        &self,
        seed_id: &str,
        embedding: &[f32],
        query: &RetrievalQuery,
    ) -> EngramResult<(Vec<FusedResult>, bool, bool)> {
        let (graph_outcome, vector_outcome) = tokio::join!(
            self.graph_leg(seed_id, &query.options),
            self.vector_leg(embedding, query),
        );

        match (graph_outcome, vector_outcome) {
            (Ok(graph), Ok(vector_ranked)) => {
                let graph_ranked = graph.ranked_node_ids(seed_id);
                let fused = fuse(&graph_ranked, &vector_ranked, self.rrf_k);
                Ok((fused, false, graph.complete))
            }
            (Ok(graph), Err(vector_err)) => {
                warn!(error = %vector_err, "vector leg failed, degrading to graph-only");
                let graph_ranked = graph.ranked_node_ids(seed_id);
                Ok((fuse(&graph_ranked, &[], self.rrf_k), true, false))
            }
            (Err(graph_err), Ok(vector_ranked)) => {
                warn!(error = %graph_err, "graph leg failed, degrading to vector-only");
                Ok((fuse(&vector_ranked, &[], self.rrf_k), true, false))
            }
            (Err(graph_err), Err(vector_err)) => Err(EngramError::RetrievalFailed {
                reason: format!("graph leg: {graph_err}; vector leg: {vector_err}"),
            }),
        }
    }

    async fn graph_leg(
        &self,
        seed_id: &str,
        options: &TraversalOptions,
    ) -> EngramResult<WeightedTraversalResponse> {
        // Traversal bounds itself with the options deadline and reports
        // partial results; no outer timeout needed.
        self.traversal.traverse(seed_id, options).await
    }

    /// Vector search under the facade budget. A leg that outlives the
    /// budget is abandoned; its late result is discarded with the future.
    async fn vector_leg(
        &self,
        embedding: &[f32],
        query: &RetrievalQuery,
    ) -> EngramResult<Vec<String>> {
        let budget = Duration::from_millis(query.options.timeout_ms);
        let candidates = tokio::time::timeout(
            budget,
            self.vector
                .search_similar(embedding, query.top_k, query.min_similarity),
        )
        .await
        .map_err(|_| EngramError::Timeout {
            elapsed_ms: budget.as_millis() as u64,
        })??;
        Ok(candidates.into_iter().map(|c| c.id).collect())
    }
}

fn truncated(mut results: Vec<FusedResult>, limit: usize) -> Vec<FusedResult> {
    results.truncate(limit);
    results
}
