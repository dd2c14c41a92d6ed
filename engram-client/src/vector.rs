//! Thin adapter over the store's nearest-neighbor search.
//!
//! The external store owns the index; this side only enforces the result
//! contract (sorted descending, similarity floor, top-k truncation) and
//! maps an exhausted transport into `VectorSearchUnavailable` so the
//! facade can fall back to graph-only retrieval.

use std::sync::Arc;

use tracing::debug;

use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::RankedCandidate;
use engram_core::traits::GraphStore;

/// Vector search client bound to a store.
pub struct VectorSearchClient {
    store: Arc<dyn GraphStore>,
}

impl VectorSearchClient {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Similarity-ranked candidates for `embedding`, best first.
    ///
    /// The store is asked for exactly the contract; the filter, sort, and
    /// truncation are re-applied here so a sloppy store cannot break the
    /// fusion input invariants.
    pub async fn search_similar(
        &self,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> EngramResult<Vec<RankedCandidate>> {
        if embedding.is_empty() {
            return Err(EngramError::invalid_options("embedding must not be empty"));
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let mut candidates = self
            .store
            .vector_search(embedding, top_k, min_similarity)
            .await
            .map_err(|e| match e {
                EngramError::Transport(inner) => EngramError::VectorSearchUnavailable {
                    reason: inner.to_string(),
                },
                other => other,
            })?;

        candidates.retain(|c| c.similarity >= min_similarity);
        candidates.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(top_k);

        debug!(candidates = candidates.len(), top_k, "vector search complete");
        Ok(candidates)
    }
}
