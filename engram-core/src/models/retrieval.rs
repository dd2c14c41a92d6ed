//! Retrieval query and result models.

use serde::{Deserialize, Serialize};

use crate::config::TraversalOptions;

/// A similarity-ranked candidate from the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: String,
    /// Cosine similarity in [-1, 1].
    pub similarity: f32,
}

/// One entry of the fused ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: String,
    /// Sum of `1 / (k + rank)` over the input lists containing this id.
    pub fused_score: f64,
    /// 1-based position in the fused ranking.
    pub rank: usize,
}

/// A logical retrieval request. At least one of `embedding` and
/// `seed_node_id` must be present; with only one, the facade runs
/// single-mode retrieval and skips fusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalQuery {
    pub embedding: Option<Vec<f32>>,
    pub seed_node_id: Option<String>,
    pub options: TraversalOptions,
    /// Vector-leg result width.
    pub top_k: usize,
    /// Vector-leg similarity floor.
    pub min_similarity: f32,
}

impl Default for RetrievalQuery {
    fn default() -> Self {
        Self {
            embedding: None,
            seed_node_id: None,
            options: TraversalOptions::default(),
            top_k: crate::constants::DEFAULT_NODE_LIMIT,
            min_similarity: 0.0,
        }
    }
}

/// The facade's unified response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub results: Vec<FusedResult>,
    /// True when one requested retrieval leg failed or timed out and the
    /// ranking was produced from the surviving leg alone. Distinct from
    /// single-mode-by-request, which is not degraded.
    pub degraded: bool,
    pub from_cache: bool,
    pub execution_time_ms: u64,
}

impl RetrievalResult {
    /// An empty, non-degraded result (both fusion inputs empty is not an
    /// error).
    pub fn empty(execution_time_ms: u64) -> Self {
        Self {
            results: Vec::new(),
            degraded: false,
            from_cache: false,
            execution_time_ms,
        }
    }
}
