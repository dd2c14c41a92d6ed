//! Reciprocal Rank Fusion: `score(id) = Σ 1/(k + rank_list(id))`.
//!
//! Graph priority and cosine similarity do not share a scale, so raw
//! scores cannot be merged directly; fusing 1-based ranks sidesteps the
//! calibration problem entirely. Ties break by id lexical order for
//! determinism.

use std::collections::HashMap;

use engram_core::constants::DEFAULT_RRF_K;
use engram_core::models::FusedResult;

/// Fuse two ranked id lists into one ordering.
///
/// Ids absent from a list contribute nothing for that list. An id
/// appearing twice in one list counts only its best (first) rank.
pub fn fuse(graph_ranked: &[String], vector_ranked: &[String], rrf_k: u32) -> Vec<FusedResult> {
    let mut scores: HashMap<&str, f64> = HashMap::new();

    for list in [graph_ranked, vector_ranked] {
        let mut seen = std::collections::HashSet::new();
        for (index, id) in list.iter().enumerate() {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let rank = index + 1;
            *scores.entry(id.as_str()).or_default() += 1.0 / (rrf_k as f64 + rank as f64);
        }
    }

    let mut fused: Vec<(String, f64)> = scores
        .into_iter()
        .map(|(id, score)| (id.to_string(), score))
        .collect();
    fused.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    fused
        .into_iter()
        .enumerate()
        .map(|(index, (id, fused_score))| FusedResult {
            id,
            fused_score,
            rank: index + 1,
        })
        .collect()
}

/// Fuse with the default smoothing constant (60).
pub fn fuse_default(graph_ranked: &[String], vector_ranked: &[String]) -> Vec<FusedResult> {
    fuse(graph_ranked, vector_ranked, DEFAULT_RRF_K)
}
