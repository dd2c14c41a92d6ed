//! Tunable defaults for traversal, scoring, fusion, and caching.
//!
//! The weight and threshold values here are empirical starting points, not
//! invariants. Callers override them through `TraversalOptions`.

/// Engram system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default maximum traversal depth.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Default maximum number of distinct nodes discovered per traversal.
pub const DEFAULT_NODE_LIMIT: usize = 100;

/// Default per-query traversal budget in milliseconds.
pub const DEFAULT_TRAVERSAL_TIMEOUT_MS: u64 = 1000;

/// Edges scoring below this priority are dropped. Zero disables filtering.
pub const DEFAULT_EDGE_WEIGHT_THRESHOLD: f64 = 0.3;

/// Edges younger than this many days receive the recency boost.
pub const DEFAULT_RECENCY_BOOST_DAYS: i64 = 30;

/// Multiplier applied to edges inside the recency window.
pub const DEFAULT_RECENCY_BOOST_MULTIPLIER: f64 = 1.5;

/// Source nodes with degree above this are treated as hubs.
pub const DEFAULT_HUB_PENALTY_THRESHOLD: u64 = 500;

/// Multiplier applied to edges leaving hub nodes.
pub const DEFAULT_HUB_PENALTY_MULTIPLIER: f64 = 0.5;

/// Fan-out cap: edges kept per expanded node after priority sorting.
pub const DEFAULT_MAX_NEIGHBORS_PER_NODE: usize = 50;

/// RRF smoothing constant. Higher values flatten the fused score curve.
pub const DEFAULT_RRF_K: u32 = 60;

/// Result cache time-to-live (5 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 300_000;

/// Result cache capacity in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Number of pooled store connections.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Maximum number of pooled store connections.
pub const MAX_POOL_SIZE: usize = 8;

/// Default transport retry budget for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial transport retry backoff in milliseconds (doubles per attempt).
pub const INITIAL_BACKOFF_MS: u64 = 50;

/// Backoff ceiling in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 1000;

/// Base weight for edge types without an explicit entry.
pub const DEFAULT_EDGE_WEIGHT: f64 = 0.5;

/// Base weight for an edge type, used when `TraversalOptions.edge_type_weights`
/// has no override. Covers the entity vocabulary (decisions, news, documents,
/// companies); unknown types fall back to [`DEFAULT_EDGE_WEIGHT`].
pub fn default_edge_weight(edge_type: &str) -> f64 {
    match edge_type {
        "SUPPORTED_BY" => 0.7,
        "CONTRADICTED_BY" => 0.65,
        "INFLUENCED_BY" => 0.6,
        "ISSUED_BY" => 0.5,
        "PART_OF" => 0.45,
        "RELATES_TO" => 0.4,
        "MENTIONS" => 0.35,
        _ => DEFAULT_EDGE_WEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_edge_types_have_distinct_weights() {
        assert_eq!(default_edge_weight("INFLUENCED_BY"), 0.6);
        assert_eq!(default_edge_weight("MENTIONS"), 0.35);
    }

    #[test]
    fn unknown_edge_type_falls_back() {
        assert_eq!(default_edge_weight("SOMETHING_ELSE"), DEFAULT_EDGE_WEIGHT);
    }
}
