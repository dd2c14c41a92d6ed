//! Traversal response models.

use serde::{Deserialize, Serialize};

use crate::graph::{GraphEdge, GraphNode, GraphPath};

/// An edge with its query-time composite priority.
///
/// Derived per query and never stored: recency and hub degree are
/// time-varying, so yesterday's priority is stale today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedEdge {
    pub edge: GraphEdge,
    /// `base_weight * recency_boost * hub_penalty`.
    pub priority: f64,
    pub recency_boost: f64,
    pub hub_penalty: f64,
}

/// Summary of what traversal discarded, for observability and tuning.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FilterStats {
    /// Edges examined across all expansions.
    pub total_edges: usize,
    /// Edges dropped by the weight threshold or the fan-out cap.
    pub filtered_edges: usize,
    /// Mean priority of the edges that survived (0.0 when none did).
    pub average_priority: f64,
}

/// Result of a bounded traversal from a seed node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalResponse {
    pub paths: Vec<GraphPath>,
    pub nodes: Vec<GraphNode>,
    pub execution_time_ms: u64,
    /// False when the wall-clock budget fired mid-expansion and the
    /// response carries best-effort partial results.
    pub complete: bool,
}

/// Traversal result with scored edges and filter statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedTraversalResponse {
    pub paths: Vec<GraphPath>,
    pub nodes: Vec<GraphNode>,
    pub execution_time_ms: u64,
    pub complete: bool,
    /// Every followed edge, sorted by priority descending.
    pub prioritized_edges: Vec<PrioritizedEdge>,
    pub filter_stats: FilterStats,
}

impl WeightedTraversalResponse {
    /// Discovered node ids in priority-edge order (first occurrence wins),
    /// the graph-side input to rank fusion. The seed anchors the query and
    /// is excluded from its own ranking.
    pub fn ranked_node_ids(&self, seed_id: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut ranked = Vec::new();
        for scored in &self.prioritized_edges {
            for id in [&scored.edge.target_id, &scored.edge.source_id] {
                if id != seed_id && seen.insert(id.clone()) {
                    ranked.push(id.clone());
                }
            }
        }
        ranked
    }
}
