//! Priority scorer: `priority = base_weight * recency_boost * hub_penalty`.
//!
//! The recency boost favors evidence temporally close to the query; the
//! hub penalty suppresses universally-connected nodes (a sector index, a
//! megacap ticker) that would otherwise dominate every traversal on
//! degree alone. Both factors are multiplicative and independent, so they
//! compose without re-normalization.

use chrono::{DateTime, Duration, Utc};

use engram_core::config::TraversalOptions;
use engram_core::constants::default_edge_weight;
use engram_core::graph::GraphEdge;
use engram_core::models::{FilterStats, PrioritizedEdge};

/// Score one edge. Pure; never fails.
///
/// `hub_degree` is the query-time degree of the edge's source node in the
/// traversal direction. Edges with malformed or missing timestamps get no
/// recency boost.
pub fn score_edge(
    edge: &GraphEdge,
    now: DateTime<Utc>,
    options: &TraversalOptions,
    hub_degree: u64,
) -> PrioritizedEdge {
    let base_weight = options
        .edge_type_weights
        .get(&edge.edge_type)
        .copied()
        .unwrap_or_else(|| default_edge_weight(&edge.edge_type));

    let recency_boost = match edge.timestamp() {
        Some(ts) if now.signed_duration_since(ts) <= Duration::days(options.recency_boost_days) => {
            options.recency_boost_multiplier
        }
        _ => 1.0,
    };

    let hub_penalty = if hub_degree > options.hub_penalty_threshold {
        options.hub_penalty_multiplier
    } else {
        1.0
    };

    PrioritizedEdge {
        edge: edge.clone(),
        priority: base_weight * recency_boost * hub_penalty,
        recency_boost,
        hub_penalty,
    }
}

/// Running tally of examined vs. kept edges for `FilterStats`.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    total: usize,
    kept: usize,
    priority_sum: f64,
}

impl StatsAccumulator {
    pub fn examined(&mut self, count: usize) {
        self.total += count;
    }

    pub fn kept(&mut self, edge: &PrioritizedEdge) {
        self.kept += 1;
        self.priority_sum += edge.priority;
    }

    pub fn finish(self) -> FilterStats {
        FilterStats {
            total_edges: self.total,
            filtered_edges: self.total.saturating_sub(self.kept),
            average_priority: if self.kept > 0 {
                self.priority_sum / self.kept as f64
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn edge(edge_type: &str, age_days: i64, now: DateTime<Utc>) -> GraphEdge {
        let mut properties = HashMap::new();
        properties.insert(
            "timestamp".to_string(),
            serde_json::json!((now - Duration::days(age_days)).to_rfc3339()),
        );
        GraphEdge {
            id: format!("e-{edge_type}"),
            edge_type: edge_type.to_string(),
            source_id: "decision-1".into(),
            target_id: "news-7".into(),
            properties,
        }
    }

    #[test]
    fn recent_influenced_by_edge_scores_point_nine() {
        // INFLUENCED_BY base 0.6, created 2 days ago (inside the 30-day
        // window, boost 1.5), degree 10 below the hub threshold.
        let now = Utc::now();
        let options = TraversalOptions::default();
        let scored = score_edge(&edge("INFLUENCED_BY", 2, now), now, &options, 10);
        assert!((scored.priority - 0.9).abs() < 1e-9);
        assert_eq!(scored.recency_boost, 1.5);
        assert_eq!(scored.hub_penalty, 1.0);
    }

    #[test]
    fn stale_edge_gets_no_recency_boost() {
        let now = Utc::now();
        let options = TraversalOptions::default();
        let scored = score_edge(&edge("INFLUENCED_BY", 90, now), now, &options, 10);
        assert_eq!(scored.recency_boost, 1.0);
        assert!((scored.priority - 0.6).abs() < 1e-9);
    }

    #[test]
    fn hub_source_is_penalized() {
        let now = Utc::now();
        let options = TraversalOptions::default();
        let scored = score_edge(&edge("INFLUENCED_BY", 90, now), now, &options, 501);
        assert_eq!(scored.hub_penalty, 0.5);
        assert!((scored.priority - 0.3).abs() < 1e-9);
    }

    #[test]
    fn missing_timestamp_means_no_boost() {
        let now = Utc::now();
        let options = TraversalOptions::default();
        let bare = GraphEdge {
            id: "e1".into(),
            edge_type: "RELATES_TO".into(),
            source_id: "a".into(),
            target_id: "b".into(),
            properties: HashMap::new(),
        };
        let scored = score_edge(&bare, now, &options, 0);
        assert_eq!(scored.recency_boost, 1.0);
    }

    #[test]
    fn explicit_type_weight_overrides_default() {
        let now = Utc::now();
        let mut options = TraversalOptions::default();
        options
            .edge_type_weights
            .insert("INFLUENCED_BY".to_string(), 0.2);
        let scored = score_edge(&edge("INFLUENCED_BY", 90, now), now, &options, 10);
        assert!((scored.priority - 0.2).abs() < 1e-9);
    }

    #[test]
    fn raising_recency_multiplier_never_lowers_recent_priority() {
        let now = Utc::now();
        let e = edge("RELATES_TO", 1, now);

        let low = TraversalOptions {
            recency_boost_multiplier: 1.2,
            ..Default::default()
        };
        let high = TraversalOptions {
            recency_boost_multiplier: 2.0,
            ..Default::default()
        };
        assert!(
            score_edge(&e, now, &high, 10).priority >= score_edge(&e, now, &low, 10).priority
        );
    }

    #[test]
    fn stats_accumulator_averages_kept_edges() {
        let now = Utc::now();
        let options = TraversalOptions::default();
        let mut stats = StatsAccumulator::default();

        stats.examined(3);
        stats.kept(&score_edge(&edge("INFLUENCED_BY", 2, now), now, &options, 10));
        stats.kept(&score_edge(&edge("INFLUENCED_BY", 90, now), now, &options, 10));

        let stats = stats.finish();
        assert_eq!(stats.total_edges, 3);
        assert_eq!(stats.filtered_edges, 1);
        assert!((stats.average_priority - 0.75).abs() < 1e-9);
    }

    #[test]
    fn empty_stats_have_zero_average() {
        let stats = StatsAccumulator::default().finish();
        assert_eq!(stats.average_priority, 0.0);
    }
}
