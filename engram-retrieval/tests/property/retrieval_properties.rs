//! Property tests for the pure retrieval stages: priority scoring and
//! reciprocal rank fusion.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use proptest::prelude::*;

use engram_core::config::TraversalOptions;
use engram_core::graph::GraphEdge;
use engram_retrieval::fusion::fuse;
use engram_retrieval::scoring::score_edge;

fn edge(edge_type: &str, age_days: i64, now: chrono::DateTime<Utc>) -> GraphEdge {
    let mut properties = HashMap::new();
    properties.insert(
        "timestamp".to_string(),
        serde_json::json!((now - Duration::days(age_days)).to_rfc3339()),
    );
    GraphEdge {
        id: "e1".to_string(),
        edge_type: edge_type.to_string(),
        source_id: "a".to_string(),
        target_id: "b".to_string(),
        properties,
    }
}

fn unique_ids() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::hash_set("[a-z]{1,8}", 0..20)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn fusing_a_list_with_itself_preserves_its_order(ids in unique_ids()) {
        let fused = fuse(&ids, &ids, 60);
        let order: Vec<String> = fused.into_iter().map(|f| f.id).collect();
        prop_assert_eq!(order, ids);
    }

    #[test]
    fn fused_scores_are_positive_and_bounded(
        graph in unique_ids(),
        vector in unique_ids(),
        k in 1u32..200,
    ) {
        let upper = 2.0 / (k as f64 + 1.0);
        for result in fuse(&graph, &vector, k) {
            prop_assert!(result.fused_score > 0.0);
            prop_assert!(result.fused_score <= upper + 1e-12);
        }
    }

    #[test]
    fn fusion_output_is_sorted_with_contiguous_ranks(
        graph in unique_ids(),
        vector in unique_ids(),
    ) {
        let fused = fuse(&graph, &vector, 60);
        for (index, window) in fused.windows(2).enumerate() {
            prop_assert!(window[0].fused_score >= window[1].fused_score);
            prop_assert_eq!(window[0].rank, index + 1);
        }
    }

    #[test]
    fn priority_is_the_product_of_its_factors(
        base in 0.01f64..2.0,
        age_days in 0i64..120,
        hub_degree in 0u64..2000,
    ) {
        let mut options = TraversalOptions::default();
        options.edge_type_weights.insert("RELATES_TO".to_string(), base);
        let now = Utc::now();

        let scored = score_edge(&edge("RELATES_TO", age_days, now), now, &options, hub_degree);
        let expected = base * scored.recency_boost * scored.hub_penalty;
        prop_assert!((scored.priority - expected).abs() < 1e-12);
        prop_assert!(scored.priority > 0.0);
    }

    #[test]
    fn raising_the_recency_multiplier_never_lowers_recent_priority(
        low in 1.0f64..2.0,
        extra in 0.0f64..3.0,
    ) {
        let now = Utc::now();
        let recent = edge("INFLUENCED_BY", 1, now);

        let weaker = TraversalOptions {
            recency_boost_multiplier: low,
            ..Default::default()
        };
        let stronger = TraversalOptions {
            recency_boost_multiplier: low + extra,
            ..Default::default()
        };
        prop_assert!(
            score_edge(&recent, now, &stronger, 10).priority
                >= score_edge(&recent, now, &weaker, 10).priority
        );
    }

    #[test]
    fn hub_penalty_applies_exactly_above_the_threshold(degree in 0u64..2000) {
        let now = Utc::now();
        let options = TraversalOptions::default();
        let scored = score_edge(&edge("INFLUENCED_BY", 90, now), now, &options, degree);
        if degree > options.hub_penalty_threshold {
            prop_assert_eq!(scored.hub_penalty, options.hub_penalty_multiplier);
        } else {
            prop_assert_eq!(scored.hub_penalty, 1.0);
        }
    }
}
