//! Configuration surface: store connection settings and traversal options.
//!
//! Every field defaults from `constants`; validation happens once at the
//! entry point, not scattered through call sites.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{EngramResult, TraversalError};
use crate::graph::Direction;

/// Connection settings for the external graph/vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    /// Per-request transport timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retry budget for transient transport failures.
    pub max_retries: u32,
    /// Number of pooled connections (clamped to [1, MAX_POOL_SIZE]).
    pub pool_size: usize,
    pub cache_ttl_ms: u64,
    pub cache_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7700,
            timeout_ms: constants::DEFAULT_TRAVERSAL_TIMEOUT_MS,
            max_retries: constants::DEFAULT_MAX_RETRIES,
            pool_size: constants::DEFAULT_POOL_SIZE,
            cache_ttl_ms: constants::DEFAULT_CACHE_TTL_MS,
            cache_capacity: constants::DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Base URL of the store endpoint.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Options controlling one bounded traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalOptions {
    /// Maximum expansion depth. Depth 0 returns only the seed.
    pub max_depth: usize,
    /// Stop discovering once this many distinct nodes have been found.
    pub limit: usize,
    /// Restrict traversal to these edge types. Empty means all types.
    pub edge_types: Vec<String>,
    pub direction: Direction,
    /// Wall-clock budget; expansion past the deadline returns partial results.
    pub timeout_ms: u64,
    /// Minimum priority an edge must score to be followed. Zero disables.
    pub edge_weight_threshold: f64,
    /// Per-type base weight overrides; unlisted types use the built-in table.
    pub edge_type_weights: HashMap<String, f64>,
    pub recency_boost_days: i64,
    pub recency_boost_multiplier: f64,
    pub hub_penalty_threshold: u64,
    pub hub_penalty_multiplier: f64,
    /// Fan-out cap per expanded node, applied after priority sorting.
    pub max_neighbors_per_node: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            limit: constants::DEFAULT_NODE_LIMIT,
            edge_types: Vec::new(),
            direction: Direction::Outgoing,
            timeout_ms: constants::DEFAULT_TRAVERSAL_TIMEOUT_MS,
            edge_weight_threshold: constants::DEFAULT_EDGE_WEIGHT_THRESHOLD,
            edge_type_weights: HashMap::new(),
            recency_boost_days: constants::DEFAULT_RECENCY_BOOST_DAYS,
            recency_boost_multiplier: constants::DEFAULT_RECENCY_BOOST_MULTIPLIER,
            hub_penalty_threshold: constants::DEFAULT_HUB_PENALTY_THRESHOLD,
            hub_penalty_multiplier: constants::DEFAULT_HUB_PENALTY_MULTIPLIER,
            max_neighbors_per_node: constants::DEFAULT_MAX_NEIGHBORS_PER_NODE,
        }
    }
}

impl TraversalOptions {
    /// Check the option invariants: `limit > 0`, multipliers strictly
    /// positive, a non-zero fan-out cap, and a usable timeout.
    pub fn validate(&self) -> EngramResult<()> {
        if self.limit == 0 {
            return Err(invalid("limit must be greater than zero"));
        }
        if self.recency_boost_multiplier <= 0.0 {
            return Err(invalid("recency_boost_multiplier must be positive"));
        }
        if self.hub_penalty_multiplier <= 0.0 {
            return Err(invalid("hub_penalty_multiplier must be positive"));
        }
        if self.max_neighbors_per_node == 0 {
            return Err(invalid("max_neighbors_per_node must be greater than zero"));
        }
        if self.edge_weight_threshold < 0.0 {
            return Err(invalid("edge_weight_threshold must not be negative"));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> crate::errors::EngramError {
    TraversalError::InvalidOptions {
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TraversalOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let options = TraversalOptions {
            limit: 0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn non_positive_multipliers_are_rejected() {
        let options = TraversalOptions {
            recency_boost_multiplier: 0.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());

        let options = TraversalOptions {
            hub_penalty_multiplier: -1.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn options_deserialize_with_partial_fields() {
        let options: TraversalOptions =
            serde_json::from_str(r#"{"max_depth": 3, "direction": "both"}"#)
                .expect("partial options");
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.direction, Direction::Both);
        assert_eq!(options.limit, constants::DEFAULT_NODE_LIMIT);
    }

    #[test]
    fn store_config_base_url() {
        let config = StoreConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:7700");
    }
}
