//! Shared test support: an in-memory `GraphStore` with configurable
//! latency and failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use engram_core::errors::{EngramResult, TransportError};
use engram_core::graph::{Direction, GraphEdge, GraphNode, Neighborhood};
use engram_core::models::{HealthStatus, RankedCandidate};
use engram_core::traits::GraphStore;

#[derive(Default)]
pub struct MockGraphStore {
    nodes: HashMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    degree_overrides: HashMap<String, u64>,
    vector_matches: Vec<RankedCandidate>,
    vector_fails: bool,
    delay: Option<Duration>,
    pub neighbor_calls: AtomicUsize,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, id: &str, node_type: &str) -> Self {
        self.nodes.insert(
            id.to_string(),
            GraphNode {
                id: id.to_string(),
                node_type: node_type.to_string(),
                properties: HashMap::new(),
            },
        );
        self
    }

    /// Add a directed edge whose `timestamp` property is `age_days` old.
    pub fn with_edge(
        mut self,
        id: &str,
        edge_type: &str,
        source: &str,
        target: &str,
        age_days: i64,
    ) -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "timestamp".to_string(),
            serde_json::json!((Utc::now() - ChronoDuration::days(age_days)).to_rfc3339()),
        );
        self.edges.push(GraphEdge {
            id: id.to_string(),
            edge_type: edge_type.to_string(),
            source_id: source.to_string(),
            target_id: target.to_string(),
            properties,
        });
        self
    }

    /// Force a node's reported degree (for hub-penalty scenarios).
    pub fn with_degree(mut self, id: &str, degree: u64) -> Self {
        self.degree_overrides.insert(id.to_string(), degree);
        self
    }

    pub fn with_vector_matches(mut self, matches: Vec<(&str, f32)>) -> Self {
        self.vector_matches = matches
            .into_iter()
            .map(|(id, similarity)| RankedCandidate {
                id: id.to_string(),
                similarity,
            })
            .collect();
        self
    }

    pub fn with_vector_failure(mut self) -> Self {
        self.vector_fails = true;
        self
    }

    /// Delay every store call, to exercise deadline behavior.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn adjacent(&self, node_id: &str, direction: Direction) -> Vec<GraphEdge> {
        self.edges
            .iter()
            .filter(|edge| match direction {
                Direction::Outgoing => edge.source_id == node_id,
                Direction::Incoming => edge.target_id == node_id,
                Direction::Both => edge.source_id == node_id || edge.target_id == node_id,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn fetch_node(&self, id: &str) -> EngramResult<Option<GraphNode>> {
        self.simulate_latency().await;
        Ok(self.nodes.get(id).cloned())
    }

    async fn neighbors(
        &self,
        node_id: &str,
        direction: Direction,
        edge_types: &[String],
    ) -> EngramResult<Neighborhood> {
        self.simulate_latency().await;
        self.neighbor_calls.fetch_add(1, Ordering::Relaxed);

        let edges: Vec<GraphEdge> = self
            .adjacent(node_id, direction)
            .into_iter()
            .filter(|edge| edge_types.is_empty() || edge_types.contains(&edge.edge_type))
            .collect();
        let nodes = edges
            .iter()
            .filter_map(|edge| self.nodes.get(edge.other_endpoint(node_id)).cloned())
            .collect();
        Ok(Neighborhood { edges, nodes })
    }

    async fn degree(&self, node_id: &str, direction: Direction) -> EngramResult<u64> {
        self.simulate_latency().await;
        if let Some(degree) = self.degree_overrides.get(node_id) {
            return Ok(*degree);
        }
        Ok(self.adjacent(node_id, direction).len() as u64)
    }

    async fn vector_search(
        &self,
        _embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> EngramResult<Vec<RankedCandidate>> {
        self.simulate_latency().await;
        if self.vector_fails {
            return Err(TransportError::RetriesExhausted {
                attempts: 4,
                last_error: "connection refused".into(),
            }
            .into());
        }
        let mut matches: Vec<RankedCandidate> = self
            .vector_matches
            .iter()
            .filter(|c| c.similarity >= min_similarity)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn health_check(&self) -> EngramResult<HealthStatus> {
        Ok(HealthStatus {
            healthy: true,
            latency_ms: 0,
            details: None,
        })
    }
}
