//! Bounded breadth-first traversal with priority-filtered fan-out.
//!
//! Expansion is limited three ways: depth (`max_depth`), discovered-node
//! count (`limit`), and per-node fan-out (`max_neighbors_per_node`, applied
//! after priority sorting so the strongest edges survive). Worst-case work
//! per depth level is `O(frontier_width * max_neighbors_per_node)` rather
//! than `O(total_degree)`.
//!
//! The wall-clock budget never fails a query mid-flight: when the deadline
//! fires, whatever has been gathered is returned with `complete = false`.
//! Availability over completeness.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};

use engram_core::config::TraversalOptions;
use engram_core::errors::{EngramResult, TraversalError};
use engram_core::graph::{Direction, GraphEdge, GraphNode, GraphPath};
use engram_core::models::{PrioritizedEdge, WeightedTraversalResponse};
use engram_core::traits::GraphStore;

use crate::scoring::{score_edge, StatsAccumulator};

/// Breadth-first traversal engine over a graph store.
pub struct TraversalEngine {
    store: Arc<dyn GraphStore>,
}

/// Per-query expansion state: visited set, parent pointers, snapshots.
struct Expansion {
    /// Node id → discovery depth. Doubles as the visited set; a node is
    /// admitted once, which keeps every reconstructed path cycle-free.
    visited: HashMap<String, usize>,
    /// Discovered node id → (parent id, connecting edge).
    parents: HashMap<String, (String, GraphEdge)>,
    snapshots: HashMap<String, GraphNode>,
    /// Admission order, for deterministic output.
    order: Vec<String>,
}

impl Expansion {
    fn new(seed: GraphNode) -> Self {
        let mut expansion = Self {
            visited: HashMap::new(),
            parents: HashMap::new(),
            snapshots: HashMap::new(),
            order: Vec::new(),
        };
        expansion.visited.insert(seed.id.clone(), 0);
        expansion.order.push(seed.id.clone());
        expansion.snapshots.insert(seed.id.clone(), seed);
        expansion
    }

    fn admit(&mut self, node: GraphNode, depth: usize, parent: String, edge: GraphEdge) {
        self.visited.insert(node.id.clone(), depth);
        self.parents.insert(node.id.clone(), (parent, edge));
        self.order.push(node.id.clone());
        self.snapshots.insert(node.id.clone(), node);
    }

    /// Walk parent pointers from `node_id` back to the seed.
    fn path_to(&self, node_id: &str) -> GraphPath {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut current = node_id.to_string();

        loop {
            if let Some(snapshot) = self.snapshots.get(&current) {
                nodes.push(snapshot.clone());
            }
            match self.parents.get(&current) {
                Some((parent, edge)) => {
                    edges.push(edge.clone());
                    current = parent.clone();
                }
                None => break,
            }
        }

        nodes.reverse();
        edges.reverse();
        GraphPath { nodes, edges }
    }
}

impl TraversalEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Traverse outward from `seed_id` under the given bounds.
    ///
    /// Fails with `InvalidOptions` on constraint violations and
    /// `InvalidSeed` when the seed does not exist. A deadline firing
    /// mid-expansion returns the partial response gathered so far.
    pub async fn traverse(
        &self,
        seed_id: &str,
        options: &TraversalOptions,
    ) -> EngramResult<WeightedTraversalResponse> {
        options.validate()?;

        let started = Instant::now();
        let deadline = started + Duration::from_millis(options.timeout_ms);

        let seed = match self.fetch_seed(seed_id, deadline).await? {
            SeedLookup::Found(node) => node,
            SeedLookup::Missing => {
                return Err(TraversalError::InvalidSeed {
                    id: seed_id.to_string(),
                }
                .into())
            }
            SeedLookup::DeadlineFired => {
                warn!(seed_id, "traversal deadline fired before seed lookup completed");
                return Ok(partial_empty_response(started));
            }
        };

        let mut expansion = Expansion::new(seed);
        let mut frontier: VecDeque<(String, usize)> = VecDeque::new();
        frontier.push_back((seed_id.to_string(), 0));

        let mut kept_edges: Vec<PrioritizedEdge> = Vec::new();
        let mut stats = StatsAccumulator::default();
        let mut degree_memo: HashMap<String, u64> = HashMap::new();
        let mut complete = true;
        let now = Utc::now();

        'expand: while let Some((node_id, depth)) = frontier.pop_front() {
            if depth >= options.max_depth || expansion.visited.len() >= options.limit {
                continue;
            }

            let neighborhood = match self
                .with_deadline(deadline, self.store.neighbors(
                    &node_id,
                    options.direction,
                    &options.edge_types,
                ))
                .await?
            {
                Some(neighborhood) => neighborhood,
                None => {
                    complete = false;
                    break 'expand;
                }
            };

            for node in neighborhood.nodes {
                // Keep endpoint snapshots for path reconstruction; admission
                // happens below, edge by edge.
                expansion.snapshots.entry(node.id.clone()).or_insert(node);
            }

            let candidates: Vec<GraphEdge> = neighborhood
                .edges
                .into_iter()
                .filter(|edge| matches_filters(edge, &node_id, options))
                .collect();
            stats.examined(candidates.len());

            // Score every candidate; the hub penalty needs the source
            // node's query-time degree.
            let mut scored: Vec<PrioritizedEdge> = Vec::with_capacity(candidates.len());
            for edge in candidates {
                let hub_degree = match self
                    .degree_of(&edge.source_id, options.direction, deadline, &mut degree_memo)
                    .await?
                {
                    Some(degree) => degree,
                    None => {
                        complete = false;
                        break 'expand;
                    }
                };
                let prioritized = score_edge(&edge, now, options, hub_degree);
                if prioritized.priority >= options.edge_weight_threshold {
                    scored.push(prioritized);
                }
            }

            scored.sort_by(|a, b| {
                b.priority
                    .partial_cmp(&a.priority)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.edge.id.cmp(&b.edge.id))
            });
            scored.truncate(options.max_neighbors_per_node);

            for prioritized in scored {
                stats.kept(&prioritized);

                let neighbor_id = prioritized.edge.other_endpoint(&node_id).to_string();
                let admissible = neighbor_id != node_id
                    && !expansion.visited.contains_key(&neighbor_id)
                    && expansion.visited.len() < options.limit;
                if admissible {
                    let snapshot = expansion
                        .snapshots
                        .get(&neighbor_id)
                        .cloned()
                        .unwrap_or_else(|| placeholder_node(&neighbor_id));
                    expansion.admit(
                        snapshot,
                        depth + 1,
                        node_id.clone(),
                        prioritized.edge.clone(),
                    );
                    frontier.push_back((neighbor_id, depth + 1));
                }

                kept_edges.push(prioritized);
            }
        }

        kept_edges.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.edge.id.cmp(&b.edge.id))
        });

        let paths: Vec<GraphPath> = expansion
            .order
            .iter()
            .skip(1) // the seed has no path to itself
            .map(|id| expansion.path_to(id))
            .collect();
        let nodes: Vec<GraphNode> = expansion
            .order
            .iter()
            .filter_map(|id| expansion.snapshots.get(id).cloned())
            .collect();

        let filter_stats = stats.finish();
        let execution_time_ms = started.elapsed().as_millis() as u64;
        debug!(
            seed_id,
            discovered = nodes.len(),
            kept_edges = kept_edges.len(),
            total_edges = filter_stats.total_edges,
            filtered_edges = filter_stats.filtered_edges,
            execution_time_ms,
            complete,
            "traversal finished"
        );

        Ok(WeightedTraversalResponse {
            paths,
            nodes,
            execution_time_ms,
            complete,
            prioritized_edges: kept_edges,
            filter_stats,
        })
    }

    async fn fetch_seed(&self, seed_id: &str, deadline: Instant) -> EngramResult<SeedLookup> {
        match self
            .with_deadline(deadline, self.store.fetch_node(seed_id))
            .await?
        {
            Some(Some(node)) => Ok(SeedLookup::Found(node)),
            Some(None) => Ok(SeedLookup::Missing),
            None => Ok(SeedLookup::DeadlineFired),
        }
    }

    /// Query-time degree of a node, memoized within this traversal only —
    /// degree changes as the graph is mutated, so it is never cached
    /// across queries.
    async fn degree_of(
        &self,
        node_id: &str,
        direction: Direction,
        deadline: Instant,
        memo: &mut HashMap<String, u64>,
    ) -> EngramResult<Option<u64>> {
        if let Some(degree) = memo.get(node_id) {
            return Ok(Some(*degree));
        }
        match self
            .with_deadline(deadline, self.store.degree(node_id, direction))
            .await?
        {
            Some(degree) => {
                memo.insert(node_id.to_string(), degree);
                Ok(Some(degree))
            }
            None => Ok(None),
        }
    }

    /// Run a store call under the traversal deadline. `Ok(None)` means the
    /// deadline fired; the caller turns that into a partial response.
    async fn with_deadline<T>(
        &self,
        deadline: Instant,
        call: impl std::future::Future<Output = EngramResult<T>>,
    ) -> EngramResult<Option<T>> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }
        match tokio::time::timeout(remaining, call).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }
}

enum SeedLookup {
    Found(GraphNode),
    Missing,
    DeadlineFired,
}

/// Direction and edge-type restriction, re-applied client-side so a store
/// that ignores filter params cannot widen the traversal.
fn matches_filters(edge: &GraphEdge, node_id: &str, options: &TraversalOptions) -> bool {
    if !options.edge_types.is_empty() && !options.edge_types.contains(&edge.edge_type) {
        return false;
    }
    match options.direction {
        Direction::Outgoing => edge.source_id == node_id,
        Direction::Incoming => edge.target_id == node_id,
        Direction::Both => edge.source_id == node_id || edge.target_id == node_id,
    }
}

/// Stand-in for an endpoint the store did not send a snapshot for.
fn placeholder_node(id: &str) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        node_type: String::new(),
        properties: HashMap::new(),
    }
}

fn partial_empty_response(started: Instant) -> WeightedTraversalResponse {
    WeightedTraversalResponse {
        paths: Vec::new(),
        nodes: Vec::new(),
        execution_time_ms: started.elapsed().as_millis() as u64,
        complete: false,
        prioritized_edges: Vec::new(),
        filter_stats: Default::default(),
    }
}
