//! TTL-bounded result cache with insertion-order eviction.
//!
//! Query patterns are bursty-then-idle, so oldest-inserted-first eviction
//! is used instead of LRU. A single mutex guards the map and the
//! insertion queue together: readers see a fully-written entry or a miss,
//! never a partial write.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use engram_core::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_MS};
use engram_core::models::{FusedResult, RetrievalQuery};

/// A cached fused ranking.
#[derive(Debug, Clone)]
struct CacheEntry {
    results: Vec<FusedResult>,
    inserted_at: Instant,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order; front is evicted first.
    order: VecDeque<String>,
}

/// Bounded TTL cache keyed by normalized query fingerprints.
#[derive(Debug)]
pub struct ResultCache {
    inner: Mutex<CacheInner>,
    ttl: Duration,
    capacity: usize,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            DEFAULT_CACHE_CAPACITY,
        )
    }
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Look up a fused ranking. Expired entries are removed on the way out.
    pub fn get(&self, key: &str) -> Option<Vec<FusedResult>> {
        let mut inner = self.lock();
        match inner.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!(key, "result cache hit");
                Some(entry.results.clone())
            }
            Some(_) => {
                inner.entries.remove(key);
                inner.order.retain(|k| k != key);
                None
            }
            None => None,
        }
    }

    /// Insert a fused ranking, evicting oldest-inserted entries over
    /// capacity. Re-inserting an existing key refreshes its age and moves
    /// it to the back of the eviction queue.
    pub fn put(&self, key: String, results: Vec<FusedResult>) {
        let mut inner = self.lock();
        if inner.entries.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                results,
                inserted_at: Instant::now(),
            },
        );
        while inner.entries.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        // A panic while holding this short, allocation-only critical
        // section leaves no torn state worth preserving.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Normalized, order-independent fingerprint of a query's semantically
/// significant parameters.
///
/// Truncation-style parameters (`limit`, `top_k`) and the wall-clock
/// budget are deliberately excluded: a larger cached ranking satisfies a
/// smaller request by truncation, and the timeout does not change what
/// the query means.
pub fn query_fingerprint(query: &RetrievalQuery) -> String {
    let mut hasher = blake3::Hasher::new();

    if let Some(seed) = &query.seed_node_id {
        hasher.update(b"seed:");
        hasher.update(seed.as_bytes());
    }
    if let Some(embedding) = &query.embedding {
        hasher.update(b"embedding:");
        for value in embedding {
            hasher.update(&value.to_le_bytes());
        }
    }
    hasher.update(b"min_similarity:");
    hasher.update(&query.min_similarity.to_le_bytes());

    let options = &query.options;
    hasher.update(b"direction:");
    hasher.update(format!("{:?}", options.direction).as_bytes());
    hasher.update(b"max_depth:");
    hasher.update(&(options.max_depth as u64).to_le_bytes());
    hasher.update(b"fan_out:");
    hasher.update(&(options.max_neighbors_per_node as u64).to_le_bytes());

    let mut edge_types = options.edge_types.clone();
    edge_types.sort();
    for edge_type in &edge_types {
        hasher.update(b"edge_type:");
        hasher.update(edge_type.as_bytes());
    }

    let mut weights: Vec<(&String, &f64)> = options.edge_type_weights.iter().collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));
    for (edge_type, weight) in weights {
        hasher.update(b"weight:");
        hasher.update(edge_type.as_bytes());
        hasher.update(&weight.to_le_bytes());
    }

    hasher.update(b"threshold:");
    hasher.update(&options.edge_weight_threshold.to_le_bytes());
    hasher.update(b"recency:");
    hasher.update(&options.recency_boost_days.to_le_bytes());
    hasher.update(&options.recency_boost_multiplier.to_le_bytes());
    hasher.update(b"hub:");
    hasher.update(&options.hub_penalty_threshold.to_le_bytes());
    hasher.update(&options.hub_penalty_multiplier.to_le_bytes());

    hasher.finalize().to_hex().to_string()
}
