//! # engram-retrieval
//!
//! Query-time retrieval logic: bounded BFS traversal with priority
//! scoring, reciprocal rank fusion of graph and vector rankings, a
//! TTL-bounded result cache, and the facade that orchestrates one
//! logical `retrieve` call.

pub mod cache;
pub mod engine;
pub mod fusion;
pub mod scoring;
pub mod traversal;

pub use cache::ResultCache;
pub use engine::RetrievalEngine;
pub use traversal::TraversalEngine;
