//! # engram-client
//!
//! Connection manager for the external graph/vector store.
//! Owns the pooled transport, the wire protocol envelopes, bounded
//! retry with backoff, and the thin vector-search adapter.

pub mod client;
pub mod pool;
pub mod protocol;
pub mod vector;

pub use client::StoreClient;
pub use pool::ConnectionPool;
pub use vector::VectorSearchClient;
