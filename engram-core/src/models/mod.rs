//! Query-result models shared across the workspace.

pub mod health;
pub mod retrieval;
pub mod traversal;

pub use health::HealthStatus;
pub use retrieval::{FusedResult, RankedCandidate, RetrievalQuery, RetrievalResult};
pub use traversal::{FilterStats, PrioritizedEdge, TraversalResponse, WeightedTraversalResponse};
