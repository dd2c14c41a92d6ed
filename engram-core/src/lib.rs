//! # engram-core
//!
//! Foundation crate for the Engram hybrid retrieval engine.
//! Defines the graph data model, configuration, errors, response models,
//! and the `GraphStore` seam the client and retrieval crates build on.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod graph;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{StoreConfig, TraversalOptions};
pub use errors::{EngramError, EngramResult, TransportError, TraversalError};
pub use graph::{Direction, GraphEdge, GraphNode, GraphPath, Neighborhood};
pub use traits::GraphStore;
