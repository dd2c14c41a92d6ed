//! Store health probe result.

use serde::{Deserialize, Serialize};

/// Outcome of a health check against the external store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Round-trip latency of the probe.
    pub latency_ms: u64,
    /// Store-reported detail (version, index sizes), free-form.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
