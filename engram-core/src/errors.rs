//! Error taxonomy for the retrieval engine.
//!
//! Transport failures are retried inside the connection manager; traversal
//! timeouts are not errors at all (they surface as partial responses with
//! `complete = false`). Everything else propagates to the facade, which
//! degrades to single-mode results when one retrieval leg still succeeded.

/// Result alias used across all Engram crates.
pub type EngramResult<T> = Result<T, EngramError>;

/// Transport-layer errors from the external graph/vector store.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("store returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("store rejected request: {message}")]
    StoreError { message: String },

    #[error("malformed store response: {message}")]
    MalformedResponse { message: String },

    #[error("retry budget exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl TransportError {
    /// Whether the connection manager should retry this failure.
    ///
    /// Connection-level failures and 5xx responses are transient; a store
    /// rejection or a malformed body will not improve on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::ConnectionFailed { .. } => true,
            TransportError::Http { status, .. } => *status >= 500,
            TransportError::StoreError { .. }
            | TransportError::MalformedResponse { .. }
            | TransportError::RetriesExhausted { .. } => false,
        }
    }
}

/// Caller errors from traversal entry points. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error("seed node not found: {id}")]
    InvalidSeed { id: String },

    #[error("invalid traversal options: {reason}")]
    InvalidOptions { reason: String },
}

/// Umbrella error for the Engram workspace.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("traversal error: {0}")]
    Traversal(#[from] TraversalError),

    #[error("vector search unavailable: {reason}")]
    VectorSearchUnavailable { reason: String },

    #[error("operation timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("retrieval failed: {reason}")]
    RetrievalFailed { reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngramError {
    /// Convenience constructor used at seam boundaries.
    pub fn invalid_options(reason: impl Into<String>) -> Self {
        EngramError::Traversal(TraversalError::InvalidOptions {
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failures_are_transient() {
        let err = TransportError::ConnectionFailed {
            message: "refused".into(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn server_errors_are_transient_client_errors_are_not() {
        let five_oh_three = TransportError::Http {
            status: 503,
            message: "unavailable".into(),
        };
        let four_hundred = TransportError::Http {
            status: 400,
            message: "bad request".into(),
        };
        assert!(five_oh_three.is_transient());
        assert!(!four_hundred.is_transient());
    }

    #[test]
    fn store_rejections_are_permanent() {
        let err = TransportError::StoreError {
            message: "unknown operation".into(),
        };
        assert!(!err.is_transient());
    }
}
