//! Bounded transport pool for the store endpoint.
//!
//! One `reqwest::Client` multiplexes connections internally; the pool
//! bounds in-flight requests with semaphore permits so a request borrows
//! capacity for exactly one round trip. No permit is held across anything
//! but its own request future.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::debug;

use engram_core::config::StoreConfig;
use engram_core::constants::MAX_POOL_SIZE;
use engram_core::errors::{EngramResult, TransportError};

use crate::protocol::{StoreOperation, StoreRequest, StoreResponse};

/// Bounded pool of logical connections to the store.
pub struct ConnectionPool {
    http: reqwest::Client,
    permits: Arc<Semaphore>,
    capacity: usize,
    endpoint: String,
}

impl ConnectionPool {
    /// Build a pool from connection settings.
    pub fn new(config: &StoreConfig) -> EngramResult<Self> {
        let size = config.pool_size.clamp(1, MAX_POOL_SIZE);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_max_idle_per_host(size)
            .build()
            .map_err(|e| TransportError::ConnectionFailed {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            permits: Arc::new(Semaphore::new(size)),
            capacity: size,
            endpoint: format!("{}/query", config.base_url()),
        })
    }

    /// Execute one request/response round trip while holding a pool permit.
    ///
    /// No retry here; retry policy lives in `StoreClient`.
    pub async fn execute<P, T>(&self, operation: StoreOperation, params: P) -> EngramResult<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let permit =
            self.permits
                .acquire()
                .await
                .map_err(|_| TransportError::ConnectionFailed {
                    message: "connection pool closed".to_string(),
                })?;

        let request = StoreRequest::new(operation, params);
        debug!(request_id = %request.request_id, ?operation, "store request");

        let result = self.round_trip(&request).await;
        drop(permit);
        result
    }

    async fn round_trip<P, T>(&self, request: &StoreRequest<P>) -> EngramResult<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::ConnectionFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Http {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let envelope: StoreResponse<T> =
            response
                .json()
                .await
                .map_err(|e| TransportError::MalformedResponse {
                    message: e.to_string(),
                })?;
        Ok(envelope.into_result()?)
    }

    /// Pool capacity in concurrent requests.
    pub fn size(&self) -> usize {
        self.capacity
    }
}
