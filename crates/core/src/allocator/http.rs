//! HTTP allocator client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::selector::AllocationRequest;

use super::types::{AllocationEndpoint, AllocationOutcome, Allocator, AllocatorError};

#[derive(Debug, Deserialize)]
struct AllocationResponse {
    /// Reported allocation state, e.g. "Allocated" or "UnAllocated".
    state: String,
    address: Option<String>,
    port: Option<u16>,
}

/// Allocator speaking JSON over HTTP.
pub struct HttpAllocator {
    client: reqwest::Client,
    url: String,
}

impl HttpAllocator {
    /// Create a client posting allocation requests to `url` with a
    /// per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AllocatorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AllocatorError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Allocator for HttpAllocator {
    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<AllocationOutcome, AllocatorError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AllocatorError::Timeout
                } else {
                    AllocatorError::ConnectionFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(AllocatorError::ApiError(format!(
                "allocation returned HTTP {}",
                response.status()
            )));
        }

        let body: AllocationResponse = response
            .json()
            .await
            .map_err(|e| AllocatorError::InvalidResponse(e.to_string()))?;

        if body.state != "Allocated" {
            return Ok(AllocationOutcome::Unfulfilled(body.state));
        }

        let address = body.address.ok_or_else(|| {
            AllocatorError::InvalidResponse("allocated response missing address".to_string())
        })?;
        let port = body.port.ok_or_else(|| {
            AllocatorError::InvalidResponse("allocated response missing port".to_string())
        })?;

        debug!(%address, port, "Allocation created");
        Ok(AllocationOutcome::Allocated(AllocationEndpoint {
            address,
            port,
        }))
    }
}
