//! Allocator trait and outcome types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selector::AllocationRequest;

/// Errors that can occur requesting an allocation.
#[derive(Debug, Error)]
pub enum AllocatorError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

/// Where players connect to an allocated server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEndpoint {
    pub address: String,
    pub port: u16,
}

impl AllocationEndpoint {
    /// The `address:port` connection string handed to assigned tickets.
    pub fn connection(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Result of an allocation request.
///
/// Any non-allocated outcome is a skip, not a retriable error: the match's
/// tickets stay unassigned and are reconsidered next cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// A server was reserved for the match.
    Allocated(AllocationEndpoint),
    /// The allocator could not satisfy the request. Carries the reported
    /// state for logging.
    Unfulfilled(String),
}

/// Reserves concrete server instances for formed matches.
#[async_trait]
pub trait Allocator: Send + Sync {
    /// Request a server matching the declarative selection.
    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<AllocationOutcome, AllocatorError>;
}
