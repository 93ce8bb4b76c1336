//! Mock allocator for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::allocator::{AllocationEndpoint, AllocationOutcome, Allocator, AllocatorError};
use crate::selector::AllocationRequest;

/// Mock implementation of the [`Allocator`] trait.
///
/// By default every request succeeds with a fresh endpoint
/// (`10.0.0.{n}:7777`). Tests can queue an unfulfilled outcome or a hard
/// failure for the next request, and inspect every request received.
#[derive(Debug, Default)]
pub struct MockAllocator {
    requests: Arc<RwLock<Vec<AllocationRequest>>>,
    next_unfulfilled: Arc<RwLock<Option<String>>>,
    fail_next: Arc<RwLock<bool>>,
    counter: Arc<RwLock<u32>>,
}

impl MockAllocator {
    /// Create a mock allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// All allocation requests received, in order.
    pub async fn requests(&self) -> Vec<AllocationRequest> {
        self.requests.read().await.clone()
    }

    /// Make the next request come back unfulfilled with the given state.
    pub async fn unfulfill_next(&self, state: &str) {
        *self.next_unfulfilled.write().await = Some(state.to_string());
    }

    /// Make the next request fail outright.
    pub async fn fail_next(&self) {
        *self.fail_next.write().await = true;
    }
}

#[async_trait]
impl Allocator for MockAllocator {
    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<AllocationOutcome, AllocatorError> {
        self.requests.write().await.push(request.clone());

        if std::mem::take(&mut *self.fail_next.write().await) {
            return Err(AllocatorError::ConnectionFailed(
                "mock allocator failure".to_string(),
            ));
        }

        if let Some(state) = self.next_unfulfilled.write().await.take() {
            return Ok(AllocationOutcome::Unfulfilled(state));
        }

        let mut counter = self.counter.write().await;
        *counter += 1;
        Ok(AllocationOutcome::Allocated(AllocationEndpoint {
            address: format!("10.0.0.{}", *counter),
            port: 7777,
        }))
    }
}
