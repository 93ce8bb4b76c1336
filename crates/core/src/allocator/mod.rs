//! Game server allocation abstraction.

mod http;
mod types;

pub use http::HttpAllocator;
pub use types::{AllocationEndpoint, AllocationOutcome, Allocator, AllocatorError};
