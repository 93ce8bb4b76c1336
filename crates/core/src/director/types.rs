//! Types for the orchestration loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can abort one profile's unit of work for a cycle.
///
/// None of these are fatal to the loop: the failing profile is logged and
/// skipped, siblings and later cycles are unaffected.
#[derive(Debug, Error)]
pub enum DirectorError {
    /// Ticket backend error (query or assignment).
    #[error("backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    /// Allocator error.
    #[error("allocator error: {0}")]
    Allocator(#[from] crate::allocator::AllocatorError),

    /// Selection building error.
    #[error("selector error: {0}")]
    Selector(#[from] crate::selector::SelectorError),

    /// Profile lookup error.
    #[error("profile error: {0}")]
    Profile(#[from] crate::profile::ProfileError),
}

/// Current status of the director.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorStatus {
    /// Whether the loop is running.
    pub running: bool,
    /// Number of configured profiles.
    pub profiles: usize,
    /// Completed decision cycles since startup.
    pub cycles_completed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default() {
        let status = DirectorStatus::default();
        assert!(!status.running);
        assert_eq!(status.cycles_completed, 0);
    }

    #[test]
    fn test_error_display() {
        let err = DirectorError::Backend(crate::backend::BackendError::Timeout);
        assert_eq!(err.to_string(), "backend error: Request timeout");
    }
}
