//! Testing utilities and mock implementations for lifecycle tests.
//!
//! This module provides mock implementations of all external collaborator
//! traits, allowing full decision-cycle testing without real infrastructure.

mod mock_allocator;
mod mock_backend;
mod mock_notifier;

pub use mock_allocator::MockAllocator;
pub use mock_backend::{MockTicketBackend, RecordedAssignment};
pub use mock_notifier::{FoundNotification, MockPlayerNotifier};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::profile::{MatchStrategy, ModeProfile, SelectorStrategy};
    use crate::ticket::Ticket;

    /// Create `n` tickets with predictable ids (`{prefix}-t-{i}`) and player
    /// ids (`{prefix}-p-{i}`).
    pub fn tickets(prefix: &str, n: usize) -> Vec<Ticket> {
        (0..n)
            .map(|i| Ticket::new(format!("{prefix}-t-{i}"), format!("{prefix}-p-{i}")))
            .collect()
    }

    /// A countdown profile with exclusive-match selection.
    pub fn countdown_profile(name: &str, min: usize, max: usize) -> ModeProfile {
        ModeProfile {
            name: name.to_string(),
            pool_name: name.to_string(),
            fleet_name: name.to_string(),
            min_players: min,
            max_players: max,
            strategy: MatchStrategy::Countdown,
            selector: SelectorStrategy::ExclusiveMatch,
        }
    }

    /// An instant profile with capacity-based selection.
    pub fn instant_profile(name: &str, min: usize, max: usize) -> ModeProfile {
        ModeProfile {
            name: name.to_string(),
            pool_name: name.to_string(),
            fleet_name: name.to_string(),
            min_players: min,
            max_players: max,
            strategy: MatchStrategy::Instant,
            selector: SelectorStrategy::CapacityBased,
        }
    }
}
