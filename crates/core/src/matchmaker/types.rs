//! The match type produced by the formation strategies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::ModeProfile;
use crate::ticket::Ticket;

/// A formed group of tickets ready for server assignment.
///
/// Matches are consumed once by the allocation step and then discarded;
/// nothing in this crate persists them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Unique match id.
    pub id: String,
    /// Name of the profile this match was formed for.
    pub profile_name: String,
    /// Identity of the function that formed the match. Stamped with the
    /// profile name, same as `profile_name`.
    pub function_name: String,
    /// Member tickets, in arrival order.
    pub tickets: Vec<Ticket>,
    /// Whether a game server must be allocated for this match. Always true:
    /// merging into existing under-filled matches is not supported.
    pub allocate_gameserver: bool,
}

impl Match {
    /// Assemble a match from a group of tickets and the profile that
    /// produced it.
    pub fn assemble(profile: &ModeProfile, tickets: Vec<Ticket>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            profile_name: profile.name.clone(),
            function_name: profile.name.clone(),
            tickets,
            allocate_gameserver: true,
        }
    }

    /// Number of tickets (players) in the match.
    pub fn player_count(&self) -> usize {
        self.tickets.len()
    }
}
