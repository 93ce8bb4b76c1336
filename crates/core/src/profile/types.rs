//! Profile types and the registry used to resolve them by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when resolving profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No profile is configured under the given name.
    #[error("no mode profile found for {0}")]
    UnknownProfile(String),
}

/// How tickets in a pool are batched into matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Cut matches immediately whenever enough tickets are waiting.
    Instant,
    /// Wait for a full match, forcing a partial one after a bounded countdown.
    Countdown,
}

/// How a game server is selected for a formed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorStrategy {
    /// Prefer an already-allocated server with spare player capacity.
    /// Used for drop-in/drop-out or singleplayer-style modes where many
    /// matches can share one running server.
    CapacityBased,
    /// Prefer an allocated server explicitly flagged as takeable, without a
    /// capacity filter. Used for modes needing one dedicated server per match.
    ExclusiveMatch,
}

/// Static configuration for one game mode.
///
/// Loaded once at startup and immutable thereafter. Exactly one profile
/// exists per distinct mode, and profile-to-pool is a fixed 1:1 mapping
/// (enforced by config validation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeProfile {
    /// Profile (mode) name.
    pub name: String,
    /// Pool of tickets this profile matches from.
    pub pool_name: String,
    /// Fleet that matches formed by this profile are allocated to.
    pub fleet_name: String,
    /// Smallest viable match size.
    pub min_players: usize,
    /// Largest match size; a pool with this many tickets is cut immediately.
    pub max_players: usize,
    /// Batching strategy.
    pub strategy: MatchStrategy,
    /// Server selection strategy.
    pub selector: SelectorStrategy,
}

/// Lookup table of mode profiles keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, ModeProfile>,
}

impl ProfileRegistry {
    /// Build a registry from configured profiles.
    pub fn new(profiles: impl IntoIterator<Item = ModeProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        }
    }

    /// Resolve a profile by name. Unknown names are an explicit error so
    /// external callers asking for an unconfigured mode get a clear answer.
    pub fn get(&self, name: &str) -> Result<&ModeProfile, ProfileError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))
    }

    /// All configured profiles, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &ModeProfile> {
        self.profiles.values()
    }

    /// Number of configured profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profiles are configured.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
