//! Mode profiles: static per-game-mode configuration driving batching and
//! server selection.

mod types;

pub use types::{MatchStrategy, ModeProfile, ProfileError, ProfileRegistry, SelectorStrategy};
