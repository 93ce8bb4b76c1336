//! Director configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the orchestration loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Minimum time between cycle starts (milliseconds). If a cycle takes
    /// longer than this, the next one starts immediately.
    #[serde(default = "default_min_cycle_interval")]
    pub min_cycle_interval_ms: u64,

    /// Deadline for one profile's unit of work within a cycle
    /// (milliseconds). A unit that overruns is abandoned for this cycle so
    /// one slow external call cannot delay the cycle boundary indefinitely.
    #[serde(default = "default_profile_deadline")]
    pub profile_deadline_ms: u64,
}

fn default_min_cycle_interval() -> u64 {
    1000 // 1 second
}

fn default_profile_deadline() -> u64 {
    10_000 // 10 seconds
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            min_cycle_interval_ms: default_min_cycle_interval(),
            profile_deadline_ms: default_profile_deadline(),
        }
    }
}
