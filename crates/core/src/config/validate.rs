use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one profile is configured
/// - Profile names and pool names are unique (per-pool countdown state is
///   owned by exactly one profile, so duplicate pool names are rejected
///   outright rather than relying on accidental non-overlap)
/// - Player bounds are sane: 1 <= min_players <= max_players
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.profiles.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one profile must be configured".to_string(),
        ));
    }

    let mut names = HashSet::new();
    let mut pools = HashSet::new();
    for profile in &config.profiles {
        if !names.insert(profile.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate profile name: {}",
                profile.name
            )));
        }
        if !pools.insert(profile.pool_name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate pool name: {} (each pool must belong to exactly one profile)",
                profile.pool_name
            )));
        }
        if profile.min_players == 0 {
            return Err(ConfigError::ValidationError(format!(
                "profile {}: min_players must be at least 1",
                profile.name
            )));
        }
        if profile.min_players > profile.max_players {
            return Err(ConfigError::ValidationError(format!(
                "profile {}: min_players ({}) exceeds max_players ({})",
                profile.name, profile.min_players, profile.max_players
            )));
        }
    }

    Ok(())
}
