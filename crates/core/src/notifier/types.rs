//! Player notifier trait and errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur delivering a notification to one player.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Delivers matchmaking signals to a single player's current location.
///
/// Failures are logged by the gateway and never block or retry.
#[async_trait]
pub trait PlayerNotifier: Send + Sync {
    /// Tell a player a match of `player_count` players will start at
    /// `teleport_at`. A match starting immediately is the same signal with
    /// `teleport_at` = now.
    async fn match_found(
        &self,
        player_id: &str,
        player_count: usize,
        teleport_at: DateTime<Utc>,
    ) -> Result<(), NotifyError>;

    /// Tell a player their pending countdown was cancelled.
    async fn match_cancelled(&self, player_id: &str) -> Result<(), NotifyError>;
}
