//! No-op notifier for deployments without a notification service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{NotifyError, PlayerNotifier};

/// Discards every notification. Used when no notifier is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl PlayerNotifier for NoopNotifier {
    async fn match_found(
        &self,
        _player_id: &str,
        _player_count: usize,
        _teleport_at: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn match_cancelled(&self, _player_id: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}
