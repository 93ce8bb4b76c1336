//! Mock player notifier for testing.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::notifier::{NotifyError, PlayerNotifier};

/// A recorded match-found notification.
#[derive(Debug, Clone)]
pub struct FoundNotification {
    pub player_id: String,
    pub player_count: usize,
    pub teleport_at: DateTime<Utc>,
}

/// Mock implementation of the [`PlayerNotifier`] trait, recording every
/// delivery and optionally failing for specific players.
#[derive(Debug, Default)]
pub struct MockPlayerNotifier {
    found: Arc<RwLock<Vec<FoundNotification>>>,
    cancelled: Arc<RwLock<Vec<String>>>,
    failing_players: Arc<RwLock<HashSet<String>>>,
}

impl MockPlayerNotifier {
    /// Create a mock notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All match-found notifications delivered so far.
    pub async fn found_notifications(&self) -> Vec<FoundNotification> {
        self.found.read().await.clone()
    }

    /// All cancellation notifications delivered so far.
    pub async fn cancelled_notifications(&self) -> Vec<String> {
        self.cancelled.read().await.clone()
    }

    /// Make every delivery to the given player fail.
    pub async fn fail_for_player(&self, player_id: &str) {
        self.failing_players
            .write()
            .await
            .insert(player_id.to_string());
    }

    async fn check_failure(&self, player_id: &str) -> Result<(), NotifyError> {
        if self.failing_players.read().await.contains(player_id) {
            return Err(NotifyError::ConnectionFailed(format!(
                "mock failure for {player_id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerNotifier for MockPlayerNotifier {
    async fn match_found(
        &self,
        player_id: &str,
        player_count: usize,
        teleport_at: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        self.check_failure(player_id).await?;
        self.found.write().await.push(FoundNotification {
            player_id: player_id.to_string(),
            player_count,
            teleport_at,
        });
        Ok(())
    }

    async fn match_cancelled(&self, player_id: &str) -> Result<(), NotifyError> {
        self.check_failure(player_id).await?;
        self.cancelled.write().await.push(player_id.to_string());
        Ok(())
    }
}
