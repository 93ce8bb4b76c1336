//! Bounded fan-out of per-player notifications.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::matchmaker::Match;
use crate::metrics;
use crate::ticket::extract_player_ids;

use super::types::PlayerNotifier;

const DEFAULT_MAX_IN_FLIGHT: usize = 32;

/// Fans matchmaking signals out to every player in a roster, with an upper
/// bound on in-flight deliveries so a bursty roster cannot exhaust
/// resources. Per-player failures are logged and dropped.
#[derive(Clone)]
pub struct NotificationGateway {
    notifier: Arc<dyn PlayerNotifier>,
    max_in_flight: usize,
}

impl NotificationGateway {
    /// Create a gateway with the default in-flight bound.
    pub fn new(notifier: Arc<dyn PlayerNotifier>) -> Self {
        Self::with_max_in_flight(notifier, DEFAULT_MAX_IN_FLIGHT)
    }

    /// Create a gateway with an explicit in-flight bound.
    pub fn with_max_in_flight(notifier: Arc<dyn PlayerNotifier>, max_in_flight: usize) -> Self {
        Self {
            notifier,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Notify every player in the roster that a match will begin at
    /// `teleport_at`.
    pub async fn notify_pending(&self, roster: &[String], teleport_at: DateTime<Utc>) {
        let player_count = roster.len();
        stream::iter(roster.iter().cloned())
            .map(|player_id| {
                let notifier = Arc::clone(&self.notifier);
                async move {
                    if let Err(e) = notifier
                        .match_found(&player_id, player_count, teleport_at)
                        .await
                    {
                        metrics::NOTIFICATIONS_FAILED.inc();
                        warn!(player_id = %player_id, "Failed to notify pending match: {}", e);
                    } else {
                        metrics::NOTIFICATIONS_SENT.inc();
                    }
                }
            })
            .buffer_unordered(self.max_in_flight)
            .collect::<()>()
            .await;
    }

    /// Notify every player in the roster that their countdown was cancelled.
    pub async fn notify_cancelled(&self, roster: &[String]) {
        stream::iter(roster.iter().cloned())
            .map(|player_id| {
                let notifier = Arc::clone(&self.notifier);
                async move {
                    if let Err(e) = notifier.match_cancelled(&player_id).await {
                        metrics::NOTIFICATIONS_FAILED.inc();
                        warn!(player_id = %player_id, "Failed to notify cancellation: {}", e);
                    } else {
                        metrics::NOTIFICATIONS_SENT.inc();
                    }
                }
            })
            .buffer_unordered(self.max_in_flight)
            .collect::<()>()
            .await;
    }

    /// Notify every player in a match that it is starting now.
    pub async fn notify_match_starting(&self, game_match: &Match) {
        let roster = extract_player_ids(&game_match.tickets);
        self.notify_pending(&roster, Utc::now()).await;
    }
}
