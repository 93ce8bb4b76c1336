//! HTTP player notifier client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{NotifyError, PlayerNotifier};

#[derive(Debug, Serialize)]
struct MatchFoundRequest<'a> {
    player_id: &'a str,
    player_count: usize,
    teleport_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct MatchCancelledRequest<'a> {
    player_id: &'a str,
}

/// Player notifier speaking JSON over HTTP.
pub struct HttpPlayerNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPlayerNotifier {
    /// Create a client for the notification service at `base_url` with a
    /// per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout
                } else {
                    NotifyError::ConnectionFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(NotifyError::ApiError(format!(
                "{} returned HTTP {}",
                path,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerNotifier for HttpPlayerNotifier {
    async fn match_found(
        &self,
        player_id: &str,
        player_count: usize,
        teleport_at: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        self.post(
            "/v1/matchmaking/found",
            &MatchFoundRequest {
                player_id,
                player_count,
                teleport_at,
            },
        )
        .await
    }

    async fn match_cancelled(&self, player_id: &str) -> Result<(), NotifyError> {
        self.post(
            "/v1/matchmaking/cancelled",
            &MatchCancelledRequest { player_id },
        )
        .await
    }
}
