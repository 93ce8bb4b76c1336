//! HTTP ticket backend client.
//!
//! Thin JSON client for a ticket service exposing pool queries and ticket
//! assignment. Every call carries a bounded timeout so a hung backend cannot
//! stall a decision cycle indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ticket::Ticket;

use super::types::{BackendError, TicketAssigner, TicketSource};

#[derive(Debug, Serialize)]
struct QueryPoolRequest<'a> {
    pool: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryPoolResponse {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
struct AssignRequest<'a> {
    ticket_ids: &'a [String],
    connection: &'a str,
}

/// Ticket backend speaking JSON over HTTP.
pub struct HttpTicketBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTicketBackend {
    /// Create a client for the backend at `base_url` with a per-request
    /// timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn map_request_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::ConnectionFailed(e.to_string())
    }
}

#[async_trait]
impl TicketSource for HttpTicketBackend {
    async fn query_pool(&self, pool_name: &str) -> Result<Vec<Ticket>, BackendError> {
        let response = self
            .client
            .post(self.url("/v1/tickets/query"))
            .json(&QueryPoolRequest { pool: pool_name })
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(BackendError::ApiError(format!(
                "query_pool returned HTTP {}",
                response.status()
            )));
        }

        let body: QueryPoolResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        debug!(pool = pool_name, tickets = body.tickets.len(), "Queried pool");
        Ok(body.tickets)
    }
}

#[async_trait]
impl TicketAssigner for HttpTicketBackend {
    async fn assign(&self, ticket_ids: &[String], connection: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url("/v1/tickets/assign"))
            .json(&AssignRequest {
                ticket_ids,
                connection,
            })
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(BackendError::ApiError(format!(
                "assign returned HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let backend =
            HttpTicketBackend::new("http://tickets.local/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.url("/v1/tickets/query"),
            "http://tickets.local/v1/tickets/query"
        );
    }
}
