//! Mock ticket backend for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{BackendError, TicketAssigner, TicketSource};
use crate::ticket::Ticket;

/// A recorded assignment for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedAssignment {
    /// Tickets that were assigned.
    pub ticket_ids: Vec<String>,
    /// Connection string they were assigned to.
    pub connection: String,
}

/// Mock implementation of [`TicketSource`] and [`TicketAssigner`].
///
/// Behaves like the real backend: queries return the current pool contents
/// in insertion order, and assigned tickets disappear from subsequent
/// snapshots.
#[derive(Debug, Default)]
pub struct MockTicketBackend {
    pools: Arc<RwLock<HashMap<String, Vec<Ticket>>>>,
    assignments: Arc<RwLock<Vec<RecordedAssignment>>>,
    fail_next_query: Arc<RwLock<bool>>,
    fail_next_assign: Arc<RwLock<bool>>,
}

impl MockTicketBackend {
    /// Create an empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a pool.
    pub async fn set_tickets(&self, pool_name: &str, tickets: Vec<Ticket>) {
        self.pools
            .write()
            .await
            .insert(pool_name.to_string(), tickets);
    }

    /// Append tickets to a pool.
    pub async fn add_tickets(&self, pool_name: &str, tickets: Vec<Ticket>) {
        self.pools
            .write()
            .await
            .entry(pool_name.to_string())
            .or_default()
            .extend(tickets);
    }

    /// Current contents of a pool.
    pub async fn tickets(&self, pool_name: &str) -> Vec<Ticket> {
        self.pools
            .read()
            .await
            .get(pool_name)
            .cloned()
            .unwrap_or_default()
    }

    /// All recorded assignments, in order.
    pub async fn assignments(&self) -> Vec<RecordedAssignment> {
        self.assignments.read().await.clone()
    }

    /// Make the next query fail.
    pub async fn fail_next_query(&self) {
        *self.fail_next_query.write().await = true;
    }

    /// Make the next assignment fail.
    pub async fn fail_next_assign(&self) {
        *self.fail_next_assign.write().await = true;
    }
}

#[async_trait]
impl TicketSource for MockTicketBackend {
    async fn query_pool(&self, pool_name: &str) -> Result<Vec<Ticket>, BackendError> {
        if std::mem::take(&mut *self.fail_next_query.write().await) {
            return Err(BackendError::ConnectionFailed(
                "mock query failure".to_string(),
            ));
        }
        Ok(self.tickets(pool_name).await)
    }
}

#[async_trait]
impl TicketAssigner for MockTicketBackend {
    async fn assign(&self, ticket_ids: &[String], connection: &str) -> Result<(), BackendError> {
        if std::mem::take(&mut *self.fail_next_assign.write().await) {
            return Err(BackendError::ApiError("mock assign failure".to_string()));
        }

        self.assignments.write().await.push(RecordedAssignment {
            ticket_ids: ticket_ids.to_vec(),
            connection: connection.to_string(),
        });

        // Assigned tickets resolve and leave every future snapshot.
        let mut pools = self.pools.write().await;
        for tickets in pools.values_mut() {
            tickets.retain(|t| !ticket_ids.contains(&t.id));
        }
        Ok(())
    }
}
