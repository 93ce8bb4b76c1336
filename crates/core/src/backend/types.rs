//! Ticket backend traits and errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::ticket::Ticket;

/// Errors that can occur talking to the ticket backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

/// Supplies the current contents of a ticket pool.
///
/// Each call returns an atomic snapshot of the pool in arrival order; the
/// decision cycle treats it as the complete truth for that cycle.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Query the ordered tickets currently waiting in a pool.
    async fn query_pool(&self, pool_name: &str) -> Result<Vec<Ticket>, BackendError>;
}

/// Marks tickets as assigned to a server.
///
/// Assigned tickets disappear from future [`TicketSource`] snapshots, which
/// is the only "retry" mechanism the director relies on: unassigned tickets
/// are simply observed again next cycle.
#[async_trait]
pub trait TicketAssigner: Send + Sync {
    /// Assign the given tickets to the server at `connection`
    /// (an `address:port` string).
    async fn assign(&self, ticket_ids: &[String], connection: &str) -> Result<(), BackendError>;
}
