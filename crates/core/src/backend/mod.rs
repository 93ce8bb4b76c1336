//! Ticket backend abstraction.
//!
//! The backend owns the tickets: it answers per-pool snapshot queries and
//! marks tickets as assigned so they disappear from future snapshots. This
//! crate only speaks to it through the [`TicketSource`] and
//! [`TicketAssigner`] traits.

mod http;
mod types;

pub use http::HttpTicketBackend;
pub use types::{BackendError, TicketAssigner, TicketSource};
