//! Ticket type and player identity extraction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Key under which the owning player's id is stored in a ticket's
/// persistent fields.
pub const PLAYER_ID_FIELD: &str = "playerId";

/// Errors raised when reading data out of a ticket.
#[derive(Debug, Error)]
pub enum TicketError {
    /// The ticket carries no value under the requested persistent field.
    #[error("ticket {ticket_id} has no persistent field {field}")]
    MissingField { ticket_id: String, field: String },

    /// The persistent field exists but is not a string.
    #[error("ticket {ticket_id} field {field} is not a string")]
    InvalidField { ticket_id: String, field: String },
}

/// A single waiting client's matchmaking request.
///
/// Tickets are produced by the external ticket source and are immutable once
/// observed. Everything beyond the id lives in free-form persistent fields;
/// the only field this crate reads is [`PLAYER_ID_FIELD`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket id, assigned by the ticket source.
    pub id: String,
    /// Opaque per-ticket data persisted alongside the ticket.
    #[serde(default)]
    pub persistent_fields: HashMap<String, serde_json::Value>,
}

impl Ticket {
    /// Create a ticket owned by the given player.
    pub fn new(id: impl Into<String>, player_id: impl Into<String>) -> Self {
        let mut persistent_fields = HashMap::new();
        persistent_fields.insert(
            PLAYER_ID_FIELD.to_string(),
            serde_json::Value::String(player_id.into()),
        );
        Self {
            id: id.into(),
            persistent_fields,
        }
    }

    /// The id of the player who filed this ticket.
    pub fn player_id(&self) -> Result<&str, TicketError> {
        let value = self.persistent_fields.get(PLAYER_ID_FIELD).ok_or_else(|| {
            TicketError::MissingField {
                ticket_id: self.id.clone(),
                field: PLAYER_ID_FIELD.to_string(),
            }
        })?;
        value.as_str().ok_or_else(|| TicketError::InvalidField {
            ticket_id: self.id.clone(),
            field: PLAYER_ID_FIELD.to_string(),
        })
    }
}

/// Extract the player ids of every ticket, skipping tickets whose player id
/// is missing or malformed. A skipped ticket is logged, not fatal: the
/// roster is best-effort data used for notifications only.
pub fn extract_player_ids(tickets: &[Ticket]) -> Vec<String> {
    let mut player_ids = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        match ticket.player_id() {
            Ok(player_id) => player_ids.push(player_id.to_string()),
            Err(e) => warn!("Failed to extract player id from ticket: {}", e),
        }
    }
    player_ids
}
