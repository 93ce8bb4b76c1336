//! Matchmaking tickets: one waiting client's request to be matched.

mod types;

pub use types::{extract_player_ids, Ticket, TicketError, PLAYER_ID_FIELD};
