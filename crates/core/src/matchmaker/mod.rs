//! Match formation: the policy deciding when waiting tickets become matches.
//!
//! Two strategies exist, chosen per profile:
//! - **Instant**: cut matches immediately whenever enough tickets wait.
//! - **Countdown**: wait for a full match, but start a bounded countdown and
//!   force a partial match when it expires.

mod batch;
mod countdown;
mod instant;
mod types;

pub use batch::cut_groups;
pub use countdown::{CountdownEvent, CountdownScheduler, CountdownState, COUNTDOWN_GRACE};
pub use instant::make_instant_matches;
pub use types::Match;
