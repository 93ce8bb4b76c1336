//! The orchestration loop.
//!
//! Runs one decision cycle per configured profile on a fixed cadence,
//! fanning the per-profile work out concurrently and isolating failures per
//! profile: query tickets, form matches, allocate servers, assign tickets,
//! notify players.

mod config;
mod runner;
mod types;

pub use config::DirectorConfig;
pub use runner::Director;
pub use types::{DirectorError, DirectorStatus};
