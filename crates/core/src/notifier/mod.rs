//! Player notification: pending countdowns, cancellations, and starting
//! matches. Strictly fire-and-forget; nothing here feeds back into the
//! match formation decisions.

mod gateway;
mod http;
mod noop;
mod types;

pub use gateway::NotificationGateway;
pub use http::HttpPlayerNotifier;
pub use noop::NoopNotifier;
pub use types::{NotifyError, PlayerNotifier};
