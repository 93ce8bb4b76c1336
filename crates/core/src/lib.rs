//! Lodestone core: match formation and orchestration for a game server
//! matchmaker.
//!
//! Waiting clients file tickets into named pools; per pool, a mode profile
//! decides how tickets batch into matches (instantly, or after a bounded
//! countdown) and how a game server is selected for each match. The
//! [`director::Director`] runs this decision cycle on a fixed cadence across
//! all profiles concurrently. External collaborators (ticket backend,
//! allocator, player notifier) sit behind traits with HTTP implementations
//! and test mocks.

pub mod allocator;
pub mod backend;
pub mod config;
pub mod director;
pub mod matchmaker;
pub mod metrics;
pub mod notifier;
pub mod profile;
pub mod selector;
pub mod testing;
pub mod ticket;

pub use allocator::{AllocationEndpoint, AllocationOutcome, Allocator, HttpAllocator};
pub use backend::{BackendError, HttpTicketBackend, TicketAssigner, TicketSource};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
};
pub use director::{Director, DirectorConfig, DirectorError, DirectorStatus};
pub use matchmaker::{
    cut_groups, make_instant_matches, CountdownEvent, CountdownScheduler, Match, COUNTDOWN_GRACE,
};
pub use notifier::{
    HttpPlayerNotifier, NoopNotifier, NotificationGateway, NotifyError, PlayerNotifier,
};
pub use profile::{MatchStrategy, ModeProfile, ProfileError, ProfileRegistry, SelectorStrategy};
pub use selector::{build_allocation, AllocationRequest, SelectorError};
pub use ticket::{Ticket, TicketError};
