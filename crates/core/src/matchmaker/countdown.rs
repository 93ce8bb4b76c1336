//! Countdown match formation.
//!
//! Per pool, the scheduler is a two-state machine: **Idle** (no deadline)
//! and **Counting** (deadline set). Once per decision cycle it either cuts
//! full matches immediately, starts/extends a countdown while the pool sits
//! between the minimum and maximum size, or force-cuts a partial match when
//! the countdown expires.
//!
//! The scheduler never performs I/O: notification intent is returned as
//! [`CountdownEvent`]s for the caller to dispatch.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::metrics;
use crate::profile::ModeProfile;
use crate::ticket::{extract_player_ids, Ticket};

use super::batch::cut_groups;
use super::types::Match;

/// Grace period granted to an under-full pool before it is force-matched.
pub const COUNTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Per-pool countdown state.
#[derive(Debug, Clone, Default)]
pub struct CountdownState {
    /// When the pending match will be forced. `None` while Idle.
    pub deadline: Option<DateTime<Utc>>,
    /// Player ids currently waiting in the pool, refreshed every cycle.
    pub roster: Vec<String>,
}

/// Notification intent produced by a countdown decision.
#[derive(Debug, Clone, PartialEq)]
pub enum CountdownEvent {
    /// A match is pending for the roster and will start at `teleport_at`.
    /// Re-emitted every cycle while the countdown runs.
    Pending {
        roster: Vec<String>,
        teleport_at: DateTime<Utc>,
    },
    /// The countdown was cancelled because players left the pool.
    Cancelled { roster: Vec<String> },
}

/// Stateful countdown policy over a set of pools.
///
/// Each pool's state is owned exclusively by the profile mapped to that pool
/// (a fixed 1:1 mapping, enforced by config validation), so concurrent
/// profile units never touch the same entry.
#[derive(Debug)]
pub struct CountdownScheduler {
    grace: chrono::Duration,
    pools: HashMap<String, CountdownState>,
}

impl Default for CountdownScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownScheduler {
    /// Create a scheduler with the standard grace period.
    pub fn new() -> Self {
        Self::with_grace_period(COUNTDOWN_GRACE)
    }

    /// Create a scheduler with a custom grace period. Test hook: production
    /// code uses [`COUNTDOWN_GRACE`].
    pub fn with_grace_period(grace: Duration) -> Self {
        Self {
            grace: chrono::Duration::from_std(grace).unwrap_or(chrono::Duration::seconds(10)),
            pools: HashMap::new(),
        }
    }

    /// Current state of a pool, if it has ever been observed.
    pub fn state(&self, pool_name: &str) -> Option<&CountdownState> {
        self.pools.get(pool_name)
    }

    /// Run one decision cycle for a pool.
    ///
    /// `tickets` is this cycle's atomic snapshot of the pool, in arrival
    /// order. Returns the matches cut this cycle plus the notification
    /// events the caller should dispatch. Never errors: external-call
    /// failures surface only in the caller.
    pub fn decide(
        &mut self,
        profile: &ModeProfile,
        mut tickets: Vec<Ticket>,
        now: DateTime<Utc>,
    ) -> (Vec<Match>, Vec<CountdownEvent>) {
        let state = self.pools.entry(profile.pool_name.clone()).or_default();

        // Refresh the roster unconditionally: players who left the pool must
        // drop out of it regardless of countdown state.
        state.roster = extract_player_ids(&tickets);

        // An empty snapshot exits before the cancellation step, so a pool
        // that empties completely keeps its deadline and sends no
        // cancellation notice. Deliberate: observed source behavior.
        if tickets.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let mut events = Vec::new();
        let mut matches = Vec::new();

        // Players left and the pool can no longer fill a match: cancel.
        if state.deadline.is_some() && tickets.len() < profile.min_players {
            state.deadline = None;
            metrics::COUNTDOWNS_CANCELLED
                .with_label_values(&[profile.pool_name.as_str()])
                .inc();
            events.push(CountdownEvent::Cancelled {
                roster: state.roster.clone(),
            });
        }

        // Cut as many full matches as possible. A full match ends the wait,
        // so any running countdown is cleared; no pending notice is sent
        // here since players are notified when a server is assigned.
        if tickets.len() >= profile.max_players {
            let (groups, remainder) = cut_groups(tickets, profile.max_players);
            tickets = remainder;
            for group in groups {
                matches.push(Match::assemble(profile, group));
            }
            state.deadline = None;
            debug!(
                pool = %profile.pool_name,
                remaining = tickets.len(),
                "Cut full matches"
            );
        }

        // Not enough left for even a partial match.
        if tickets.len() < profile.min_players {
            return (matches, events);
        }

        // Countdown expired with a viable partial pool: force the match.
        if let Some(deadline) = state.deadline {
            if now > deadline {
                metrics::COUNTDOWNS_EXPIRED
                    .with_label_values(&[profile.pool_name.as_str()])
                    .inc();
                matches.push(Match::assemble(profile, tickets));
                state.deadline = None;
                return (matches, events);
            }
        }

        // Pool is within [min, max): start a countdown if none is running,
        // and (re-)notify the roster of the pending deadline either way.
        let deadline = match state.deadline {
            Some(deadline) => deadline,
            None => {
                let deadline = now + self.grace;
                state.deadline = Some(deadline);
                metrics::COUNTDOWNS_STARTED
                    .with_label_values(&[profile.pool_name.as_str()])
                    .inc();
                debug!(pool = %profile.pool_name, %deadline, "Started countdown");
                deadline
            }
        };
        events.push(CountdownEvent::Pending {
            roster: state.roster.clone(),
            teleport_at: deadline,
        });

        (matches, events)
    }
}
