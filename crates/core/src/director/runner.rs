//! Director implementation.
//!
//! Each cycle spawns one unit of work per profile, joins them all, then
//! sleeps out the remainder of the minimum cycle interval. Within a unit the
//! steps are strictly sequential: query -> form matches -> allocate ->
//! assign -> notify. Across units there is no ordering guarantee beyond
//! each profile getting exactly one attempt per cycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::allocator::{AllocationOutcome, Allocator};
use crate::backend::{TicketAssigner, TicketSource};
use crate::matchmaker::{make_instant_matches, CountdownEvent, CountdownScheduler, Match};
use crate::metrics;
use crate::notifier::NotificationGateway;
use crate::profile::{MatchStrategy, ModeProfile, ProfileRegistry};
use crate::selector::build_allocation;

use super::config::DirectorConfig;
use super::types::{DirectorError, DirectorStatus};

/// The matchmaking director: forms matches from waiting tickets and hands
/// them off for server assignment, forever.
pub struct Director {
    config: DirectorConfig,
    profiles: Vec<ModeProfile>,
    registry: ProfileRegistry,
    ticket_source: Arc<dyn TicketSource>,
    assigner: Arc<dyn TicketAssigner>,
    allocator: Arc<dyn Allocator>,
    gateway: NotificationGateway,

    // One countdown scheduler per pool. Profile-to-pool is 1:1 (enforced by
    // config validation), so no two concurrent units ever lock the same
    // entry; the mutex guards the state across successive cycles only.
    schedulers: HashMap<String, Arc<Mutex<CountdownScheduler>>>,

    running: Arc<AtomicBool>,
    cycles: Arc<AtomicU64>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Director {
    /// Create a director over the given profiles and collaborators.
    pub fn new(
        config: DirectorConfig,
        profiles: Vec<ModeProfile>,
        ticket_source: Arc<dyn TicketSource>,
        assigner: Arc<dyn TicketAssigner>,
        allocator: Arc<dyn Allocator>,
        gateway: NotificationGateway,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let schedulers = profiles
            .iter()
            .map(|p| {
                (
                    p.pool_name.clone(),
                    Arc::new(Mutex::new(CountdownScheduler::new())),
                )
            })
            .collect();

        let registry = ProfileRegistry::new(profiles.iter().cloned());

        Self {
            config,
            profiles,
            registry,
            ticket_source,
            assigner,
            allocator,
            gateway,
            schedulers,
            running: Arc::new(AtomicBool::new(false)),
            cycles: Arc::new(AtomicU64::new(0)),
            shutdown_tx,
        }
    }

    /// Run the decision loop until [`Director::shutdown`] is called.
    ///
    /// Cycles start at most once per `min_cycle_interval_ms`; a cycle that
    /// overruns the interval is followed immediately by the next one.
    pub async fn run(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Director already running");
            return;
        }

        info!(profiles = self.profiles.len(), "Director started");
        let interval = Duration::from_millis(self.config.min_cycle_interval_ms);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            let started = Instant::now();
            self.run_cycle().await;

            let elapsed = started.elapsed();
            metrics::CYCLE_DURATION.observe(elapsed.as_secs_f64());

            if elapsed < interval {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = tokio::time::sleep(interval - elapsed) => {}
                }
            } else if shutdown_rx.try_recv().is_ok() {
                break;
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Director stopped");
    }

    /// Replace every pool's countdown grace period. Test hook: production
    /// code keeps [`crate::matchmaker::COUNTDOWN_GRACE`].
    pub fn with_countdown_grace(mut self, grace: Duration) -> Self {
        for scheduler in self.schedulers.values_mut() {
            *scheduler = Arc::new(Mutex::new(CountdownScheduler::with_grace_period(grace)));
        }
        self
    }

    /// Signal the loop to stop after the current cycle.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Current status.
    pub fn status(&self) -> DirectorStatus {
        DirectorStatus {
            running: self.running.load(Ordering::Relaxed),
            profiles: self.profiles.len(),
            cycles_completed: self.cycles.load(Ordering::Relaxed),
        }
    }

    /// Run one decision cycle: every profile concurrently, joined at the
    /// cycle boundary. Public so tests (and tooling) can drive cycles
    /// deterministically.
    pub async fn run_cycle(&self) {
        let deadline = Duration::from_millis(self.config.profile_deadline_ms);

        let handles: Vec<_> = self
            .profiles
            .iter()
            .cloned()
            .map(|profile| {
                let scheduler = Arc::clone(&self.schedulers[&profile.pool_name]);
                let registry = self.registry.clone();
                let ticket_source = Arc::clone(&self.ticket_source);
                let assigner = Arc::clone(&self.assigner);
                let allocator = Arc::clone(&self.allocator);
                let gateway = self.gateway.clone();

                tokio::spawn(async move {
                    let unit = Self::process_profile(
                        &profile,
                        &registry,
                        &scheduler,
                        &ticket_source,
                        &assigner,
                        &allocator,
                        &gateway,
                    );
                    match tokio::time::timeout(deadline, unit).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            metrics::PROFILE_FAILURES
                                .with_label_values(&[profile.name.as_str(), "error"])
                                .inc();
                            warn!(profile = %profile.name, "Profile cycle failed: {}", e);
                        }
                        Err(_) => {
                            metrics::PROFILE_FAILURES
                                .with_label_values(&[profile.name.as_str(), "timeout"])
                                .inc();
                            warn!(profile = %profile.name, "Profile cycle exceeded deadline");
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Profile task panicked: {}", e);
            }
        }

        metrics::CYCLES_TOTAL.inc();
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// One profile's unit of work for this cycle.
    async fn process_profile(
        profile: &ModeProfile,
        registry: &ProfileRegistry,
        scheduler: &Arc<Mutex<CountdownScheduler>>,
        ticket_source: &Arc<dyn TicketSource>,
        assigner: &Arc<dyn TicketAssigner>,
        allocator: &Arc<dyn Allocator>,
        gateway: &NotificationGateway,
    ) -> Result<(), DirectorError> {
        let tickets = ticket_source.query_pool(&profile.pool_name).await?;
        metrics::TICKETS_WAITING
            .with_label_values(&[profile.pool_name.as_str()])
            .set(tickets.len() as i64);
        debug!(profile = %profile.name, tickets = tickets.len(), "Queried pool");

        let (matches, events) = match profile.strategy {
            MatchStrategy::Instant => (make_instant_matches(profile, tickets), Vec::new()),
            MatchStrategy::Countdown => {
                let mut scheduler = scheduler.lock().await;
                scheduler.decide(profile, tickets, Utc::now())
            }
        };

        for event in events {
            match event {
                CountdownEvent::Pending { roster, teleport_at } => {
                    gateway.notify_pending(&roster, teleport_at).await;
                }
                CountdownEvent::Cancelled { roster } => {
                    gateway.notify_cancelled(&roster).await;
                }
            }
        }

        if !matches.is_empty() {
            info!(profile = %profile.name, generated = matches.len(), "Generated matches");
            metrics::MATCHES_FORMED
                .with_label_values(&[profile.name.as_str()])
                .inc_by(matches.len() as u64);
        }

        for game_match in matches {
            // Matches carry the profile name they were formed for; resolve it
            // rather than trusting it to be the profile driving this unit.
            let match_profile = registry.get(&game_match.profile_name)?;
            Self::allocate_and_assign(match_profile, game_match, assigner, allocator, gateway)
                .await;
        }

        Ok(())
    }

    /// Allocate a server for one match, assign its tickets, and notify the
    /// players. Every failure here is scoped to this match: it is logged
    /// and skipped, and its tickets simply re-appear in the next cycle's
    /// snapshot.
    async fn allocate_and_assign(
        profile: &ModeProfile,
        game_match: Match,
        assigner: &Arc<dyn TicketAssigner>,
        allocator: &Arc<dyn Allocator>,
        gateway: &NotificationGateway,
    ) {
        if !game_match.allocate_gameserver {
            return;
        }

        let request = match build_allocation(profile, &game_match) {
            Ok(request) => request,
            Err(e) => {
                error!(match_id = %game_match.id, "Failed to build allocation: {}", e);
                metrics::ALLOCATIONS_FAILED
                    .with_label_values(&[profile.name.as_str()])
                    .inc();
                return;
            }
        };

        let endpoint = match allocator.allocate(&request).await {
            Ok(AllocationOutcome::Allocated(endpoint)) => endpoint,
            Ok(AllocationOutcome::Unfulfilled(state)) => {
                error!(match_id = %game_match.id, state = %state, "Failed to allocate server");
                metrics::ALLOCATIONS_FAILED
                    .with_label_values(&[profile.name.as_str()])
                    .inc();
                return;
            }
            Err(e) => {
                error!(match_id = %game_match.id, "Failed to allocate server: {}", e);
                metrics::ALLOCATIONS_FAILED
                    .with_label_values(&[profile.name.as_str()])
                    .inc();
                return;
            }
        };

        let connection = endpoint.connection();
        debug!(match_id = %game_match.id, connection = %connection, "Allocation created");

        let ticket_ids: Vec<String> = game_match.tickets.iter().map(|t| t.id.clone()).collect();
        if let Err(e) = assigner.assign(&ticket_ids, &connection).await {
            error!(match_id = %game_match.id, "Failed to assign tickets: {}", e);
            metrics::ASSIGNMENTS_FAILED
                .with_label_values(&[profile.name.as_str()])
                .inc();
            return;
        }

        gateway.notify_match_starting(&game_match).await;
        info!(
            match_id = %game_match.id,
            connection = %connection,
            players = game_match.player_count(),
            "Assigned server to match"
        );
    }
}
