//! Director lifecycle integration tests.
//!
//! These tests drive full decision cycles through the director with mocked
//! collaborators: query -> form matches -> allocate -> assign -> notify.

use std::sync::Arc;
use std::time::Duration;

use lodestone_core::{
    selector::{ServerState, ANNOTATION_EXPECTED_PLAYERS, LABEL_FLEET, LABEL_SHOULD_ALLOCATE},
    testing::{fixtures, MockAllocator, MockPlayerNotifier, MockTicketBackend},
    Director, DirectorConfig, ModeProfile, NotificationGateway, Ticket,
};

/// Test helper bundling all mocked collaborators.
struct TestHarness {
    backend: Arc<MockTicketBackend>,
    allocator: Arc<MockAllocator>,
    notifier: Arc<MockPlayerNotifier>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            backend: Arc::new(MockTicketBackend::new()),
            allocator: Arc::new(MockAllocator::new()),
            notifier: Arc::new(MockPlayerNotifier::new()),
        }
    }

    fn director(&self, profiles: Vec<ModeProfile>) -> Director {
        let config = DirectorConfig {
            min_cycle_interval_ms: 10,
            profile_deadline_ms: 1000,
        };
        Director::new(
            config,
            profiles,
            Arc::clone(&self.backend) as Arc<dyn lodestone_core::TicketSource>,
            Arc::clone(&self.backend) as Arc<dyn lodestone_core::TicketAssigner>,
            Arc::clone(&self.allocator) as Arc<dyn lodestone_core::Allocator>,
            NotificationGateway::new(
                Arc::clone(&self.notifier) as Arc<dyn lodestone_core::PlayerNotifier>
            ),
        )
    }
}

#[tokio::test]
async fn test_full_match_allocated_assigned_and_notified() {
    let harness = TestHarness::new();
    let profile = fixtures::countdown_profile("block_sumo", 2, 12);
    harness
        .backend
        .set_tickets("block_sumo", fixtures::tickets("s", 12))
        .await;

    let director = harness.director(vec![profile]);
    director.run_cycle().await;

    // One full match was cut and assigned; the pool drained.
    let assignments = harness.backend.assignments().await;
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].ticket_ids.len(), 12);
    assert_eq!(assignments[0].connection, "10.0.0.1:7777");
    assert!(harness.backend.tickets("block_sumo").await.is_empty());

    // Exclusive-match selection: takeable-allocated first, ready fallback.
    let requests = harness.allocator.requests().await;
    assert_eq!(requests.len(), 1);
    let first = &requests[0].selectors[0];
    assert_eq!(first.server_state, ServerState::Allocated);
    assert_eq!(first.match_labels[LABEL_FLEET], "block_sumo");
    assert_eq!(first.match_labels[LABEL_SHOULD_ALLOCATE], "true");
    assert_eq!(requests[0].selectors[1].server_state, ServerState::Ready);

    // Every player was told the match starts now.
    let found = harness.notifier.found_notifications().await;
    assert_eq!(found.len(), 12);
    assert!(found.iter().all(|n| n.player_count == 12));
}

#[tokio::test]
async fn test_instant_profile_allocates_with_capacity_filter() {
    let harness = TestHarness::new();
    let profile = fixtures::instant_profile("lobby", 1, 50);
    harness
        .backend
        .set_tickets("lobby", fixtures::tickets("l", 6))
        .await;

    let director = harness.director(vec![profile]);
    director.run_cycle().await;

    let requests = harness.allocator.requests().await;
    assert_eq!(requests.len(), 1);
    let players = requests[0].selectors[0].players.unwrap();
    assert_eq!(players.min_available, 6);

    let expected: Vec<String> =
        serde_json::from_str(&requests[0].annotations[ANNOTATION_EXPECTED_PLAYERS]).unwrap();
    assert_eq!(expected.len(), 6);
    assert!(expected.contains(&"l-p-0".to_string()));
}

#[tokio::test]
async fn test_countdown_lifecycle_across_cycles() {
    let harness = TestHarness::new();
    let profile = fixtures::countdown_profile("block_sumo", 2, 12);
    harness
        .backend
        .set_tickets("block_sumo", fixtures::tickets("c", 5))
        .await;

    let director = harness
        .director(vec![profile])
        .with_countdown_grace(Duration::from_millis(50));

    // First cycle: under max, a countdown starts and players hear about it.
    director.run_cycle().await;
    assert!(harness.backend.assignments().await.is_empty());
    let found = harness.notifier.found_notifications().await;
    assert_eq!(found.len(), 5);

    // After the grace period the partial match is forced out.
    tokio::time::sleep(Duration::from_millis(60)).await;
    director.run_cycle().await;

    let assignments = harness.backend.assignments().await;
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].ticket_ids.len(), 5);
    assert!(harness.backend.tickets("block_sumo").await.is_empty());
}

#[tokio::test]
async fn test_countdown_cancelled_when_players_leave() {
    let harness = TestHarness::new();
    let profile = fixtures::countdown_profile("block_sumo", 2, 12);
    harness
        .backend
        .set_tickets("block_sumo", fixtures::tickets("c", 3))
        .await;

    let director = harness.director(vec![profile]);
    director.run_cycle().await;
    assert_eq!(harness.notifier.found_notifications().await.len(), 3);

    // All but one player leaves: the countdown is cancelled.
    harness
        .backend
        .set_tickets("block_sumo", fixtures::tickets("c", 1))
        .await;
    director.run_cycle().await;

    let cancelled = harness.notifier.cancelled_notifications().await;
    assert_eq!(cancelled, vec!["c-p-0".to_string()]);
    assert!(harness.backend.assignments().await.is_empty());
}

#[tokio::test]
async fn test_emptied_pool_sends_no_cancellation() {
    let harness = TestHarness::new();
    let profile = fixtures::countdown_profile("block_sumo", 2, 12);
    harness
        .backend
        .set_tickets("block_sumo", fixtures::tickets("c", 3))
        .await;

    let director = harness.director(vec![profile]);
    director.run_cycle().await;

    harness.backend.set_tickets("block_sumo", Vec::new()).await;
    director.run_cycle().await;

    assert!(harness.notifier.cancelled_notifications().await.is_empty());
}

#[tokio::test]
async fn test_unfulfilled_allocation_skips_match_until_next_cycle() {
    let harness = TestHarness::new();
    let profile = fixtures::instant_profile("lobby", 1, 12);
    harness
        .backend
        .set_tickets("lobby", fixtures::tickets("l", 4))
        .await;

    let director = harness.director(vec![profile]);

    harness.allocator.unfulfill_next("UnAllocated").await;
    director.run_cycle().await;

    // The match was skipped: nothing assigned, tickets still waiting.
    assert!(harness.backend.assignments().await.is_empty());
    assert_eq!(harness.backend.tickets("lobby").await.len(), 4);

    // Next cycle re-observes the same tickets and succeeds.
    director.run_cycle().await;
    let assignments = harness.backend.assignments().await;
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].ticket_ids.len(), 4);
}

#[tokio::test]
async fn test_assignment_failure_leaves_tickets_for_next_cycle() {
    let harness = TestHarness::new();
    let profile = fixtures::instant_profile("lobby", 1, 12);
    harness
        .backend
        .set_tickets("lobby", fixtures::tickets("l", 3))
        .await;

    let director = harness.director(vec![profile]);

    harness.backend.fail_next_assign().await;
    director.run_cycle().await;
    assert!(harness.backend.assignments().await.is_empty());
    assert!(harness.notifier.found_notifications().await.is_empty());

    director.run_cycle().await;
    assert_eq!(harness.backend.assignments().await.len(), 1);
}

#[tokio::test]
async fn test_profile_failure_does_not_abort_siblings() {
    let harness = TestHarness::new();
    let healthy = fixtures::instant_profile("lobby", 1, 12);
    let broken = fixtures::countdown_profile("block_sumo", 2, 12);

    harness
        .backend
        .set_tickets("lobby", fixtures::tickets("l", 3))
        .await;
    // Tickets without a player id: selection fails for the cut match.
    let malformed: Vec<Ticket> = (0..12)
        .map(|i| Ticket {
            id: format!("bad-t-{i}"),
            persistent_fields: Default::default(),
        })
        .collect();
    harness.backend.set_tickets("block_sumo", malformed).await;

    let director = harness.director(vec![healthy, broken]);
    director.run_cycle().await;

    // The healthy profile's match went through regardless.
    let assignments = harness.backend.assignments().await;
    assert_eq!(assignments.len(), 1);
    assert!(assignments[0].ticket_ids.iter().all(|id| id.starts_with("l-")));
}

#[tokio::test]
async fn test_query_failure_recovers_next_cycle() {
    let harness = TestHarness::new();
    let profile = fixtures::instant_profile("lobby", 1, 12);
    harness
        .backend
        .set_tickets("lobby", fixtures::tickets("l", 2))
        .await;

    let director = harness.director(vec![profile]);

    harness.backend.fail_next_query().await;
    director.run_cycle().await;
    assert!(harness.backend.assignments().await.is_empty());

    director.run_cycle().await;
    assert_eq!(harness.backend.assignments().await.len(), 1);
}

#[tokio::test]
async fn test_run_loop_starts_and_shuts_down() {
    let harness = TestHarness::new();
    let profile = fixtures::instant_profile("lobby", 1, 12);
    let director = Arc::new(harness.director(vec![profile]));

    let runner = {
        let director = Arc::clone(&director);
        tokio::spawn(async move { director.run().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    let status = director.status();
    assert!(status.running);
    assert!(status.cycles_completed >= 1);

    director.shutdown();
    tokio::time::timeout(Duration::from_secs(1), runner)
        .await
        .expect("director did not stop")
        .unwrap();
    assert!(!director.status().running);
}

/// Minimal deterministic PRNG so the simulation needs no extra dependency.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

#[tokio::test]
async fn test_randomized_simulation_never_double_matches_a_ticket() {
    let harness = TestHarness::new();
    let profile = fixtures::countdown_profile("arena", 2, 8);
    let director = harness
        .director(vec![profile])
        .with_countdown_grace(Duration::ZERO);

    let mut rng = XorShift(0x5eed_1234_dead_beef);
    let mut next_ticket = 0u64;

    for _ in 0..1000 {
        // Random arrivals.
        let arrivals = rng.below(4) as usize;
        let new_tickets: Vec<Ticket> = (0..arrivals)
            .map(|_| {
                let id = next_ticket;
                next_ticket += 1;
                Ticket::new(format!("t-{id}"), format!("p-{id}"))
            })
            .collect();
        harness.backend.add_tickets("arena", new_tickets).await;

        // Random departures of still-waiting tickets.
        let mut waiting = harness.backend.tickets("arena").await;
        if !waiting.is_empty() && rng.below(3) == 0 {
            let gone = rng.below(waiting.len() as u64) as usize;
            waiting.remove(gone);
            harness.backend.set_tickets("arena", waiting).await;
        }

        director.run_cycle().await;
    }

    let assignments = harness.backend.assignments().await;
    assert!(!assignments.is_empty());

    let mut seen = std::collections::HashSet::new();
    for assignment in &assignments {
        let size = assignment.ticket_ids.len();
        assert!((2..=8).contains(&size), "match size {size} out of bounds");
        for id in &assignment.ticket_ids {
            assert!(seen.insert(id.clone()), "ticket {id} matched twice");
        }
    }
}
