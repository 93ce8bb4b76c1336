//! Prometheus metrics for the matchmaking director.
//!
//! Covers the decision cycle (durations, per-profile failures), match
//! formation (matches, countdown transitions), and the external
//! collaborators (allocations, notifications).

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// Decision cycle
// =============================================================================

/// Completed decision cycles.
pub static CYCLES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("lodestone_cycles_total", "Total completed decision cycles").unwrap()
});

/// Decision cycle duration in seconds, across all profiles.
pub static CYCLE_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "lodestone_cycle_duration_seconds",
            "Duration of one full decision cycle",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
    )
    .unwrap()
});

/// Per-profile units of work that failed or timed out this cycle.
pub static PROFILE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lodestone_profile_failures_total",
            "Profile units of work aborted by an error or deadline",
        ),
        &["profile", "reason"], // "query", "timeout"
    )
    .unwrap()
});

// =============================================================================
// Match formation
// =============================================================================

/// Matches formed, by profile.
pub static MATCHES_FORMED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lodestone_matches_formed_total", "Matches formed"),
        &["profile"],
    )
    .unwrap()
});

/// Tickets observed waiting per pool at the last cycle.
pub static TICKETS_WAITING: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "lodestone_tickets_waiting",
            "Tickets waiting in the pool at the last snapshot",
        ),
        &["pool"],
    )
    .unwrap()
});

/// Countdowns started, by pool.
pub static COUNTDOWNS_STARTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lodestone_countdowns_started_total", "Countdowns started"),
        &["pool"],
    )
    .unwrap()
});

/// Countdowns cancelled because players left, by pool.
pub static COUNTDOWNS_CANCELLED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lodestone_countdowns_cancelled_total",
            "Countdowns cancelled below minimum players",
        ),
        &["pool"],
    )
    .unwrap()
});

/// Countdowns that expired and forced a partial match, by pool.
pub static COUNTDOWNS_EXPIRED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lodestone_countdowns_expired_total",
            "Countdowns expired into forced matches",
        ),
        &["pool"],
    )
    .unwrap()
});

// =============================================================================
// External collaborators
// =============================================================================

/// Allocation requests that errored or came back unfulfilled, by profile.
pub static ALLOCATIONS_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lodestone_allocations_failed_total",
            "Allocation requests skipped after an error or unfulfilled status",
        ),
        &["profile"],
    )
    .unwrap()
});

/// Ticket assignments that failed, by profile.
pub static ASSIGNMENTS_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lodestone_assignments_failed_total",
            "Ticket assignment requests that failed",
        ),
        &["profile"],
    )
    .unwrap()
});

/// Player notifications delivered.
pub static NOTIFICATIONS_SENT: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lodestone_notifications_sent_total",
        "Player notifications delivered",
    )
    .unwrap()
});

/// Player notifications dropped after a delivery failure.
pub static NOTIFICATIONS_FAILED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lodestone_notifications_failed_total",
        "Player notifications dropped after a delivery failure",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry.register(Box::new(CYCLES_TOTAL.clone())).ok();
    registry.register(Box::new(CYCLE_DURATION.clone())).ok();
    registry.register(Box::new(PROFILE_FAILURES.clone())).ok();
    registry.register(Box::new(MATCHES_FORMED.clone())).ok();
    registry.register(Box::new(TICKETS_WAITING.clone())).ok();
    registry.register(Box::new(COUNTDOWNS_STARTED.clone())).ok();
    registry
        .register(Box::new(COUNTDOWNS_CANCELLED.clone()))
        .ok();
    registry.register(Box::new(COUNTDOWNS_EXPIRED.clone())).ok();
    registry.register(Box::new(ALLOCATIONS_FAILED.clone())).ok();
    registry.register(Box::new(ASSIGNMENTS_FAILED.clone())).ok();
    registry.register(Box::new(NOTIFICATIONS_SENT.clone())).ok();
    registry
        .register(Box::new(NOTIFICATIONS_FAILED.clone()))
        .ok();
}

/// Render the registry in the Prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_registered_metrics() {
        CYCLES_TOTAL.inc();
        MATCHES_FORMED.with_label_values(&["lobby"]).inc();

        let text = render();
        assert!(text.contains("lodestone_cycles_total"));
        assert!(text.contains("lodestone_matches_formed_total"));
    }
}
