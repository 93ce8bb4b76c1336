//! Allocation request types and the two selection strategies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::matchmaker::Match;
use crate::profile::{ModeProfile, SelectorStrategy};
use crate::ticket::TicketError;

/// Label carrying the fleet a server belongs to.
pub const LABEL_FLEET: &str = "fleet";
/// Label set by servers that accept additional matches while allocated.
pub const LABEL_SHOULD_ALLOCATE: &str = "should-allocate";
/// Annotation carrying the match correlation id.
pub const ANNOTATION_MATCH_ID: &str = "matchmaker/match-id";
/// Annotation carrying the JSON-encoded expected player id list.
pub const ANNOTATION_EXPECTED_PLAYERS: &str = "matchmaker/expected-players";

/// Errors raised while building an allocation request.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// A member ticket's player id could not be extracted. The whole
    /// annotation step fails; the match is never partially annotated.
    #[error("failed to build expected players: {0}")]
    ExpectedPlayers(#[from] TicketError),

    /// The expected player list could not be serialized.
    #[error("failed to encode expected players: {0}")]
    Encode(#[from] serde_json::Error),
}

/// State tier a selector requires of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerState {
    /// Already running a match and reachable by players.
    Allocated,
    /// Started but not yet handed to any match.
    Ready,
}

/// Player-capacity filter on a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSelector {
    /// Minimum free player slots the server must have.
    pub min_available: u64,
    /// Maximum free player slots. Effectively unbounded for our selectors.
    pub max_available: u64,
}

/// One tier of a server selection. Tiers are tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSelector {
    /// Labels the server must carry.
    pub match_labels: BTreeMap<String, String>,
    /// Required server state.
    pub server_state: ServerState,
    /// Optional free-capacity requirement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<PlayerSelector>,
}

/// Declarative request for one game server, consumed by the external
/// allocator. Produced once per match that requires allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Packing strategy hint for the allocator.
    pub scheduling: String,
    /// Selection tiers, most preferred first.
    pub selectors: Vec<ServerSelector>,
    /// Annotations patched onto the chosen server: match correlation id and
    /// the expected player list.
    pub annotations: BTreeMap<String, String>,
}

/// Build the allocation request for a match using the profile's selector
/// strategy.
///
/// Both strategies are two-tier: prefer a server already in the Allocated
/// state in the target fleet, fall back to any Ready server in that fleet.
/// Capacity-based selection additionally requires free player capacity for
/// the whole match on the first tier; exclusive-match selection instead
/// requires the server to be flagged as takeable.
pub fn build_allocation(
    profile: &ModeProfile,
    game_match: &Match,
) -> Result<AllocationRequest, SelectorError> {
    let first_tier = match profile.selector {
        SelectorStrategy::CapacityBased => ServerSelector {
            match_labels: fleet_labels(profile),
            server_state: ServerState::Allocated,
            players: Some(PlayerSelector {
                // will need to change for party support
                min_available: game_match.player_count() as u64,
                max_available: u64::MAX,
            }),
        },
        SelectorStrategy::ExclusiveMatch => {
            let mut match_labels = fleet_labels(profile);
            match_labels.insert(LABEL_SHOULD_ALLOCATE.to_string(), "true".to_string());
            ServerSelector {
                match_labels,
                server_state: ServerState::Allocated,
                players: None,
            }
        }
    };

    let fallback = ServerSelector {
        match_labels: fleet_labels(profile),
        server_state: ServerState::Ready,
        players: None,
    };

    Ok(AllocationRequest {
        scheduling: "Packed".to_string(),
        selectors: vec![first_tier, fallback],
        annotations: build_annotations(game_match)?,
    })
}

fn fleet_labels(profile: &ModeProfile) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_FLEET.to_string(), profile.fleet_name.clone());
    labels
}

fn build_annotations(game_match: &Match) -> Result<BTreeMap<String, String>, SelectorError> {
    let mut expected_players = Vec::with_capacity(game_match.tickets.len());
    for ticket in &game_match.tickets {
        expected_players.push(ticket.player_id()?.to_string());
    }

    let mut annotations = BTreeMap::new();
    annotations.insert(
        ANNOTATION_MATCH_ID.to_string(),
        Uuid::new_v4().to_string(),
    );
    annotations.insert(
        ANNOTATION_EXPECTED_PLAYERS.to_string(),
        serde_json::to_string(&expected_players)?,
    );
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MatchStrategy;
    use crate::ticket::Ticket;
    use std::collections::HashMap;

    fn profile(selector: SelectorStrategy) -> ModeProfile {
        ModeProfile {
            name: "lobby".to_string(),
            pool_name: "lobby".to_string(),
            fleet_name: "lobby".to_string(),
            min_players: 1,
            max_players: 50,
            strategy: MatchStrategy::Instant,
            selector,
        }
    }

    fn match_of(n: usize, profile: &ModeProfile) -> Match {
        let tickets = (0..n)
            .map(|i| Ticket::new(format!("t-{i}"), format!("p-{i}")))
            .collect();
        Match::assemble(profile, tickets)
    }

    #[test]
    fn test_capacity_based_tiers() {
        let profile = profile(SelectorStrategy::CapacityBased);
        let m = match_of(6, &profile);
        let request = build_allocation(&profile, &m).unwrap();

        assert_eq!(request.scheduling, "Packed");
        assert_eq!(request.selectors.len(), 2);

        let first = &request.selectors[0];
        assert_eq!(first.server_state, ServerState::Allocated);
        assert_eq!(first.match_labels[LABEL_FLEET], "lobby");
        let players = first.players.unwrap();
        assert_eq!(players.min_available, 6);
        assert_eq!(players.max_available, u64::MAX);

        let fallback = &request.selectors[1];
        assert_eq!(fallback.server_state, ServerState::Ready);
        assert_eq!(fallback.match_labels[LABEL_FLEET], "lobby");
        assert!(fallback.players.is_none());
    }

    #[test]
    fn test_exclusive_match_tiers() {
        let profile = profile(SelectorStrategy::ExclusiveMatch);
        let m = match_of(8, &profile);
        let request = build_allocation(&profile, &m).unwrap();

        let first = &request.selectors[0];
        assert_eq!(first.server_state, ServerState::Allocated);
        assert_eq!(first.match_labels[LABEL_SHOULD_ALLOCATE], "true");
        assert!(first.players.is_none());

        assert!(request.selectors[1]
            .match_labels
            .get(LABEL_SHOULD_ALLOCATE)
            .is_none());
    }

    #[test]
    fn test_expected_players_annotation() {
        let profile = profile(SelectorStrategy::CapacityBased);
        let m = match_of(6, &profile);
        let request = build_allocation(&profile, &m).unwrap();

        let encoded = &request.annotations[ANNOTATION_EXPECTED_PLAYERS];
        let decoded: Vec<String> = serde_json::from_str(encoded).unwrap();
        assert_eq!(decoded.len(), 6);
        assert_eq!(decoded[0], "p-0");
        assert_eq!(decoded[5], "p-5");
    }

    #[test]
    fn test_correlation_id_is_fresh_per_request() {
        let profile = profile(SelectorStrategy::CapacityBased);
        let m = match_of(2, &profile);

        let a = build_allocation(&profile, &m).unwrap();
        let b = build_allocation(&profile, &m).unwrap();
        assert_ne!(
            a.annotations[ANNOTATION_MATCH_ID],
            b.annotations[ANNOTATION_MATCH_ID]
        );
        // Correlation id is generated for the allocation, not taken from the
        // match id.
        assert_ne!(a.annotations[ANNOTATION_MATCH_ID], m.id);
    }

    #[test]
    fn test_malformed_ticket_fails_whole_annotation() {
        let profile = profile(SelectorStrategy::CapacityBased);
        let mut m = match_of(3, &profile);
        m.tickets[1] = Ticket {
            id: "t-bad".to_string(),
            persistent_fields: HashMap::new(),
        };

        let err = build_allocation(&profile, &m).unwrap_err();
        assert!(matches!(err, SelectorError::ExpectedPlayers(_)));
    }

    #[test]
    fn test_request_serializes_to_json() {
        let profile = profile(SelectorStrategy::ExclusiveMatch);
        let m = match_of(2, &profile);
        let request = build_allocation(&profile, &m).unwrap();

        let json = serde_json::to_string(&request).unwrap();
        let parsed: AllocationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }
}
