//! Instant match formation: cut matches as soon as enough tickets wait.

use crate::profile::ModeProfile;
use crate::ticket::Ticket;

use super::types::Match;

/// Immediately form matches from all tickets in the pool, grouping up to
/// `max_players` per match to reduce allocations.
///
/// A pool with `min_players` tickets or fewer produces nothing; above that,
/// matches are cut while at least `min_players` tickets remain, so the last
/// match may be a partial one.
pub fn make_instant_matches(profile: &ModeProfile, mut tickets: Vec<Ticket>) -> Vec<Match> {
    if tickets.len() <= profile.min_players {
        return Vec::new();
    }

    let mut matches = Vec::new();
    while tickets.len() >= profile.min_players {
        let take = profile.max_players.min(tickets.len());
        let rest = tickets.split_off(take);
        let match_tickets = std::mem::replace(&mut tickets, rest);
        matches.push(Match::assemble(profile, match_tickets));
    }
    matches
}
