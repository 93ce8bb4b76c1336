//! FIFO batching of tickets into fixed-size groups.

use crate::ticket::Ticket;

/// Greedily cut full-size groups off the front of a ticket sequence.
///
/// Repeatedly removes the first `group_size` tickets while at least that
/// many remain, and returns the cut groups plus whatever is left over.
/// Arrival order is preserved throughout, so earlier-arrived tickets are
/// matched first. Pure and deterministic.
pub fn cut_groups(
    mut tickets: Vec<Ticket>,
    group_size: usize,
) -> (Vec<Vec<Ticket>>, Vec<Ticket>) {
    let mut groups = Vec::new();
    while tickets.len() >= group_size {
        let remainder = tickets.split_off(group_size);
        groups.push(std::mem::replace(&mut tickets, remainder));
    }
    (groups, tickets)
}
