//! Cycle anti-pattern predicates.
//!
//! Each isolation level proscribes a family of cycles in the transaction
//! dependency graph, characterized purely by the edge-type sequence. The
//! predicates are pure functions over the candidate cycle; the search
//! strategies call them on every closed cycle they find.
//!
//! The families are monotone in strictness: every PL-1 violation is a
//! PL-2 violation, every PL-2 violation a PSI violation, every PSI
//! violation an SI violation, and any cycle at all violates SER.

use super::IsolationLevel;
use crate::graph::digraph::TxnDepEdge;
use crate::graph::DepType;

/// `true` if `cycle` violates `level`.
///
/// The cycle is an ordered closed walk of transaction edges; adjacency is
/// cyclic (the last edge is followed by the first).
#[must_use]
pub fn is_violation<K>(level: IsolationLevel, cycle: &[TxnDepEdge<K>]) -> bool {
    match level {
        IsolationLevel::Pl1 => is_write_cycle(cycle),
        IsolationLevel::Pl2 => is_circular_information_flow(cycle),
        IsolationLevel::ParallelSnapshotIsolation => has_fewer_than_two_rw(cycle),
        IsolationLevel::SnapshotIsolation => lacks_consecutive_rw(cycle),
        IsolationLevel::Serializable => true,
    }
}

/// G0: every edge is `ww`.
fn is_write_cycle<K>(cycle: &[TxnDepEdge<K>]) -> bool {
    cycle.iter().all(|edge| edge.dep == DepType::Ww)
}

/// G1c: no edge is `rw`.
fn is_circular_information_flow<K>(cycle: &[TxnDepEdge<K>]) -> bool {
    cycle.iter().all(|edge| edge.dep != DepType::Rw)
}

/// PSI tolerates cycles carrying two or more `rw` edges.
fn has_fewer_than_two_rw<K>(cycle: &[TxnDepEdge<K>]) -> bool {
    cycle.iter().filter(|edge| edge.dep == DepType::Rw).count() < 2
}

/// SI tolerates cycles with two cyclically-adjacent `rw` edges.
fn lacks_consecutive_rw<K>(cycle: &[TxnDepEdge<K>]) -> bool {
    !cycle.iter().enumerate().any(|(position, edge)| {
        edge.dep == DepType::Rw && cycle[(position + 1) % cycle.len()].dep == DepType::Rw
    })
}
