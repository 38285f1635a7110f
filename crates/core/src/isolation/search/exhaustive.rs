//! Exhaustive cycle enumeration.
//!
//! Enumerates every elementary cycle (each one discovered once per edge
//! it contains, which is harmless), filters by the predicate, and keeps
//! the shortest satisfying cycle as the witness. No depth bound: this is
//! the authoritative strategy the bounded ones are cross-checked against,
//! at exponential worst-case cost.

use core::fmt::Debug;
use core::hash::Hash;

use alloc::vec;

use super::Witness;
use crate::graph::digraph::{TxnDepEdge, TxnDepGraph};

/// Finds the shortest predicate-satisfying cycle, if any exists.
pub fn search<K, P>(graph: &TxnDepGraph<K>, accepts: &P) -> Option<Witness<K>>
where
    K: Clone + Debug + Eq + Hash,
    P: Fn(&[TxnDepEdge<K>]) -> bool,
{
    let mut best: Option<Witness<K>> = None;
    for back_edge in graph.edges() {
        for path in graph.simple_paths(back_edge.to, back_edge.from) {
            if best.as_ref().is_some_and(|cycle| cycle.len() <= path.len() + 1) {
                // simple_paths comes back shortest first; nothing longer
                // from this back edge can improve on the best witness
                break;
            }
            let mut cycle = vec![back_edge.clone()];
            cycle.extend(path.into_iter().map(|index| graph.edge(index).clone()));
            if accepts(&cycle) {
                best = Some(cycle);
            }
        }
    }
    best
}
