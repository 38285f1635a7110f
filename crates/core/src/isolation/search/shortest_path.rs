//! Shortest-path witness search.
//!
//! Every cycle contains each of its edges as a "back edge": for an edge
//! `u -> v`, any path `v => u` closes a cycle when the edge is prepended.
//! This strategy scans the edges in insertion order and, per edge,
//! enumerates the return paths shortest first, accepting the first cycle
//! the predicate takes. Complete: if a satisfying cycle exists, one of
//! its edges eventually serves as the back edge that finds it.

use core::fmt::Debug;
use core::hash::Hash;

use alloc::vec;

use super::Witness;
use crate::graph::digraph::{TxnDepEdge, TxnDepGraph};

/// Searches for a predicate-satisfying cycle via per-back-edge return
/// paths.
pub fn search<K, P>(graph: &TxnDepGraph<K>, accepts: &P) -> Option<Witness<K>>
where
    K: Clone + Debug + Eq + Hash,
    P: Fn(&[TxnDepEdge<K>]) -> bool,
{
    for back_edge in graph.edges() {
        for path in graph.simple_paths(back_edge.to, back_edge.from) {
            let mut cycle = vec![back_edge.clone()];
            cycle.extend(path.into_iter().map(|index| graph.edge(index).clone()));
            if accepts(&cycle) {
                return Some(cycle);
            }
        }
    }
    None
}
