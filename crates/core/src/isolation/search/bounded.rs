//! Bounded per-vertex DFS.
//!
//! For every start vertex, walk outward along elementary paths of at most
//! `max_depth` edges; whenever a path closes back at its start with at
//! least [`MIN_CYCLE_LEN`](super::MIN_CYCLE_LEN) edges, test the level
//! predicate and stop at the first hit. Cycles longer than the bound are
//! invisible to this strategy.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;

use super::{Witness, MIN_CYCLE_LEN};
use crate::graph::digraph::{TxnDepEdge, TxnDepGraph};

/// Searches for a predicate-satisfying cycle, trying start vertices in
/// the order given.
pub fn search<K, P>(
    graph: &TxnDepGraph<K>,
    max_depth: usize,
    starts: &[usize],
    accepts: &P,
) -> Option<Witness<K>>
where
    K: Clone + Debug + Eq + Hash,
    P: Fn(&[TxnDepEdge<K>]) -> bool,
{
    for &start in starts {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        if let Some(witness) = dfs(graph, start, start, max_depth, &mut path, &mut visited, accepts)
        {
            return Some(witness);
        }
    }
    None
}

fn dfs<K, P>(
    graph: &TxnDepGraph<K>,
    start: usize,
    current: usize,
    depth_left: usize,
    path: &mut Vec<usize>,
    visited: &mut HashSet<usize>,
    accepts: &P,
) -> Option<Witness<K>>
where
    K: Clone + Debug + Eq + Hash,
    P: Fn(&[TxnDepEdge<K>]) -> bool,
{
    for &edge_index in graph.out_edges(current) {
        let next = graph.edge(edge_index).to;

        if next == start && path.len() + 1 >= MIN_CYCLE_LEN {
            path.push(edge_index);
            let cycle: Witness<K> = path.iter().map(|&index| graph.edge(index).clone()).collect();
            path.pop();
            if accepts(&cycle) {
                return Some(cycle);
            }
        }

        if depth_left > 1 && next != start && visited.insert(next) {
            path.push(edge_index);
            let found = dfs(graph, start, next, depth_left - 1, path, visited, accepts);
            path.pop();
            visited.remove(&next);
            if found.is_some() {
                return found;
            }
        }
    }
    None
}
