//! Isolation levels and the check dispatcher.
//!
//! [`check_graph`] pairs a [`Strategy`] from [`search`] with the level's
//! anti-pattern predicate from [`anti_pattern`] and runs it over a
//! constructed transaction graph. The graph is read-only here; checks for
//! different levels may run against the same graph concurrently.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use derive_more::Display;

use crate::graph::digraph::{TxnDepEdge, TxnDepGraph};

pub mod anti_pattern;
pub mod search;

pub use search::{Strategy, DEFAULT_MAX_DEPTH, MIN_CYCLE_LEN};

/// The isolation levels this checker can decide, weakest first.
///
/// Adya's hierarchy: PL-1 proscribes G0 (write cycles), PL-2 adds G1
/// (aborted reads, intermediate reads, circular information flow), PSI
/// and SI bound the anti-dependencies a cycle may carry, and SER (PL-3)
/// tolerates no cycle at all.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    #[display("PL-1")]
    Pl1,
    #[display("PL-2")]
    Pl2,
    #[display("PSI")]
    ParallelSnapshotIsolation,
    #[display("SI")]
    SnapshotIsolation,
    #[display("SER")]
    Serializable,
}

impl IsolationLevel {
    /// `true` if `cycle` witnesses a violation of this level.
    #[must_use]
    pub fn is_violation<K>(self, cycle: &[TxnDepEdge<K>]) -> bool {
        anti_pattern::is_violation(self, cycle)
    }
}

/// The verdict of one check: valid, or invalid with a witness cycle.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<K> {
    pub is_valid: bool,
    pub witness: Option<Vec<TxnDepEdge<K>>>,
}

impl<K> Outcome<K> {
    fn from_witness(witness: Option<Vec<TxnDepEdge<K>>>) -> Self {
        Self {
            is_valid: witness.is_none(),
            witness,
        }
    }
}

/// Checks one isolation level against a constructed transaction graph.
///
/// For PL-1 the search runs on the `ww`-only subgraph with the
/// accept-anything predicate: a cycle there is exactly a cycle of only
/// `ww` edges in the full graph, so the SER search applies unmodified.
#[must_use]
pub fn check_graph<K>(
    graph: &TxnDepGraph<K>,
    level: IsolationLevel,
    strategy: Strategy,
) -> Outcome<K>
where
    K: Clone + Debug + Eq + Hash,
{
    tracing::debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        %level,
        ?strategy,
        "searching for anti-pattern cycles"
    );

    if level == IsolationLevel::Pl1 {
        let ww_only = graph.ww_subgraph();
        return Outcome::from_witness(run(&ww_only, strategy, &|_| true));
    }

    Outcome::from_witness(run(graph, strategy, &|cycle: &[TxnDepEdge<K>]| {
        level.is_violation(cycle)
    }))
}

fn run<K, P>(graph: &TxnDepGraph<K>, strategy: Strategy, accepts: &P) -> Option<Vec<TxnDepEdge<K>>>
where
    K: Clone + Debug + Eq + Hash,
    P: Fn(&[TxnDepEdge<K>]) -> bool,
{
    match strategy {
        Strategy::Bounded { max_depth } => {
            search::bounded::search(graph, max_depth, graph.vertices(), accepts)
        }
        Strategy::BoundedRandom { max_depth, seed } => {
            let mut starts = graph.vertices().to_vec();
            search::shuffle(&mut starts, seed);
            search::bounded::search(graph, max_depth, &starts, accepts)
        }
        Strategy::ShortestPath => search::shortest_path::search(graph, accepts),
        Strategy::Exhaustive => search::exhaustive::search(graph, accepts),
    }
}
