//! Cycle search strategies over the transaction dependency graph.
//!
//! All strategies share one contract: find a cycle accepted by the given
//! predicate and return it as a witness, or report that none exists
//! within the strategy's reach. Whenever a satisfying cycle exists, a
//! strategy must either return one or be documented as bounded -- no
//! strategy may drop a true positive for the sake of early termination
//! inside its own bounds.
//!
//! There is no deterministic tie-break across equally short cycles; any
//! satisfying cycle may come back as the witness.
//!
//! The per-vertex bounded search is embarrassingly parallel across start
//! vertices; it is kept single-threaded here and is fast enough for
//! checker-scale graphs.

use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub mod bounded;
pub mod exhaustive;
pub mod shortest_path;

/// The shortest possible cycle: two transactions depending on each other.
pub const MIN_CYCLE_LEN: usize = 2;

/// Default bound for the bounded strategies. An empirical constant: the
/// interesting anti-patterns close within four edges on real histories.
/// Not a completeness guarantee -- [`Strategy::Exhaustive`] is the
/// authoritative one.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// How to search the graph for an offending cycle.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Per-vertex DFS up to `max_depth` edges, vertices in insertion
    /// order, first hit wins.
    Bounded { max_depth: usize },
    /// Same as `Bounded` with the start vertices shuffled by a
    /// per-call-seeded RNG. Same worst case, better expected latency on
    /// histories with many violations.
    BoundedRandom { max_depth: usize, seed: u64 },
    /// Per back-edge `(u, v)`: enumerate paths `v` to `u` shortest first,
    /// prepend the edge, first satisfying cycle wins.
    ShortestPath,
    /// Enumerate every elementary cycle and return the shortest
    /// satisfying one. Unbounded; the ground truth for the others.
    Exhaustive,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Bounded {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Fisher-Yates shuffle driven by a seeded [`SmallRng`].
///
/// The RNG is per call; no process-global state is involved, so a fixed
/// seed reproduces the traversal order exactly.
pub(crate) fn shuffle(items: &mut [usize], seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    for position in (1..items.len()).rev() {
        #[allow(clippy::cast_possible_truncation)]
        let other = (rng.next_u64() % (position as u64 + 1)) as usize;
        items.swap(position, other);
    }
}

/// A cycle accepted by a level predicate, as an ordered closed walk.
pub type Witness<K> = Vec<crate::graph::digraph::TxnDepEdge<K>>;
