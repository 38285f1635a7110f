//! Search-strategy contracts, exercised on hand-built graphs: bound
//! behavior, witness minimality, and randomized-order determinism.

use isocheck_core::graph::digraph::{TxnDepEdge, TxnDepGraph};
use isocheck_core::graph::{DepType, EventId};
use isocheck_core::{check_graph, IsolationLevel, Strategy};

fn edge(from: usize, to: usize, dep: DepType) -> TxnDepEdge<&'static str> {
    TxnDepEdge {
        from,
        to,
        dep,
        key: "x",
        from_event: EventId::new(from, 0),
        to_event: EventId::new(to, 0),
    }
}

/// A single directed ring of `len` ww edges over vertices `0..len`.
fn ring(len: usize) -> TxnDepGraph<&'static str> {
    let mut graph = TxnDepGraph::default();
    for from in 0..len {
        graph.add_edge(edge(from, (from + 1) % len, DepType::Ww));
    }
    graph
}

// -- Bound behavior ----------------------------------------------------------

/// The depth bound is a heuristic: a cycle longer than the bound is
/// invisible to the bounded strategy but not to the exhaustive one.
#[test]
fn bounded_search_misses_cycles_beyond_depth() {
    let graph = ring(6);

    let bounded = check_graph(
        &graph,
        IsolationLevel::Serializable,
        Strategy::Bounded { max_depth: 4 },
    );
    assert!(bounded.is_valid);

    let exhaustive = check_graph(&graph, IsolationLevel::Serializable, Strategy::Exhaustive);
    assert!(!exhaustive.is_valid);
    assert_eq!(exhaustive.witness.unwrap().len(), 6);
}

/// Raising the bound makes the same cycle visible.
#[test]
fn bounded_search_finds_cycles_within_depth() {
    let graph = ring(6);

    let outcome = check_graph(
        &graph,
        IsolationLevel::Serializable,
        Strategy::Bounded { max_depth: 6 },
    );
    assert!(!outcome.is_valid);
}

// -- Witness minimality ------------------------------------------------------

/// With a 2-cycle and a 4-cycle present, the exhaustive strategy returns
/// the shorter witness.
#[test]
fn exhaustive_returns_shortest_witness() {
    let mut graph = ring(4);
    graph.add_edge(edge(10, 11, DepType::Ww));
    graph.add_edge(edge(11, 10, DepType::Ww));

    let outcome = check_graph(&graph, IsolationLevel::Serializable, Strategy::Exhaustive);
    assert_eq!(outcome.witness.unwrap().len(), 2);
}

// -- Randomized order --------------------------------------------------------

/// The randomized strategy is a pure function of its seed.
#[test]
fn bounded_random_is_deterministic_per_seed() {
    let mut graph = ring(3);
    graph.add_edge(edge(20, 21, DepType::Ww));
    graph.add_edge(edge(21, 20, DepType::Ww));

    let first = check_graph(
        &graph,
        IsolationLevel::Serializable,
        Strategy::BoundedRandom { max_depth: 4, seed: 99 },
    );
    let second = check_graph(
        &graph,
        IsolationLevel::Serializable,
        Strategy::BoundedRandom { max_depth: 4, seed: 99 },
    );
    assert_eq!(first, second);
    assert!(!first.is_valid);
}

// -- PL-1 subgraph dispatch --------------------------------------------------

/// A cycle that needs a wr edge to close is invisible to PL-1's ww-only
/// subgraph, whichever strategy runs.
#[test]
fn pl1_ignores_mixed_cycles() {
    let mut graph = TxnDepGraph::default();
    graph.add_edge(edge(0, 1, DepType::Ww));
    graph.add_edge(edge(1, 0, DepType::Wr));

    for strategy in [
        Strategy::default(),
        Strategy::BoundedRandom { max_depth: 4, seed: 5 },
        Strategy::ShortestPath,
        Strategy::Exhaustive,
    ] {
        assert!(check_graph(&graph, IsolationLevel::Pl1, strategy).is_valid);
        assert!(!check_graph(&graph, IsolationLevel::Pl2, strategy).is_valid);
    }
}

/// The empty graph is valid at every level under every strategy.
#[test]
fn empty_graph_is_valid() {
    let graph: TxnDepGraph<&'static str> = TxnDepGraph::default();
    for strategy in [Strategy::default(), Strategy::ShortestPath, Strategy::Exhaustive] {
        for level in [
            IsolationLevel::Pl1,
            IsolationLevel::Pl2,
            IsolationLevel::ParallelSnapshotIsolation,
            IsolationLevel::SnapshotIsolation,
            IsolationLevel::Serializable,
        ] {
            assert!(check_graph(&graph, level, strategy).is_valid);
        }
    }
}
