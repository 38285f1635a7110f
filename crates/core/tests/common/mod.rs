//! DSL macros and helpers for building test histories.
//!
//! # Syntax
//!
//! ```ignore
//! let history = vec![
//!     op!(a(x, 1), a(y, 1)),          // committed transaction
//!     op_fail!(a(x, 2)),              // failed transaction
//!     op!(r(x, [1]), r(y)),           // reads: sequence and nil
//! ];
//! ```
//!
//! - `a(key, val)`   -> `Mop::append("key", val)`
//! - `w(key, val)`   -> `Mop::write("key", val)`
//! - `r(key, [..])`  -> sequence read (list-append histories)
//! - `r(key, val)`   -> scalar read (register histories)
//! - `r(key)`        -> nil read

use isocheck_core::construct::Constructed;
use isocheck_core::{check_graph, IsolationLevel, Strategy};

/// Build a single micro-operation.
#[macro_export]
macro_rules! mop {
    (a($key:ident, $val:expr)) => {
        isocheck_core::history::types::Mop::append(stringify!($key), $val)
    };
    (w($key:ident, $val:expr)) => {
        isocheck_core::history::types::Mop::write(stringify!($key), $val)
    };
    (r($key:ident, [$($v:expr),* $(,)?])) => {
        isocheck_core::history::types::Mop::read(
            stringify!($key),
            isocheck_core::history::types::Value::Sequence(vec![$($v),*]),
        )
    };
    (r($key:ident, $val:expr)) => {
        isocheck_core::history::types::Mop::read(
            stringify!($key),
            isocheck_core::history::types::Value::Scalar($val),
        )
    };
    (r($key:ident)) => {
        isocheck_core::history::types::Mop::read(
            stringify!($key),
            isocheck_core::history::types::Value::Nil,
        )
    };
}

/// Build a committed operation.
#[macro_export]
macro_rules! op {
    ($($m:ident($($args:tt)*)),* $(,)?) => {
        isocheck_core::history::types::Op::ok(0, vec![$($crate::mop!($m($($args)*))),*])
    };
}

/// Build a failed operation.
#[macro_export]
macro_rules! op_fail {
    ($($m:ident($($args:tt)*)),* $(,)?) => {
        isocheck_core::history::types::Op::fail(0, vec![$($crate::mop!($m($($args)*))),*])
    };
}

/// Every search strategy, including two different randomized seeds.
#[allow(dead_code)]
#[must_use]
pub fn strategies() -> [Strategy; 5] {
    [
        Strategy::default(),
        Strategy::BoundedRandom {
            max_depth: isocheck_core::isolation::DEFAULT_MAX_DEPTH,
            seed: 7,
        },
        Strategy::BoundedRandom {
            max_depth: isocheck_core::isolation::DEFAULT_MAX_DEPTH,
            seed: 1234,
        },
        Strategy::ShortestPath,
        Strategy::Exhaustive,
    ]
}

/// Runs every strategy against the graph, asserts they agree on the
/// verdict and that every returned witness satisfies the level predicate,
/// then returns the common verdict.
#[allow(dead_code)]
#[must_use]
pub fn agreed_verdict(constructed: &Constructed<&'static str>, level: IsolationLevel) -> bool {
    let mut verdict: Option<bool> = None;
    for strategy in strategies() {
        let outcome = check_graph(&constructed.txns, level, strategy);
        if let Some(witness) = &outcome.witness {
            assert!(
                level.is_violation(witness),
                "{level} witness from {strategy:?} fails its own predicate: {witness:?}",
            );
        }
        match verdict {
            None => verdict = Some(outcome.is_valid),
            Some(previous) => assert_eq!(
                previous, outcome.is_valid,
                "strategies disagree on {level} ({strategy:?})",
            ),
        }
    }
    verdict.expect("at least one strategy ran")
}

/// Asserts the hierarchy: a SER-valid graph is valid at every weaker
/// level, and so on down the chain.
#[allow(dead_code)]
pub fn assert_monotone(constructed: &Constructed<&'static str>) {
    let verdict =
        |level| check_graph(&constructed.txns, level, Strategy::Exhaustive).is_valid;
    let ser = verdict(IsolationLevel::Serializable);
    let si = verdict(IsolationLevel::SnapshotIsolation);
    let psi = verdict(IsolationLevel::ParallelSnapshotIsolation);
    let pl2 = verdict(IsolationLevel::Pl2);
    let pl1 = verdict(IsolationLevel::Pl1);

    if ser {
        assert!(
            si && psi && pl2 && pl1,
            "SER-valid graph invalid at a weaker level"
        );
    }
    if si {
        assert!(psi && pl2 && pl1, "SI-valid graph invalid at a weaker level");
    }
    if psi {
        assert!(pl2 && pl1, "PSI-valid graph invalid at a weaker level");
    }
    if pl2 {
        assert!(pl1, "PL-2-valid graph invalid at PL-1");
    }
}
