//! Register-variant construction: version logs, derived edges, and the
//! G1 findings driven by the write log.

mod common;

use common::{agreed_verdict, assert_monotone};
use isocheck_core::construct::{rw_register, Error, WriteLog};
use isocheck_core::graph::DepType;
use isocheck_core::history::types::Op;
use isocheck_core::IsolationLevel::{
    ParallelSnapshotIsolation, Serializable, SnapshotIsolation,
};

fn log(entries: &[(&'static str, &[i64])]) -> WriteLog<&'static str> {
    entries
        .iter()
        .map(|&(key, versions)| (key, versions.to_vec()))
        .collect()
}

// -- Edge derivation ---------------------------------------------------------

#[test]
fn serial_history_is_clean() {
    let history = vec![op!(w(x, 1)), op!(r(x, 1), w(x, 2)), op!(r(x, 2))];
    let constructed = rw_register::build(history, &log(&[("x", &[1, 2])])).unwrap();

    assert!(!constructed.g1.g1a);
    assert!(!constructed.g1.g1b);
    assert!(constructed.txns.has_edge(0, 1, DepType::Wr));
    assert!(constructed.txns.has_edge(0, 1, DepType::Ww));
    assert!(constructed.txns.has_edge(1, 2, DepType::Wr));
    assert!(agreed_verdict(&constructed, Serializable));
    assert_monotone(&constructed);
}

#[test]
fn nil_readers_antidepend_on_first_write() {
    let history = vec![op!(r(x)), op!(w(x, 1))];
    let constructed = rw_register::build(history, &log(&[("x", &[1])])).unwrap();

    assert!(constructed.txns.has_edge(0, 1, DepType::Rw));
    assert_eq!(constructed.txns.edge_count(), 1);
}

/// Two transactions read version 1 and overwrite it independently: the
/// log orders their writes, and the loser's read anti-depends on the
/// winner.
#[test]
fn register_lost_update() {
    let history = vec![
        op!(w(x, 1)),
        op!(r(x, 1), w(x, 2)),
        op!(r(x, 1), w(x, 3)),
    ];
    let constructed = rw_register::build(history, &log(&[("x", &[1, 2, 3])])).unwrap();

    assert!(!constructed.g1.g1a);
    assert!(!constructed.g1.g1b);
    assert!(constructed.txns.has_edge(2, 1, DepType::Rw));
    assert!(constructed.txns.has_edge(1, 2, DepType::Ww));
    assert!(!agreed_verdict(&constructed, Serializable));
    assert!(!agreed_verdict(&constructed, SnapshotIsolation));
    assert!(!agreed_verdict(&constructed, ParallelSnapshotIsolation));
}

/// Register flavor of write skew: both reads miss the other's write; the
/// two rw edges are adjacent in the cycle, so SI tolerates it.
#[test]
fn register_write_skew() {
    let history = vec![
        op!(r(x), r(y), w(x, 1)),
        op!(r(x), r(y), w(y, 1)),
    ];
    let constructed =
        rw_register::build(history, &log(&[("x", &[1]), ("y", &[1])])).unwrap();

    assert!(!agreed_verdict(&constructed, Serializable));
    assert!(agreed_verdict(&constructed, SnapshotIsolation));
    assert!(agreed_verdict(&constructed, ParallelSnapshotIsolation));
    assert_monotone(&constructed);
}

// -- G1 findings -------------------------------------------------------------

/// Reading a value the log never recorded for that key.
#[test]
fn read_of_unlogged_value_raises_g1a() {
    let history = vec![op!(w(x, 1)), op!(r(x, 5))];
    let constructed = rw_register::build(history, &log(&[("x", &[1])])).unwrap();

    assert!(constructed.g1.g1a);
}

/// Reading a key the log has no writes for at all.
#[test]
fn read_of_unlogged_key_raises_g1a() {
    let history = vec![op!(r(y, 3))];
    let constructed = rw_register::build(history, &log(&[])).unwrap();

    assert!(constructed.g1.g1a);
}

/// A logged version whose write event never committed.
#[test]
fn logged_version_without_write_event_raises_g1a_when_read() {
    let history = vec![op!(w(x, 1)), op!(r(x, 2))];
    let constructed = rw_register::build(history, &log(&[("x", &[1, 2])])).unwrap();

    assert!(constructed.g1.g1a);
}

/// An intermediate write observed outside its own transaction.
#[test]
fn intermediate_write_read_raises_g1b() {
    let history = vec![op!(w(x, 1), w(x, 2)), op!(r(x, 1))];
    let constructed = rw_register::build(history, &log(&[("x", &[1, 2])])).unwrap();

    assert!(constructed.g1.g1b);
}

/// The same shape read at the allowed moment -- between the write and its
/// successor inside the writing transaction -- is not G1b.
#[test]
fn intermediate_write_read_in_window_is_allowed() {
    let history = vec![op!(w(x, 1), r(x, 1), w(x, 2))];
    let constructed = rw_register::build(history, &log(&[("x", &[1, 2])])).unwrap();

    assert!(!constructed.g1.g1b);
}

// -- Log-driven failures -----------------------------------------------------

#[test]
fn empty_version_list_is_fatal() {
    let history = vec![op!(w(x, 1))];
    let result = rw_register::build(history, &log(&[("x", &[])]));

    assert!(
        matches!(result, Err(Error::BrokenWriteLog { key: "x" })),
        "expected BrokenWriteLog, got {result:?}",
    );
}

#[test]
fn duplicate_register_write_is_fatal() {
    let history = vec![op!(w(x, 1)), op!(w(x, 1))];
    let result = rw_register::build(history, &log(&[("x", &[1])]));

    assert!(
        matches!(result, Err(Error::DuplicateWrite { key: "x", value: 1, .. })),
        "expected DuplicateWrite, got {result:?}",
    );
}

/// A committed write missing from the log is logged as suspicious but is
/// not fatal and raises no finding by itself.
#[test]
fn unlogged_committed_write_is_tolerated() {
    let history = vec![op!(w(x, 1)), op!(w(x, 2))];
    let constructed = rw_register::build(history, &log(&[("x", &[1])])).unwrap();

    assert!(!constructed.g1.g1a);
    assert!(!constructed.g1.g1b);
}

/// A sequence observation in a register history is a malformed input.
#[test]
fn sequence_read_is_malformed() {
    let history: Vec<Op<&str>> = vec![op!(w(x, 1)), op!(r(x, [1]))];
    let result = rw_register::build(history, &log(&[("x", &[1])]));

    assert!(
        matches!(result, Err(Error::MalformedValue { .. })),
        "expected MalformedValue, got {result:?}",
    );
}
