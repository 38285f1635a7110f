//! Black-box isolation checking for transactional histories.
//!
//! `isocheck_core` decides whether a recorded history of concurrent
//! transactions satisfies a target isolation level by building a typed
//! dependency graph over its transactions and searching it for anomalous
//! cycles. Five levels are supported, ordered weakest to strongest:
//!
//! 1. **PL-1** -- no write cycles (G0).
//! 2. **PL-2** -- no circular information flow (G1c), on top of the G1a
//!    and G1b findings reported at construction time.
//! 3. **PSI** (Parallel Snapshot Isolation) -- no cycle with fewer than
//!    two anti-dependency (`rw`) edges.
//! 4. **SI** (Snapshot Isolation) -- no cycle without two consecutive
//!    `rw` edges.
//! 5. **SER** (Serializability) -- no cycle at all.
//!
//! Two history variants are supported: *list-append* (each key is an
//! append-only list and reads observe the whole list, from which the
//! version order is reconstructed) and *read/write register* (reads
//! observe single values; the version order comes from a storage write
//! log supplied by the caller).
//!
//! # Data flow
//!
//! ```text
//! History -> preprocess (drop nemesis ops, attach indices, keep ok ops)
//!         -> construct::{list_append, rw_register}::build
//!         -> { event graph, transaction graph, G1 findings }
//!         -> isolation::check_graph (level x search strategy)
//!         -> Outcome { is_valid, witness }
//! ```
//!
//! # Entry points
//!
//! [`check_list_append`] and [`check_rw_register`] run the whole pipeline
//! and fold the G1 findings into a [`Report`]. To check several levels
//! against one history, build once via [`construct`] and call
//! [`isolation::check_graph`] per level -- the constructed graph is
//! immutable and freely shared.
//!
//! ```rust,ignore
//! use isocheck_core::{check_list_append, IsolationLevel, Strategy};
//!
//! let report = check_list_append(history, IsolationLevel::Serializable, Strategy::default())?;
//! assert!(!report.g1a && !report.g1b, "graph is untrustworthy");
//! match report.witness {
//!     None => println!("serializable"),
//!     Some(cycle) => println!("violation: {cycle:?}"),
//! }
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- `Serialize`/`Deserialize` derives on the history and
//!   graph types.
//! - **`schemars`** -- `JsonSchema` derives on the history input types.
//!
//! This crate is `no_std` compatible (requires `alloc`).

#![cfg_attr(not(any(test, feature = "schemars")), no_std)]
extern crate alloc;

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

pub mod construct;
pub mod graph;
pub mod history;
pub mod isolation;

pub use construct::{Constructed, Error, G1Anomalies, WriteLog};
pub use graph::digraph::TxnDepEdge;
pub use isolation::{check_graph, IsolationLevel, Outcome, Strategy};

use history::types::History;

/// The result surface of a full check: the level verdict plus the G1
/// findings from construction.
///
/// `g1a`/`g1b` apply globally; when either is set, the level verdict is
/// computed on a graph derived from a broken execution and should not be
/// trusted on its own.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<K> {
    pub is_valid: bool,
    pub witness: Option<Vec<TxnDepEdge<K>>>,
    pub g1a: bool,
    pub g1b: bool,
}

impl<K> Report<K> {
    fn new(outcome: Outcome<K>, g1: G1Anomalies) -> Self {
        Self {
            is_valid: outcome.is_valid,
            witness: outcome.witness,
            g1a: g1.g1a,
            g1b: g1.g1b,
        }
    }
}

/// Constructs the dependency graph of a list-append history and checks
/// one isolation level against it.
///
/// # Errors
///
/// Returns an [`Error`] when the history violates an input precondition
/// (see [`construct::error::Error`]); this is distinct from an invalid
/// verdict, which comes back as a [`Report`] with `is_valid == false`.
pub fn check_list_append<K>(
    history: History<K>,
    level: IsolationLevel,
    strategy: Strategy,
) -> Result<Report<K>, Error<K>>
where
    K: Clone + Debug + Eq + Hash + Ord,
{
    let constructed = construct::list_append::build(history)?;
    let outcome = check_graph(&constructed.txns, level, strategy);
    Ok(Report::new(outcome, constructed.g1))
}

/// Constructs the dependency graph of a read/write-register history from
/// its write log and checks one isolation level against it.
///
/// # Errors
///
/// Returns an [`Error`] when the history or write log violates an input
/// precondition; see [`construct::error::Error`].
pub fn check_rw_register<K>(
    history: History<K>,
    write_log: &WriteLog<K>,
    level: IsolationLevel,
    strategy: Strategy,
) -> Result<Report<K>, Error<K>>
where
    K: Clone + Debug + Eq + Hash + Ord,
{
    let constructed = construct::rw_register::build(history, write_log)?;
    let outcome = check_graph(&constructed.txns, level, strategy);
    Ok(Report::new(outcome, constructed.g1))
}
