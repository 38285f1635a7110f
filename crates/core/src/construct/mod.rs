//! Dependency-graph construction from a recorded history.
//!
//! The two history variants share the same pipeline: preprocess the
//! history, collect one event node per read/write micro-operation, derive
//! typed event-level edges per key, then project the event edges onto
//! transactions. They differ only in how edges are derived:
//!
//! - [`list_append`] reconstructs each key's append chain from the
//!   sequences its reads observed;
//! - [`rw_register`] walks an externally sourced per-key write-version log.
//!
//! G1a (aborted read) and G1b (intermediate read) are detected here, as a
//! side effect of edge derivation, and returned as findings -- they make
//! the graph untrustworthy but do not abort construction. Structural
//! violations of the input preconditions do abort it, with an
//! [`Error`](error::Error).

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::graph::event::{DepEdge, EventId, ReadEvent, WriteEvent};
use crate::graph::{TxnDepEdge, TxnDepGraph};
use crate::history::types::{Mop, Op};

pub mod error;
pub mod list_append;
pub mod rw_register;

pub use error::Error;
pub use rw_register::WriteLog;

/// G1 findings, detected once during construction and applying globally
/// regardless of which isolation level is checked afterwards.
///
/// Callers normally assert both are `false` before trusting level-specific
/// verdicts: either anomaly means the execution broke the transaction
/// model the graph is built on.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct G1Anomalies {
    /// A committed read observed a value that was never durably written.
    pub g1a: bool,
    /// A read observed an intermediate (non-final) write of another
    /// transaction.
    pub g1b: bool,
}

/// The event-level graph: one node per read/write event plus the typed
/// dependency edges derived between them.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct EventGraph<K> {
    pub writes: Vec<WriteEvent<K>>,
    pub reads: Vec<ReadEvent<K>>,
    pub edges: Vec<DepEdge<K>>,
}

/// Everything derived from one history: both graphs, the transaction
/// ordinals in completion order, and the G1 findings.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Constructed<K> {
    pub events: EventGraph<K>,
    pub txns: TxnDepGraph<K>,
    pub txn_ids: Vec<usize>,
    pub g1: G1Anomalies,
}

/// Collects event nodes from an ok-only history.
///
/// The final write to a key within each transaction is marked
/// `last_write`; any other write to that key is intermediate, the raw
/// material of G1b.
fn collect_events<K>(
    ok_history: &[Op<K>],
) -> Result<(Vec<usize>, Vec<WriteEvent<K>>, Vec<ReadEvent<K>>), Error<K>>
where
    K: Clone + Eq + Hash,
{
    let mut txn_ids = Vec::with_capacity(ok_history.len());
    let mut writes = Vec::with_capacity(ok_history.len());
    let mut reads = Vec::with_capacity(ok_history.len() * 2);

    for op in ok_history {
        let txn = op.index.ok_or(Error::MissingIndex)?;
        txn_ids.push(txn);

        let mut last_write_slot: HashMap<K, usize> = HashMap::new();
        for (pos, mop) in op.mops.iter().enumerate() {
            let id = EventId::new(txn, pos);
            match mop {
                Mop::Read { key, value } => reads.push(ReadEvent {
                    id,
                    key: key.clone(),
                    value: value.clone(),
                }),
                Mop::Append { key, value } | Mop::Write { key, value } => {
                    writes.push(WriteEvent {
                        id,
                        key: key.clone(),
                        value: *value,
                        last_write: false,
                    });
                    last_write_slot.insert(key.clone(), writes.len() - 1);
                }
            }
        }
        for slot in last_write_slot.into_values() {
            writes[slot].last_write = true;
        }
    }

    Ok((txn_ids, writes, reads))
}

/// Indexes write events per key per value, flagging intermediate writes.
///
/// Fails on a duplicate `(key, value)` write: the input precondition says
/// each value is written at most once per key.
#[allow(clippy::type_complexity)]
fn index_writes<K>(
    writes: &[WriteEvent<K>],
) -> Result<HashMap<K, HashMap<i64, (EventId, bool)>>, Error<K>>
where
    K: Clone + Eq + Hash,
{
    let mut by_key: HashMap<K, HashMap<i64, (EventId, bool)>> = HashMap::new();
    for write in writes {
        let slot = by_key.entry(write.key.clone()).or_default();
        if let Some(&(first, _)) = slot.get(&write.value) {
            return Err(Error::DuplicateWrite {
                key: write.key.clone(),
                value: write.value,
                ids: [first, write.id],
            });
        }
        slot.insert(write.value, (write.id, !write.last_write));
    }
    Ok(by_key)
}

/// Projects event edges onto transactions.
///
/// Every transaction becomes a vertex (isolated ones included); each event
/// edge maps to the `(from_txn, to_txn, type)` triple of its endpoints.
/// Self-loops and duplicate triples are dropped by the graph itself.
fn project_onto_txns<K>(txn_ids: &[usize], edges: &[DepEdge<K>]) -> TxnDepGraph<K>
where
    K: Clone + Debug + Eq + Hash,
{
    let mut graph = TxnDepGraph::default();
    for &txn in txn_ids {
        graph.add_vertex(txn);
    }
    for edge in edges {
        graph.add_edge(TxnDepEdge {
            from: edge.from.txn,
            to: edge.to.txn,
            dep: edge.dep,
            key: edge.key.clone(),
            from_event: edge.from,
            to_event: edge.to,
        });
    }
    graph
}
