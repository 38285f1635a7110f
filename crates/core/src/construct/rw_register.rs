//! Graph construction for read/write-register histories.
//!
//! Unlike list-append, a register read observes only the latest value, so
//! the per-key version order cannot be reconstructed from observations
//! alone. It is instead taken from a [`WriteLog`] -- the storage engine's
//! ground truth, replayed externally and consumed here as an ordered list
//! of versions per key. Walking consecutive version pairs yields the same
//! three edge types as the append variant:
//!
//! - `rw` from the readers of a version to the write of the next one;
//! - `ww` between writes of consecutive versions;
//! - `wr` from each write to its readers.
//!
//! The value `0` is the nil sentinel: reads observing the initial state.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use super::{
    collect_events, index_writes, project_onto_txns, Constructed, Error, EventGraph, G1Anomalies,
};
use crate::graph::event::{DepEdge, EventId};
use crate::graph::DepType;
use crate::history::types::{History, Value};
use crate::history::{filter_ok, preprocess};

/// Per-key ordered write versions, replayed from storage.
pub type WriteLog<K> = HashMap<K, Vec<i64>>;

/// Builds the event and transaction dependency graphs from a register
/// history and its write log.
///
/// # Errors
///
/// Returns an [`Error`] when the history or log violates an input
/// precondition: a value written twice to the same key, a key in the log
/// with no versions, or a malformed observed value.
pub fn build<K>(history: History<K>, write_log: &WriteLog<K>) -> Result<Constructed<K>, Error<K>>
where
    K: Clone + Debug + Eq + Hash + Ord,
{
    let history = preprocess(history);
    let ok_history = filter_ok(history);
    tracing::debug!(
        txns = ok_history.len(),
        keys = write_log.len(),
        "constructing register graph"
    );

    let (txn_ids, writes, reads) = collect_events(&ok_history)?;
    let writes_by_key = index_writes(&writes)?;

    // key -> observed value -> read ids; nil reads observe 0
    let mut reads_by_key: HashMap<K, HashMap<i64, Vec<EventId>>> = HashMap::new();
    for read in &reads {
        let observed = match &read.value {
            Value::Nil => 0,
            Value::Scalar(value) => *value,
            Value::Sequence(_) => {
                return Err(Error::MalformedValue {
                    id: read.id,
                    value: read.value.clone(),
                })
            }
        };
        reads_by_key
            .entry(read.key.clone())
            .or_default()
            .entry(observed)
            .or_default()
            .push(read.id);
    }

    let mut edges: Vec<DepEdge<K>> = Vec::new();
    let mut g1 = G1Anomalies::default();

    // reads on keys the log never saw written
    for (key, by_value) in &reads_by_key {
        if write_log.contains_key(key) {
            continue;
        }
        for (&observed, read_ids) in by_value {
            if observed != 0 {
                g1.g1a = true;
                tracing::warn!(
                    key = ?key,
                    value = observed,
                    reads = ?read_ids,
                    "G1a: key has no logged writes (aborted?) yet reads observed a value"
                );
                break;
            }
        }
    }

    let mut keys: Vec<&K> = write_log.keys().collect();
    keys.sort();
    for key in keys {
        let versions = &write_log[key];
        if versions.is_empty() {
            return Err(Error::BrokenWriteLog { key: key.clone() });
        }
        derive_key_edges(
            key,
            versions,
            reads_by_key.get(key),
            writes_by_key.get(key),
            &mut edges,
            &mut g1,
        );
    }

    let txns = project_onto_txns(&txn_ids, &edges);
    Ok(Constructed {
        events: EventGraph {
            writes,
            reads,
            edges,
        },
        txns,
        txn_ids,
        g1,
    })
}

fn readers_of<'a>(reads: Option<&'a HashMap<i64, Vec<EventId>>>, value: i64) -> &'a [EventId] {
    reads
        .and_then(|by_value| by_value.get(&value))
        .map_or(&[], Vec::as_slice)
}

fn write_of(
    writes: Option<&HashMap<i64, (EventId, bool)>>,
    value: i64,
) -> Option<(EventId, bool)> {
    writes.and_then(|by_value| by_value.get(&value)).copied()
}

/// Derives all event edges for one key by walking its version log.
fn derive_key_edges<K>(
    key: &K,
    versions: &[i64],
    reads: Option<&HashMap<i64, Vec<EventId>>>,
    writes: Option<&HashMap<i64, (EventId, bool)>>,
    edges: &mut Vec<DepEdge<K>>,
    g1: &mut G1Anomalies,
) where
    K: Clone + Debug + Eq + Hash,
{
    let mut seen_in_log: HashSet<i64> = HashSet::new();
    // the latest logged version that has a write event
    let mut prev: Option<(i64, EventId)> = None;

    for (position, &version) in versions.iter().enumerate() {
        seen_in_log.insert(version);
        let next_write = versions
            .get(position + 1)
            .and_then(|&next| write_of(writes, next))
            .map(|(id, _)| id);

        let Some((write_id, intermediate)) = write_of(writes, version) else {
            if !readers_of(reads, version).is_empty() {
                g1.g1a = true;
                tracing::warn!(
                    key = ?key,
                    value = version,
                    reads = ?readers_of(reads, version),
                    "G1a: logged version has no write event (aborted?) yet was read"
                );
            }
            continue;
        };

        // rw: readers of the previous state missed this write; the first
        // version supersedes the nil state, later ones the last version
        // that actually has a write event
        let previous_readers = if position == 0 {
            Some(readers_of(reads, 0))
        } else {
            prev.map(|(prev_version, _)| readers_of(reads, prev_version))
        };
        for &rid in previous_readers.into_iter().flatten() {
            if !rid.happens_before(write_id) {
                edges.push(DepEdge::new(rid, write_id, key.clone(), DepType::Rw));
            }
        }

        // ww: the previous logged write precedes this one
        if let Some((_, prev_write)) = prev {
            if !prev_write.happens_before(write_id) {
                edges.push(DepEdge::new(prev_write, write_id, key.clone(), DepType::Ww));
            }
        }

        // wr: this write precedes its readers
        for &rid in readers_of(reads, version) {
            let mut g1b_raised = false;
            if let Some(next_write) = next_write {
                // an intermediate write may only be read between itself
                // and the next write of its own transaction
                let allowed = write_id.happens_before(rid) && rid.happens_before(next_write);
                if intermediate && !allowed {
                    g1.g1b = true;
                    g1b_raised = true;
                    tracing::warn!(
                        key = ?key,
                        value = version,
                        write = ?write_id,
                        read = ?rid,
                        "G1b: intermediate write observed"
                    );
                }
            }
            if !g1b_raised && !write_id.happens_before(rid) {
                edges.push(DepEdge::new(write_id, rid, key.clone(), DepType::Wr));
            }
        }

        prev = Some((version, write_id));
    }

    // reads of values the log never recorded
    if let Some(by_value) = reads {
        for (&observed, read_ids) in by_value {
            if observed != 0 && !seen_in_log.contains(&observed) {
                g1.g1a = true;
                tracing::warn!(
                    key = ?key,
                    value = observed,
                    reads = ?read_ids,
                    "G1a: observed value missing from the write log (aborted?)"
                );
            }
        }
    }

    // writes the log never recorded: the history said ok, storage disagrees
    if let Some(by_value) = writes {
        for (&value, &(id, _)) in by_value {
            if !seen_in_log.contains(&value) {
                tracing::warn!(
                    key = ?key,
                    value,
                    write = ?id,
                    "write recorded ok but absent from the write log"
                );
            }
        }
    }
}
