//! Graph construction for list-append histories.
//!
//! Each key is an append-only list; a read observes the full ordered
//! sequence of values appended so far. The per-key append chain is
//! reconstructed from those observations: reads of the same key are
//! grouped by observed sequence into *traces*, sorted longest first, and
//! every shorter trace must be an exact prefix of the longer one --
//! appended values never disappear. Walking the traces longest to
//! shortest yields all three edge types:
//!
//! - `rw` from each read to the writer of every value it did not observe;
//! - `ww` between writers of consecutive values in the chain;
//! - `wr` from the writer of a trace's last value to the trace's reads.
//!
//! Same-transaction ordering suppresses edges throughout: an event never
//! depends on one that already happens-before it in its own transaction.

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

/// Builds the event and transaction dependency graphs from a list-append
/// history.
///
/// The history is preprocessed first (nemesis ops dropped, indices
/// attached, non-ok ops filtered). G1a/G1b come back as findings inside
/// the result.
///
/// # Errors
///
/// Returns an [`Error`] when the history violates an input precondition:
/// a value appended twice to the same key, a read that is not a prefix of
/// a longer read of the same key, or a malformed observed value.
pub fn build<K>(history: History<K>) -> Result<Constructed<K>, Error<K>>
where
    K: Clone + Debug + Eq + Hash + Ord,
{
    let history = preprocess(history);
    let ok_history = filter_ok(history);
    tracing::debug!(txns = ok_history.len(), "constructing list-append graph");

    let (txn_ids, writes, reads) = collect_events(&ok_history)?;
    let appends_by_key = index_writes(&writes)?;

    // group reads into traces: key -> observed sequence -> read ids
    let mut traces_by_key: HashMap<K, HashMap<Vec<i64>, Vec<EventId>>> = HashMap::new();
    for read in &reads {
        let observed = match &read.value {
            Value::Nil => Vec::new(),
            Value::Sequence(values) => values.clone(),
            Value::Scalar(_) => {
                return Err(Error::MalformedValue {
                    id: read.id,
                    value: read.value.clone(),
                })
            }
        };
        traces_by_key
            .entry(read.key.clone())
            .or_default()
            .entry(observed)
            .or_default()
            .push(read.id);
    }

    let mut edges: Vec<DepEdge<K>> = Vec::new();
    let mut g1 = G1Anomalies::default();

    let mut keys: Vec<&K> = traces_by_key.keys().collect();
    keys.sort();
    for key in keys {
        let grouped = &traces_by_key[key];
        let mut traces: Vec<(&Vec<i64>, &Vec<EventId>)> = grouped.iter().collect();
        traces.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
        derive_key_edges(key, &traces, appends_by_key.get(key), &mut edges, &mut g1)?;
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

/// Derives all event edges for one key from its traces.
#[allow(clippy::too_many_lines)]
fn derive_key_edges<K>(
    key: &K,
    traces: &[(&Vec<i64>, &Vec<EventId>)],
    appends: Option<&HashMap<i64, (EventId, bool)>>,
    edges: &mut Vec<DepEdge<K>>,
    g1: &mut G1Anomalies,
) -> Result<(), Error<K>>
where
    K: Clone + Debug + Eq + Hash + Ord,
{
    let Some(appends) = appends else {
        // no appends at all: every read must have observed the empty list
        for (observed, read_ids) in traces {
            if !observed.is_empty() {
                g1.g1a = true;
                tracing::warn!(
                    key = ?key,
                    observed = ?observed,
                    reads = ?read_ids,
                    "G1a: key has no appends (aborted?) yet reads observed values"
                );
            }
        }
        return Ok(());
    };

    let append_of = |value: i64| appends.get(&value).map(|&(id, _)| id);
    let is_intermediate = |value: i64| appends.get(&value).is_some_and(|&(_, itmd)| itmd);

    // appends ordered by value for deterministic edge derivation
    let mut append_list: Vec<(i64, EventId)> =
        appends.iter().map(|(&value, &(id, _))| (value, id)).collect();
    append_list.sort_unstable();

    let (mut longer_val, longer_read_ids) = traces[0];

    if longer_val.is_empty() {
        // nothing was observed; every append is a later write
        for &(_, later_aid) in &append_list {
            for &rid in longer_read_ids {
                if !rid.happens_before(later_aid) {
                    edges.push(DepEdge::new(rid, later_aid, key.clone(), DepType::Rw));
                }
            }
        }
        return Ok(());
    }

    let longer_appended = longer_val[longer_val.len() - 1];
    let mut longer_aid = append_of(longer_appended);
    if longer_aid.is_none() {
        g1.g1a = true;
        tracing::warn!(
            key = ?key,
            value = longer_appended,
            observed = ?longer_val,
            "G1a: observed value was never appended (aborted?)"
        );
    }

    let value_set: HashSet<i64> = longer_val.iter().copied().collect();
    // reads ordered before some unobserved append of their own transaction
    let mut ordered_before_later: HashSet<EventId> = HashSet::new();

    for &(later_appended, later_aid) in &append_list {
        if value_set.contains(&later_appended) {
            continue;
        }
        for &rid in longer_read_ids {
            if rid.happens_before(later_aid) {
                ordered_before_later.insert(rid);
            } else {
                edges.push(DepEdge::new(rid, later_aid, key.clone(), DepType::Rw));
            }
        }
        if let Some(aid) = longer_aid {
            if !aid.happens_before(later_aid) {
                edges.push(DepEdge::new(aid, later_aid, key.clone(), DepType::Ww));
            }
        }
    }

    if let Some(aid) = longer_aid {
        for &rid in longer_read_ids {
            // an intermediate append may only be read between itself and
            // the next append of its own transaction
            let allowed = aid.happens_before(rid) && ordered_before_later.contains(&rid);
            if is_intermediate(longer_appended) && !allowed {
                g1.g1b = true;
                tracing::warn!(
                    key = ?key,
                    value = longer_appended,
                    write = ?aid,
                    read = ?rid,
                    "G1b: intermediate append observed"
                );
            } else if !aid.happens_before(rid) {
                edges.push(DepEdge::new(aid, rid, key.clone(), DepType::Wr));
            }
        }
    }

    for &(observed, read_ids) in traces.iter().skip(1) {
        if !is_prefix(observed, longer_val) {
            return Err(Error::NonPrefixRead {
                key: key.clone(),
                shorter: observed.clone(),
                longer: longer_val.clone(),
            });
        }

        // rw: these reads missed the next value in the chain
        let next_appended = longer_val[observed.len()];
        match append_of(next_appended) {
            None => {
                g1.g1a = true;
                tracing::warn!(
                    key = ?key,
                    value = next_appended,
                    observed = ?longer_val,
                    "G1a: observed value was never appended (aborted?)"
                );
            }
            Some(next_aid) => {
                for &rid in read_ids {
                    if !rid.happens_before(next_aid) {
                        edges.push(DepEdge::new(rid, next_aid, key.clone(), DepType::Rw));
                    }
                }
            }
        }

        if observed.is_empty() {
            break;
        }

        // ww: chain the values this trace did not see, back to front
        let mut next_aid = longer_aid;
        for position in (observed.len() - 1..longer_val.len() - 1).rev() {
            let appended = longer_val[position];
            let aid = append_of(appended);
            match aid {
                None => {
                    g1.g1a = true;
                    tracing::warn!(
                        key = ?key,
                        value = appended,
                        observed = ?longer_val,
                        "G1a: observed value was never appended (aborted?)"
                    );
                }
                Some(aid) => {
                    if let Some(next_aid) = next_aid {
                        if !aid.happens_before(next_aid) {
                            edges.push(DepEdge::new(aid, next_aid, key.clone(), DepType::Ww));
                        }
                    }
                }
            }
            next_aid = aid;
        }

        // wr: the writer of this trace's last value precedes its reads
        let appended = observed[observed.len() - 1];
        let aid = append_of(appended);
        if let (Some(aid), Some(window_end)) = (aid, append_of(longer_val[observed.len()])) {
            for &rid in read_ids {
                let allowed = aid.happens_before(rid) && rid.happens_before(window_end);
                if is_intermediate(appended) && !allowed {
                    g1.g1b = true;
                    tracing::warn!(
                        key = ?key,
                        value = appended,
                        write = ?aid,
                        read = ?rid,
                        "G1b: intermediate append observed"
                    );
                } else if !aid.happens_before(rid) {
                    edges.push(DepEdge::new(aid, rid, key.clone(), DepType::Wr));
                }
            }
        }

        longer_val = observed;
        longer_aid = aid;
    }

    // ww edges for whatever the shortest trace left uncovered
    if longer_val.len() >= 2 {
        let mut next_aid = longer_aid;
        for position in (0..longer_val.len() - 1).rev() {
            let appended = longer_val[position];
            let aid = append_of(appended);
            match aid {
                None => {
                    g1.g1a = true;
                    tracing::warn!(
                        key = ?key,
                        value = appended,
                        observed = ?longer_val,
                        "G1a: observed value was never appended (aborted?)"
                    );
                }
                Some(aid) => {
                    if let Some(next_aid) = next_aid {
                        if !aid.happens_before(next_aid) {
                            edges.push(DepEdge::new(aid, next_aid, key.clone(), DepType::Ww));
                        }
                    }
                }
            }
            next_aid = aid;
        }
    }

    Ok(())
}

/// `true` if `shorter` is a strict prefix of `longer`.
fn is_prefix(shorter: &[i64], longer: &[i64]) -> bool {
    shorter.len() < longer.len() && longer[..shorter.len()] == *shorter
}
