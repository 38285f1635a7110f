//! The history model and its preprocessing steps.
//!
//! A history arrives as an ordered sequence of [`Op`]s (transactions), each
//! holding its micro-operations. Before graph construction it goes through
//! three steps, in order:
//!
//! 1. [`filter_out_nemesis`] -- drop fault-injection operations;
//! 2. [`attach_index_if_absent`] -- assign completion-order ordinals when
//!    the history carries none;
//! 3. [`filter_ok`] -- keep only operations that completed ok.
//!
//! [`preprocess`] bundles the first two; the ok-filter runs inside graph
//! construction so that callers keep access to the unfiltered history.

use alloc::vec::Vec;

use self::types::{Op, OpKind, Process};

pub mod types;

/// Drops operations issued by the fault-injection process.
#[must_use]
pub fn filter_out_nemesis<K>(history: Vec<Op<K>>) -> Vec<Op<K>> {
    history
        .into_iter()
        .filter(|op| op.process != Process::Nemesis)
        .collect()
}

/// Assigns completion-order indices when no operation carries one.
///
/// A history that already has any index attached is left untouched; mixing
/// pre-assigned and missing indices is the collector's bug to fix, not
/// ours to guess at.
pub fn attach_index_if_absent<K>(history: &mut [Op<K>]) {
    if history.iter().any(|op| op.index.is_some()) {
        return;
    }
    for (index, op) in history.iter_mut().enumerate() {
        op.index = Some(index);
    }
}

/// Keeps only operations that completed ok.
#[must_use]
pub fn filter_ok<K>(history: Vec<Op<K>>) -> Vec<Op<K>> {
    history
        .into_iter()
        .filter(|op| op.kind == OpKind::Ok)
        .collect()
}

/// Nemesis filter plus index attachment, in that order.
#[must_use]
pub fn preprocess<K>(history: Vec<Op<K>>) -> Vec<Op<K>> {
    let mut history = filter_out_nemesis(history);
    attach_index_if_absent(&mut history);
    history
}
