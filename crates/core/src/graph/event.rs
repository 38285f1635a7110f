use core::fmt::{Debug, Formatter, Result};

use super::DepType;
use crate::history::types::Value;

/// Identifies an event by its owning transaction ordinal and its position
/// within that transaction.
///
/// Position order within one transaction is the only intra-transaction
/// ordering the checker assumes.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId {
    pub txn: usize,
    pub pos: usize,
}

impl EventId {
    #[must_use]
    pub const fn new(txn: usize, pos: usize) -> Self {
        Self { txn, pos }
    }

    /// Same-transaction happens-before: `self` precedes `other` within one
    /// transaction. Events of different transactions are never ordered.
    #[must_use]
    pub const fn happens_before(self, other: Self) -> bool {
        self.txn == other.txn && self.pos < other.pos
    }
}

impl Debug for EventId {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{},{}", self.txn, self.pos)
    }
}

/// A write (append) event node.
///
/// `last_write` marks the final write to `key` within the owning
/// transaction; a read observing a non-final write is the G1b anomaly.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteEvent<K> {
    pub id: EventId,
    pub key: K,
    pub value: i64,
    pub last_write: bool,
}

/// A read event node, carrying the full observed value.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEvent<K> {
    pub id: EventId,
    pub key: K,
    pub value: Value,
}

/// An event-level dependency edge, tagged with the key it was derived
/// from. Event edges never cross keys.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepEdge<K> {
    pub from: EventId,
    pub to: EventId,
    pub key: K,
    pub dep: DepType,
}

impl<K> DepEdge<K> {
    #[must_use]
    pub const fn new(from: EventId, to: EventId, key: K, dep: DepType) -> Self {
        Self { from, to, key, dep }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happens_before() {
        assert!(EventId::new(1, 0).happens_before(EventId::new(1, 2)));
        assert!(!EventId::new(1, 2).happens_before(EventId::new(1, 0)));
        assert!(!EventId::new(1, 0).happens_before(EventId::new(2, 1)));
        assert!(!EventId::new(1, 1).happens_before(EventId::new(1, 1)));
    }

    #[test]
    fn test_event_id_debug() {
        assert_eq!(format!("{:?}", EventId::new(3, 1)), "3,1");
    }
}
