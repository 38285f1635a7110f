//! In-process dependency graphs.
//!
//! Two graphs are derived from every history: an event-level graph (one
//! node per read/write micro-operation, edges between events on the same
//! key) and its projection onto transactions. Both are built once and are
//! read-only afterwards; every isolation-level check queries the same
//! constructed graph.

use derive_more::Display;

pub mod digraph;
pub mod event;

pub use digraph::{TxnDepEdge, TxnDepGraph};
pub use event::{DepEdge, EventId, ReadEvent, WriteEvent};

/// The type of a dependency edge.
///
/// - `ww`: the source wrote a version the target overwrote;
/// - `wr`: the source wrote the version the target read;
/// - `rw`: the source read a version the target later overwrote
///   (anti-dependency).
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepType {
    #[display("ww")]
    Ww,
    #[display("wr")]
    Wr,
    #[display("rw")]
    Rw,
}
