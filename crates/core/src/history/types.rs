use alloc::vec::Vec;
use core::fmt::{Debug, Formatter, Result};

/// A value observed by a read or produced by a write, resolved once at
/// ingestion into a closed variant.
///
/// List-append histories read back `Sequence`s (the full ordered list of
/// values appended so far); register histories read back `Scalar`s. `Nil`
/// is the unread/initial state in either variant.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    Nil,
    Scalar(i64),
    Sequence(Vec<i64>),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Sequence(vs) => write!(f, "{vs:?}"),
        }
    }
}

/// A micro-operation: one read or write step within a transaction.
///
/// `Append` is the list-append flavor of a write; `Write` is the register
/// flavor. Both carry the single value being written -- each value is
/// written at most once per key (an input precondition of the checker).
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Clone, PartialEq, Eq)]
pub enum Mop<K> {
    Read { key: K, value: Value },
    Append { key: K, value: i64 },
    Write { key: K, value: i64 },
}

impl<K> Mop<K> {
    pub const fn read(key: K, value: Value) -> Self {
        Self::Read { key, value }
    }

    pub const fn append(key: K, value: i64) -> Self {
        Self::Append { key, value }
    }

    pub const fn write(key: K, value: i64) -> Self {
        Self::Write { key, value }
    }

    /// Returns `true` for `Append` and `Write` micro-operations.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Append { .. } | Self::Write { .. })
    }
}

impl<K: Debug> Debug for Mop<K> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Read { key, value } => write!(f, "{key:?}=>{value:?}"),
            Self::Append { key, value } => write!(f, "{key:?}<+{value:?}"),
            Self::Write { key, value } => write!(f, "{key:?}<={value:?}"),
        }
    }
}

/// Completion status of an operation, as recorded by the history collector.
///
/// Only `Ok` operations participate in graph construction; `Fail` and
/// `Info` operations are dropped by the ok-filter (but may still explain a
/// G1a finding: a read observing a value whose writer never committed).
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Ok,
    Fail,
    Info,
}

/// The session that issued an operation.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    Client(u64),
    /// Fault-injection process; its operations never enter the graph.
    Nemesis,
}

/// One transaction as recorded in the history: an ordered list of
/// micro-operations plus its completion status.
///
/// `index` is the transaction's unique ordinal (completion order). It is
/// attached during preprocessing when the history carries none; graph
/// construction requires it.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Clone, PartialEq, Eq)]
pub struct Op<K> {
    pub index: Option<usize>,
    pub process: Process,
    pub kind: OpKind,
    pub mops: Vec<Mop<K>>,
}

impl<K> Op<K> {
    #[must_use]
    pub const fn ok(process: u64, mops: Vec<Mop<K>>) -> Self {
        Self {
            index: None,
            process: Process::Client(process),
            kind: OpKind::Ok,
            mops,
        }
    }

    #[must_use]
    pub const fn fail(process: u64, mops: Vec<Mop<K>>) -> Self {
        Self {
            index: None,
            process: Process::Client(process),
            kind: OpKind::Fail,
            mops,
        }
    }

    #[must_use]
    pub const fn info(process: u64, mops: Vec<Mop<K>>) -> Self {
        Self {
            index: None,
            process: Process::Client(process),
            kind: OpKind::Info,
            mops,
        }
    }

    #[must_use]
    pub const fn nemesis(mops: Vec<Mop<K>>) -> Self {
        Self {
            index: None,
            process: Process::Nemesis,
            kind: OpKind::Info,
            mops,
        }
    }
}

impl<K: Debug> Debug for Op<K> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        if let Some(index) = self.index {
            write!(f, "T{index}")?;
        }
        write!(f, "{:?}", self.mops)?;
        match self.kind {
            OpKind::Ok => Ok(()),
            OpKind::Fail => write!(f, "!"),
            OpKind::Info => write!(f, "?"),
        }
    }
}

/// An ordered collection of transactions, in completion order.
pub type History<K> = Vec<Op<K>>;
