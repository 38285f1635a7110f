use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use super::event::EventId;
use super::DepType;

/// A transaction-level dependency edge: the projection of one event edge
/// onto the owning transactions.
///
/// `from_event`/`to_event` retain one representative event-edge witness;
/// when several event edges project onto the same `(from, to, dep)`
/// triple, only the first is kept.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxnDepEdge<K> {
    pub from: usize,
    pub to: usize,
    pub dep: DepType,
    pub key: K,
    pub from_event: EventId,
    pub to_event: EventId,
}

/// Directed multigraph over transactions, backed by adjacency lists.
///
/// Vertices are transaction ordinals; edges carry their dependency type and
/// witness events. At most one edge exists per `(from, to, dep)` triple.
/// Self-loops are rejected: same-transaction event ordering is not a
/// cross-transaction dependency.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TxnDepGraph<K> {
    vertices: Vec<usize>,
    edges: Vec<TxnDepEdge<K>>,
    /// vertex -> indices into `edges` of its outgoing edges
    out: HashMap<usize, Vec<usize>>,
    seen: HashSet<(usize, usize, DepType)>,
}

impl<K> Default for TxnDepGraph<K> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            out: HashMap::new(),
            seen: HashSet::new(),
        }
    }
}

impl<K> TxnDepGraph<K>
where
    K: Clone + Debug + Eq + Hash,
{
    /// Adds a vertex with no edges (if not already present).
    pub fn add_vertex(&mut self, txn: usize) {
        if !self.out.contains_key(&txn) {
            self.out.insert(txn, Vec::new());
            self.vertices.push(txn);
        }
    }

    /// Inserts an edge, deduplicating by `(from, to, dep)`.
    ///
    /// Returns `false` if the edge was a self-loop or a duplicate; the
    /// first witness wins.
    pub fn add_edge(&mut self, edge: TxnDepEdge<K>) -> bool {
        if edge.from == edge.to {
            return false;
        }
        if !self.seen.insert((edge.from, edge.to, edge.dep)) {
            return false;
        }
        self.add_vertex(edge.from);
        self.add_vertex(edge.to);
        let index = self.edges.len();
        if let Some(slots) = self.out.get_mut(&edge.from) {
            slots.push(index);
        }
        self.edges.push(edge);
        true
    }

    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    #[must_use]
    pub fn edges(&self) -> &[TxnDepEdge<K>] {
        &self.edges
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Indices of the edges leaving `txn` (empty for unknown vertices).
    #[must_use]
    pub fn out_edges(&self, txn: usize) -> &[usize] {
        self.out.get(&txn).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn edge(&self, index: usize) -> &TxnDepEdge<K> {
        &self.edges[index]
    }

    /// Returns `true` if an edge with the given triple exists.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize, dep: DepType) -> bool {
        self.seen.contains(&(from, to, dep))
    }

    /// The subgraph containing every vertex but only `ww` edges.
    ///
    /// A cycle in this subgraph is exactly a cycle of only-`ww` edges in
    /// the full graph, which lets the PL-1 check reuse the any-cycle
    /// search unmodified.
    #[must_use]
    pub fn ww_subgraph(&self) -> Self {
        let mut sub = Self::default();
        for &txn in &self.vertices {
            sub.add_vertex(txn);
        }
        for edge in &self.edges {
            if edge.dep == DepType::Ww {
                sub.add_edge(edge.clone());
            }
        }
        sub
    }

    /// Every simple path from `from` to `to`, as edge indices, ordered by
    /// ascending length.
    ///
    /// Parallel edges count as distinct paths (their dependency types
    /// differ, which matters to the anti-pattern predicates). `to` is
    /// terminal: paths passing through it and returning are not simple and
    /// are not produced. Exponential in the worst case; callers bound the
    /// graphs they hand in.
    #[must_use]
    pub fn simple_paths(&self, from: usize, to: usize) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut path = Vec::new();
        let mut visited: HashSet<usize> = HashSet::new();
        visited.insert(from);
        self.simple_paths_from(from, to, &mut visited, &mut path, &mut paths);
        paths.sort_by_key(Vec::len);
        paths
    }

    fn simple_paths_from(
        &self,
        current: usize,
        to: usize,
        visited: &mut HashSet<usize>,
        path: &mut Vec<usize>,
        paths: &mut Vec<Vec<usize>>,
    ) {
        for &edge_index in self.out_edges(current) {
            let next = self.edges[edge_index].to;
            if next == to {
                path.push(edge_index);
                paths.push(path.clone());
                path.pop();
            } else if visited.insert(next) {
                path.push(edge_index);
                self.simple_paths_from(next, to, visited, path, paths);
                path.pop();
                visited.remove(&next);
            }
        }
    }
}
