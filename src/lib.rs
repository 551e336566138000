//! Minimum spanning trees over weighted, undirected graphs using Kruskal's algorithm.
//!
//! The crate is split in two parts: a [`DisjointSet`] tracking connectivity between
//! nodes, and the [`builder`] module which sorts edges and accepts them one by one,
//! producing a lazy trace of [`Snapshot`]s and a final [`MstResult`].
//!
//! # Example
//!
//! ```
//! use kruskal_mst::{build_mst, Edge};
//!
//! let nodes = ["A", "B", "C", "D"];
//! let edges = [
//!     Edge::new("A", "B", 1),
//!     Edge::new("B", "C", 2),
//!     Edge::new("A", "C", 2),
//!     Edge::new("C", "D", 3),
//! ];
//!
//! let mst = build_mst(&nodes, &edges).unwrap();
//! assert_eq!(mst.total_weight(), 6);
//! assert!(mst.is_spanning_tree());
//! ```
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::hash::Hash;

pub mod builder;
pub mod disjoint_set;
mod error;

pub use builder::{
    build_mst, build_mst_observed, ForestPolicy, Kruskal, MstBuilder, MstResult, Outcome,
    Snapshot, SnapshotObserver,
};
pub use disjoint_set::DisjointSet;
pub use error::{
    DisjointSetError, IncompleteSpanningTreeError, InvalidEdgeError, MstError,
};

/// An opaque node identifier.
///
/// Anything that can be hashed, compared and cloned works as a node: string labels,
/// integers, or user-defined ids.
pub trait Node: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Node for T {}

/// An undirected, weighted connection between two nodes.
///
/// The weight is the link bandwidth of the connection. Edges are immutable once
/// constructed; parallel edges between the same pair are kept independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge<N: Node> {
    u: N,
    v: N,
    weight: u64,
}

impl<N: Node> Edge<N> {
    pub fn new(u: N, v: N, weight: u64) -> Self {
        Edge { u, v, weight }
    }

    pub fn u(&self) -> &N {
        &self.u
    }

    pub fn v(&self) -> &N {
        &self.v
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Both endpoints, in the order they were given.
    pub fn endpoints(&self) -> (&N, &N) {
        (&self.u, &self.v)
    }

    pub fn is_self_loop(&self) -> bool {
        self.u == self.v
    }
}

impl<N: Node> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?} - {:?}, {})", self.u, self.v, self.weight)
    }
}

impl<N: Node> From<(N, N, u64)> for Edge<N> {
    fn from((u, v, weight): (N, N, u64)) -> Self {
        Edge::new(u, v, weight)
    }
}

/// A node set together with an edge list.
///
/// The graph is only an input container: building a tree borrows it and never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<N: Node> {
    nodes: Vec<N>,
    edges: Vec<Edge<N>>,
}

impl<N: Node> Graph<N> {
    /// Creates a graph from an explicit node set.
    ///
    /// Repeated nodes are kept once, in order of first appearance. Edges are not
    /// checked here; endpoints outside `nodes` are reported when a tree is built.
    pub fn new(nodes: impl IntoIterator<Item = N>, edges: Vec<Edge<N>>) -> Self {
        Graph {
            nodes: dedup_in_order(nodes),
            edges,
        }
    }

    /// Creates a graph whose nodes are exactly the edge endpoints.
    ///
    /// Nodes are listed in the order they are first referenced by an edge.
    pub fn from_edges(edges: Vec<Edge<N>>) -> Self {
        let endpoints = edges
            .iter()
            .flat_map(|edge| [edge.u.clone(), edge.v.clone()])
            .collect::<Vec<_>>();
        Graph::new(endpoints, edges)
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    /// Lazy Kruskal trace over this graph.
    pub fn kruskal(&self) -> Result<Kruskal<'_, N>, MstError> {
        Kruskal::new(&self.nodes, &self.edges)
    }

    /// Builds the minimum spanning tree (or forest) of this graph.
    pub fn minimum_spanning_tree(&self) -> Result<MstResult<N>, MstError> {
        build_mst(&self.nodes, &self.edges)
    }
}

pub(crate) fn dedup_in_order<N: Node>(nodes: impl IntoIterator<Item = N>) -> Vec<N> {
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|node| seen.insert(node.clone()))
        .collect()
}
