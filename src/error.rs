use thiserror::Error;

/// Error types returned while building a minimum spanning tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MstError {
    #[error("Invalid edge: {0}")]
    InvalidEdge(#[from] InvalidEdgeError),

    #[error("Disjoint set error: {0}")]
    DisjointSet(#[from] DisjointSetError),

    #[error("Incomplete spanning tree: {0}")]
    IncompleteSpanningTree(#[from] IncompleteSpanningTreeError),
}

/// Errors raised by [`DisjointSet`](crate::DisjointSet) lookups.
///
/// Nodes must be registered when the set is created; any other node is a caller bug.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisjointSetError {
    #[error("node {node} was never registered")]
    UnknownNode { node: String },
}

/// Input validation failures.
///
/// These are detected before any edge is processed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidEdgeError {
    #[error("edge {edge} references node {node} outside the node set")]
    UnknownEndpoint {
        /// Debug rendering of the offending edge.
        edge: String,
        /// The endpoint that is not part of the node set.
        node: String,
    },

    #[error("edge {edge} connects a node to itself")]
    SelfLoop { edge: String },
}

/// The input graph is disconnected, so the result is a spanning forest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("graph has {components} components: accepted {accepted} of {expected} edges")]
pub struct IncompleteSpanningTreeError {
    /// Number of trees in the resulting forest.
    pub components: usize,
    /// Edges accepted into the forest.
    pub accepted: usize,
    /// Edges a spanning tree over the same nodes would have.
    pub expected: usize,
}
