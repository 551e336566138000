use crate::disjoint_set::DisjointSet;
use crate::error::{IncompleteSpanningTreeError, InvalidEdgeError, MstError};
use crate::{dedup_in_order, Edge, Node};
use std::iter::FusedIterator;
use std::rc::Rc;

/// What to do when the input graph is disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForestPolicy {
    /// Return the spanning forest; the result reports [`Outcome::SpanningForest`].
    #[default]
    Allow,
    /// Fail with [`MstError::IncompleteSpanningTree`].
    Reject,
}

/// Whether the accepted edges connect every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All nodes are reachable from each other.
    SpanningTree,
    /// The graph is disconnected: one tree per connected component.
    SpanningForest { components: usize },
}

/// Runs Kruskal's algorithm with a configurable treatment of disconnected input.
///
/// # Example
///
/// ```
/// use kruskal_mst::{Edge, ForestPolicy, MstBuilder, MstError};
///
/// let nodes = ["A", "B", "C", "D"];
/// let edges = [Edge::new("A", "B", 1), Edge::new("C", "D", 1)];
///
/// let forest = MstBuilder::default().build(&nodes, &edges).unwrap();
/// assert!(!forest.is_spanning_tree());
///
/// let strict = MstBuilder::new(ForestPolicy::Reject).build(&nodes, &edges);
/// assert!(matches!(strict, Err(MstError::IncompleteSpanningTree(_))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MstBuilder {
    forest_policy: ForestPolicy,
}

impl MstBuilder {
    pub fn new(forest_policy: ForestPolicy) -> MstBuilder {
        MstBuilder { forest_policy }
    }

    pub fn forest_policy(&self) -> ForestPolicy {
        self.forest_policy
    }

    /// Builds the minimum spanning tree (or forest) of `nodes` and `edges`.
    ///
    /// # Arguments
    ///
    /// * `nodes` - The node set. Every edge endpoint must belong to it.
    /// * `edges` - The weighted edges, in input order. Equal weights keep this order.
    ///
    /// # Returns
    ///
    /// The accepted edges in acceptance order, or the first validation error.
    pub fn build<N: Node>(
        &self,
        nodes: &[N],
        edges: &[Edge<N>],
    ) -> Result<MstResult<N>, MstError> {
        let result = Kruskal::new(nodes, edges)?.finish()?;
        self.apply_policy(result)
    }

    /// Same as [`build`](Self::build), handing every snapshot to `observer` as the
    /// corresponding edge is accepted.
    pub fn build_observed<N, O>(
        &self,
        nodes: &[N],
        edges: &[Edge<N>],
        observer: &mut O,
    ) -> Result<MstResult<N>, MstError>
    where
        N: Node,
        O: SnapshotObserver<N> + ?Sized,
    {
        let mut kruskal = Kruskal::new(nodes, edges)?;
        for snapshot in kruskal.by_ref() {
            observer.on_snapshot(&snapshot?);
        }
        let result = kruskal.finish()?;
        self.apply_policy(result)
    }

    fn apply_policy<N: Node>(&self, result: MstResult<N>) -> Result<MstResult<N>, MstError> {
        match self.forest_policy {
            ForestPolicy::Allow => Ok(result),
            ForestPolicy::Reject => Ok(result.into_spanning_tree()?),
        }
    }
}

/// Builds the minimum spanning tree (or forest) with the default configuration.
pub fn build_mst<N: Node>(nodes: &[N], edges: &[Edge<N>]) -> Result<MstResult<N>, MstError> {
    MstBuilder::default().build(nodes, edges)
}

/// Builds the minimum spanning tree, reporting each acceptance to `observer`.
pub fn build_mst_observed<N, O>(
    nodes: &[N],
    edges: &[Edge<N>],
    observer: &mut O,
) -> Result<MstResult<N>, MstError>
where
    N: Node,
    O: SnapshotObserver<N> + ?Sized,
{
    MstBuilder::default().build_observed(nodes, edges, observer)
}

/// Consumer of the incremental trace, e.g. a renderer drawing the partial tree.
pub trait SnapshotObserver<N: Node> {
    fn on_snapshot(&mut self, snapshot: &Snapshot<'_, N>);
}

impl<N: Node, F: FnMut(&Snapshot<'_, N>)> SnapshotObserver<N> for F {
    fn on_snapshot(&mut self, snapshot: &Snapshot<'_, N>) {
        self(snapshot)
    }
}

/// The state of a run right after an edge was accepted.
///
/// Holds the whole input for context plus the edges accepted so far. The accepted
/// list is shared with the run and copied only if the run has to grow it while this
/// snapshot is still alive, so it stays valid after the run moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<'g, N: Node> {
    all_nodes: &'g [N],
    all_edges: &'g [Edge<N>],
    accepted: Rc<Vec<Edge<N>>>,
}

impl<'g, N: Node> Snapshot<'g, N> {
    pub fn all_nodes(&self) -> &'g [N] {
        self.all_nodes
    }

    pub fn all_edges(&self) -> &'g [Edge<N>] {
        self.all_edges
    }

    pub fn accepted_edges(&self) -> &[Edge<N>] {
        &self.accepted
    }

    /// The edge whose acceptance produced this snapshot.
    pub fn latest(&self) -> Option<&Edge<N>> {
        self.accepted.last()
    }

    /// One-based position of this snapshot in the trace.
    pub fn step(&self) -> usize {
        self.accepted.len()
    }

    pub fn total_weight(&self) -> u128 {
        total_weight(&self.accepted)
    }
}

/// A single Kruskal run, advanced lazily.
///
/// Iterating yields one [`Snapshot`] per accepted edge, in acceptance order. The
/// sequence is finite and cannot be restarted. A consumer may stop at any point and
/// call [`finish`](Self::finish) to complete the run without further snapshots.
pub struct Kruskal<'g, N: Node> {
    nodes: &'g [N],
    edges: &'g [Edge<N>],
    order: std::vec::IntoIter<usize>,
    set: DisjointSet<N>,
    accepted: Rc<Vec<Edge<N>>>,
    completed: bool,
}

impl<'g, N: Node> Kruskal<'g, N> {
    /// Validates the input and prepares the weight-ordered edge queue.
    ///
    /// # Errors
    ///
    /// Returns [`MstError::InvalidEdge`] before any edge is processed if an edge
    /// references a node outside `nodes` or connects a node to itself.
    pub fn new(nodes: &'g [N], edges: &'g [Edge<N>]) -> Result<Kruskal<'g, N>, MstError> {
        let set = DisjointSet::new(nodes.iter().cloned());
        validate(&set, edges)?;
        if edges.is_empty() && set.len() > 1 {
            log::warn!("No connections submitted for {} nodes", set.len());
        }

        // Stable sort: equal weights keep their input order.
        let mut order: Vec<usize> = (0..edges.len()).collect();
        order.sort_by_key(|&index| edges[index].weight());

        Ok(Kruskal {
            nodes,
            edges,
            order: order.into_iter(),
            set,
            accepted: Rc::new(Vec::with_capacity(nodes.len().saturating_sub(1))),
            completed: false,
        })
    }

    /// Edges accepted so far, in acceptance order.
    pub fn accepted_edges(&self) -> &[Edge<N>] {
        &self.accepted
    }

    /// Processes every remaining edge and returns the final result.
    pub fn finish(mut self) -> Result<MstResult<N>, MstError> {
        while self.advance()? {}

        let nodes = dedup_in_order(self.nodes.iter().cloned());
        let components = self.set.component_count();
        if components > 1 {
            log::warn!(
                "Graph is disconnected: spanning forest with {components} components, {} edges",
                self.accepted.len()
            );
        }

        let accepted_edges =
            Rc::try_unwrap(self.accepted).unwrap_or_else(|shared| (*shared).clone());
        Ok(MstResult {
            nodes,
            accepted_edges,
            components,
        })
    }

    /// Moves to the next accepted edge. Returns `false` once the queue is empty.
    fn advance(&mut self) -> Result<bool, MstError> {
        for index in self.order.by_ref() {
            let edge = &self.edges[index];
            if self.set.union(edge.u(), edge.v())? {
                log::debug!("accepted edge {edge}");
                Rc::make_mut(&mut self.accepted).push(edge.clone());
                return Ok(true);
            }
            log::debug!("rejected edge {edge}: would close a cycle");
        }

        if !self.completed {
            self.completed = true;
            log::info!(
                "Kruskal finished: {} of {} edges accepted, total weight {}",
                self.accepted.len(),
                self.edges.len(),
                total_weight(&self.accepted)
            );
        }
        Ok(false)
    }
}

impl<'g, N: Node> Iterator for Kruskal<'g, N> {
    type Item = Result<Snapshot<'g, N>, MstError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => Some(Ok(Snapshot {
                all_nodes: self.nodes,
                all_edges: self.edges,
                accepted: Rc::clone(&self.accepted),
            })),
            Ok(false) => None,
            Err(e) => {
                self.order = Vec::new().into_iter();
                Some(Err(e))
            }
        }
    }
}

impl<N: Node> FusedIterator for Kruskal<'_, N> {}

/// The final tree, or forest if the input was disconnected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MstResult<N: Node> {
    nodes: Vec<N>,
    accepted_edges: Vec<Edge<N>>,
    components: usize,
}

impl<N: Node> MstResult<N> {
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Accepted edges in acceptance order.
    pub fn accepted_edges(&self) -> &[Edge<N>] {
        &self.accepted_edges
    }

    pub fn edge_count(&self) -> usize {
        self.accepted_edges.len()
    }

    /// Sum of the accepted weights, widened so that large bandwidths cannot overflow.
    pub fn total_weight(&self) -> u128 {
        total_weight(&self.accepted_edges)
    }

    /// Number of connected components covered by the result.
    pub fn components(&self) -> usize {
        self.components
    }

    /// `true` when every node is connected; an empty or single-node graph counts.
    pub fn is_spanning_tree(&self) -> bool {
        self.components <= 1
    }

    pub fn outcome(&self) -> Outcome {
        if self.is_spanning_tree() {
            Outcome::SpanningTree
        } else {
            Outcome::SpanningForest {
                components: self.components,
            }
        }
    }

    /// Keeps the result only if it spans all nodes.
    pub fn into_spanning_tree(self) -> Result<MstResult<N>, IncompleteSpanningTreeError> {
        if self.is_spanning_tree() {
            return Ok(self);
        }
        Err(IncompleteSpanningTreeError {
            components: self.components,
            accepted: self.accepted_edges.len(),
            expected: self.nodes.len().saturating_sub(1),
        })
    }

    pub fn into_edges(self) -> Vec<Edge<N>> {
        self.accepted_edges
    }
}

fn validate<N: Node>(set: &DisjointSet<N>, edges: &[Edge<N>]) -> Result<(), InvalidEdgeError> {
    for edge in edges {
        let (u, v) = edge.endpoints();
        if let Some(node) = [u, v].into_iter().find(|node| !set.contains(node)) {
            return Err(InvalidEdgeError::UnknownEndpoint {
                edge: edge.to_string(),
                node: format!("{node:?}"),
            });
        }
        if edge.is_self_loop() {
            return Err(InvalidEdgeError::SelfLoop {
                edge: edge.to_string(),
            });
        }
    }
    Ok(())
}

fn total_weight<N: Node>(edges: &[Edge<N>]) -> u128 {
    edges.iter().map(|edge| u128::from(edge.weight())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(list: &[(&'static str, &'static str, u64)]) -> Vec<Edge<&'static str>> {
        list.iter().map(|&(u, v, w)| Edge::new(u, v, w)).collect()
    }

    #[test]
    fn equal_weights_keep_input_order() {
        let nodes = ["a", "b", "c", "d"];
        let input = edges(&[("c", "d", 1), ("a", "b", 1), ("b", "c", 1)]);

        let mst = build_mst(&nodes, &input).unwrap();
        assert_eq!(mst.accepted_edges(), input.as_slice());
    }

    #[test]
    fn heavier_edges_come_later() {
        let nodes = ["a", "b", "c"];
        let input = edges(&[("a", "b", 9), ("b", "c", 0), ("a", "c", 4)]);

        let mst = build_mst(&nodes, &input).unwrap();
        assert_eq!(
            mst.accepted_edges(),
            edges(&[("b", "c", 0), ("a", "c", 4)]).as_slice()
        );
        assert_eq!(mst.total_weight(), 4);
    }

    #[test]
    fn parallel_edges_are_independent() {
        let nodes = ["a", "b"];
        let input = edges(&[("a", "b", 5), ("b", "a", 2), ("a", "b", 2)]);

        let mst = build_mst(&nodes, &input).unwrap();
        assert_eq!(mst.accepted_edges(), edges(&[("b", "a", 2)]).as_slice());
    }

    #[test]
    fn self_loop_is_invalid() {
        let nodes = ["a", "b"];
        let input = edges(&[("a", "b", 1), ("b", "b", 0)]);

        let err = build_mst(&nodes, &input).unwrap_err();
        assert!(matches!(
            err,
            MstError::InvalidEdge(InvalidEdgeError::SelfLoop { .. })
        ));
    }

    #[test]
    fn unknown_endpoint_names_the_node() {
        let nodes = ["a", "b"];
        let input = edges(&[("a", "b", 1), ("b", "x", 1)]);

        let err = Kruskal::new(&nodes, &input).err().unwrap();
        assert_eq!(
            err,
            MstError::InvalidEdge(InvalidEdgeError::UnknownEndpoint {
                edge: "(\"b\" - \"x\", 1)".to_string(),
                node: "\"x\"".to_string(),
            })
        );
    }

    #[test]
    fn finish_after_partial_iteration() {
        let nodes = ["a", "b", "c", "d"];
        let input = edges(&[("a", "b", 1), ("b", "c", 2), ("c", "d", 3)]);

        let mut kruskal = Kruskal::new(&nodes, &input).unwrap();
        let first = kruskal.next().unwrap().unwrap();
        assert_eq!(first.step(), 1);
        assert_eq!(first.latest(), Some(&input[0]));
        assert_eq!(kruskal.accepted_edges().len(), 1);

        let mst = kruskal.finish().unwrap();
        assert_eq!(mst.accepted_edges(), input.as_slice());
        // the earlier snapshot is unaffected
        assert_eq!(first.accepted_edges(), &input[..1]);
    }

    #[test]
    fn observer_sees_each_acceptance() {
        let nodes = ["a", "b", "c"];
        let input = edges(&[("a", "b", 2), ("b", "c", 1), ("a", "c", 3)]);

        let mut weights = Vec::new();
        let mut record = |snapshot: &Snapshot<'_, &str>| weights.push(snapshot.total_weight());
        let mst = build_mst_observed(&nodes, &input, &mut record).unwrap();

        assert_eq!(weights, vec![1, 3]);
        assert_eq!(mst.total_weight(), 3);
    }

    #[test]
    fn reject_policy_fails_on_forest() {
        let nodes = ["a", "b", "c"];
        let input = edges(&[("a", "b", 1)]);

        let builder = MstBuilder::new(ForestPolicy::Reject);
        assert_eq!(builder.forest_policy(), ForestPolicy::Reject);
        assert_eq!(
            builder.build(&nodes, &input),
            Err(MstError::IncompleteSpanningTree(IncompleteSpanningTreeError {
                components: 2,
                accepted: 1,
                expected: 2,
            }))
        );
    }

    #[test]
    fn reject_policy_accepts_connected_graph() {
        let nodes = ["a", "b"];
        let input = edges(&[("a", "b", 1)]);

        let mst = MstBuilder::new(ForestPolicy::Reject)
            .build(&nodes, &input)
            .unwrap();
        assert_eq!(mst.outcome(), Outcome::SpanningTree);
    }

    #[test]
    fn empty_graph_is_a_tree() {
        let mst = build_mst::<u32>(&[], &[]).unwrap();
        assert_eq!(mst.edge_count(), 0);
        assert_eq!(mst.components(), 0);
        assert!(mst.is_spanning_tree());
    }

    #[test]
    fn nodes_without_edges_are_separate_components() {
        let mst = build_mst(&[1, 2, 3], &[]).unwrap();
        assert_eq!(mst.outcome(), Outcome::SpanningForest { components: 3 });
        assert_eq!(mst.nodes(), &[1, 2, 3]);
    }

    mod capture {
        use std::sync::Mutex;
        use std::thread::{self, ThreadId};

        static RECORDS: Mutex<Vec<(ThreadId, log::Level, String)>> = Mutex::new(Vec::new());

        struct Capture;

        impl log::Log for Capture {
            fn enabled(&self, _: &log::Metadata) -> bool {
                true
            }

            fn log(&self, record: &log::Record) {
                let entry = (thread::current().id(), record.level(), record.args().to_string());
                RECORDS.lock().unwrap().push(entry);
            }

            fn flush(&self) {}
        }

        static LOGGER: Capture = Capture;

        pub fn install() {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        }

        /// Messages logged at `level` by the calling test thread.
        pub fn messages(level: log::Level) -> Vec<String> {
            let id = thread::current().id();
            RECORDS
                .lock()
                .unwrap()
                .iter()
                .filter(|(thread, lvl, _)| *thread == id && *lvl == level)
                .map(|(_, _, message)| message.clone())
                .collect()
        }
    }

    #[test]
    fn total_weight_does_not_overflow_u64() {
        capture::install();
        let nodes = [1, 2, 3];
        let input = vec![Edge::new(1, 2, u64::MAX), Edge::new(2, 3, u64::MAX)];

        let snapshots: Vec<_> = Kruskal::new(&nodes, &input)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let mst = build_mst(&nodes, &input).unwrap();

        let expected = 2 * u128::from(u64::MAX);
        assert_eq!(mst.total_weight(), expected);
        assert_eq!(snapshots[0].total_weight(), u128::from(u64::MAX));
        assert_eq!(snapshots[1].total_weight(), expected);
        assert!(capture::messages(log::Level::Info)
            .iter()
            .any(|message| message.contains(&expected.to_string())));
    }

    #[test]
    fn iterator_stays_exhausted() {
        fn assert_fused<I: FusedIterator>(_: &I) {}

        let nodes = ["a", "b"];
        let input = edges(&[("a", "b", 1)]);
        let mut kruskal = Kruskal::new(&nodes, &input).unwrap();
        assert_fused(&kruskal);

        assert!(kruskal.next().is_some());
        assert!(kruskal.next().is_none());
        assert!(kruskal.next().is_none());
    }

    #[test]
    fn edgeless_single_node_is_not_warned() {
        capture::install();
        build_mst(&["only"], &[]).unwrap();
        assert!(capture::messages(log::Level::Warn).is_empty());

        build_mst(&["a", "b"], &[]).unwrap();
        let warnings = capture::messages(log::Level::Warn);
        assert!(warnings
            .iter()
            .any(|message| message.starts_with("No connections submitted")));
    }

    #[test]
    fn dropped_snapshot_releases_shared_edges() {
        let nodes = ["a", "b", "c", "d"];
        let input = edges(&[("a", "b", 1), ("b", "c", 2), ("c", "d", 3)]);
        let mut kruskal = Kruskal::new(&nodes, &input).unwrap();

        let first = kruskal.next().unwrap().unwrap();
        let shared = Rc::as_ptr(&first.accepted);
        drop(first);

        let second = kruskal.next().unwrap().unwrap();
        assert_eq!(Rc::as_ptr(&second.accepted), shared);

        let third = kruskal.next().unwrap().unwrap();
        assert_ne!(Rc::as_ptr(&third.accepted), Rc::as_ptr(&second.accepted));
        assert_eq!(second.accepted_edges(), &input[..2]);
        assert_eq!(third.accepted_edges(), input.as_slice());
    }
}
