use crate::error::DisjointSetError;
use crate::Node;
use std::collections::HashMap;

/// A vertex in the union-find forest.
#[derive(Debug, Clone)]
struct Vertex<N> {
    /// The parent vertex in the union-find structure. Roots point at themselves.
    parent: N,
}

impl<N: Node> Vertex<N> {
    /// Creates a new vertex with itself as its own parent.
    fn new(key: N) -> Vertex<N> {
        Vertex { parent: key }
    }
}

/// A partition of nodes into disjoint connectivity classes.
///
/// Every registered node maps to a parent node; following parents always ends at a
/// root, the representative of the class. [`find`](Self::find) compresses the
/// path it walks, [`union`](Self::union) attaches one root under another.
///
/// # Example
///
/// ```
/// use kruskal_mst::DisjointSet;
///
/// let mut set = DisjointSet::new(["a", "b", "c"]);
/// assert!(set.union(&"a", &"b").unwrap());
/// assert!(!set.union(&"b", &"a").unwrap());
/// assert!(set.connected(&"a", &"b").unwrap());
/// assert_eq!(set.component_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DisjointSet<N: Node> {
    vertices: HashMap<N, Vertex<N>>,
    components: usize,
}

impl<N: Node> Default for DisjointSet<N> {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<N: Node> DisjointSet<N> {
    /// Creates one singleton class per node.
    ///
    /// # Arguments
    ///
    /// * `nodes` - The nodes to register. Repeated nodes are registered once.
    ///
    /// # Returns
    ///
    /// A `DisjointSet` in which every node is its own representative.
    pub fn new(nodes: impl IntoIterator<Item = N>) -> DisjointSet<N> {
        let mut vertices = HashMap::new();
        for node in nodes {
            vertices
                .entry(node.clone())
                .or_insert_with(|| Vertex::new(node));
        }
        let components = vertices.len();
        DisjointSet {
            vertices,
            components,
        }
    }

    /// Finds the representative of the class containing `node`.
    ///
    /// Every vertex visited on the way is re-pointed directly at the root, which
    /// leaves all answers unchanged and shortens later lookups.
    ///
    /// # Errors
    ///
    /// Returns [`DisjointSetError::UnknownNode`] if `node` was never registered.
    pub fn find(&mut self, node: &N) -> Result<N, DisjointSetError> {
        let mut root = self.parent_of(node)?.clone();
        loop {
            let parent = &self.vertices[&root].parent;
            if *parent == root {
                break;
            }
            root = parent.clone();
        }

        let mut current = node.clone();
        while current != root {
            let vertex = self
                .vertices
                .get_mut(&current)
                .ok_or_else(|| unknown(&current))?;
            let next = std::mem::replace(&mut vertex.parent, root.clone());
            current = next;
        }

        Ok(root)
    }

    /// Merges the classes containing `a` and `b`.
    ///
    /// # Returns
    ///
    /// `true` if the classes were different and got merged, `false` if `a` and `b`
    /// were already connected. The root of `b` is attached under the root of `a`.
    ///
    /// # Errors
    ///
    /// Returns [`DisjointSetError::UnknownNode`] if either node was never registered.
    pub fn union(&mut self, a: &N, b: &N) -> Result<bool, DisjointSetError> {
        let root_a = self.find(a)?;
        let root_b = self.find(b)?;
        if root_a == root_b {
            return Ok(false);
        }
        if let Some(vertex) = self.vertices.get_mut(&root_b) {
            vertex.parent = root_a;
        }
        self.components -= 1;
        Ok(true)
    }

    /// Whether `a` and `b` belong to the same class.
    pub fn connected(&mut self, a: &N, b: &N) -> Result<bool, DisjointSetError> {
        Ok(self.find(a)? == self.find(b)?)
    }

    pub fn contains(&self, node: &N) -> bool {
        self.vertices.contains_key(node)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of disjoint classes currently in the partition.
    pub fn component_count(&self) -> usize {
        self.components
    }

    fn parent_of(&self, node: &N) -> Result<&N, DisjointSetError> {
        self.vertices
            .get(node)
            .map(|vertex| &vertex.parent)
            .ok_or_else(|| unknown(node))
    }
}

fn unknown<N: Node>(node: &N) -> DisjointSetError {
    DisjointSetError::UnknownNode {
        node: format!("{node:?}"),
    }
}
