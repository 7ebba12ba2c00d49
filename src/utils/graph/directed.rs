//! Core directed multigraph implementation.
//!
//! [`DirectedGraph`] stores typed node and edge data with incidence lists for
//! O(1) insertion and O(degree) adjacency queries in both directions. Multiple
//! edges between the same pair of nodes are allowed, which the CFG layer uses
//! for things like two `case` labels branching to the same block.
//!
//! Nodes are never removed. Edges are removed only through the bulk
//! [`remove_edges_from`](DirectedGraph::remove_edges_from) /
//! [`remove_edges_to`](DirectedGraph::remove_edges_to) primitives, which
//! tombstone the edge slot so all previously handed-out identifiers stay
//! stable.

use crate::{
    utils::graph::{
        edge::EdgeId,
        node::NodeId,
        traits::{GraphBase, Predecessors, Successors},
    },
    Error, Result,
};

/// Internal storage for edge data and endpoints.
#[derive(Debug, Clone)]
struct EdgeData<E> {
    /// Source node of the edge
    source: NodeId,
    /// Target node of the edge
    target: NodeId,
    /// User-provided edge data
    data: E,
}

/// A directed multigraph with typed node and edge data.
///
/// # Memory Layout
///
/// - Nodes live in a contiguous vector indexed by [`NodeId`]
/// - Edge slots live in a contiguous vector indexed by [`EdgeId`]; removed
///   edges leave a tombstone so identifiers are never reused
/// - Per-node incidence lists (outgoing/incoming) hold [`EdgeId`]s and only
///   ever reference live edges
///
/// # Thread Safety
///
/// `DirectedGraph<N, E>` is [`Send`] and [`Sync`] when `N` and `E` are. Build
/// the graph from one thread, then share it immutably.
///
/// # Examples
///
/// ```rust,ignore
/// use fuzzycfg::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str, i32> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// graph.add_edge(a, b, 10)?;
/// assert_eq!(graph.successors(a).collect::<Vec<_>>(), vec![b]);
/// # Ok::<(), fuzzycfg::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    /// Node data storage
    nodes: Vec<N>,
    /// Edge slots; `None` marks a removed edge
    edges: Vec<Option<EdgeData<E>>>,
    /// Outgoing edges per node (adjacency list for successors)
    outgoing: Vec<Vec<EdgeId>>,
    /// Incoming edges per node (adjacency list for predecessors)
    incoming: Vec<Vec<EdgeId>>,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates a new empty directed graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new directed graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `node_capacity` - Expected number of nodes
    /// * `edge_capacity` - Expected number of edges
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a new node with the given data and returns its identifier.
    ///
    /// Identifiers are assigned sequentially starting from 0.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns a reference to the data of the given node, or `None` for an
    /// unknown identifier.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns a mutable reference to the data of the given node.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(node.index())
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over all node identifiers, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Returns an iterator over `(NodeId, &N)` pairs, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, data)| (NodeId::new(i), data))
    }

    /// Adds a directed edge from `source` to `target` with the given data.
    ///
    /// Multiple edges between the same pair of nodes are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        if source.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "source node {} does not exist in graph with {} nodes",
                source,
                self.nodes.len()
            )));
        }
        if target.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "target node {} does not exist in graph with {} nodes",
                target,
                self.nodes.len()
            )));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(Some(EdgeData {
            source,
            target,
            data,
        }));

        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);

        Ok(id)
    }

    /// Removes every edge originating at the given node.
    ///
    /// A non-existent node is a no-op. Edge identifiers of removed edges stay
    /// allocated but resolve to `None` afterwards.
    pub fn remove_edges_from(&mut self, node: NodeId) {
        if node.index() >= self.nodes.len() {
            return;
        }
        let ids = std::mem::take(&mut self.outgoing[node.index()]);
        for id in ids {
            if let Some(edge) = self.edges[id.index()].take() {
                self.incoming[edge.target.index()].retain(|&e| e != id);
            }
        }
    }

    /// Removes every edge targeting the given node.
    ///
    /// A non-existent node is a no-op.
    pub fn remove_edges_to(&mut self, node: NodeId) {
        if node.index() >= self.nodes.len() {
            return;
        }
        let ids = std::mem::take(&mut self.incoming[node.index()]);
        for id in ids {
            if let Some(edge) = self.edges[id.index()].take() {
                self.outgoing[edge.source.index()].retain(|&e| e != id);
            }
        }
    }

    /// Returns a reference to the data of the given edge, or `None` when the
    /// edge was removed or never existed.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.index())?.as_ref().map(|e| &e.data)
    }

    /// Returns the `(source, target)` endpoints of the given edge.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges
            .get(edge.index())?
            .as_ref()
            .map(|e| (e.source, e.target))
    }

    /// Returns the number of live edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Returns an iterator over `(EdgeId, &E)` pairs for all live edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId::new(i), &e.data)))
    }

    /// Returns an iterator over the successors of the given node.
    ///
    /// A node reached through two parallel edges is yielded twice.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing[node.index()]
            .iter()
            .filter_map(|&id| self.edges[id.index()].as_ref().map(|e| e.target))
    }

    /// Returns an iterator over the predecessors of the given node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming[node.index()]
            .iter()
            .filter_map(|&id| self.edges[id.index()].as_ref().map(|e| e.source))
    }

    /// Returns an iterator over `(EdgeId, target, &E)` for each outgoing edge
    /// of the given node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId, &E)> + '_ {
        self.outgoing[node.index()].iter().filter_map(|&id| {
            self.edges[id.index()]
                .as_ref()
                .map(|e| (id, e.target, &e.data))
        })
    }

    /// Returns an iterator over `(EdgeId, source, &E)` for each incoming edge
    /// of the given node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId, &E)> + '_ {
        self.incoming[node.index()].iter().filter_map(|&id| {
            self.edges[id.index()]
                .as_ref()
                .map(|e| (id, e.source, &e.data))
        })
    }

    /// Returns the number of outgoing edges of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing[node.index()].len()
    }

    /// Returns the number of incoming edges of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.incoming[node.index()].len()
    }

    /// Returns `true` if the graph contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if the given node identifier is valid for this graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    /// Returns `true` if the given edge identifier refers to a live edge.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges
            .get(edge.index())
            .is_some_and(|slot| slot.is_some())
    }
}

impl<N, E> GraphBase for DirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N, E> Successors for DirectedGraph<N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.outgoing[node.index()]
            .iter()
            .filter_map(|&id| self.edges[id.index()].as_ref().map(|e| e.target))
    }
}

impl<N, E> Predecessors for DirectedGraph<N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.incoming[node.index()]
            .iter()
            .filter_map(|&id| self.edges[id.index()].as_ref().map(|e| e.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates a diamond graph: A -> B, A -> C, B -> D, C -> D
    fn create_diamond_graph() -> DirectedGraph<&'static str, ()> {
        let mut graph = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");
        let d = graph.add_node("D");
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(a, c, ()).unwrap();
        graph.add_edge(b, d, ()).unwrap();
        graph.add_edge(c, d, ()).unwrap();
        graph
    }

    #[test]
    fn test_new_graph_is_empty() {
        let graph: DirectedGraph<(), ()> = DirectedGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_node_assigns_sequential_ids() {
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        assert_eq!(graph.add_node("A"), NodeId::new(0));
        assert_eq!(graph.add_node("B"), NodeId::new(1));
        assert_eq!(graph.node(NodeId::new(0)), Some(&"A"));
        assert_eq!(graph.node(NodeId::new(5)), None);
    }

    #[test]
    fn test_node_mut() {
        let mut graph: DirectedGraph<String, ()> = DirectedGraph::new();
        let a = graph.add_node(String::from("hello"));
        if let Some(data) = graph.node_mut(a) {
            data.push_str(" world");
        }
        assert_eq!(graph.node(a), Some(&String::from("hello world")));
    }

    #[test]
    fn test_add_edge_and_endpoints() {
        let mut graph: DirectedGraph<&str, &str> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let e = graph.add_edge(a, b, "A->B").unwrap();

        assert_eq!(graph.edge(e), Some(&"A->B"));
        assert_eq!(graph.edge_endpoints(e), Some((a, b)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_invalid_endpoints() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());

        let result = graph.add_edge(NodeId::new(9), a, ());
        assert!(result.unwrap_err().to_string().contains("source node"));

        let result = graph.add_edge(a, NodeId::new(9), ());
        assert!(result.unwrap_err().to_string().contains("target node"));
    }

    #[test]
    fn test_parallel_edges() {
        let mut graph: DirectedGraph<&str, i32> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let e1 = graph.add_edge(a, b, 1).unwrap();
        let e2 = graph.add_edge(a, b, 2).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge(e1), Some(&1));
        assert_eq!(graph.edge(e2), Some(&2));
        assert_eq!(graph.successors(a).count(), 2);
    }

    #[test]
    fn test_self_loop() {
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("A");
        let e = graph.add_edge(a, a, ()).unwrap();

        assert_eq!(graph.edge_endpoints(e), Some((a, a)));
        assert_eq!(graph.out_degree(a), 1);
        assert_eq!(graph.in_degree(a), 1);
    }

    #[test]
    fn test_successors_and_predecessors() {
        let graph = create_diamond_graph();
        let a = NodeId::new(0);
        let d = NodeId::new(3);

        let succ: Vec<NodeId> = graph.successors(a).collect();
        assert_eq!(succ, vec![NodeId::new(1), NodeId::new(2)]);

        let pred: Vec<NodeId> = graph.predecessors(d).collect();
        assert_eq!(pred, vec![NodeId::new(1), NodeId::new(2)]);
    }

    #[test]
    fn test_outgoing_and_incoming_edges() {
        let mut graph: DirectedGraph<&str, i32> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");
        graph.add_edge(a, b, 10).unwrap();
        graph.add_edge(a, c, 20).unwrap();
        graph.add_edge(b, c, 30).unwrap();

        let out: Vec<i32> = graph.outgoing_edges(a).map(|(_, _, &w)| w).collect();
        assert_eq!(out, vec![10, 20]);

        let inc: Vec<(NodeId, i32)> = graph.incoming_edges(c).map(|(_, s, &w)| (s, w)).collect();
        assert_eq!(inc, vec![(a, 20), (b, 30)]);
    }

    #[test]
    fn test_remove_edges_from() {
        let mut graph = create_diamond_graph();
        let a = NodeId::new(0);
        let b = NodeId::new(1);

        graph.remove_edges_from(a);

        assert_eq!(graph.out_degree(a), 0);
        assert_eq!(graph.in_degree(b), 0);
        assert_eq!(graph.edge_count(), 2);
        // B -> D and C -> D survive
        assert_eq!(graph.in_degree(NodeId::new(3)), 2);
    }

    #[test]
    fn test_remove_edges_to() {
        let mut graph = create_diamond_graph();
        let d = NodeId::new(3);

        graph.remove_edges_to(d);

        assert_eq!(graph.in_degree(d), 0);
        assert_eq!(graph.out_degree(NodeId::new(1)), 0);
        assert_eq!(graph.out_degree(NodeId::new(2)), 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_remove_edges_invalid_node_is_noop() {
        let mut graph = create_diamond_graph();
        graph.remove_edges_from(NodeId::new(99));
        graph.remove_edges_to(NodeId::new(99));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_removed_edge_id_resolves_to_none() {
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let e = graph.add_edge(a, b, ()).unwrap();

        graph.remove_edges_from(a);

        assert!(!graph.contains_edge(e));
        assert_eq!(graph.edge(e), None);
        assert_eq!(graph.edge_endpoints(e), None);

        // New edges get fresh identifiers, not the tombstoned slot.
        let e2 = graph.add_edge(a, b, ()).unwrap();
        assert_ne!(e, e2);
    }

    #[test]
    fn test_edges_iterator_skips_tombstones() {
        let mut graph: DirectedGraph<&str, i32> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        graph.add_edge(a, b, 1).unwrap();
        graph.add_edge(b, a, 2).unwrap();
        graph.remove_edges_from(a);

        let live: Vec<i32> = graph.edges().map(|(_, &w)| w).collect();
        assert_eq!(live, vec![2]);
    }

    #[test]
    fn test_graph_traits() {
        fn count_via_base<G: GraphBase>(g: &G) -> usize {
            g.node_count()
        }
        fn succ_via_trait<G: Successors>(g: &G, node: NodeId) -> Vec<NodeId> {
            g.successors(node).collect()
        }
        fn pred_via_trait<G: Predecessors>(g: &G, node: NodeId) -> Vec<NodeId> {
            g.predecessors(node).collect()
        }

        let graph = create_diamond_graph();
        assert_eq!(count_via_base(&graph), 4);
        assert_eq!(
            succ_via_trait(&graph, NodeId::new(0)),
            vec![NodeId::new(1), NodeId::new(2)]
        );
        assert_eq!(
            pred_via_trait(&graph, NodeId::new(3)),
            vec![NodeId::new(1), NodeId::new(2)]
        );
    }
}
