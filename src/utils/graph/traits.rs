//! Trait definitions for graph abstractions.
//!
//! Algorithms in [`crate::utils::graph::algorithms`] are written against these
//! traits rather than [`DirectedGraph`](crate::utils::graph::DirectedGraph)
//! directly, so they work for any graph shape that can answer adjacency
//! queries. The hierarchy is minimal and composable: [`GraphBase`] for node
//! enumeration, [`Successors`] for forward traversal, [`Predecessors`] for
//! backward traversal. All adjacency queries return iterators, keeping simple
//! traversals allocation-free.

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
///
/// # Required Methods
///
/// - [`node_count`](GraphBase::node_count) - Returns the total number of nodes
/// - [`node_ids`](GraphBase::node_ids) - Returns an iterator over all node IDs
pub trait GraphBase {
    /// Returns the number of nodes in the graph, regardless of connectivity.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers, typically in the order
    /// nodes were added.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support forward edge traversal.
pub trait Successors: GraphBase {
    /// Returns an iterator over the successor nodes of the given node.
    ///
    /// For a directed edge `(u, v)`, node `v` is a successor of `u`.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessor nodes of the given node.
    ///
    /// For a directed edge `(u, v)`, node `u` is a predecessor of `v`.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}
