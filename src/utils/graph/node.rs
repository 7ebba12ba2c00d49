//! Node identifiers for directed graphs.

use std::fmt;

/// A strongly-typed identifier for a node within a directed graph.
///
/// `NodeId` wraps a `usize` index assigned sequentially (from 0) as nodes are
/// added. The newtype prevents node indices from being confused with edge
/// indices or other integers. Identity of a CFG vertex is its `NodeId`, not
/// the equality of its payload.
///
/// Node IDs are created by
/// [`DirectedGraph::add_node`](crate::utils::graph::DirectedGraph::add_node);
/// constructing them manually is mainly useful in tests.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a `NodeId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw 0-based index, usable for indexing per-node side tables.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_node_id_roundtrip() {
        let node = NodeId::new(42);
        assert_eq!(node.index(), 42);
        assert_eq!(usize::from(node), 42);
        assert_eq!(NodeId::from(42usize), node);
    }

    #[test]
    fn test_node_id_ordering_and_hash() {
        let mut ids = vec![NodeId::new(2), NodeId::new(0), NodeId::new(1)];
        ids.sort();
        assert_eq!(ids, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);

        let set: HashSet<NodeId> = ids.into_iter().chain([NodeId::new(1)]).collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_node_id_formatting() {
        assert_eq!(format!("{:?}", NodeId::new(7)), "NodeId(7)");
        assert_eq!(format!("{}", NodeId::new(7)), "n7");
    }
}
