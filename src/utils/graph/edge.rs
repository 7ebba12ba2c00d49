//! Edge identifiers for directed graphs.

use std::fmt;

/// A strongly-typed identifier for an edge within a directed graph.
///
/// `EdgeId` wraps a `usize` index assigned sequentially (from 0) as edges are
/// added. Removing edges tombstones the slot, so an `EdgeId` is never reused
/// for a different edge; looking up a removed edge simply yields `None`.
///
/// Edge IDs are created by
/// [`DirectedGraph::add_edge`](crate::utils::graph::DirectedGraph::add_edge).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Creates an `EdgeId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw 0-based index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<usize> for EdgeId {
    #[inline]
    fn from(index: usize) -> Self {
        EdgeId(index)
    }
}

impl From<EdgeId> for usize {
    #[inline]
    fn from(edge: EdgeId) -> Self {
        edge.0
    }
}
