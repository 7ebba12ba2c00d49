//! Graph traversal algorithms.

use crate::utils::graph::{NodeId, Successors};

/// Depth-first search iterator over graph nodes.
///
/// Performs an iterative (non-recursive) depth-first traversal from a given
/// start node, visiting each reachable node exactly once in pre-order. Created
/// by [`dfs`].
pub struct DfsIterator<'g, G: Successors> {
    graph: &'g G,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
}

impl<'g, G: Successors> DfsIterator<'g, G> {
    fn new(graph: &'g G, start: NodeId) -> Self {
        let node_count = graph.node_count();
        if start.index() >= node_count {
            return DfsIterator {
                graph,
                stack: Vec::new(),
                visited: Vec::new(),
            };
        }

        let mut visited = vec![false; node_count];
        visited[start.index()] = true;

        DfsIterator {
            graph,
            stack: vec![start],
            visited,
        }
    }
}

impl<G: Successors> Iterator for DfsIterator<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push unvisited successors in reverse so they pop in original order
        let successors: Vec<NodeId> = self.graph.successors(node).collect();
        for &succ in successors.iter().rev() {
            if !self.visited[succ.index()] {
                self.visited[succ.index()] = true;
                self.stack.push(succ);
            }
        }

        Some(node)
    }
}

/// Returns a depth-first search iterator starting from the given node.
///
/// Visits each node reachable from `start` exactly once, in pre-order. An
/// out-of-range start yields an empty iterator.
///
/// # Complexity
///
/// O(V + E) time, O(V) space.
pub fn dfs<G: Successors>(graph: &G, start: NodeId) -> DfsIterator<'_, G> {
    DfsIterator::new(graph, start)
}

/// Returns `true` if `to` is reachable from `from` along directed edges.
///
/// A node is considered reachable from itself.
#[must_use]
pub fn is_reachable<G: Successors>(graph: &G, from: NodeId, to: NodeId) -> bool {
    dfs(graph, from).any(|node| node == to)
}
