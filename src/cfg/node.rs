//! Vertex types for the control flow graph.

use std::fmt;

use crate::ast::AstNodeRef;

/// A vertex of the control flow graph.
///
/// Every vertex is either one of the synthetic markers (entry, exit, error,
/// exception, infinite-loop) or a [`Container`](CfgNode::Container) wrapping
/// exactly one atomic unit of execution: a statement or an evaluation ordering
/// point of a sub-expression. The container holds a shared reference to the
/// tree node, never a copy.
///
/// Vertex identity is the [`NodeId`](crate::utils::graph::NodeId) handle inside
/// a fragment's graph, not payload equality; two containers may wrap nodes with
/// identical source text.
#[derive(Debug, Clone)]
pub enum CfgNode {
    /// The unique entry vertex of a fragment.
    Entry,
    /// The unique exit vertex of a fragment; every normally-returning path
    /// reaches it.
    Exit,
    /// The lazily-created error vertex; target of unresolvable jumps and the
    /// payload of error fragments substituted for failed conversions.
    Error,
    /// An exception collection point; targets of `except` edges.
    Exception,
    /// The decision point of a `for (;;)` loop that has no condition.
    InfiniteLoop,
    /// One atomic statement or evaluation point, wrapping its tree node.
    Container(AstNodeRef),
}

impl CfgNode {
    /// Returns the wrapped tree node for a `Container` vertex.
    #[must_use]
    pub fn ast(&self) -> Option<&AstNodeRef> {
        match self {
            CfgNode::Container(node) => Some(node),
            _ => None,
        }
    }

    /// Returns `true` for `Container` vertices.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, CfgNode::Container(_))
    }

    /// Returns `true` for the synthetic marker vertices (everything except
    /// `Container`).
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        !self.is_container()
    }

    /// Returns the source text of the wrapped node, or `""` for synthetic
    /// vertices and containers without recorded code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            CfgNode::Container(node) => node.escaped_code(),
            _ => "",
        }
    }
}

impl fmt::Display for CfgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfgNode::Entry => write!(f, "ENTRY"),
            CfgNode::Exit => write!(f, "EXIT"),
            CfgNode::Error => write!(f, "ERROR"),
            CfgNode::Exception => write!(f, "EXCEPTION"),
            CfgNode::InfiniteLoop => write!(f, "INFINITE LOOP"),
            CfgNode::Container(node) => write!(f, "{node}"),
        }
    }
}
