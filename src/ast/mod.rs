//! The tagged syntax tree the converter consumes.
//!
//! The front end's parser (out of scope for this crate) produces a heterogeneous
//! tree of [`AstNode`] values. Every node carries a [`AstKind`] tag, ordered
//! children, an optional literal source-text rendering and an optional source
//! location. The converter only ever reads this tree; nodes are shared via
//! [`AstNodeRef`] so a CFG vertex can wrap a node without copying it.
//!
//! # Child Conventions
//!
//! Composite statements expose their parts through accessor methods rather than
//! positional indexing: [`AstNode::condition`] finds the `Condition` child,
//! [`AstNode::body`] the first non-header child, [`AstNode::else_branch`] the
//! statement under an `ElseStatement` child, and so on. A tree producer only has
//! to emit the right child kinds, in source order.

mod kind;
mod node;

pub use kind::AstKind;
pub use node::{AstNode, AstNodeRef, SourceLocation};
