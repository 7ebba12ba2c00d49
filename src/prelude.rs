//! # fuzzycfg Prelude
//!
//! A convenient prelude re-exporting the types most callers need: the tree
//! builder surface, the converter, and the CFG value types.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all fuzzycfg operations
pub use crate::Error;

/// The result type used throughout fuzzycfg
pub use crate::Result;

// ================================================================================================
// Input Trees
// ================================================================================================

/// Syntax tree nodes, kinds, and shared handles
pub use crate::ast::{AstKind, AstNode, AstNodeRef, SourceLocation};

// ================================================================================================
// Control Flow Graphs
// ================================================================================================

/// The CFG fragment and its vertex/edge types
pub use crate::cfg::{Cfg, CfgEdgeKind, CfgNode, NodeMap};

/// The converter and the dialect override point
pub use crate::cfg::{convert_functions, AstToCfgConverter, CDialect, DialectFlow};

// ================================================================================================
// Graph Core
// ================================================================================================

/// Strongly-typed graph handles
pub use crate::utils::graph::{EdgeId, NodeId};

/// The generic directed multigraph and its traversal traits
pub use crate::utils::graph::{DirectedGraph, GraphBase, Predecessors, Successors};
