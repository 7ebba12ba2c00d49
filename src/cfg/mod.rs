//! Control flow graph construction.
//!
//! This is the heart of the crate: the [`Cfg`] fragment type with its
//! composition algebra, the [`AstToCfgConverter`] that translates syntax trees
//! into fragments bottom-up, and the [`DialectFlow`] hook for
//! dialect-specific statement forms.
//!
//! # Architecture
//!
//! Construction is structurally recursive. Every tree node becomes a small
//! fragment with one entry and one exit vertex; composite nodes build theirs
//! by converting children and combining the pieces with
//! [`append`](Cfg::append) (sequencing), [`mount`](Cfg::mount) (branching) and
//! [`absorb`](Cfg::absorb) (structural merge). Non-local transfers - `break`,
//! `continue`, `return`, `goto`, exceptions - are recorded in pending
//! registries on the fragment and resolved by fixup passes once the owning
//! scope is known: loops and switches resolve break/continue immediately,
//! function scope resolves goto and return at the end.
//!
//! # Totality
//!
//! Conversion never fails. Malformed constructs degrade to single-vertex
//! error fragments at their own boundary, unresolved jumps are redirected to
//! the function's error vertex, and all such events surface as `log` warnings
//! rather than errors.
//!
//! # Examples
//!
//! ```rust,ignore
//! use fuzzycfg::ast::{AstKind, AstNode};
//! use fuzzycfg::cfg::AstToCfgConverter;
//!
//! // while (c) break;
//! let tree = AstNode::new(AstKind::WhileStatement)
//!     .with_child(AstNode::new(AstKind::Condition).with_code("c"))
//!     .with_child(AstNode::new(AstKind::BreakStatement).with_code("break"))
//!     .into_ref();
//!
//! let cfg = AstToCfgConverter::new().convert(&tree);
//! assert!(cfg.is_connected(cfg.entry(), cfg.exit()));
//! ```

mod convert;
mod dialect;
mod edge;
mod graph;
mod node;

pub use convert::{convert_functions, AstToCfgConverter};
pub use dialect::{CDialect, DialectFlow};
pub use edge::CfgEdgeKind;
pub use graph::{Cfg, NodeMap};
pub use node::CfgNode;
