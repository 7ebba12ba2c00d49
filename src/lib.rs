#![doc(html_no_source)]
#![deny(missing_docs)]

//! # fuzzycfg
//!
//! Per-function control flow graph construction for a permissive ("fuzzy")
//! C/C++ front end.
//!
//! The surrounding front end parses source text it cannot always fully
//! understand - incomplete code, missing headers, unknown constructs - into a
//! tagged syntax tree. This crate turns one function's tree into a control
//! flow graph through bottom-up, structurally-recursive translation: every
//! statement and expression becomes a small graph fragment, fragments compose
//! through a three-operation algebra, and non-local control transfers
//! (`goto`, `break`, `continue`, `return`, exceptions) are stitched in by
//! deferred fixup passes once their enclosing scope is known.
//!
//! ## Features
//!
//! - **Total conversion** - any input tree yields a structurally valid CFG
//!   (single entry, single exit); malformed constructs degrade to error
//!   vertices with advisory `log` warnings, never failures
//! - **Composition algebra** - fragments combine only through `append`,
//!   `mount` and `absorb`, which keep the entry/exit invariant by construction
//! - **Deferred jump resolution** - pending registries on each fragment carry
//!   break/continue/return/goto sites to the scope that can resolve them
//! - **Exceptions as edges** - `throw` and `try`/`catch` are modelled as
//!   labeled graph edges, not host-language control flow
//! - **Dialect hook** - dialect-specific forms (the C `if`, parameter
//!   registration) plug in through a strategy trait without touching the
//!   shared rules
//! - **Parallel fan-out** - function conversions share no state; the
//!   [`cfg::convert_functions`] driver runs one rayon task per function
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fuzzycfg::ast::{AstKind, AstNode};
//! use fuzzycfg::cfg::AstToCfgConverter;
//!
//! // void f() { x = y; }
//! let function = AstNode::new(AstKind::FunctionDef)
//!     .with_child(AstNode::new(AstKind::CompoundStatement)
//!         .with_child(AstNode::new(AstKind::ExpressionStatement)
//!             .with_child(AstNode::new(AstKind::AssignmentExpression).with_code("x = y"))))
//!     .into_ref();
//!
//! let cfg = AstToCfgConverter::new().convert(&function);
//! for (source, target, label) in cfg.edges() {
//!     println!("{source} -> {target} [{label}]");
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`ast`] - the opaque tagged tree the converter reads
//! - [`utils::graph`] - the generic directed multigraph underneath
//! - [`cfg`] - the fragment type, composition algebra, converter and dialect
//!   hook
//!
//! The parser producing the tree and the program-graph exporter consuming the
//! CFG are external collaborators; this crate performs no I/O.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,ignore
/// use fuzzycfg::prelude::*;
///
/// let cfg = AstToCfgConverter::new().convert(&tree);
/// ```
pub mod prelude;

/// The tagged syntax tree consumed by the converter.
///
/// # Key Types
///
/// - [`ast::AstNode`] - one tree node: kind tag, children, source text,
///   location
/// - [`ast::AstKind`] - the closed set of node kinds
/// - [`ast::AstNodeRef`] - shared node handle ([`std::sync::Arc`])
pub mod ast;

/// Control flow graph construction: fragments, composition algebra,
/// converter, dialect hook.
///
/// # Key Types
///
/// - [`cfg::Cfg`] - a CFG fragment with one entry and one exit vertex
/// - [`cfg::CfgNode`] / [`cfg::CfgEdgeKind`] - vertex and edge-label variants
/// - [`cfg::AstToCfgConverter`] - the tree-to-CFG converter
/// - [`cfg::DialectFlow`] / [`cfg::CDialect`] - the dialect override point
///
/// # Main Functions
///
/// - [`cfg::AstToCfgConverter::convert`] - convert one function body
/// - [`cfg::convert_functions`] - parallel fan-out over many functions
pub mod cfg;

/// Shared infrastructure: the generic graph core and DOT escaping.
///
/// # Key Types
///
/// - [`utils::graph::DirectedGraph`] - directed multigraph with incidence
///   lists and edge-removal primitives
/// - [`utils::graph::NodeId`] / [`utils::graph::EdgeId`] - strongly-typed
///   handles
pub mod utils;

/// Error types used throughout the crate
///
/// Note that conversion itself is total; these surface only through the graph
/// primitives and the fragment algebra.
pub use error::Error;

/// `fuzzycfg` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
