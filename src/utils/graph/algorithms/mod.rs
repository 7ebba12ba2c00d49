//! Graph algorithms operating over the abstraction traits.
//!
//! Currently traversal only: depth-first iteration and directed reachability,
//! which back [`Cfg::is_connected`](crate::cfg::Cfg::is_connected) and the
//! structural invariants checked by the test suite.

mod traversal;

pub use traversal::{dfs, is_reachable, DfsIterator};
