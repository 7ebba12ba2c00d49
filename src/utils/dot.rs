//! DOT format utilities for graph visualization.
//!
//! Helpers for generating DOT output that renders with Graphviz tools.

/// Escapes a string for safe use in DOT format labels and identifiers.
///
/// Handles the characters that have special meaning in DOT labels: quotes,
/// backslashes, newlines, and angle brackets.
///
/// # Arguments
///
/// * `s` - The string to escape
///
/// # Returns
///
/// A new string with all special characters properly escaped.
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace('<', "\\<")
        .replace('>', "\\>")
}
