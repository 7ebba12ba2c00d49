//! The syntax tree node type and its child-convention accessors.

use std::fmt;
use std::sync::Arc;

use crate::ast::AstKind;

/// Shared handle to a syntax tree node.
///
/// Nodes are reference-counted so that a CFG `Container` vertex can wrap a node
/// without copying it, and so that per-function conversions can run on worker
/// threads.
pub type AstNodeRef = Arc<AstNode>;

/// A source range attached to a tree node.
///
/// Locations are carried opaquely for downstream consumers; the converter never
/// interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based line of the first token.
    pub line: u32,
    /// 0-based column of the first token.
    pub column: u32,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// One node of the tagged input tree.
///
/// A node is a kind tag, ordered children, and optionally the literal source
/// text it covers plus its location. Trees are built once by the front end (or
/// by tests, via the builder methods) and are read-only afterwards.
///
/// # Examples
///
/// ```rust,ignore
/// use fuzzycfg::ast::{AstKind, AstNode};
///
/// // while (x) { }
/// let tree = AstNode::new(AstKind::WhileStatement)
///     .with_child(AstNode::new(AstKind::Condition).with_code("x"))
///     .with_child(AstNode::new(AstKind::CompoundStatement))
///     .into_ref();
/// assert!(tree.condition().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct AstNode {
    kind: AstKind,
    code: Option<String>,
    location: Option<SourceLocation>,
    children: Vec<AstNodeRef>,
}

impl AstNode {
    /// Creates a new leaf node of the given kind.
    #[must_use]
    pub fn new(kind: AstKind) -> Self {
        AstNode {
            kind,
            code: None,
            location: None,
            children: Vec::new(),
        }
    }

    /// Sets the literal source-text rendering of this node.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the source location of this node.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: AstNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Appends an already-shared child node.
    #[must_use]
    pub fn with_child_ref(mut self, child: AstNodeRef) -> Self {
        self.children.push(child);
        self
    }

    /// Finishes building and returns a shared handle.
    #[must_use]
    pub fn into_ref(self) -> AstNodeRef {
        Arc::new(self)
    }

    /// Returns the kind tag of this node.
    #[must_use]
    pub fn kind(&self) -> AstKind {
        self.kind
    }

    /// Returns the literal source text of this node, if the parser recorded one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the source text of this node, or `""` when none was recorded.
    #[must_use]
    pub fn escaped_code(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }

    /// Returns the source location of this node, if any.
    #[must_use]
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    /// Returns the ordered children of this node.
    #[must_use]
    pub fn children(&self) -> &[AstNodeRef] {
        &self.children
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the first child with the given kind.
    #[must_use]
    pub fn find_child(&self, kind: AstKind) -> Option<&AstNodeRef> {
        self.children.iter().find(|c| c.kind() == kind)
    }

    /// Returns the `Condition` child of a block-starting statement.
    #[must_use]
    pub fn condition(&self) -> Option<&AstNodeRef> {
        self.find_child(AstKind::Condition)
    }

    /// Returns the body of a block-starting statement: the first child that is
    /// not a header kind (condition, else/catch arm, for-loop clause,
    /// parameter list).
    #[must_use]
    pub fn body(&self) -> Option<&AstNodeRef> {
        self.children.iter().find(|c| !c.kind().is_header())
    }

    /// Returns the statement under the `ElseStatement` child of an `if`.
    #[must_use]
    pub fn else_branch(&self) -> Option<&AstNodeRef> {
        self.find_child(AstKind::ElseStatement)
            .and_then(|e| e.children.first())
    }

    /// Returns the `ForInit` child of a `for` statement.
    #[must_use]
    pub fn for_init(&self) -> Option<&AstNodeRef> {
        self.find_child(AstKind::ForInit)
    }

    /// Returns the `ForUpdate` child of a `for` statement.
    #[must_use]
    pub fn for_update(&self) -> Option<&AstNodeRef> {
        self.find_child(AstKind::ForUpdate)
    }

    /// Returns the `ParameterList` child of a function definition.
    #[must_use]
    pub fn parameter_list(&self) -> Option<&AstNodeRef> {
        self.find_child(AstKind::ParameterList)
    }

    /// Returns the `CatchStatement` children of a `try` statement, in order.
    pub fn catches(&self) -> impl Iterator<Item = &AstNodeRef> + '_ {
        self.children
            .iter()
            .filter(|c| c.kind() == AstKind::CatchStatement)
    }

    /// Returns the label name of a `Label` node: its code with any trailing
    /// `:` (and surrounding whitespace) trimmed.
    #[must_use]
    pub fn label_name(&self) -> Option<&str> {
        self.code
            .as_deref()
            .map(|c| c.trim().trim_end_matches(':').trim_end())
    }

    /// Returns the target label of a `goto`: the code of its first
    /// `Identifier` child.
    #[must_use]
    pub fn goto_target(&self) -> Option<&str> {
        self.find_child(AstKind::Identifier).and_then(|c| c.code())
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}"),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_roundtrip() {
        let node = AstNode::new(AstKind::ExpressionStatement)
            .with_code("x = y")
            .with_location(SourceLocation {
                line: 3,
                column: 4,
                start: 28,
                end: 33,
            });

        assert_eq!(node.kind(), AstKind::ExpressionStatement);
        assert_eq!(node.code(), Some("x = y"));
        assert_eq!(node.location().map(|l| l.line), Some(3));
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_escaped_code_defaults_to_empty() {
        let node = AstNode::new(AstKind::Statement);
        assert_eq!(node.escaped_code(), "");
    }

    #[test]
    fn test_condition_and_body() {
        let while_stmt = AstNode::new(AstKind::WhileStatement)
            .with_child(AstNode::new(AstKind::Condition).with_code("c"))
            .with_child(AstNode::new(AstKind::CompoundStatement));

        assert_eq!(
            while_stmt.condition().map(|c| c.escaped_code()),
            Some("c")
        );
        assert_eq!(
            while_stmt.body().map(|b| b.kind()),
            Some(AstKind::CompoundStatement)
        );
    }

    #[test]
    fn test_else_branch() {
        let if_stmt = AstNode::new(AstKind::IfStatement)
            .with_child(AstNode::new(AstKind::Condition).with_code("c"))
            .with_child(AstNode::new(AstKind::ExpressionStatement).with_code("a"))
            .with_child(
                AstNode::new(AstKind::ElseStatement)
                    .with_child(AstNode::new(AstKind::ExpressionStatement).with_code("b")),
            );

        assert_eq!(if_stmt.body().map(|b| b.escaped_code()), Some("a"));
        assert_eq!(if_stmt.else_branch().map(|b| b.escaped_code()), Some("b"));
    }

    #[test]
    fn test_for_clauses() {
        let for_stmt = AstNode::new(AstKind::ForStatement)
            .with_child(AstNode::new(AstKind::ForInit).with_code("i = 0"))
            .with_child(AstNode::new(AstKind::Condition).with_code("i < n"))
            .with_child(AstNode::new(AstKind::ForUpdate).with_code("i++"))
            .with_child(AstNode::new(AstKind::CompoundStatement));

        assert_eq!(for_stmt.for_init().map(|n| n.escaped_code()), Some("i = 0"));
        assert_eq!(for_stmt.for_update().map(|n| n.escaped_code()), Some("i++"));
        assert_eq!(
            for_stmt.body().map(|b| b.kind()),
            Some(AstKind::CompoundStatement)
        );
    }

    #[test]
    fn test_label_name_trims_colon() {
        let label = AstNode::new(AstKind::Label).with_code("case 1 :");
        assert_eq!(label.label_name(), Some("case 1"));

        let plain = AstNode::new(AstKind::Label).with_code("out:");
        assert_eq!(plain.label_name(), Some("out"));
    }

    #[test]
    fn test_goto_target() {
        let goto = AstNode::new(AstKind::GotoStatement)
            .with_code("goto out ;")
            .with_child(AstNode::new(AstKind::Identifier).with_code("out"));
        assert_eq!(goto.goto_target(), Some("out"));

        let broken = AstNode::new(AstKind::GotoStatement).with_code("goto ;");
        assert_eq!(broken.goto_target(), None);
    }

    #[test]
    fn test_catches() {
        let try_stmt = AstNode::new(AstKind::TryStatement)
            .with_child(AstNode::new(AstKind::CompoundStatement))
            .with_child(AstNode::new(AstKind::CatchStatement))
            .with_child(AstNode::new(AstKind::CatchStatement));

        assert_eq!(try_stmt.catches().count(), 2);
        assert_eq!(
            try_stmt.body().map(|b| b.kind()),
            Some(AstKind::CompoundStatement)
        );
    }

    #[test]
    fn test_display_uses_code() {
        let node = AstNode::new(AstKind::Constant).with_code("42");
        assert_eq!(node.to_string(), "42");

        let bare = AstNode::new(AstKind::BreakStatement);
        assert_eq!(bare.to_string(), "BreakStatement");
    }
}
