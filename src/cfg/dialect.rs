//! Dialect-specific translation overrides.
//!
//! The shared converter covers the constructs whose flow is the same in every
//! supported dialect. The handful of dialect-sensitive forms go through a
//! [`DialectFlow`] strategy injected into the converter, so a new dialect
//! plugs in without touching the shared algebra.

use crate::{
    ast::{AstKind, AstNodeRef},
    cfg::{
        convert::{pass_through_cfg, single_node_cfg},
        AstToCfgConverter, Cfg, CfgEdgeKind, CfgNode,
    },
    Result,
};

/// Strategy for dialect-specific statement forms.
///
/// The converter offers every node to the dialect first;
/// [`try_convert`](DialectFlow::try_convert) returns `None` to fall through to
/// the shared rules, or `Some(fragment)` to take the node over. A returned
/// `Err` degrades to the error fragment at the node's boundary, exactly like a
/// failing shared rule.
pub trait DialectFlow: Send + Sync {
    /// Offers a node to the dialect. Return `None` for "not mine".
    fn try_convert(
        &self,
        converter: &AstToCfgConverter,
        node: &AstNodeRef,
    ) -> Option<Result<Cfg>>;
}

/// The C dialect.
///
/// Overrides two forms: `if` statements (the generic front end leaves their
/// condition/else shape to the dialect) and formal parameters, whose container
/// vertices are registered on the fragment for downstream consumers.
pub struct CDialect;

impl DialectFlow for CDialect {
    fn try_convert(
        &self,
        converter: &AstToCfgConverter,
        node: &AstNodeRef,
    ) -> Option<Result<Cfg>> {
        match node.kind() {
            AstKind::IfStatement => Some(Self::if_statement(converter, node)),
            AstKind::Parameter => Some(Self::parameter(node)),
            _ => None,
        }
    }
}

impl CDialect {
    fn if_statement(converter: &AstToCfgConverter, node: &AstNodeRef) -> Result<Cfg> {
        let condition = node
            .condition()
            .ok_or_else(|| malformed_error!("if statement without condition"))?;

        let mut block = Cfg::new();
        let cond = block.add_vertex(CfgNode::Container(condition.clone()));
        block.add_edge(block.entry(), cond, CfgEdgeKind::Empty)?;

        let then_branch = match node.body() {
            Some(body) => converter.convert(body),
            None => pass_through_cfg()?,
        };
        let exit = block.exit();
        block.mount(cond, exit, then_branch, CfgEdgeKind::True)?;

        if let Some(else_statement) = node.else_branch() {
            let else_branch = converter.convert(else_statement);
            block.mount(cond, exit, else_branch, CfgEdgeKind::False)?;
        } else {
            block.add_edge(cond, exit, CfgEdgeKind::False)?;
        }

        Ok(block)
    }

    fn parameter(node: &AstNodeRef) -> Result<Cfg> {
        let (mut block, container) = single_node_cfg(node)?;
        block.register_parameter(container);
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstNode;

    fn convert(node: AstNode) -> Cfg {
        AstToCfgConverter::new().convert(&node.into_ref())
    }

    fn vertex_by_code(cfg: &Cfg, code: &str) -> Option<crate::utils::graph::NodeId> {
        cfg.vertices()
            .find(|(_, n)| n.code() == code)
            .map(|(id, _)| id)
    }

    #[test]
    fn test_if_without_else() {
        let cfg = convert(
            AstNode::new(AstKind::IfStatement)
                .with_child(AstNode::new(AstKind::Condition).with_code("foo"))
                .with_child(AstNode::new(AstKind::Identifier).with_code("a")),
        );

        let cond = vertex_by_code(&cfg, "foo").unwrap();
        let a = vertex_by_code(&cfg, "a").unwrap();

        assert!(cfg
            .edges()
            .any(|(s, t, l)| s == cond && t == a && *l == CfgEdgeKind::True));
        assert!(cfg
            .edges()
            .any(|(s, t, l)| s == cond && t == cfg.exit() && *l == CfgEdgeKind::False));
    }

    #[test]
    fn test_if_with_else() {
        let cfg = convert(
            AstNode::new(AstKind::IfStatement)
                .with_child(AstNode::new(AstKind::Condition).with_code("foo"))
                .with_child(AstNode::new(AstKind::Identifier).with_code("a"))
                .with_child(
                    AstNode::new(AstKind::ElseStatement)
                        .with_child(AstNode::new(AstKind::Identifier).with_code("b")),
                ),
        );

        let cond = vertex_by_code(&cfg, "foo").unwrap();
        let a = vertex_by_code(&cfg, "a").unwrap();
        let b = vertex_by_code(&cfg, "b").unwrap();

        assert!(cfg
            .edges()
            .any(|(s, t, l)| s == cond && t == a && *l == CfgEdgeKind::True));
        assert!(cfg
            .edges()
            .any(|(s, t, l)| s == cond && t == b && *l == CfgEdgeKind::False));
        assert!(cfg.is_connected(a, cfg.exit()));
        assert!(cfg.is_connected(b, cfg.exit()));
    }

    #[test]
    fn test_if_with_empty_then_collapses_to_direct_edge() {
        let cfg = convert(
            AstNode::new(AstKind::IfStatement)
                .with_child(AstNode::new(AstKind::Condition).with_code("foo"))
                .with_child(AstNode::new(AstKind::CompoundStatement)),
        );

        // entry, condition, exit; the empty then branch is a direct true edge.
        assert_eq!(cfg.vertex_count(), 3);
        let cond = vertex_by_code(&cfg, "foo").unwrap();
        assert!(cfg
            .edges()
            .any(|(s, t, l)| s == cond && t == cfg.exit() && *l == CfgEdgeKind::True));
        assert!(cfg
            .edges()
            .any(|(s, t, l)| s == cond && t == cfg.exit() && *l == CfgEdgeKind::False));
    }

    #[test]
    fn test_if_without_condition_degrades() {
        let cfg = convert(
            AstNode::new(AstKind::IfStatement)
                .with_child(AstNode::new(AstKind::ExpressionStatement).with_code("a")),
        );
        assert!(cfg.vertices().any(|(_, n)| matches!(n, CfgNode::Error)));
    }

    #[test]
    fn test_parameter_is_registered() {
        let cfg = convert(AstNode::new(AstKind::Parameter).with_code("int x"));
        assert_eq!(cfg.parameters().len(), 1);
        let registered = cfg.parameters()[0];
        assert_eq!(cfg.vertex(registered).map(|n| n.code()), Some("int x"));
    }

    #[test]
    fn test_unhandled_kinds_fall_through() {
        let dialect = CDialect;
        let converter = AstToCfgConverter::new();
        let node = AstNode::new(AstKind::WhileStatement).into_ref();
        assert!(dialect.try_convert(&converter, &node).is_none());
    }
}
