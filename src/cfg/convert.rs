//! Bottom-up translation of syntax trees into CFG fragments.
//!
//! [`AstToCfgConverter`] walks the tree depth-first, builds one fragment per
//! node, and combines children through the composition algebra of
//! [`Cfg`]. It is *total*: any error escaping a translation rule is caught at
//! that node's visit boundary, logged, and replaced by a single-vertex error
//! fragment, so malformed or unsupported constructs never abort the conversion
//! of their siblings or parents. This matches the permissive philosophy of the
//! surrounding front end.
//!
//! Dialect-sensitive constructs are offered to the injected
//! [`DialectFlow`](crate::cfg::DialectFlow) strategy before the shared rules
//! run; see [`crate::cfg::dialect`].

use rayon::prelude::*;

use crate::{
    ast::{AstKind, AstNodeRef},
    cfg::{dialect::CDialect, Cfg, CfgEdgeKind, CfgNode, DialectFlow},
    utils::graph::NodeId,
    Result,
};

/// Creates the pass-through fragment: `entry --empty--> exit`.
pub(crate) fn pass_through_cfg() -> Result<Cfg> {
    let mut cfg = Cfg::new();
    cfg.add_edge(cfg.entry(), cfg.exit(), CfgEdgeKind::Empty)?;
    Ok(cfg)
}

/// Creates the single-vertex fragment
/// `entry --empty--> Container(node) --empty--> exit` and returns the
/// container's handle alongside.
pub(crate) fn single_node_cfg(node: &AstNodeRef) -> Result<(Cfg, NodeId)> {
    let mut cfg = Cfg::new();
    let container = cfg.add_vertex(CfgNode::Container(node.clone()));
    cfg.add_edge(cfg.entry(), container, CfgEdgeKind::Empty)?;
    cfg.add_edge(container, cfg.exit(), CfgEdgeKind::Empty)?;
    Ok((cfg, container))
}

/// Creates the error fragment `entry --empty--> Error --empty--> exit`,
/// substituted for any node whose conversion failed.
pub(crate) fn error_cfg() -> Cfg {
    let mut cfg = Cfg::new();
    let error = cfg.add_vertex(CfgNode::Error);
    // Both handles are fresh, these edges cannot dangle.
    let _ = cfg.add_edge(cfg.entry(), error, CfgEdgeKind::Empty);
    let _ = cfg.add_edge(error, cfg.exit(), CfgEdgeKind::Empty);
    cfg
}

/// Converts function bodies to CFGs, one rayon task per function.
///
/// Each conversion is independent (fragments, registries and label tables are
/// all local to one call), so the fan-out needs no synchronization. Results
/// are in input order.
#[must_use]
pub fn convert_functions(functions: &[AstNodeRef]) -> Vec<Cfg> {
    functions
        .par_iter()
        .map(|function| AstToCfgConverter::new().convert(function))
        .collect()
}

/// The tree-to-CFG converter.
///
/// One translation rule per [`AstKind`]; kinds without a dedicated rule fall
/// back to a single `Container` vertex, which keeps the converter total over
/// any tree the front end produces.
///
/// # Examples
///
/// ```rust,ignore
/// use fuzzycfg::ast::{AstKind, AstNode};
/// use fuzzycfg::cfg::AstToCfgConverter;
///
/// let function = AstNode::new(AstKind::FunctionDef)
///     .with_child(AstNode::new(AstKind::CompoundStatement)
///         .with_child(AstNode::new(AstKind::ExpressionStatement)
///             .with_child(AstNode::new(AstKind::AssignmentExpression).with_code("x = y"))))
///     .into_ref();
///
/// let cfg = AstToCfgConverter::new().convert(&function);
/// assert!(cfg.is_connected(cfg.entry(), cfg.exit()));
/// ```
pub struct AstToCfgConverter {
    dialect: Box<dyn DialectFlow>,
}

impl Default for AstToCfgConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl AstToCfgConverter {
    /// Creates a converter with the C dialect installed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dialect(Box::new(CDialect))
    }

    /// Creates a converter with a custom dialect strategy.
    #[must_use]
    pub fn with_dialect(dialect: Box<dyn DialectFlow>) -> Self {
        AstToCfgConverter { dialect }
    }

    /// Converts one tree node into a CFG fragment.
    ///
    /// Never fails: a rule that errors out is substituted with the error
    /// fragment at this node's boundary and a warning is logged.
    pub fn convert(&self, node: &AstNodeRef) -> Cfg {
        let converted = match self.dialect.try_convert(self, node) {
            Some(result) => result,
            None => self.convert_default(node),
        };

        converted.unwrap_or_else(|err| {
            log::warn!(
                "substituting error fragment for {:?} node: {err}",
                node.kind()
            );
            error_cfg()
        })
    }

    /// The shared translation rules, keyed by node kind.
    fn convert_default(&self, node: &AstNodeRef) -> Result<Cfg> {
        match node.kind() {
            AstKind::FunctionDef => self.function_definition(node),
            AstKind::ParameterList
            | AstKind::CompoundStatement
            | AstKind::IdentifierDeclStatement => self.child_sequence(node),
            AstKind::ExpressionStatement | AstKind::Condition => self.forward_to_child(node),
            AstKind::IdentifierDecl => self.identifier_decl(node),
            AstKind::CallExpression => self.call_expression(node),
            AstKind::BinaryExpression => self.binary_expression(node),
            AstKind::WhileStatement => self.while_statement(node),
            AstKind::DoStatement => self.do_statement(node),
            AstKind::ForStatement => self.for_statement(node),
            AstKind::SwitchStatement => self.switch_statement(node),
            AstKind::TryStatement => self.try_statement(node),
            AstKind::Label => Self::label_statement(node),
            AstKind::GotoStatement => Self::goto_statement(node),
            AstKind::BreakStatement => Self::break_statement(node),
            AstKind::ContinueStatement => Self::continue_statement(node),
            AstKind::ReturnStatement => Self::return_statement(node),
            AstKind::ThrowStatement => Self::throw_statement(node),
            _ => single_node_cfg(node).map(|(cfg, _)| cfg),
        }
    }

    /// Converts the node's body, or yields a pass-through when it has none.
    fn convert_body(&self, node: &AstNodeRef) -> Result<Cfg> {
        match node.body() {
            Some(body) => Ok(self.convert(body)),
            None => pass_through_cfg(),
        }
    }

    fn function_definition(&self, node: &AstNodeRef) -> Result<Cfg> {
        let mut function = pass_through_cfg()?;

        let mut parameters = match node.parameter_list() {
            Some(list) => self.convert(list),
            None => pass_through_cfg()?,
        };
        parameters.append(self.convert_body(node)?)?;
        function.append(parameters)?;

        Self::fix_goto_statements(&mut function)?;
        Self::fix_return_statements(&mut function)?;

        if !function.break_statements().is_empty() {
            log::warn!("unresolved break statement outside any loop or switch");
            let error = function.error_node();
            Self::fix_break_statements(&mut function, error)?;
        }
        if !function.continue_statements().is_empty() {
            log::warn!("unresolved continue statement outside any loop");
            let error = function.error_node();
            Self::fix_continue_statements(&mut function, error)?;
        }

        if let Some(exception) = function.exception_node() {
            let exit = function.exit();
            function.add_edge(exception, exit, CfgEdgeKind::UnhandledExcept)?;
        }

        Ok(function)
    }

    /// Appends each child's fragment in source order: parameter lists,
    /// compound statements, declaration statements.
    fn child_sequence(&self, node: &AstNodeRef) -> Result<Cfg> {
        let mut block = pass_through_cfg()?;
        for child in node.children() {
            block.append(self.convert(child))?;
        }
        Ok(block)
    }

    /// Conversion of wrapper nodes is the conversion of their single child.
    fn forward_to_child(&self, node: &AstNodeRef) -> Result<Cfg> {
        let child = node
            .children()
            .first()
            .ok_or_else(|| malformed_error!("{:?} node without a child", node.kind()))?;
        Ok(self.convert(child))
    }

    fn identifier_decl(&self, node: &AstNodeRef) -> Result<Cfg> {
        match node.find_child(AstKind::AssignmentExpression) {
            Some(assignment) => Ok(self.convert(assignment)),
            None => pass_through_cfg(),
        }
    }

    fn call_expression(&self, node: &AstNodeRef) -> Result<Cfg> {
        let mut block = pass_through_cfg()?;
        if let Some(arguments) = node.find_child(AstKind::ArgumentList) {
            for argument in arguments.children() {
                block.append(self.convert(argument))?;
            }
        }
        block.append_node(CfgNode::Container(node.clone()))?;
        Ok(block)
    }

    fn binary_expression(&self, node: &AstNodeRef) -> Result<Cfg> {
        let mut block = pass_through_cfg()?;
        // `&&` and `||` get no special treatment: both operands are always
        // sequenced, lazy evaluation is not modelled.
        for operand in node.children() {
            block.append(self.convert(operand))?;
        }
        block.append_node(CfgNode::Container(node.clone()))?;
        Ok(block)
    }

    fn while_statement(&self, node: &AstNodeRef) -> Result<Cfg> {
        let condition = node
            .condition()
            .ok_or_else(|| malformed_error!("while statement without condition"))?;

        let mut while_block = Cfg::new();
        let cond = while_block.add_vertex(CfgNode::Container(condition.clone()));
        while_block.add_edge(while_block.entry(), cond, CfgEdgeKind::Empty)?;

        let body = self.convert_body(node)?;
        while_block.mount(cond, cond, body, CfgEdgeKind::True)?;

        let exit = while_block.exit();
        while_block.add_edge(cond, exit, CfgEdgeKind::False)?;

        Self::fix_break_statements(&mut while_block, exit)?;
        Self::fix_continue_statements(&mut while_block, cond)?;

        Ok(while_block)
    }

    fn do_statement(&self, node: &AstNodeRef) -> Result<Cfg> {
        let condition = node
            .condition()
            .ok_or_else(|| malformed_error!("do statement without condition"))?;

        let mut do_block = Cfg::new();
        let cond = do_block.add_vertex(CfgNode::Container(condition.clone()));
        let exit = do_block.exit();
        do_block.add_edge(cond, exit, CfgEdgeKind::False)?;

        let body = self.convert_body(node)?;
        let body_is_empty = body.is_empty();
        let body_entry_succs: Vec<NodeId> = body.successors(body.entry()).collect();

        let entry = do_block.entry();
        let map = do_block.mount(entry, cond, body, CfgEdgeKind::Empty)?;

        if body_is_empty {
            do_block.add_edge(cond, cond, CfgEdgeKind::True)?;
        } else {
            // The loop-back edges skip the body's discarded entry and go
            // straight to its first statements.
            for succ in body_entry_succs {
                if let Some(target) = map.get(succ) {
                    do_block.add_edge(cond, target, CfgEdgeKind::True)?;
                }
            }
        }

        Self::fix_break_statements(&mut do_block, exit)?;
        Self::fix_continue_statements(&mut do_block, cond)?;

        Ok(do_block)
    }

    fn for_statement(&self, node: &AstNodeRef) -> Result<Cfg> {
        let mut for_block = Cfg::new();

        let cond = match node.condition() {
            Some(condition) => for_block.add_vertex(CfgNode::Container(condition.clone())),
            None => for_block.add_vertex(CfgNode::InfiniteLoop),
        };
        let exit = for_block.exit();
        for_block.add_edge(cond, exit, CfgEdgeKind::False)?;

        let entry = for_block.entry();
        if let Some(init) = node.for_init() {
            let init_vertex = for_block.add_vertex(CfgNode::Container(init.clone()));
            for_block.add_edge(entry, init_vertex, CfgEdgeKind::Empty)?;
            for_block.add_edge(init_vertex, cond, CfgEdgeKind::Empty)?;
        } else {
            for_block.add_edge(entry, cond, CfgEdgeKind::Empty)?;
        }

        let body = self.convert_body(node)?;
        let continue_target = if let Some(update) = node.for_update() {
            let update_vertex = for_block.add_vertex(CfgNode::Container(update.clone()));
            for_block.add_edge(update_vertex, cond, CfgEdgeKind::Empty)?;
            for_block.mount(cond, update_vertex, body, CfgEdgeKind::True)?;
            update_vertex
        } else {
            for_block.mount(cond, cond, body, CfgEdgeKind::True)?;
            cond
        };

        Self::fix_break_statements(&mut for_block, exit)?;
        Self::fix_continue_statements(&mut for_block, continue_target)?;

        Ok(for_block)
    }

    fn switch_statement(&self, node: &AstNodeRef) -> Result<Cfg> {
        let condition = node
            .condition()
            .ok_or_else(|| malformed_error!("switch statement without condition"))?;

        let mut switch_block = Cfg::new();
        let cond = switch_block.add_vertex(CfgNode::Container(condition.clone()));
        switch_block.add_edge(switch_block.entry(), cond, CfgEdgeKind::Empty)?;

        let body = self.convert_body(node)?;
        // Absorbed, not mounted: the body keeps its internal sequencing
        // (fall-through between cases) and only gains the dispatch edges.
        let body_exit_preds: Vec<NodeId> = body.predecessors(body.exit()).collect();
        let map = switch_block.absorb(body)?;

        let mut has_default = false;
        for (name, target) in switch_block.drain_switch_labels() {
            if name == "default" {
                has_default = true;
            }
            switch_block.add_edge(cond, target, CfgEdgeKind::Case(name))?;
        }

        let exit = switch_block.exit();
        for pred in body_exit_preds {
            if let Some(source) = map.get(pred) {
                switch_block.add_edge(source, exit, CfgEdgeKind::Empty)?;
            }
        }
        if !has_default {
            switch_block.add_edge(cond, exit, CfgEdgeKind::Empty)?;
        }

        Self::fix_break_statements(&mut switch_block, exit)?;

        Ok(switch_block)
    }

    fn try_statement(&self, node: &AstNodeRef) -> Result<Cfg> {
        let body = node
            .body()
            .ok_or_else(|| malformed_error!("try statement without a guarded statement"))?;
        let mut try_block = self.convert(body);

        // Every interior vertex that cannot yet raise gets an except edge to a
        // fresh collection point; vertices that already raise (throws, inner
        // exception points) escalate through the same vertex.
        let unprotected: Vec<NodeId> = try_block
            .vertices()
            .filter(|&(id, _)| id != try_block.entry() && id != try_block.exit())
            .filter(|&(id, _)| {
                !try_block
                    .outgoing(id)
                    .any(|(_, label)| matches!(label, CfgEdgeKind::Except))
            })
            .map(|(id, _)| id)
            .collect();

        if !unprotected.is_empty() {
            let exception = try_block.new_exception_node();
            for vertex in unprotected {
                try_block.add_edge(vertex, exception, CfgEdgeKind::Except)?;
            }
        }

        if node.catches().count() == 0 {
            log::warn!("cannot find catch for try");
            return Ok(try_block);
        }

        for catch in node.catches() {
            let handler = match catch.body() {
                Some(handler) => self.convert(handler),
                None => pass_through_cfg()?,
            };
            let exception = try_block
                .exception_node()
                .ok_or_else(|| malformed_error!("catch clause without a guarded statement"))?;
            let exit = try_block.exit();
            try_block.mount(exception, exit, handler, CfgEdgeKind::HandledExcept)?;
        }

        Ok(try_block)
    }

    fn label_statement(node: &AstNodeRef) -> Result<Cfg> {
        let name = node
            .label_name()
            .ok_or_else(|| malformed_error!("label without a name"))?
            .to_string();
        let (mut block, container) = single_node_cfg(node)?;
        block.add_label(name, container);
        Ok(block)
    }

    fn goto_statement(node: &AstNodeRef) -> Result<Cfg> {
        let target = node
            .goto_target()
            .ok_or_else(|| malformed_error!("goto without a target label"))?
            .to_string();
        let (mut block, container) = single_node_cfg(node)?;
        block.add_goto_statement(container, target);
        Ok(block)
    }

    fn break_statement(node: &AstNodeRef) -> Result<Cfg> {
        let (mut block, container) = single_node_cfg(node)?;
        block.add_break_statement(container);
        Ok(block)
    }

    fn continue_statement(node: &AstNodeRef) -> Result<Cfg> {
        let (mut block, container) = single_node_cfg(node)?;
        block.add_continue_statement(container);
        Ok(block)
    }

    fn return_statement(node: &AstNodeRef) -> Result<Cfg> {
        let (mut block, container) = single_node_cfg(node)?;
        block.add_return_statement(container);
        Ok(block)
    }

    fn throw_statement(node: &AstNodeRef) -> Result<Cfg> {
        let mut block = Cfg::new();
        let container = block.add_vertex(CfgNode::Container(node.clone()));
        block.add_edge(block.entry(), container, CfgEdgeKind::Empty)?;
        let exception = block.new_exception_node();
        // A throw never falls through: no edge to the fragment's own exit.
        block.add_edge(container, exception, CfgEdgeKind::Except)?;
        Ok(block)
    }

    /// Resolves pending gotos against the label table; an unknown label is
    /// diagnosed and redirected to the error vertex. Function scope.
    fn fix_goto_statements(cfg: &mut Cfg) -> Result<()> {
        for (vertex, label) in cfg.take_goto_statements() {
            let target = match cfg.label_target(&label) {
                Some(target) => target,
                None => {
                    log::warn!("cannot find block for label {label}");
                    cfg.error_node()
                }
            };
            cfg.remove_edges_from(vertex);
            cfg.add_edge(vertex, target, CfgEdgeKind::Empty)?;
        }
        Ok(())
    }

    /// Redirects pending returns at the function exit. Function scope.
    fn fix_return_statements(cfg: &mut Cfg) -> Result<()> {
        let exit = cfg.exit();
        for vertex in cfg.take_return_statements() {
            cfg.remove_edges_from(vertex);
            cfg.add_edge(vertex, exit, CfgEdgeKind::Empty)?;
        }
        Ok(())
    }

    /// Redirects pending breaks at the enclosing construct's target.
    /// Entries of more deeply nested constructs were already cleared there.
    fn fix_break_statements(cfg: &mut Cfg, target: NodeId) -> Result<()> {
        for vertex in cfg.take_break_statements() {
            cfg.remove_edges_from(vertex);
            cfg.add_edge(vertex, target, CfgEdgeKind::Empty)?;
        }
        Ok(())
    }

    /// Redirects pending continues at the enclosing loop's target.
    fn fix_continue_statements(cfg: &mut Cfg, target: NodeId) -> Result<()> {
        for vertex in cfg.take_continue_statements() {
            cfg.remove_edges_from(vertex);
            cfg.add_edge(vertex, target, CfgEdgeKind::Empty)?;
        }
        Ok(())
    }
}
