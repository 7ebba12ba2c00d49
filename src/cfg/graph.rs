//! The control flow graph fragment and its composition algebra.
//!
//! A [`Cfg`] is a directed multigraph with exactly one entry and one exit
//! vertex. The converter builds one small fragment per tree node and combines
//! fragments exclusively through three primitives:
//!
//! - [`append`](Cfg::append) - sequential composition (statement lists,
//!   evaluation order)
//! - [`mount`](Cfg::mount) - branch composition (loop bodies, if/else arms,
//!   catch handlers)
//! - [`absorb`](Cfg::absorb) - structural merge without rewiring (switch
//!   bodies, and the first step of the other two)
//!
//! Besides the graph, a fragment carries the bookkeeping needed to resolve
//! non-local control transfers later: pending break/continue/return/goto
//! registries, the label table, the parameter list, and the optional error and
//! exception vertices. Merging a child fragment transfers all of this to the
//! parent, with vertex handles remapped through the returned [`NodeMap`].

use std::collections::HashMap;
use std::fmt::Write;

use crate::{
    cfg::{CfgEdgeKind, CfgNode},
    utils::{
        escape_dot,
        graph::{algorithms, DirectedGraph, EdgeId, NodeId},
    },
    Error, Result,
};

/// Mapping from a merged fragment's vertex handles to their images in the
/// parent fragment.
///
/// Produced by [`Cfg::absorb`] and [`Cfg::mount`]. The merged fragment's entry
/// and exit vertices are discarded by the merge and have no image.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    map: Vec<Option<NodeId>>,
}

impl NodeMap {
    fn empty() -> Self {
        NodeMap { map: Vec::new() }
    }

    /// Returns the parent-fragment handle for a vertex of the merged fragment,
    /// or `None` for its entry/exit vertices.
    #[must_use]
    pub fn get(&self, old: NodeId) -> Option<NodeId> {
        self.map.get(old.index()).copied().flatten()
    }
}

/// A control flow graph fragment with one entry and one exit vertex.
///
/// Freshly created fragments contain only the entry and exit vertices and are
/// considered *empty*; composition operations special-case empty operands so
/// constructs with no body still produce correct flow. The single-entry /
/// single-exit invariant is established by [`new`](Cfg::new) and preserved by
/// every composition primitive.
///
/// # Lifecycle
///
/// A fragment is created for one tree node, populated, and then consumed by
/// being merged into exactly one parent fragment; the parent's registries
/// absorb the child's pending entries and label table. The fragment returned
/// for a whole function is terminal: after the goto/return fixups, all four
/// registries are empty (unresolved entries are redirected to the error
/// vertex with a diagnostic).
///
/// # Examples
///
/// ```rust,ignore
/// use fuzzycfg::cfg::{Cfg, CfgEdgeKind, CfgNode};
///
/// let mut cfg = Cfg::new();
/// assert!(cfg.is_empty());
/// let v = cfg.add_vertex(CfgNode::Error);
/// cfg.add_edge(cfg.entry(), v, CfgEdgeKind::Empty)?;
/// cfg.add_edge(v, cfg.exit(), CfgEdgeKind::Empty)?;
/// assert!(cfg.is_connected(cfg.entry(), cfg.exit()));
/// # Ok::<(), fuzzycfg::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Cfg {
    /// The underlying directed multigraph.
    graph: DirectedGraph<CfgNode, CfgEdgeKind>,
    /// The unique entry vertex.
    entry: NodeId,
    /// The unique exit vertex.
    exit: NodeId,
    /// The lazily-created error vertex.
    error: Option<NodeId>,
    /// The current exception collection point, if any.
    exception: Option<NodeId>,
    /// Pending break statements awaiting their enclosing loop/switch.
    breaks: Vec<NodeId>,
    /// Pending continue statements awaiting their enclosing loop.
    continues: Vec<NodeId>,
    /// Pending return statements awaiting the function-level fixup.
    returns: Vec<NodeId>,
    /// Pending goto statements with their target label names.
    gotos: Vec<(NodeId, String)>,
    /// Declared labels visible to enclosing scopes.
    labels: HashMap<String, NodeId>,
    /// Formal-parameter vertices registered by the dialect.
    parameters: Vec<NodeId>,
}

impl Default for Cfg {
    fn default() -> Self {
        Self::new()
    }
}

impl Cfg {
    /// Creates an empty fragment containing only its entry and exit vertices.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = DirectedGraph::new();
        let entry = graph.add_node(CfgNode::Entry);
        let exit = graph.add_node(CfgNode::Exit);
        Cfg {
            graph,
            entry,
            exit,
            error: None,
            exception: None,
            breaks: Vec::new(),
            continues: Vec::new(),
            returns: Vec::new(),
            gotos: Vec::new(),
            labels: HashMap::new(),
            parameters: Vec::new(),
        }
    }

    /// Returns the entry vertex.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the exit vertex.
    #[must_use]
    pub fn exit(&self) -> NodeId {
        self.exit
    }

    /// Returns the error vertex, creating it on first use.
    pub fn error_node(&mut self) -> NodeId {
        if let Some(error) = self.error {
            return error;
        }
        let error = self.graph.add_node(CfgNode::Error);
        self.error = Some(error);
        error
    }

    /// Returns `true` if the error vertex has been created.
    #[must_use]
    pub fn has_error_node(&self) -> bool {
        self.error.is_some()
    }

    /// Creates a fresh exception vertex and makes it this fragment's exception
    /// collection point, replacing any previous one.
    pub fn new_exception_node(&mut self) -> NodeId {
        let exception = self.graph.add_node(CfgNode::Exception);
        self.exception = Some(exception);
        exception
    }

    /// Returns the current exception collection point, if any.
    #[must_use]
    pub fn exception_node(&self) -> Option<NodeId> {
        self.exception
    }

    /// Returns `true` if this fragment carries an exception vertex.
    #[must_use]
    pub fn has_exception_node(&self) -> bool {
        self.exception.is_some()
    }

    /// Returns `true` if the fragment contains only its entry and exit
    /// vertices.
    ///
    /// Entry and exit carry no information of their own, so such a fragment
    /// represents "no executable content".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 2
    }

    /// Adds a vertex and returns its handle.
    pub fn add_vertex(&mut self, node: CfgNode) -> NodeId {
        self.graph.add_node(node)
    }

    /// Adds a labeled edge between two vertices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, label: CfgEdgeKind) -> Result<EdgeId> {
        self.graph.add_edge(source, target, label)
    }

    /// Removes every edge originating at the given vertex. A non-existent
    /// vertex is a no-op.
    pub fn remove_edges_from(&mut self, node: NodeId) {
        self.graph.remove_edges_from(node);
    }

    /// Removes every edge targeting the given vertex. A non-existent vertex is
    /// a no-op.
    pub fn remove_edges_to(&mut self, node: NodeId) {
        self.graph.remove_edges_to(node);
    }

    /// Returns the payload of the given vertex.
    #[must_use]
    pub fn vertex(&self, node: NodeId) -> Option<&CfgNode> {
        self.graph.node(node)
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns an iterator over `(handle, payload)` for every vertex.
    pub fn vertices(&self) -> impl Iterator<Item = (NodeId, &CfgNode)> + '_ {
        self.graph.nodes()
    }

    /// Returns the number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns an iterator over `(source, target, label)` for every live edge.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &CfgEdgeKind)> + '_ {
        self.graph.edges().filter_map(|(id, label)| {
            self.graph
                .edge_endpoints(id)
                .map(|(source, target)| (source, target, label))
        })
    }

    /// Returns an iterator over `(target, label)` for each outgoing edge of
    /// the given vertex.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid vertex of this fragment.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &CfgEdgeKind)> + '_ {
        self.graph
            .outgoing_edges(node)
            .map(|(_, target, label)| (target, label))
    }

    /// Returns an iterator over `(source, label)` for each incoming edge of
    /// the given vertex.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid vertex of this fragment.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &CfgEdgeKind)> + '_ {
        self.graph
            .incoming_edges(node)
            .map(|(_, source, label)| (source, label))
    }

    /// Returns an iterator over the successors of the given vertex.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid vertex of this fragment.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Returns an iterator over the predecessors of the given vertex.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid vertex of this fragment.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(node)
    }

    /// Returns `true` if `to` is reachable from `from` along directed edges.
    #[must_use]
    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        algorithms::is_reachable(&self.graph, from, to)
    }

    /// Registers a pending break statement.
    pub fn add_break_statement(&mut self, node: NodeId) {
        self.breaks.push(node);
    }

    /// Registers a pending continue statement.
    pub fn add_continue_statement(&mut self, node: NodeId) {
        self.continues.push(node);
    }

    /// Registers a pending return statement.
    pub fn add_return_statement(&mut self, node: NodeId) {
        self.returns.push(node);
    }

    /// Registers a pending goto statement and its target label name.
    pub fn add_goto_statement(&mut self, node: NodeId, target: impl Into<String>) {
        self.gotos.push((node, target.into()));
    }

    /// Returns the pending break statements.
    #[must_use]
    pub fn break_statements(&self) -> &[NodeId] {
        &self.breaks
    }

    /// Returns the pending continue statements.
    #[must_use]
    pub fn continue_statements(&self) -> &[NodeId] {
        &self.continues
    }

    /// Returns the pending return statements.
    #[must_use]
    pub fn return_statements(&self) -> &[NodeId] {
        &self.returns
    }

    /// Returns the pending goto statements with their target label names.
    #[must_use]
    pub fn goto_statements(&self) -> &[(NodeId, String)] {
        &self.gotos
    }

    /// Drains and returns the pending break statements.
    pub fn take_break_statements(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.breaks)
    }

    /// Drains and returns the pending continue statements.
    pub fn take_continue_statements(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.continues)
    }

    /// Drains and returns the pending return statements.
    pub fn take_return_statements(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.returns)
    }

    /// Drains and returns the pending goto statements.
    pub fn take_goto_statements(&mut self) -> Vec<(NodeId, String)> {
        std::mem::take(&mut self.gotos)
    }

    /// Declares a label in this fragment's label table.
    pub fn add_label(&mut self, name: impl Into<String>, node: NodeId) {
        self.labels.insert(name.into(), node);
    }

    /// Returns the vertex a declared label identifies.
    #[must_use]
    pub fn label_target(&self, name: &str) -> Option<NodeId> {
        self.labels.get(name).copied()
    }

    /// Returns an iterator over the visible labels.
    pub fn labels(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.labels.iter().map(|(name, &node)| (name.as_str(), node))
    }

    /// Removes and returns every `case*`/`default` label, sorted by name.
    ///
    /// Case labels only have meaning to the switch that absorbed them; hiding
    /// them here keeps a nested switch from capturing its parent's labels and
    /// keeps them out of goto resolution.
    pub fn drain_switch_labels(&mut self) -> Vec<(String, NodeId)> {
        let mut switch_labels = Vec::new();
        self.labels.retain(|name, &mut node| {
            if name.starts_with("case") || name.starts_with("default") {
                switch_labels.push((name.clone(), node));
                false
            } else {
                true
            }
        });
        switch_labels.sort_by(|(a, _), (b, _)| a.cmp(b));
        switch_labels
    }

    /// Registers a formal-parameter vertex.
    pub fn register_parameter(&mut self, node: NodeId) {
        self.parameters.push(node);
    }

    /// Returns the registered formal-parameter vertices.
    #[must_use]
    pub fn parameters(&self) -> &[NodeId] {
        &self.parameters
    }

    /// Merges `other` into this fragment without rewiring: copies every
    /// interior vertex and every edge not touching `other`'s entry/exit, and
    /// transfers its registries, label table and parameter list.
    ///
    /// If both fragments carry an exception vertex, a fresh one is created and
    /// both prior vertices are wired to it with `UnhandledExcept`, modelling
    /// "either inner exception point may itself go unhandled". If only `other`
    /// carries one, it becomes this fragment's exception point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if `other`'s bookkeeping references a
    /// vertex that did not survive the merge, which would indicate a corrupted
    /// fragment.
    pub fn absorb(&mut self, other: Cfg) -> Result<NodeMap> {
        self.merge_from(&other)
    }

    /// Sequential composition: splices `other` in front of this fragment's
    /// exit.
    ///
    /// Every edge that reached the exit is redirected at the successors of
    /// `other`'s entry (keeping its own label), and every edge that reached
    /// `other`'s exit is redirected at this fragment's exit (keeping its own
    /// label). An empty `other` leaves the structure untouched and only
    /// transfers bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] on corrupted fragments; see
    /// [`absorb`](Cfg::absorb).
    pub fn append(&mut self, other: Cfg) -> Result<()> {
        let map = self.merge_from(&other)?;
        if other.is_empty() {
            return Ok(());
        }

        let exit_preds: Vec<(NodeId, CfgEdgeKind)> = self
            .incoming(self.exit)
            .map(|(source, label)| (source, label.clone()))
            .collect();
        let entry_succs: Vec<NodeId> = other.graph.successors(other.entry).collect();

        for (source, label) in &exit_preds {
            for &succ in &entry_succs {
                if let Some(target) = map.get(succ) {
                    self.graph.add_edge(*source, target, label.clone())?;
                }
            }
        }
        self.graph.remove_edges_to(self.exit);

        let other_exit_preds: Vec<(NodeId, CfgEdgeKind)> = other
            .graph
            .incoming_edges(other.exit)
            .map(|(_, source, label)| (source, label.clone()))
            .collect();
        for (source, label) in other_exit_preds {
            if let Some(source) = map.get(source) {
                self.graph.add_edge(source, self.exit, label)?;
            }
        }

        Ok(())
    }

    /// Splices a single vertex in front of this fragment's exit, as if a
    /// one-vertex fragment had been appended. Returns the new vertex's handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] on dangling handles; cannot occur for a
    /// well-formed fragment.
    pub fn append_node(&mut self, node: CfgNode) -> Result<NodeId> {
        let vertex = self.graph.add_node(node);
        let exit_preds: Vec<(NodeId, CfgEdgeKind)> = self
            .incoming(self.exit)
            .map(|(source, label)| (source, label.clone()))
            .collect();
        for (source, label) in exit_preds {
            self.graph.add_edge(source, vertex, label)?;
        }
        self.graph.remove_edges_to(self.exit);
        self.graph.add_edge(vertex, self.exit, CfgEdgeKind::Empty)?;
        Ok(vertex)
    }

    /// Branch composition: mounts `other` as an alternative path from
    /// `branch` to `merge`.
    ///
    /// The successors of `other`'s entry are entered from `branch` under
    /// `label`; the predecessors of `other`'s exit reconverge at `merge` with
    /// their own labels. An empty `other` degenerates to a single `label` edge
    /// from `branch` to `merge`.
    ///
    /// Returns the handle remapping so callers can locate mounted vertices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if `branch`/`merge` are dangling or the
    /// merged fragment is corrupted.
    pub fn mount(
        &mut self,
        branch: NodeId,
        merge: NodeId,
        other: Cfg,
        label: CfgEdgeKind,
    ) -> Result<NodeMap> {
        if other.is_empty() {
            self.graph.add_edge(branch, merge, label)?;
            return Ok(NodeMap::empty());
        }

        let map = self.merge_from(&other)?;

        let entry_succs: Vec<NodeId> = other.graph.successors(other.entry).collect();
        for succ in entry_succs {
            if let Some(target) = map.get(succ) {
                self.graph.add_edge(branch, target, label.clone())?;
            }
        }

        let exit_preds: Vec<(NodeId, CfgEdgeKind)> = other
            .graph
            .incoming_edges(other.exit)
            .map(|(_, source, label)| (source, label.clone()))
            .collect();
        for (source, label) in exit_preds {
            if let Some(source) = map.get(source) {
                self.graph.add_edge(source, merge, label)?;
            }
        }

        Ok(map)
    }

    /// Returns an edge-reversed copy of this fragment with entry and exit
    /// swapped, for backward analyses. Registries and labels do not carry
    /// over; the parameter list does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] on a corrupted fragment; cannot occur for
    /// fragments built through this API.
    pub fn reverse(&self) -> Result<Cfg> {
        let mut graph = DirectedGraph::with_capacity(self.graph.node_count(), self.graph.edge_count());
        for (_, node) in self.graph.nodes() {
            graph.add_node(node.clone());
        }

        let mut reversed = Cfg {
            graph,
            entry: self.exit,
            exit: self.entry,
            error: self.error,
            exception: self.exception,
            breaks: Vec::new(),
            continues: Vec::new(),
            returns: Vec::new(),
            gotos: Vec::new(),
            labels: HashMap::new(),
            parameters: self.parameters.clone(),
        };

        for (id, label) in self.graph.edges() {
            if let Some((source, target)) = self.graph.edge_endpoints(id) {
                reversed.graph.add_edge(target, source, label.clone())?;
            }
        }

        Ok(reversed)
    }

    /// Generates a DOT rendering of this fragment for debugging with Graphviz.
    ///
    /// Entry is highlighted green, exit red. This is a development aid; the
    /// program-graph export lives outside this crate.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CFG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        for (id, node) in self.vertices() {
            let style = if id == self.entry {
                ", style=filled, fillcolor=lightgreen"
            } else if id == self.exit {
                ", style=filled, fillcolor=lightcoral"
            } else {
                ""
            };
            let _ = writeln!(
                dot,
                "    {id} [label=\"{}\"{style}];",
                escape_dot(&node.to_string())
            );
        }

        dot.push('\n');

        for (source, target, label) in self.edges() {
            let color = match label {
                CfgEdgeKind::Empty => "black",
                CfgEdgeKind::True => "green",
                CfgEdgeKind::False => "red",
                CfgEdgeKind::Case(_) => "blue",
                _ => "purple",
            };
            let _ = writeln!(
                dot,
                "    {source} -> {target} [label=\"{}\", color={color}];",
                escape_dot(&label.to_string())
            );
        }

        dot.push_str("}\n");
        dot
    }

    /// Copies `other`'s interior structure and bookkeeping into `self`,
    /// returning the handle remapping. Edges out of `other`'s entry and into
    /// its exit are left for the caller to rewire.
    fn merge_from(&mut self, other: &Cfg) -> Result<NodeMap> {
        let mut map = vec![None; other.graph.node_count()];
        for (id, node) in other.graph.nodes() {
            if id == other.entry || id == other.exit {
                continue;
            }
            map[id.index()] = Some(self.graph.add_node(node.clone()));
        }
        let map = NodeMap { map };

        for (id, label) in other.graph.edges() {
            let Some((source, target)) = other.graph.edge_endpoints(id) else {
                continue;
            };
            if source == other.entry || target == other.exit {
                continue;
            }
            self.graph.add_edge(
                Self::image(&map, source)?,
                Self::image(&map, target)?,
                label.clone(),
            )?;
        }

        for &node in &other.breaks {
            self.breaks.push(Self::image(&map, node)?);
        }
        for &node in &other.continues {
            self.continues.push(Self::image(&map, node)?);
        }
        for &node in &other.returns {
            self.returns.push(Self::image(&map, node)?);
        }
        for (node, target) in &other.gotos {
            self.gotos.push((Self::image(&map, *node)?, target.clone()));
        }
        for (name, &node) in &other.labels {
            self.labels.insert(name.clone(), Self::image(&map, node)?);
        }
        for &node in &other.parameters {
            self.parameters.push(Self::image(&map, node)?);
        }

        match (self.exception, other.exception) {
            (Some(mine), Some(theirs)) => {
                let theirs = Self::image(&map, theirs)?;
                let merged = self.new_exception_node();
                self.graph
                    .add_edge(mine, merged, CfgEdgeKind::UnhandledExcept)?;
                self.graph
                    .add_edge(theirs, merged, CfgEdgeKind::UnhandledExcept)?;
            }
            (None, Some(theirs)) => {
                self.exception = Some(Self::image(&map, theirs)?);
            }
            _ => {}
        }

        Ok(map)
    }

    /// Resolves the image of an interior vertex; entry/exit handles ending up
    /// in bookkeeping would mean the fragment is corrupted.
    fn image(map: &NodeMap, old: NodeId) -> Result<NodeId> {
        map.get(old).ok_or_else(|| {
            Error::GraphError(format!(
                "vertex {old} has no image in the merged fragment"
            ))
        })
    }
}
