//! Incremental construction of a [`CfGraph`].
//!
//! Lowering passes create nodes and link them in program order. An
//! annotation (branch condition and label) can be staged with
//! [`CfgBuilder::annotate`]; the next edge created picks it up. This is how a
//! decision hands its condition to the first edge of a branch body without
//! knowing what that body starts with.

use std::collections::HashMap;

use statecraft_foundation::{Error, Result};
use tracing::debug;

use super::{CfGraph, CfgCond, CfgEdge, CfgNodeKind, NodeId};

/// A `goto` whose target label may not be defined yet.
#[derive(Debug, Clone)]
struct PendingGoto {
    from: NodeId,
    label: String,
    cond: Option<CfgCond>,
    edge_label: Option<String>,
}

/// Builds a control flow graph.
#[derive(Debug, Default)]
pub struct CfgBuilder {
    cfg: CfGraph,
    labels: HashMap<String, NodeId>,
    pending_gotos: Vec<PendingGoto>,
    loop_exits: Vec<NodeId>,
    pending_cond: Option<CfgCond>,
    pending_label: Option<String>,
    end: Option<NodeId>,
}

impl CfgBuilder {
    /// Creates a builder whose graph holds only the start node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The start node.
    #[must_use]
    pub fn start(&self) -> NodeId {
        self.cfg.start()
    }

    /// Adds a node.
    pub fn node(&mut self, kind: CfgNodeKind) -> NodeId {
        self.cfg.add_node(kind)
    }

    /// The shared terminal node, created on first use.
    pub fn end(&mut self) -> NodeId {
        match self.end {
            Some(end) => end,
            None => {
                let end = self.cfg.add_node(CfgNodeKind::End);
                self.end = Some(end);
                end
            }
        }
    }

    /// Stages a branch condition and optional label for the next edge.
    pub fn annotate(&mut self, cond: CfgCond, label: Option<String>) {
        self.pending_cond = Some(cond);
        self.pending_label = None;
        if let Some(label) = label {
            self.annotate_label(label);
        }
    }

    /// Stages a label for the next edge, appending to one already staged.
    pub fn annotate_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.pending_label = Some(match self.pending_label.take() {
            Some(existing) => format!("{existing}, {label}"),
            None => label,
        });
    }

    /// Drops any staged annotation.
    pub fn clear_annotation(&mut self) {
        self.pending_cond = None;
        self.pending_label = None;
    }

    /// Links `from` to `to`, consuming the staged annotation.
    pub fn link(&mut self, from: NodeId, to: NodeId) {
        let cond = self.pending_cond.take();
        let label = self.pending_label.take();
        self.cfg.add_edge(CfgEdge::new(from, to, cond, label));
    }

    /// Binds a label to a node.
    ///
    /// # Errors
    /// Returns a duplicate error if the label is already bound.
    pub fn define_label(&mut self, name: &str, node: NodeId) -> Result<()> {
        if self.labels.contains_key(name) {
            return Err(Error::duplicate("label", name));
        }
        self.labels.insert(name.to_string(), node);
        Ok(())
    }

    /// Records a jump from `from` to a label, resolved by [`Self::finish`].
    pub fn goto(&mut self, from: NodeId, label: impl Into<String>) {
        self.pending_gotos.push(PendingGoto {
            from,
            label: label.into(),
            cond: self.pending_cond.take(),
            edge_label: self.pending_label.take(),
        });
    }

    /// Enters a loop whose `break` jumps to `exit`.
    pub fn push_loop(&mut self, exit: NodeId) {
        self.loop_exits.push(exit);
    }

    /// Leaves the innermost loop.
    pub fn pop_loop(&mut self) {
        self.loop_exits.pop();
    }

    /// Exit of the innermost loop.
    #[must_use]
    pub fn loop_exit(&self) -> Option<NodeId> {
        self.loop_exits.last().copied()
    }

    /// Whether any edge enters `id`, pending gotos included.
    #[must_use]
    pub fn has_incoming(&self, id: NodeId) -> bool {
        self.cfg.has_incoming(id)
            || self
                .pending_gotos
                .iter()
                .any(|g| self.labels.get(&g.label) == Some(&id))
    }

    /// The graph built so far.
    #[must_use]
    pub fn graph(&self) -> &CfGraph {
        &self.cfg
    }

    /// Resolves pending gotos and returns the graph.
    ///
    /// # Errors
    /// Returns an undefined label error for a `goto` to an unbound label.
    pub fn finish(mut self) -> Result<CfGraph> {
        for goto in std::mem::take(&mut self.pending_gotos) {
            let Some(&target) = self.labels.get(&goto.label) else {
                return Err(Error::undefined_label(goto.label));
            };
            debug!(label = %goto.label, from = %goto.from, to = %target, "resolved goto");
            self.cfg
                .add_edge(CfgEdge::new(goto.from, target, goto.cond, goto.edge_label));
        }
        Ok(self.cfg)
    }
}
