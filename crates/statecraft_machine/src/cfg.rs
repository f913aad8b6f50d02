//! Control flow graphs.
//!
//! A [`CfGraph`] is the intermediate form between a parsed program and its
//! state machine. Nodes are statements (actions), branch points (decisions)
//! and join points (merges); edges carry the branch condition and any label
//! the source attached to the arrow.

mod builder;

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use builder::CfgBuilder;

/// Index of a node in a [`CfGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// What a control flow node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CfgNodeKind {
    /// Entry point; always node 0.
    Start,
    /// A statement that becomes a state.
    Action(String),
    /// A branch point; the text is the tested expression.
    Decision(String),
    /// A join point with no behavior of its own.
    Merge,
    /// The terminal node shared by every `stop`.
    End,
}

impl CfgNodeKind {
    /// Whether the node becomes a state of the machine.
    #[must_use]
    pub const fn is_state(&self) -> bool {
        matches!(self, Self::Start | Self::Action(_) | Self::End)
    }
}

/// Condition attached to a branch edge.
///
/// `seq` is the position of the branch within its decision, so the branches
/// of one decision are tested in `seq` order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CfgCond {
    seq: u64,
    name: String,
}

impl CfgCond {
    /// Creates a branch condition.
    #[must_use]
    pub fn new(seq: u64, name: impl Into<String>) -> Self {
        Self {
            seq,
            name: name.into(),
        }
    }

    /// Branch position within its decision.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Condition text.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CfgCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A directed edge of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CfgEdge {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Branch condition, on edges leaving a decision.
    pub cond: Option<CfgCond>,
    /// Free-form label (`yes`, `no`, an arrow label, ...).
    pub label: Option<String>,
}

impl CfgEdge {
    /// Creates an edge.
    #[must_use]
    pub fn new(from: NodeId, to: NodeId, cond: Option<CfgCond>, label: Option<String>) -> Self {
        Self {
            from,
            to,
            cond,
            label,
        }
    }

    /// Creates an edge with neither condition nor label.
    #[must_use]
    pub fn plain(from: NodeId, to: NodeId) -> Self {
        Self::new(from, to, None, None)
    }

    /// Renders the condition and label as a single guard text.
    ///
    /// `x > 0` with label `yes` renders as `x > 0 [yes]`; a label alone
    /// renders as itself.
    #[must_use]
    pub fn condition(&self) -> Option<String> {
        match (&self.cond, &self.label) {
            (None, None) => None,
            (Some(cond), None) => Some(cond.name.clone()),
            (None, Some(label)) => Some(label.clone()),
            (Some(cond), Some(label)) => Some(format!("{} [{label}]", cond.name)),
        }
    }
}

/// A control flow graph with nodes and edges kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CfGraph {
    nodes: Vec<CfgNodeKind>,
    edges: Vec<CfgEdge>,
}

impl Default for CfGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CfGraph {
    /// Creates a graph holding only the start node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![CfgNodeKind::Start],
            edges: Vec::new(),
        }
    }

    /// The start node.
    #[must_use]
    pub const fn start(&self) -> NodeId {
        NodeId(0)
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, kind: CfgNodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(kind);
        id
    }

    /// Adds an edge unless an identical one is already present.
    pub fn add_edge(&mut self, edge: CfgEdge) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&CfgNodeKind> {
        self.nodes.get(id.0)
    }

    /// All nodes with their ids, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &CfgNodeKind)> {
        self.nodes.iter().enumerate().map(|(i, k)| (NodeId(i), k))
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[CfgEdge] {
        &self.edges
    }

    /// Edges leaving `id`, in insertion order.
    pub fn edges_from(&self, id: NodeId) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    /// Whether any edge enters `id`.
    #[must_use]
    pub fn has_incoming(&self, id: NodeId) -> bool {
        self.edges.iter().any(|e| e.to == id)
    }
}
