//! Finite state machines.
//!
//! [`cfg_to_fsm`] turns a control flow graph into a machine whose states are
//! the graph's start, action and end nodes. Decisions and merges disappear:
//! a transition runs from one state to the next state reachable through
//! them, guarded by the conditions met on the way.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cfg::{CfGraph, CfgEdge, CfgNodeKind, NodeId};

/// Name of the state made from the start node.
pub const START_STATE: &str = "START";

/// Name of the state made from the end node.
pub const END_STATE: &str = "END";

/// Index of a state in an [`FsMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateId(pub usize);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A guarded move between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    from: StateId,
    to: StateId,
    condition: Option<String>,
    priority: u32,
}

impl Transition {
    /// Source state.
    #[must_use]
    pub const fn from(&self) -> StateId {
        self.from
    }

    /// Target state.
    #[must_use]
    pub const fn to(&self) -> StateId {
        self.to
    }

    /// Guard text; `None` means the transition is always taken.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// Evaluation order among the transitions leaving the same state,
    /// lowest first.
    #[must_use]
    pub const fn priority(&self) -> u32 {
        self.priority
    }
}

/// A finite state machine with named states.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FsMachine {
    states: Vec<String>,
    transitions: Vec<Transition>,
    start: StateId,
    terminals: Vec<StateId>,
    /// Transitions leaving each state, over `transitions[..counted]`.
    #[cfg_attr(feature = "serde", serde(skip))]
    out_degree: HashMap<StateId, u32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    counted: usize,
}

impl PartialEq for FsMachine {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
            && self.transitions == other.transitions
            && self.start == other.start
            && self.terminals == other.terminals
    }
}

impl Eq for FsMachine {}

impl FsMachine {
    /// Creates an empty machine; the first state added becomes the start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state and returns its id.
    pub fn add_state(&mut self, name: impl Into<String>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(name.into());
        id
    }

    /// Adds a transition; its priority follows the transitions already
    /// leaving `from`.
    pub fn add_transition(&mut self, from: StateId, to: StateId, condition: Option<String>) {
        for t in &self.transitions[self.counted..] {
            let degree = self.out_degree.entry(t.from).or_default();
            *degree = degree.saturating_add(1);
        }
        let degree = self.out_degree.entry(from).or_default();
        let priority = *degree;
        *degree = degree.saturating_add(1);
        self.transitions.push(Transition {
            from,
            to,
            condition,
            priority,
        });
        self.counted = self.transitions.len();
    }

    /// Sets the start state.
    pub fn set_start(&mut self, id: StateId) {
        self.start = id;
    }

    /// Marks a state as terminal.
    pub fn add_terminal(&mut self, id: StateId) {
        if !self.terminals.contains(&id) {
            self.terminals.push(id);
        }
    }

    /// All states with their ids, in id order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &str)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, name)| (StateId(i), name.as_str()))
    }

    /// Number of states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Name of a state.
    #[must_use]
    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.states.get(id.0).map(String::as_str)
    }

    /// First state with the given name.
    #[must_use]
    pub fn state_by_name(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s == name).map(StateId)
    }

    /// All transitions in creation order.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leaving `id`, by priority.
    pub fn transitions_from(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from == id)
    }

    /// The start state.
    #[must_use]
    pub const fn start(&self) -> StateId {
        self.start
    }

    /// Terminal states.
    #[must_use]
    pub fn terminals(&self) -> &[StateId] {
        &self.terminals
    }

    /// Whether `id` is terminal.
    #[must_use]
    pub fn is_terminal(&self, id: StateId) -> bool {
        self.terminals.contains(&id)
    }

    /// States reachable from the start, in id order.
    #[must_use]
    pub fn reachable_states(&self) -> Vec<StateId> {
        if self.states.is_empty() {
            return Vec::new();
        }
        let mut seen = BTreeSet::from([self.start]);
        let mut queue = VecDeque::from([self.start]);
        while let Some(id) = queue.pop_front() {
            for t in self.transitions_from(id) {
                if seen.insert(t.to) {
                    queue.push_back(t.to);
                }
            }
        }
        seen.into_iter().collect()
    }
}

/// Serializes a machine to pretty-printed JSON.
///
/// # Errors
/// Returns a serialization error if encoding fails.
#[cfg(feature = "serde")]
pub fn fsm_to_json(fsm: &FsMachine) -> statecraft_foundation::Result<String> {
    serde_json::to_string_pretty(fsm).map_err(|e| {
        statecraft_foundation::Error::new(statecraft_foundation::ErrorKind::Serialization(
            e.to_string(),
        ))
    })
}

/// Converts a control flow graph into a state machine.
///
/// States are created in node order. For every state node, outgoing edges
/// are followed in insertion order through decision and merge nodes until a
/// state node is reached; the conditions met on the way are joined with
/// ` && `. Branches of one node that lead to the same outcomes share a guard
/// `(a || b)`, and when every branch does, the node adds no guard at all. A
/// cycle made only of decisions and merges yields no transition.
#[must_use]
pub fn cfg_to_fsm(cfg: &CfGraph) -> FsMachine {
    let mut fsm = FsMachine::new();
    let mut state_of: HashMap<NodeId, StateId> = HashMap::new();

    for (node, kind) in cfg.nodes() {
        let name = match kind {
            CfgNodeKind::Start => START_STATE.to_string(),
            CfgNodeKind::Action(text) => text.clone(),
            CfgNodeKind::End => END_STATE.to_string(),
            CfgNodeKind::Decision(_) | CfgNodeKind::Merge => continue,
        };
        let id = fsm.add_state(name);
        if *kind == CfgNodeKind::End {
            fsm.add_terminal(id);
        }
        state_of.insert(node, id);
    }
    if let Some(&start) = state_of.get(&cfg.start()) {
        fsm.set_start(start);
    }

    let mut walker = Walker::new(cfg);
    for (node, kind) in cfg.nodes() {
        if !kind.is_state() {
            continue;
        }
        let from = state_of[&node];
        for (target, guards) in walker.reach(node).iter() {
            let condition = (!guards.is_empty()).then(|| guards.join(" && "));
            fsm.add_transition(from, state_of[target], condition);
        }
    }

    debug!(
        states = fsm.state_count(),
        transitions = fsm.transitions().len(),
        "built state machine"
    );
    fsm
}

// =============================================================================
// Reachability through decisions and merges
// =============================================================================

/// `(state node, guards)` pairs reachable from a node, in discovery order.
type Reach = Rc<Vec<(NodeId, Vec<String>)>>;

/// Resolves state-to-state reachability, walking each pass-through node once.
struct Walker<'g> {
    cfg: &'g CfGraph,
    out: Vec<Vec<&'g CfgEdge>>,
    memo: HashMap<NodeId, Reach>,
}

/// A node whose outgoing edges are being followed.
struct Frame {
    node: NodeId,
    next: usize,
    /// Condition of the edge whose target is being resolved above this frame.
    pending: Option<String>,
    branches: Vec<(Option<String>, Reach)>,
    /// Lowest stack index of an unfinished node met below this frame.
    low: usize,
}

impl Frame {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            next: 0,
            pending: None,
            branches: Vec::new(),
            low: usize::MAX,
        }
    }
}

impl<'g> Walker<'g> {
    fn new(cfg: &'g CfGraph) -> Self {
        let mut out = vec![Vec::new(); cfg.node_count()];
        for edge in cfg.edges() {
            if let Some(list) = out.get_mut(edge.from.0) {
                list.push(edge);
            }
        }
        Self {
            cfg,
            out,
            memo: HashMap::new(),
        }
    }

    /// Everything reachable from the state node `root`.
    ///
    /// Iterative so long chains of decisions do not grow the call stack. A
    /// node's result is cached unless it was cut short by a cycle through a
    /// node still being resolved further down the stack.
    fn reach(&mut self, root: NodeId) -> Reach {
        let mut stack = vec![Frame::new(root)];
        loop {
            let top = stack.len() - 1;
            let node = stack[top].node;
            if let Some(&edge) = self.out[node.0].get(stack[top].next) {
                stack[top].next += 1;
                let cond = edge.condition();
                let reach = match self.cfg.node(edge.to) {
                    Some(kind) if kind.is_state() => Rc::new(vec![(edge.to, Vec::new())]),
                    Some(_) => {
                        if let Some(reach) = self.memo.get(&edge.to) {
                            Rc::clone(reach)
                        } else if let Some(at) = stack.iter().position(|f| f.node == edge.to) {
                            stack[top].low = stack[top].low.min(at);
                            Reach::default()
                        } else {
                            stack[top].pending = cond;
                            stack.push(Frame::new(edge.to));
                            continue;
                        }
                    }
                    None => continue,
                };
                stack[top].branches.push((cond, reach));
                continue;
            }

            let Some(frame) = stack.pop() else {
                return Reach::default();
            };
            let reach = combine(frame.branches);
            let Some(parent) = stack.last_mut() else {
                return reach;
            };
            if frame.low >= top {
                self.memo.insert(frame.node, Rc::clone(&reach));
            }
            parent.low = parent.low.min(frame.low);
            let cond = parent.pending.take();
            parent.branches.push((cond, reach));
        }
    }
}

/// Merges the branches of one node, prefixing each branch's guard.
fn combine(branches: Vec<(Option<String>, Reach)>) -> Reach {
    let mut groups: Vec<(Vec<Option<String>>, Reach)> = Vec::new();
    for (cond, reach) in branches {
        match groups
            .iter_mut()
            .find(|(_, seen)| Rc::ptr_eq(seen, &reach) || **seen == *reach)
        {
            Some((conds, _)) => conds.push(cond),
            None => groups.push((vec![cond], reach)),
        }
    }
    if let [(conds, reach)] = groups.as_slice() {
        if conds.len() > 1 || conds[0].is_none() {
            return Rc::clone(reach);
        }
    }

    let mut merged = Vec::new();
    for (conds, reach) in groups {
        let guard = alternatives(conds);
        for (target, guards) in reach.iter() {
            let entry = (*target, guard.iter().chain(guards).cloned().collect::<Vec<_>>());
            if !merged.contains(&entry) {
                merged.push(entry);
            }
        }
    }
    Rc::new(merged)
}

/// `a`, `(a || b)`, or `None` when any branch is unconditioned.
fn alternatives(conds: Vec<Option<String>>) -> Option<String> {
    let conds: Option<Vec<String>> = conds.into_iter().collect();
    match conds?.as_slice() {
        [single] => Some(single.clone()),
        many => Some(format!("({})", many.join(" || "))),
    }
}
