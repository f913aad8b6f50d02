//! Graphviz output.

use std::fmt::Write;

use crate::fsm::FsMachine;

/// Renders a machine as a Graphviz `digraph`.
///
/// The start state and terminal states are drawn as double circles; guards
/// become edge labels.
#[must_use]
pub fn fsm_to_dot(fsm: &FsMachine) -> String {
    let mut out = String::new();
    out.push_str("digraph FSM {\n  rankdir=LR;\n\n");

    for (id, name) in fsm.states() {
        let shape = if id == fsm.start() || fsm.is_terminal(id) {
            "doublecircle"
        } else {
            "circle"
        };
        // Writing into a String cannot fail.
        let _ = writeln!(out, "  {id} [label=\"{}\", shape={shape}];", escape(name));
    }
    out.push('\n');

    for t in fsm.transitions() {
        let _ = match t.condition() {
            Some(cond) => writeln!(out, "  {} -> {} [label=\"{}\"];", t.from(), t.to(), escape(cond)),
            None => writeln!(out, "  {} -> {};", t.from(), t.to()),
        };
    }

    out.push_str("}\n");
    out
}

/// Escapes text for a double-quoted DOT string.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
