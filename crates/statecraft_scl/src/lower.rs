//! Program to state machine.

use statecraft_foundation::{Error, Result};
use statecraft_machine::{FsMachine, StateId};
use tracing::debug;

use crate::ast::Program;

/// Builds the state machine of a checked program.
///
/// Every state declaration becomes a state, in declaration order, and the
/// first one is the start. Each `next` case becomes a transition whose
/// priority is the case's position and whose condition is the printed
/// guard; `otherwise` is unconditioned. A state whose cases all lead back
/// to itself is terminal.
///
/// # Errors
/// Returns an undefined state error for a `next` target that is not
/// declared; [`check`](crate::check) reports the same problem with its
/// position.
pub fn lower(program: &Program) -> Result<FsMachine> {
    let mut fsm = FsMachine::new();
    let ids: Vec<StateId> = program
        .states
        .iter()
        .map(|s| fsm.add_state(s.name.as_str()))
        .collect();

    for (state, &from) in program.states.iter().zip(&ids) {
        let mut terminal = true;
        for case in state.next.cases() {
            let to = program
                .states
                .iter()
                .position(|s| s.name == case.target)
                .map(|i| ids[i])
                .ok_or_else(|| Error::undefined("state", case.target.as_str()))?;
            terminal &= to == from;
            fsm.add_transition(from, to, case.condition.as_ref().map(ToString::to_string));
        }
        if terminal {
            fsm.add_terminal(from);
        }
    }

    if let Some(&start) = ids.first() {
        fsm.set_start(start);
    }
    debug!(
        states = fsm.state_count(),
        transitions = fsm.transitions().len(),
        "lowered SCL program"
    );
    Ok(fsm)
}
