//! Graphviz and JSON output.

use statecraft_machine::{END_STATE, FsMachine, START_STATE, StateId, fsm_to_dot, fsm_to_json};

const ORDER: &str = "@startuml
start
:Receive order;
if (in stock?) then (yes)
  :Ship;
else (no)
  :Backorder;
endif
stop
@enduml
";

fn order() -> FsMachine {
    statecraft_ad::build_fsm_from_plantuml(ORDER).expect("valid diagram")
}

// =============================================================================
// Graphviz
// =============================================================================

#[test]
fn dot_marks_terminals_and_guards() {
    let fsm = order();
    let dot = fsm_to_dot(&fsm);
    assert!(dot.starts_with("digraph FSM {\n  rankdir=LR;"));
    assert!(dot.trim_end().ends_with('}'));

    let end = fsm.state_by_name(END_STATE).expect("end state");
    assert!(dot.contains(&format!("  {end} [label=\"END\", shape=doublecircle];")));
    let start = fsm.state_by_name(START_STATE).expect("start state");
    assert!(dot.contains(&format!("  {start} [label=\"START\", shape=doublecircle];")));
    let ship = fsm.state_by_name("Ship").expect("ship state");
    assert!(dot.contains(&format!("  {ship} [label=\"Ship\", shape=circle];")));
    assert!(dot.contains("[label=\"in stock? [yes]\"];"), "{dot}");
}

#[test]
fn dot_has_one_line_per_state_and_transition() {
    let fsm = order();
    let dot = fsm_to_dot(&fsm);
    let edges = dot.lines().filter(|l| l.contains(" -> ")).count();
    let states = dot.lines().filter(|l| l.contains("shape=")).count();
    assert_eq!(edges, fsm.transitions().len());
    assert_eq!(states, fsm.state_count());
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn json_round_trips_a_compiled_machine() {
    let fsm = order();
    let json = fsm_to_json(&fsm).expect("serializes");
    let back: FsMachine = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back, fsm);
}

#[test]
fn json_lists_state_names() {
    let json = fsm_to_json(&order()).expect("serializes");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    let states = value["states"].as_array().expect("states array");
    assert_eq!(states.len(), 5);
    assert_eq!(states[0], "START");
    assert_eq!(value["start"], 0);
}

#[test]
fn reachability_of_scl_machine() {
    let fsm = statecraft_scl::build_fsm_from_scl(
        "context C { }\n\
         state A uses C { next { otherwise => B } }\n\
         state B uses C { next { otherwise => B } }\n\
         state Orphan uses C { next { otherwise => A } }",
    )
    .expect("valid program");
    assert_eq!(fsm.reachable_states(), vec![StateId(0), StateId(1)]);
}
