//! Activity diagram compilation.

use statecraft_foundation::ErrorKind;
use statecraft_machine::{END_STATE, FsMachine, START_STATE};

fn compile(source: &str) -> FsMachine {
    statecraft_ad::build_fsm_from_plantuml(source).expect("valid diagram")
}

fn edges(fsm: &FsMachine) -> Vec<(String, String, Option<String>)> {
    fsm.transitions()
        .iter()
        .map(|t| {
            (
                fsm.state_name(t.from()).unwrap_or("?").to_string(),
                fsm.state_name(t.to()).unwrap_or("?").to_string(),
                t.condition().map(str::to_string),
            )
        })
        .collect()
}

fn edge(from: &str, to: &str, cond: Option<&str>) -> (String, String, Option<String>) {
    (from.into(), to.into(), cond.map(str::to_string))
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn repeat_loop_runs_body_first() {
    let fsm = compile(
        "start\nrepeat\n:poll;\nrepeat while (busy?) is (again) not (done)\n:report;\nstop\n",
    );
    assert_eq!(
        edges(&fsm),
        vec![
            edge(START_STATE, "poll", None),
            edge("poll", "poll", Some("busy? [again]")),
            edge("poll", "report", Some("not (busy?) [done]")),
            edge("report", END_STATE, None),
        ]
    );
}

#[test]
fn switch_cases_keep_their_order() {
    let fsm = compile("start\nswitch (light)\ncase (red)\n:halt;\ncase (green)\n:go;\nendswitch\nstop\n");
    let from_start: Vec<_> = fsm
        .transitions_from(fsm.start())
        .map(|t| (t.condition().map(str::to_string), t.priority()))
        .collect();
    assert_eq!(
        from_start,
        vec![(Some("red".to_string()), 0), (Some("green".to_string()), 1)]
    );
}

#[test]
fn activity_reference_becomes_a_call_state() {
    let fsm = compile("start\n:activity Payment;\nstop\n");
    assert!(fsm.state_by_name("call Payment").is_some());
    assert_eq!(fsm.state_count(), 3);
}

#[test]
fn statements_after_stop_are_dropped() {
    let fsm = compile("start\n:a;\nstop\n:ghost;\n");
    assert!(fsm.state_by_name("ghost").is_none());
    assert_eq!(edges(&fsm), vec![edge(START_STATE, "a", None), edge("a", END_STATE, None)]);
}

#[test]
fn every_state_is_reachable_in_a_structured_diagram() {
    let fsm = compile(
        "@startuml\ntitle Orders\nstart\n:receive;\nif (paid?) then (yes)\n  \
         while (items?) is (more)\n    :pack;\n  endwhile (none)\n  :ship;\nelse (no)\n  :cancel;\nendif\nstop\n@enduml\n",
    );
    assert_eq!(fsm.reachable_states().len(), fsm.state_count());
}

#[test]
fn chained_empty_ifs_collapse_to_one_transition() {
    let ifs: String = (0..24).map(|i| format!("if (c{i}) then\nendif\n")).collect();
    let source = format!("start\n:a;\n{ifs}:b;\nstop\n");
    let started = std::time::Instant::now();
    let fsm = compile(&source);
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
    assert_eq!(
        edges(&fsm),
        vec![
            edge(START_STATE, "a", None),
            edge("a", "b", None),
            edge("b", END_STATE, None),
        ]
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn syntax_error_has_position_and_report() {
    let err = statecraft_ad::build_fsm_from_plantuml("start\nif (a) then\n:x;\n")
        .expect_err("missing endif");
    let ErrorKind::ParseError { line, context, .. } = &err.kind else {
        panic!("expected parse error, got {err}");
    };
    assert_eq!(*line, 4);
    assert!(context.contains("position:"), "{context}");
}

#[test]
fn duplicate_label_is_rejected() {
    let err = statecraft_ad::build_fsm_from_plantuml("start\nlabel a\n:x;\nlabel a\n:y;\n")
        .expect_err("duplicate label");
    assert!(matches!(err.kind, ErrorKind::Duplicate { what: "label", .. }), "{err}");
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let depth = 3000;
    let source = format!("start\n{}:a;\n{}stop\n", "if (x) then\n".repeat(depth), "endif\n".repeat(depth));
    let err = statecraft_ad::build_fsm_from_plantuml(&source).expect_err("too deep");
    assert!(err.is_parse_error(), "{err}");
}

#[test]
fn statements_after_enduml_are_a_syntax_error() {
    let err = statecraft_ad::build_fsm_from_plantuml("@startuml\nstart\n:a;\nstop\n@enduml\n:b;\n")
        .expect_err("content after @enduml");
    let ErrorKind::ParseError { line, .. } = &err.kind else {
        panic!("expected parse error, got {err}");
    };
    assert_eq!(*line, 6);
}
