//! SCL compilation.

use statecraft_foundation::ErrorKind;
use statecraft_machine::{FsMachine, StateId};
use statecraft_scl::{Condition, Program, QuantifierKind, Stmt, UseStmt};

const TICKETS: &str = r#"
type Ticket { id: int; status: string; }
context Queue { tickets: List[Ticket]; }
context Audit { }

state Intake uses Queue {
  select t: Ticket from tickets where t.status = "new" limit 1;
  next {
    when t = null => Intake
    when t.id > 0 => Triage { export id: int; }
    otherwise => Intake
  }
}

state Triage uses Queue, Audit {
  use state Intake { id: int; }
  pre { id > 0; }
  update tickets set status = "open" where id == id;
  insert into audit (ticket, action) values (id, "triaged");
  next {
    when \A Relation tickets x by x.id : x.status # "new" => Closed
    otherwise => Intake
  }
}

state Closed uses Queue {
  delete from tickets where status = "closed";
  commit;
  next { otherwise => Closed }
}
"#;

fn program() -> Program {
    statecraft_scl::parse_scl(TICKETS).expect("valid program")
}

fn machine() -> FsMachine {
    statecraft_scl::build_fsm_from_scl(TICKETS).expect("valid program")
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn declarations_are_collected() {
    let program = program();
    assert_eq!(program.types.len(), 1);
    assert_eq!(program.contexts.len(), 2);
    assert_eq!(program.states.len(), 3);
    let triage = program.state("Triage").expect("triage");
    assert_eq!(triage.uses.len(), 2);
    assert!(matches!(&triage.imports[0], UseStmt::State { fields, .. } if fields.len() == 1));
    assert_eq!(triage.precondition.len(), 1);
    assert!(matches!(triage.body[1], Stmt::Insert { .. }));
}

#[test]
fn universal_quantifier_is_kept() {
    let program = program();
    let triage = program.state("Triage").expect("triage");
    let guard = triage.next.cases()[0].condition.as_ref().expect("guard");
    let Condition::Quantifier { kind, relation, .. } = guard else {
        panic!("expected quantifier, got {guard}");
    };
    assert_eq!(*kind, QuantifierKind::Forall);
    assert_eq!(relation.as_str(), "tickets");
}

// =============================================================================
// Machines
// =============================================================================

#[test]
fn guards_are_printed_canonically() {
    let fsm = machine();
    let intake = fsm.state_by_name("Intake").expect("intake");
    let guards: Vec<_> = fsm.transitions_from(intake).map(|t| t.condition()).collect();
    assert_eq!(guards, vec![Some("t = null"), Some("t.id > 0"), None]);

    let triage = fsm.state_by_name("Triage").expect("triage");
    let first = fsm.transitions_from(triage).next().expect("transition");
    assert_eq!(
        first.condition(),
        Some(r#"\A Relation tickets x by x.id : x.status != "new""#)
    );
}

#[test]
fn only_self_loops_make_a_terminal() {
    let fsm = machine();
    assert_eq!(fsm.start(), StateId(0));
    assert_eq!(fsm.terminals(), &[StateId(2)]);
    assert!(!fsm.is_terminal(StateId(0)));
}

#[test]
fn dot_output_of_a_program() {
    let dot = statecraft_machine::fsm_to_dot(&machine());
    assert!(dot.contains("  S0 -> S1 [label=\"t.id > 0\"];"), "{dot}");
    assert!(dot.contains("  S2 -> S2;"), "{dot}");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn undefined_target_has_a_line() {
    let err = statecraft_scl::parse_scl(
        "context C { }\nstate A uses C {\n  next {\n    when go => Elsewhere\n  }\n}",
    )
    .expect_err("undefined target");
    assert!(matches!(err.kind, ErrorKind::Undefined { what: "state", .. }));
    assert_eq!(err.context.and_then(|c| c.line), Some(4));
}

#[test]
fn unknown_uses_context() {
    let err = statecraft_scl::build_fsm_from_scl("state A uses Nowhere { next { otherwise => A } }")
        .expect_err("undefined context");
    assert_eq!(err.to_string(), "undefined context: Nowhere");
}

#[test]
fn missing_uses_clause_is_a_syntax_error() {
    let err = statecraft_scl::build_fsm_from_scl("context C { }\nstate A { next { otherwise => A } }")
        .expect_err("uses is required");
    assert!(err.is_parse_error(), "{err}");
}

#[test]
fn deeply_nested_expression_is_a_syntax_error() {
    let depth = 3000;
    let source = format!(
        "context C {{ }}\nstate A uses C {{ assert {}x{}; next {{ otherwise => A }} }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let err = statecraft_scl::build_fsm_from_scl(&source).expect_err("too deep");
    assert!(err.is_parse_error(), "{err}");
}
