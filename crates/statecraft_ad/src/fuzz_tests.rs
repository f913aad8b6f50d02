//! Property tests for the compiler pipeline.
//!
//! Arbitrary text must be either compiled or rejected with an error, never
//! panic. Well-formed diagrams must always compile, and every action must
//! end up as a state.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::build_fsm_from_plantuml;

    // ==========================================================================
    // Generators
    // ==========================================================================

    fn action_text() -> impl Strategy<Value = String> {
        "[a-z][a-z ]{0,12}[a-z]"
    }

    /// A well-formed statement list, nested up to a few levels deep.
    fn statements() -> impl Strategy<Value = Vec<String>> {
        let leaf = action_text().prop_map(|a| vec![format!(":{a};")]);
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4).prop_map(|blocks| blocks.concat()),
                (inner.clone(), inner.clone()).prop_map(|(then, other)| {
                    let mut out = vec!["if (c?) then (yes)".to_string()];
                    out.extend(then);
                    out.push("else (no)".to_string());
                    out.extend(other);
                    out.push("endif".to_string());
                    out
                }),
                inner.clone().prop_map(|body| {
                    let mut out = vec!["while (more?)".to_string()];
                    out.extend(body);
                    out.push("endwhile".to_string());
                    out
                }),
                inner.prop_map(|body| {
                    let mut out = vec!["repeat".to_string()];
                    out.extend(body);
                    out.push("repeat while (again?)".to_string());
                    out
                }),
            ]
        })
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    proptest! {
        #[test]
        fn arbitrary_text_never_panics(input in "\\PC{0,300}") {
            let _ = build_fsm_from_plantuml(&input);
        }

        #[test]
        fn well_formed_diagrams_compile(body in statements()) {
            let source = format!("@startuml\nstart\n{}\nstop\n@enduml\n", body.join("\n"));
            let fsm = build_fsm_from_plantuml(&source)
                .map_err(|e| TestCaseError::fail(format!("{e}\n{source}")))?;
            let actions = body.iter().filter(|line| line.starts_with(':')).count();
            // START and END besides the actions.
            prop_assert_eq!(fsm.state_count(), actions + 2);
            let reachable = fsm.reachable_states();
            prop_assert_eq!(reachable.len(), fsm.state_count());
        }
    }
}
