//! Fuzz tests for parser crash resistance.
//!
//! The grammar must return a tree for any input, however malformed, and
//! every node must stay inside the source.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use statecraft_grammar::{Tree, TreeBuilder};

    use crate::{language, parser};

    fn check(input: &str) -> Tree {
        let tree = parser::parse(language(), input);
        for node in tree.root_node().descendants() {
            assert!(node.start_byte() <= node.end_byte());
            assert!(node.end_byte() <= input.len());
            assert!(input.is_char_boundary(node.start_byte()));
            assert!(input.is_char_boundary(node.end_byte()));
        }
        tree
    }

    // ==========================================================================
    // Generators
    // ==========================================================================

    fn arbitrary_string() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<char>(), 0..500).prop_map(|chars| chars.into_iter().collect())
    }

    /// Lines built from PlantUML keywords and punctuation in random order.
    fn plantuml_like_string() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            Just("if".to_string()),
            Just("then".to_string()),
            Just("else".to_string()),
            Just("elseif".to_string()),
            Just("endif".to_string()),
            Just("end".to_string()),
            Just("while".to_string()),
            Just("endwhile".to_string()),
            Just("repeat".to_string()),
            Just("repeat while".to_string()),
            Just("switch".to_string()),
            Just("case".to_string()),
            Just("endswitch".to_string()),
            Just("note".to_string()),
            Just("end note".to_string()),
            Just("partition".to_string()),
            Just("<style>".to_string()),
            Just("</style>".to_string()),
            Just("skinparam".to_string()),
            Just("!pragma".to_string()),
            Just("-[".to_string()),
            Just("]->".to_string()),
            Just("->".to_string()),
            Just(":".to_string()),
            Just(";".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("'".to_string()),
            Just("/'".to_string()),
            Just("#".to_string()),
            "[a-z]{1,8}".prop_map(String::from),
        ];
        let sep = prop_oneof![Just(" ".to_string()), Just("\n".to_string())];
        prop::collection::vec((piece, sep), 0..80)
            .prop_map(|parts| parts.into_iter().map(|(p, s)| p + &s).collect())
    }

    fn deeply_nested() -> impl Strategy<Value = String> {
        (1..60usize).prop_map(|depth| {
            let open = "if (x) then\n".repeat(depth);
            let close = "endif\n".repeat(depth);
            format!("{open}:a;\n{close}")
        })
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Parser never panics on arbitrary input.
        #[test]
        fn parser_never_panics_on_arbitrary_input(input in arbitrary_string()) {
            check(&input);
        }

        /// Parser never panics on keyword soup.
        #[test]
        fn parser_never_panics_on_plantuml_like_input(input in plantuml_like_string()) {
            check(&input);
        }

        /// Balanced nesting parses without errors at any depth.
        #[test]
        fn nested_ifs_parse_cleanly(input in deeply_nested()) {
            let tree = check(&input);
            prop_assert!(!tree.root_node().has_error());
        }

        /// Actions round-trip their text.
        #[test]
        fn action_text_is_preserved(text in "[a-z]{1,10}( [a-z]{1,10}){0,4}") {
            let source = format!(":{text};");
            let tree = check(&source);
            let action = tree.root_node().child(0).and_then(|t| t.child(0));
            let text_node = action.and_then(|a| a.child_by_field_name(crate::field::ACTION));
            prop_assert_eq!(text_node.map(|n| n.text()), Some(text.as_str()));
        }
    }

    #[test]
    fn builder_is_reusable_for_empty_input() {
        let mut b = TreeBuilder::new("");
        let root = b.node(crate::kind::DOCUMENT, statecraft_grammar::Children::new(), 0);
        let tree = b.finish(language(), root);
        assert_eq!(tree.root_node().to_sexp(), check("").root_node().to_sexp());
    }
}
