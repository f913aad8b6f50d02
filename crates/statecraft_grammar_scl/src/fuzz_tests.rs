//! Fuzz tests for parser crash resistance.
//!
//! Any input must produce a tree whose nodes stay inside the source.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use statecraft_grammar::Tree;

    use crate::{kind, language, parser};

    fn check(input: &str) -> Tree {
        let tree = parser::parse(language(), input);
        let root = tree.root_node();
        assert_eq!(root.kind(), kind::PROGRAM);
        for node in root.descendants() {
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

    /// Keywords, operators and names in random order.
    fn scl_like_string() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            Just("type"),
            Just("context"),
            Just("state"),
            Just("uses"),
            Just("use"),
            Just("pre"),
            Just("let"),
            Just("select"),
            Just("foreach"),
            Just("update"),
            Just("insert"),
            Just("delete"),
            Just("commit"),
            Just("next"),
            Just("when"),
            Just("otherwise"),
            Just("export"),
            Just("\\E"),
            Just("\\A"),
            Just("Relation"),
            Just("=>"),
            Just("/\\"),
            Just("\\/"),
            Just("~"),
            Just("{"),
            Just("}"),
            Just("("),
            Just(")"),
            Just("["),
            Just("]"),
            Just(":"),
            Just(";"),
            Just(","),
            Just("="),
            Just("\""),
            Just("/*"),
            Just("X"),
            Just("1"),
        ];
        prop::collection::vec(piece, 0..120).prop_map(|parts| parts.join(" "))
    }

    /// Well-formed states chained in a ring.
    fn state_ring() -> impl Strategy<Value = (usize, String)> {
        (1..30usize).prop_map(|n| {
            let source = (0..n)
                .map(|i| {
                    let next = (i + 1) % n;
                    format!(
                        "state S{i} uses Db {{ let v: int = {i}; next {{ when v > 0 => S{next} otherwise => S{i} }} }}\n"
                    )
                })
                .collect();
            (n, source)
        })
    }

    fn nested_parens() -> impl Strategy<Value = String> {
        (1..100usize).prop_map(|depth| {
            format!(
                "state S uses C {{ let x: int = {}1{}; next {{ otherwise => S }} }}",
                "(".repeat(depth),
                ")".repeat(depth)
            )
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

        /// Parser never panics on token soup.
        #[test]
        fn parser_never_panics_on_scl_like_input(input in scl_like_string()) {
            check(&input);
        }

        /// Every state of a well-formed ring is parsed without errors.
        #[test]
        fn state_ring_parses_cleanly((n, source) in state_ring()) {
            let tree = check(&source);
            let root = tree.root_node();
            prop_assert!(!root.has_error());
            prop_assert_eq!(root.named_children().count(), n);
        }

        /// Parenthesized expressions nest to any depth.
        #[test]
        fn nested_parens_parse_cleanly(input in nested_parens()) {
            let tree = check(&input);
            prop_assert!(!tree.root_node().has_error());
        }
    }
}
