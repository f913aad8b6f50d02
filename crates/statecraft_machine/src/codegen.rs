//! Source code generation from state machines.

pub mod csharp;

use std::sync::LazyLock;

use regex::Regex;

/// Operators spelled out so guards stay readable as identifiers.
static OPERATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"==|!=|>=|<=|=>|&&|\|\||/\\|\\/|=|>|<|!|~|#").expect("operator pattern is valid")
});

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("word pattern is valid"));

/// Turns free text into a lowercase identifier.
///
/// Comparison and logic operators become words (`x >= 1` is `x_ge_1`), any
/// other run of non-word characters becomes one underscore, and a leading
/// digit gets an underscore prefix. Text with no word characters yields
/// `unnamed`.
#[must_use]
pub fn sanitize_identifier(text: &str) -> String {
    let spelled = OPERATORS.replace_all(text, |caps: &regex::Captures<'_>| {
        let word = match &caps[0] {
            "==" | "=" => "eq",
            "!=" | "#" => "ne",
            ">=" => "ge",
            "<=" => "le",
            "=>" => "implies",
            "&&" | "/\\" => "and",
            "||" | "\\/" => "or",
            ">" => "gt",
            "<" => "lt",
            _ => "not",
        };
        format!("_{word}_")
    });
    let lowered = spelled.to_lowercase();
    let joined = NON_WORD.replace_all(&lowered, "_");
    let trimmed = collapse_underscores(joined.trim_matches('_'));
    match trimmed.chars().next() {
        None => "unnamed".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{trimmed}"),
        Some(_) => trimmed,
    }
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}
