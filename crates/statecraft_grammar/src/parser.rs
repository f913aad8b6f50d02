//! The host parser.
//!
//! A [`Parser`] holds at most one language. [`Parser::set_language`] is where
//! a binding's handle is checked before use; parsing never fails once a valid
//! language is set because grammars recover from bad input with `ERROR` and
//! `MISSING` nodes.

use tracing::{debug, trace};

use crate::language::{Language, LanguageError};
use crate::tree::Tree;

/// Parses source text with a loaded grammar.
#[derive(Debug, Default)]
pub struct Parser {
    language: Option<Language>,
}

impl Parser {
    /// Creates a parser with no language.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a language handle and makes it the parser's language.
    ///
    /// # Errors
    /// Returns an error if the grammar tables are unusable; the previous
    /// language, if any, is kept.
    pub fn set_language(&mut self, language: &Language) -> Result<(), LanguageError> {
        language.validate()?;
        debug!(
            grammar = language.name(),
            abi = language.abi_version(),
            kinds = language.node_kind_count(),
            "language loaded"
        );
        self.language = Some(*language);
        Ok(())
    }

    /// Returns the current language.
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Removes the current language.
    pub fn reset(&mut self) {
        self.language = None;
    }

    /// Parses `source` into a syntax tree.
    ///
    /// # Errors
    /// Returns [`LanguageError::NoLanguage`] if no language was set.
    pub fn parse(&self, source: &str) -> Result<Tree, LanguageError> {
        let language = self.language.ok_or(LanguageError::NoLanguage)?;
        trace!(grammar = language.name(), bytes = source.len(), "parse start");
        let tree = language.parse(source);
        debug!(
            grammar = language.name(),
            nodes = tree.node_count(),
            has_error = tree.root_node().has_error(),
            "parse finished"
        );
        Ok(tree)
    }
}
