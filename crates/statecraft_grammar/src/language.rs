//! Language handles.
//!
//! A grammar binding owns a static [`LanguageInfo`] table and exports a
//! [`LanguageFn`] that resolves to it. [`Language`] is the opaque handle the
//! runtime works with; it is `Copy` and compares equal when two loads resolve
//! to the same tables.

use std::fmt;
use std::ptr;

use thiserror::Error;

use crate::tree::Tree;

/// Current grammar ABI version produced by the bindings in this workspace.
pub const LANGUAGE_VERSION: u32 = 2;

/// Oldest grammar ABI version the runtime still accepts.
pub const MIN_COMPATIBLE_LANGUAGE_VERSION: u32 = 1;

/// Kind name of nodes covering input the grammar could not parse.
pub const ERROR_KIND: &str = "ERROR";

/// Node kind id reserved for [`ERROR_KIND`].
const ERROR_KIND_ID: u16 = u16::MAX;

/// Entry point a grammar registers to turn source text into a tree.
pub type ParseFn = fn(Language, &str) -> Tree;

/// One entry of a grammar's node kind table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeKind {
    /// Kind name as it appears in the tree (`if_statement`, `"endif"`, ...).
    pub name: &'static str,
    /// Whether nodes of this kind are named (rules) or anonymous (tokens).
    pub named: bool,
}

impl NodeKind {
    /// A named node kind (a grammar rule).
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self { name, named: true }
    }

    /// An anonymous node kind (a literal token).
    #[must_use]
    pub const fn anonymous(name: &'static str) -> Self {
        Self { name, named: false }
    }
}

/// Static tables describing a compiled grammar.
#[derive(Debug)]
pub struct LanguageInfo {
    /// Grammar name (`activity_diagram`, `scl`).
    pub name: &'static str,
    /// ABI version the tables were generated for.
    pub abi_version: u32,
    /// Node kinds; a kind's id is its index.
    pub node_kinds: &'static [NodeKind],
    /// Field names; a field's id is its index plus one.
    pub field_names: &'static [&'static str],
    /// Parse entry point.
    pub parse: ParseFn,
}

/// Loader exported by a grammar binding.
#[derive(Clone, Copy)]
pub struct LanguageFn(fn() -> &'static LanguageInfo);

impl LanguageFn {
    /// Wraps a binding's table accessor.
    #[must_use]
    pub const fn from_raw(f: fn() -> &'static LanguageInfo) -> Self {
        Self(f)
    }

    /// Returns the wrapped accessor.
    #[must_use]
    pub const fn into_raw(self) -> fn() -> &'static LanguageInfo {
        self.0
    }
}

impl fmt::Debug for LanguageFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LanguageFn").field(&(self.0)().name).finish()
    }
}

/// Errors raised when a language handle cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageError {
    /// The grammar was built for an ABI the runtime does not support.
    #[error(
        "incompatible language version {version} for grammar '{name}' (supported {min}..={max})"
    )]
    IncompatibleVersion {
        /// Grammar name.
        name: &'static str,
        /// Version found in the tables.
        version: u32,
        /// Oldest supported version.
        min: u32,
        /// Newest supported version.
        max: u32,
    },

    /// The grammar tables carry no name.
    #[error("grammar tables have no name")]
    UnnamedLanguage,

    /// The grammar declares no node kinds.
    #[error("grammar '{name}' has an empty node kind table")]
    EmptyNodeTable {
        /// Grammar name.
        name: &'static str,
    },

    /// The same field name appears twice.
    #[error("grammar '{name}' declares field '{field}' more than once")]
    DuplicateField {
        /// Grammar name.
        name: &'static str,
        /// The repeated field.
        field: &'static str,
    },

    /// The grammar declares more node kinds than ids available.
    #[error("grammar '{name}' declares too many node kinds ({count})")]
    TooManyNodeKinds {
        /// Grammar name.
        name: &'static str,
        /// Number of kinds declared.
        count: usize,
    },

    /// `parse` was called before `set_language`.
    #[error("no language set on parser")]
    NoLanguage,
}

/// Opaque handle to a loaded grammar.
#[derive(Clone, Copy)]
pub struct Language(&'static LanguageInfo);

impl Language {
    /// Resolves a binding's loader into a handle.
    #[must_use]
    pub fn new(loader: LanguageFn) -> Self {
        Self((loader.0)())
    }

    /// Grammar name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name
    }

    /// ABI version of the grammar tables.
    #[must_use]
    pub fn abi_version(&self) -> u32 {
        self.0.abi_version
    }

    /// Number of node kinds, excluding the runtime's `ERROR` kind.
    #[must_use]
    pub fn node_kind_count(&self) -> usize {
        self.0.node_kinds.len()
    }

    /// Name of the node kind with the given id.
    #[must_use]
    pub fn node_kind_for_id(&self, id: u16) -> Option<&'static str> {
        if id == ERROR_KIND_ID {
            return Some(ERROR_KIND);
        }
        self.0.node_kinds.get(usize::from(id)).map(|k| k.name)
    }

    /// Id of a node kind. Named kinds win over anonymous ones sharing a name.
    #[must_use]
    pub fn id_for_node_kind(&self, name: &str, named: bool) -> Option<u16> {
        if name == ERROR_KIND {
            return Some(ERROR_KIND_ID);
        }
        self.0
            .node_kinds
            .iter()
            .position(|k| k.name == name && k.named == named)
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Whether the kind with the given id is named.
    #[must_use]
    pub fn node_kind_is_named(&self, id: u16) -> bool {
        id == ERROR_KIND_ID
            || self
                .0
                .node_kinds
                .get(usize::from(id))
                .is_some_and(|k| k.named)
    }

    /// Number of distinct field names.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.0.field_names.len()
    }

    /// Field name for a 1-based field id.
    #[must_use]
    pub fn field_name_for_id(&self, id: u16) -> Option<&'static str> {
        let index = usize::from(id).checked_sub(1)?;
        self.0.field_names.get(index).copied()
    }

    /// 1-based id of a field name.
    #[must_use]
    pub fn field_id_for_name(&self, name: &str) -> Option<u16> {
        self.0
            .field_names
            .iter()
            .position(|f| *f == name)
            .and_then(|i| u16::try_from(i + 1).ok())
    }

    /// Checks that the tables are usable by this runtime.
    ///
    /// # Errors
    /// Returns the first problem found in the grammar tables.
    pub fn validate(&self) -> Result<(), LanguageError> {
        let info = self.0;
        if info.name.is_empty() {
            return Err(LanguageError::UnnamedLanguage);
        }
        if !(MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&info.abi_version) {
            return Err(LanguageError::IncompatibleVersion {
                name: info.name,
                version: info.abi_version,
                min: MIN_COMPATIBLE_LANGUAGE_VERSION,
                max: LANGUAGE_VERSION,
            });
        }
        if info.node_kinds.is_empty() {
            return Err(LanguageError::EmptyNodeTable { name: info.name });
        }
        if info.node_kinds.len() >= usize::from(ERROR_KIND_ID) {
            return Err(LanguageError::TooManyNodeKinds {
                name: info.name,
                count: info.node_kinds.len(),
            });
        }
        for (i, field) in info.field_names.iter().enumerate() {
            if info.field_names[..i].contains(field) {
                return Err(LanguageError::DuplicateField {
                    name: info.name,
                    field,
                });
            }
        }
        Ok(())
    }

    /// Runs the grammar over `source`.
    pub(crate) fn parse(self, source: &str) -> Tree {
        (self.0.parse)(self, source)
    }
}

impl From<LanguageFn> for Language {
    fn from(loader: LanguageFn) -> Self {
        Self::new(loader)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.0.name)
            .field("abi_version", &self.0.abi_version)
            .field("node_kinds", &self.0.node_kinds.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Children, TreeBuilder};

    const KINDS: &[NodeKind] = &[NodeKind::named("document"), NodeKind::anonymous(";")];

    fn parse_empty(language: Language, source: &str) -> Tree {
        let mut builder = TreeBuilder::new(source);
        let root = builder.node("document", Children::new(), 0);
        builder.finish(language, root)
    }

    static GOOD: LanguageInfo = LanguageInfo {
        name: "toy",
        abi_version: LANGUAGE_VERSION,
        node_kinds: KINDS,
        field_names: &["body", "name"],
        parse: parse_empty,
    };

    static STALE: LanguageInfo = LanguageInfo {
        name: "toy",
        abi_version: 0,
        node_kinds: KINDS,
        field_names: &[],
        parse: parse_empty,
    };

    static EMPTY: LanguageInfo = LanguageInfo {
        name: "toy",
        abi_version: LANGUAGE_VERSION,
        node_kinds: &[],
        field_names: &[],
        parse: parse_empty,
    };

    static DUPLICATE: LanguageInfo = LanguageInfo {
        name: "toy",
        abi_version: LANGUAGE_VERSION,
        node_kinds: KINDS,
        field_names: &["body", "body"],
        parse: parse_empty,
    };

    fn good() -> &'static LanguageInfo {
        &GOOD
    }

    fn stale() -> &'static LanguageInfo {
        &STALE
    }

    fn empty() -> &'static LanguageInfo {
        &EMPTY
    }

    fn duplicate() -> &'static LanguageInfo {
        &DUPLICATE
    }

    #[test]
    fn loads_are_idempotent() {
        let loader = LanguageFn::from_raw(good);
        let a = Language::new(loader);
        let b: Language = loader.into();
        assert_eq!(a, b);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn node_kind_lookup() {
        let lang = Language::new(LanguageFn::from_raw(good));
        assert_eq!(lang.node_kind_count(), 2);
        assert_eq!(lang.node_kind_for_id(0), Some("document"));
        assert_eq!(lang.id_for_node_kind(";", false), Some(1));
        assert_eq!(lang.id_for_node_kind(";", true), None);
        assert_eq!(lang.node_kind_for_id(u16::MAX), Some(ERROR_KIND));
        assert!(lang.node_kind_is_named(0));
        assert!(!lang.node_kind_is_named(1));
    }

    #[test]
    fn field_lookup_is_one_based() {
        let lang = Language::new(LanguageFn::from_raw(good));
        assert_eq!(lang.field_id_for_name("body"), Some(1));
        assert_eq!(lang.field_name_for_id(2), Some("name"));
        assert_eq!(lang.field_name_for_id(0), None);
    }

    #[test]
    fn rejects_incompatible_version() {
        let lang = Language::new(LanguageFn::from_raw(stale));
        assert!(matches!(
            lang.validate(),
            Err(LanguageError::IncompatibleVersion { version: 0, .. })
        ));
    }

    #[test]
    fn rejects_empty_node_table() {
        let lang = Language::new(LanguageFn::from_raw(empty));
        assert_eq!(
            lang.validate(),
            Err(LanguageError::EmptyNodeTable { name: "toy" })
        );
    }

    #[test]
    fn rejects_duplicate_fields() {
        let lang = Language::new(LanguageFn::from_raw(duplicate));
        assert_eq!(
            lang.validate(),
            Err(LanguageError::DuplicateField {
                name: "toy",
                field: "body"
            })
        );
    }

    #[test]
    fn distinct_tables_are_distinct_handles() {
        let a = Language::new(LanguageFn::from_raw(good));
        let b = Language::new(LanguageFn::from_raw(stale));
        assert_ne!(a, b);
    }
}
