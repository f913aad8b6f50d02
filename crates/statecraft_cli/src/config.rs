//! CLI configuration.
//!
//! Settings come from an optional TOML file; command-line flags override
//! them. Every key is optional:
//!
//! ```toml
//! output_dir = "generated"
//! emit = ["dot", "csharp"]
//! verbose = false
//!
//! [csharp]
//! namespace = "Shop.Orders"
//!
//! [sexp]
//! show_position = true
//! show_byte_range = false
//! max_text_length = 40
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use statecraft_foundation::{Error, ErrorKind, Result};
use statecraft_grammar::SexpOptions;
use statecraft_machine::CsharpOptions;
use statecraft_machine::codegen::csharp::DEFAULT_NAMESPACE;

/// Output produced for a compiled machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    /// Graphviz `<name>.dot`
    Dot,
    /// `<name>.json`
    Json,
    /// C# bundle in `<name>_csharp/`
    Csharp,
}

/// C# generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsharpConfig {
    /// Namespace of the generated types.
    pub namespace: String,
}

impl Default for CsharpConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// `statecraft parse` output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SexpConfig {
    /// Annotate nodes with `pos=(row,col)-(row,col)`.
    pub show_position: bool,
    /// Annotate nodes with `bytes=start..end`.
    pub show_byte_range: bool,
    /// Truncate node text to this many characters.
    pub max_text_length: Option<usize>,
}

impl Default for SexpConfig {
    fn default() -> Self {
        Self {
            show_position: false,
            show_byte_range: false,
            max_text_length: SexpOptions::default().max_text_length,
        }
    }
}

/// Settings for a CLI run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory outputs are written to.
    pub output_dir: PathBuf,
    /// Outputs produced by `ad` and `scl`.
    pub emit: Vec<EmitFormat>,
    /// Log debug events.
    pub verbose: bool,
    /// C# generation.
    pub csharp: CsharpConfig,
    /// S-expression rendering.
    pub sexp: SexpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            emit: vec![EmitFormat::Dot],
            verbose: false,
            csharp: CsharpConfig::default(),
            sexp: SexpConfig::default(),
        }
    }
}

impl Config {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    /// Returns a config error for malformed TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::new(ErrorKind::Config(e.to_string())))
    }

    /// Loads a config file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a config error
    /// naming the file if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text).map_err(|e| {
            Error::new(ErrorKind::Config(format!("{}: {e}", path.display())))
        })
    }

    /// Builder method to set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder method to set the emitted formats.
    #[must_use]
    pub fn with_emit(mut self, emit: Vec<EmitFormat>) -> Self {
        self.emit = emit;
        self
    }

    /// Builder method to set the C# namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.csharp.namespace = namespace.into();
        self
    }

    /// Builder method to toggle debug logging.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Options for C# generation.
    #[must_use]
    pub fn csharp_options(&self) -> CsharpOptions {
        CsharpOptions::default().with_namespace(self.csharp.namespace.clone())
    }

    /// Options for s-expression rendering.
    #[must_use]
    pub fn sexp_options(&self) -> SexpOptions {
        SexpOptions::default()
            .with_position(self.sexp.show_position)
            .with_byte_range(self.sexp.show_byte_range)
            .with_max_text_length(self.sexp.max_text_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.emit, vec![EmitFormat::Dot]);
        assert_eq!(config.csharp_options(), CsharpOptions::default());
        assert_eq!(config.sexp_options(), SexpOptions::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_toml("").expect("parses"), Config::default());
    }

    #[test]
    fn full_file() {
        let config = Config::from_toml(
            r#"
output_dir = "generated"
emit = ["json", "csharp"]
verbose = true

[csharp]
namespace = "Shop.Orders"

[sexp]
show_position = true
max_text_length = 40
"#,
        )
        .expect("parses");
        assert_eq!(config.output_dir, PathBuf::from("generated"));
        assert_eq!(config.emit, vec![EmitFormat::Json, EmitFormat::Csharp]);
        assert!(config.verbose);
        assert_eq!(config.csharp_options().namespace, "Shop.Orders");
        let sexp = config.sexp_options();
        assert!(sexp.show_position);
        assert!(!sexp.show_byte_range);
        assert_eq!(sexp.max_text_length, Some(40));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Config::from_toml("outptu_dir = \"x\"").expect_err("typo");
        assert!(matches!(err.kind, ErrorKind::Config(ref m) if m.contains("outptu_dir")));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Config::from_toml("emit = [\"svg\"]").is_err());
    }

    #[test]
    fn builder_overrides() {
        let config = Config::new()
            .with_output_dir("out")
            .with_emit(vec![EmitFormat::Csharp])
            .with_namespace("A.B")
            .with_verbose(true);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.emit, vec![EmitFormat::Csharp]);
        assert_eq!(config.csharp.namespace, "A.B");
        assert!(config.verbose);
    }

    #[test]
    fn load_names_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("statecraft.toml");
        fs::write(&path, "emit = 3").expect("write");
        let err = Config::load(&path).expect_err("bad type");
        assert!(err.to_string().contains("statecraft.toml"));

        fs::write(&path, "emit = [\"dot\", \"json\"]").expect("write");
        let config = Config::load(&path).expect("loads");
        assert_eq!(config.emit, vec![EmitFormat::Dot, EmitFormat::Json]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load("/nonexistent/statecraft.toml").expect_err("missing");
        assert!(matches!(err.kind, ErrorKind::Io(_)));
    }
}
