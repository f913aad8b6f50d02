//! Subcommand implementations.
//!
//! Commands write their report to the given writer and return an error for
//! anything that should make the process fail.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use statecraft_foundation::{Error, Result};
use statecraft_grammar::{Language, Parser, SyntaxDiagnostic, node_to_sexp_with_text};
use statecraft_machine::{FsMachine, fsm_to_dot, fsm_to_json, generate_csharp_fsm};
use tracing::{debug, info};

use crate::args::{Command, GrammarArg};
use crate::config::{Config, EmitFormat};

/// Runs `command` with `config`.
///
/// # Errors
/// Returns the first error of the command: I/O, grammar load, syntax,
/// semantic or code generation.
pub fn execute(command: &Command, config: &Config, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Ad(compile) => {
            let text = fs::read_to_string(&compile.file)?;
            let fsm = statecraft_ad::build_fsm_from_plantuml(&text)
                .map_err(|e| in_file(e, &compile.file))?;
            emit(&fsm, &compile.file, config, out)
        }
        Command::Scl(compile) => {
            let text = fs::read_to_string(&compile.file)?;
            let fsm =
                statecraft_scl::build_fsm_from_scl(&text).map_err(|e| in_file(e, &compile.file))?;
            emit(&fsm, &compile.file, config, out)
        }
        Command::Parse { grammar, file } => parse(*grammar, file, config, out),
        Command::CheckGrammars => check_grammars(out),
    }
}

/// Records the source file in the error context.
fn in_file(err: Error, file: &Path) -> Error {
    let context = err.context.clone().unwrap_or_default();
    err.with_context(context.with_source(file.display().to_string()))
}

fn write_line(out: &mut impl Write, line: impl AsRef<str>) -> Result<()> {
    writeln!(out, "{}", line.as_ref())?;
    Ok(())
}

// =============================================================================
// ad / scl
// =============================================================================

fn stem(file: &Path) -> String {
    file.file_stem()
        .map_or_else(|| "machine".to_string(), |s| s.to_string_lossy().into_owned())
}

/// Writes every configured output of `fsm` and returns the written paths.
///
/// # Errors
/// Returns I/O, serialization and code generation errors.
pub fn write_outputs(fsm: &FsMachine, name: &str, config: &Config) -> Result<Vec<PathBuf>> {
    let dir = &config.output_dir;
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for format in &config.emit {
        match format {
            EmitFormat::Dot => {
                let path = dir.join(format!("{name}.dot"));
                fs::write(&path, fsm_to_dot(fsm))?;
                written.push(path);
            }
            EmitFormat::Json => {
                let path = dir.join(format!("{name}.json"));
                fs::write(&path, fsm_to_json(fsm)?)?;
                written.push(path);
            }
            EmitFormat::Csharp => {
                let target = dir.join(format!("{name}_csharp"));
                written.extend(generate_csharp_fsm(fsm, target, &config.csharp_options())?);
            }
        }
        debug!(?format, "emitted");
    }
    Ok(written)
}

fn emit(fsm: &FsMachine, file: &Path, config: &Config, out: &mut impl Write) -> Result<()> {
    let written = write_outputs(fsm, &stem(file), config)?;
    write_line(
        out,
        format!(
            "{}: {} states, {} transitions",
            file.display(),
            fsm.state_count(),
            fsm.transitions().len()
        ),
    )?;
    for path in &written {
        write_line(out, format!("  wrote {}", path.display()))?;
    }
    info!(files = written.len(), "done");
    Ok(())
}

// =============================================================================
// parse
// =============================================================================

fn parse(grammar: GrammarArg, file: &Path, config: &Config, out: &mut impl Write) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let (name, language) = grammar_language(grammar);
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| Error::language_load(format!("Error loading {name} grammar: {e}")))?;
    let tree = parser
        .parse(&text)
        .map_err(|e| Error::language_load(e.to_string()))?;
    write_line(
        out,
        node_to_sexp_with_text(&tree.root_node(), &config.sexp_options()),
    )?;

    let diagnostics = SyntaxDiagnostic::collect(&tree);
    let Some(first) = diagnostics.first() else {
        return Ok(());
    };
    for diagnostic in &diagnostics {
        write_line(out, "")?;
        write_line(out, format!("error: {}", diagnostic.message()))?;
        write_line(out, diagnostic.to_string())?;
    }
    Err(in_file(
        Error::parse(
            first.message(),
            first.line(),
            first.column(),
            format!("{} syntax errors", diagnostics.len()),
        ),
        file,
    ))
}

fn grammar_language(grammar: GrammarArg) -> (&'static str, Language) {
    match grammar {
        GrammarArg::ActivityDiagram => ("ActivityDiagram", statecraft_grammar_ad::language()),
        GrammarArg::Scl => ("SCL", statecraft_grammar_scl::language()),
    }
}

// =============================================================================
// check-grammars
// =============================================================================

/// Loads a grammar into a parser twice and checks both handles agree.
///
/// # Errors
/// Returns `Error loading <name> grammar` if the runtime rejects the
/// grammar or the two loads differ.
pub fn check_grammar(name: &str, load: fn() -> Language) -> Result<Language> {
    let failed = |detail: String| Error::language_load(format!("Error loading {name} grammar: {detail}"));
    let first = load();
    let mut parser = Parser::new();
    parser.set_language(&first).map_err(|e| failed(e.to_string()))?;
    let second = load();
    if first != second {
        return Err(failed("loading twice gave different handles".to_string()));
    }
    Ok(first)
}

fn check_grammars(out: &mut impl Write) -> Result<()> {
    for (name, load) in [
        ("ActivityDiagram", statecraft_grammar_ad::language as fn() -> Language),
        ("SCL", statecraft_grammar_scl::language),
    ] {
        let language = check_grammar(name, load)?;
        write_line(
            out,
            format!(
                "{name}: ok (ABI {}, {} node kinds, {} fields)",
                language.abi_version(),
                language.node_kind_count(),
                language.field_count()
            ),
        )?;
    }
    Ok(())
}
