//! Whole command runs against files on disk.

use std::fs;
use std::path::Path;

use clap::Parser;
use statecraft_cli::{Args, Command, Config, EmitFormat, GrammarArg, execute};
use statecraft_foundation::{ErrorKind, Result};

fn run_argv(argv: &[&str]) -> (Result<()>, String) {
    let args = Args::try_parse_from(argv).expect("valid arguments");
    let mut out = Vec::new();
    let result = statecraft_cli::run(&args, &mut out);
    (result, String::from_utf8(out).expect("utf-8 output"))
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn check_grammars_from_the_command_line() {
    let (result, out) = run_argv(&["statecraft", "check-grammars"]);
    result.expect("Error loading SCL grammar");
    assert!(out.lines().any(|l| l.starts_with("ActivityDiagram: ok (ABI ")), "{out}");
    assert!(out.lines().any(|l| l.starts_with("SCL: ok (ABI ")), "{out}");
}

#[test]
fn scl_run_with_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = dir.path().join("lights.scl");
    fs::write(
        &source,
        "context Road { }\n\
         state Red uses Road { next { when timer > 30 => Green\n otherwise => Red } }\n\
         state Green uses Road { next { when timer > 20 => Red\n otherwise => Green } }\n",
    )
    .expect("write");
    let config = dir.path().join("statecraft.toml");
    let out_dir = dir.path().join("gen");
    fs::write(
        &config,
        format!(
            "output_dir = \"{}\"\nemit = [\"dot\", \"csharp\"]\n[csharp]\nnamespace = \"Traffic\"\n",
            path_str(&out_dir).replace('\\', "\\\\")
        ),
    )
    .expect("write");

    let (result, out) = run_argv(&["statecraft", "-c", path_str(&config), "scl", path_str(&source)]);
    result.expect("compiles");
    assert!(out.contains("lights.scl: 2 states, 4 transitions"), "{out}");
    let dot = fs::read_to_string(out_dir.join("lights.dot")).expect("dot output");
    assert!(dot.contains("[label=\"timer > 30\"]"));
    let state = fs::read_to_string(out_dir.join("lights_csharp").join("State.cs")).expect("C# output");
    assert!(state.contains("namespace Traffic"));
    assert!(!out_dir.join("lights.json").exists());
}

#[test]
fn ad_syntax_error_fails_without_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = dir.path().join("broken.puml");
    fs::write(&source, "start\nif (x) then\n:a;\n").expect("write");
    let config = Config::new().with_output_dir(dir.path()).with_emit(vec![EmitFormat::Dot]);
    let command = Command::Ad(statecraft_cli::CompileArgs {
        file: source,
        out_dir: None,
        emit: Vec::new(),
        namespace: None,
    });
    let mut out = Vec::new();
    let err = execute(&command, &config, &mut out).expect_err("missing endif");
    assert!(err.is_parse_error());
    assert!(!dir.path().join("broken.dot").exists());
}

#[test]
fn parse_command_prints_the_tree() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = dir.path().join("flow.puml");
    fs::write(&source, "start\n:a;\nstop\n").expect("write");
    let command = Command::Parse {
        grammar: GrammarArg::ActivityDiagram,
        file: source,
    };
    let mut out = Vec::new();
    execute(&command, &Config::new(), &mut out).expect("clean parse");
    let text = String::from_utf8(out).expect("utf-8 output");
    assert!(text.contains("document"), "{text}");
    assert!(!text.contains("error:"), "{text}");
}

#[test]
fn missing_config_file_is_an_io_error() {
    let (result, _) = run_argv(&["statecraft", "-c", "/nonexistent/statecraft.toml", "check-grammars"]);
    let err = result.expect_err("missing config");
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}
