//! Configuration files merged with flags.

use std::fs;

use clap::Parser;
use statecraft_cli::{Args, Config, EmitFormat};
use statecraft_foundation::ErrorKind;

#[test]
fn file_settings_are_loaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("statecraft.toml");
    fs::write(
        &path,
        "output_dir = \"gen\"\nemit = [\"json\", \"csharp\"]\n\n[csharp]\nnamespace = \"Shop.Orders\"\n",
    )
    .expect("write");
    let config = Config::load(&path).expect("valid config");
    assert_eq!(config.output_dir, std::path::PathBuf::from("gen"));
    assert_eq!(config.emit, vec![EmitFormat::Json, EmitFormat::Csharp]);
    assert_eq!(config.csharp_options().namespace, "Shop.Orders");
    assert!(!config.verbose);
}

#[test]
fn unknown_key_names_the_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "colour = true\n").expect("write");
    let err = Config::load(&path).expect_err("unknown key");
    let ErrorKind::Config(message) = &err.kind else {
        panic!("expected config error, got {err}");
    };
    assert!(message.contains("bad.toml"), "{message}");
}

#[test]
fn flags_override_the_file() {
    let base = Config::from_toml("output_dir = \"gen\"\nemit = [\"json\"]\n").expect("valid");
    let args = Args::try_parse_from([
        "statecraft", "-v", "ad", "flow.puml", "-o", "out", "-e", "dot", "-e", "csharp",
    ])
    .expect("valid arguments");
    let config = args.apply(base);
    assert!(config.verbose);
    assert_eq!(config.output_dir, std::path::PathBuf::from("out"));
    assert_eq!(config.emit, vec![EmitFormat::Dot, EmitFormat::Csharp]);
}

#[test]
fn unset_flags_keep_file_values() {
    let base = Config::from_toml("emit = [\"json\"]\n[csharp]\nnamespace = \"A.B\"\n").expect("valid");
    let args = Args::try_parse_from(["statecraft", "scl", "flow.scl"]).expect("valid arguments");
    let config = args.apply(base.clone());
    assert_eq!(config, base);
}

#[test]
fn unknown_emit_format_is_rejected() {
    assert!(Args::try_parse_from(["statecraft", "ad", "x.puml", "-e", "svg"]).is_err());
}
