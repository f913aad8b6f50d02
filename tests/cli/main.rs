//! Integration tests for the `statecraft` command-line tool
//!
//! Tests argument parsing, configuration files and whole command runs.

mod commands;
mod config;
