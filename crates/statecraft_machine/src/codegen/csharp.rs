//! C# code generation.
//!
//! A machine becomes a bundle of files in one namespace:
//! - `State.cs`: an enum with one member per state
//! - `Dispatcher.cs`: the start state, terminal test and a `Step` method
//!   trying each state's transitions by priority
//! - `Transition_<From>_<To>.cs`: one partial class per transition, with a
//!   partial guard method to implement by hand when the transition is
//!   conditional

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use statecraft_foundation::{Error, ErrorKind, Result};
use tracing::{debug, info};

use super::sanitize_identifier;
use crate::fsm::{FsMachine, StateId};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "Statecraft.Generated";

/// Options for C# generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsharpOptions {
    /// Namespace of every generated type.
    pub namespace: String,
}

impl Default for CsharpOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl CsharpOptions {
    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name, without directory.
    pub name: String,
    /// File contents.
    pub contents: String,
}

#[derive(Template)]
#[template(path = "csharp/state.cs.j2", escape = "none")]
struct StateEnumTemplate<'a> {
    namespace: &'a str,
    states: &'a [String],
}

struct DispatchEntry {
    state: String,
    transitions: Vec<String>,
}

#[derive(Template)]
#[template(path = "csharp/dispatcher.cs.j2", escape = "none")]
struct DispatcherTemplate<'a> {
    namespace: &'a str,
    start: &'a str,
    terminals: Vec<String>,
    entries: Vec<DispatchEntry>,
}

struct TransitionView {
    from: String,
    to: String,
    class_name: String,
    comment: String,
    priority: u32,
    guard: Option<String>,
}

#[derive(Template)]
#[template(path = "csharp/transition.cs.j2", escape = "none")]
struct TransitionTemplate<'a> {
    namespace: &'a str,
    t: &'a TransitionView,
}

fn codegen_error(err: &askama::Error) -> Error {
    Error::new(ErrorKind::Codegen(err.to_string()))
}

/// Enum member name of a state: its sanitized name and id.
fn member_name(fsm: &FsMachine, id: StateId) -> Result<String> {
    let name = fsm
        .state_name(id)
        .ok_or_else(|| Error::internal(format!("transition refers to unknown state {id}")))?;
    Ok(format!("{}_{}", sanitize_identifier(name), id.0))
}

/// Renders the C# bundle for a machine without touching the file system.
///
/// # Errors
/// Returns a codegen error if a template fails to render, or an internal
/// error if a transition refers to a state the machine does not have.
pub fn render_csharp(fsm: &FsMachine, options: &CsharpOptions) -> Result<Vec<GeneratedFile>> {
    let namespace = options.namespace.as_str();
    let states = fsm
        .states()
        .map(|(id, _)| member_name(fsm, id))
        .collect::<Result<Vec<_>>>()?;

    let mut files = vec![GeneratedFile {
        name: "State.cs".to_string(),
        contents: StateEnumTemplate {
            namespace,
            states: &states,
        }
        .render()
        .map_err(|e| codegen_error(&e))?,
    }];

    let mut used = HashSet::new();
    let mut entries: Vec<DispatchEntry> = Vec::new();
    for t in fsm.transitions() {
        let from = member_name(fsm, t.from())?;
        let to = member_name(fsm, t.to())?;
        let mut class_name = format!("Transition_{from}_{to}");
        if !used.insert(class_name.clone()) {
            class_name = format!("{class_name}_{}", t.priority());
            used.insert(class_name.clone());
        }
        let view = TransitionView {
            comment: match t.condition() {
                Some(cond) => cond.replace(['\r', '\n'], " "),
                None => format!("{from} -> {to}"),
            },
            guard: t
                .condition()
                .map(|cond| format!("When_{}", sanitize_identifier(cond))),
            priority: t.priority(),
            from,
            to,
            class_name,
        };
        files.push(GeneratedFile {
            name: format!("{}.cs", view.class_name),
            contents: TransitionTemplate {
                namespace,
                t: &view,
            }
            .render()
            .map_err(|e| codegen_error(&e))?,
        });

        match entries.iter_mut().find(|e| e.state == view.from) {
            Some(entry) => entry.transitions.push(view.class_name),
            None => entries.push(DispatchEntry {
                state: view.from,
                transitions: vec![view.class_name],
            }),
        }
    }

    let start = member_name(fsm, fsm.start())?;
    let terminals = fsm
        .terminals()
        .iter()
        .map(|&id| member_name(fsm, id))
        .collect::<Result<Vec<_>>>()?;
    files.push(GeneratedFile {
        name: "Dispatcher.cs".to_string(),
        contents: DispatcherTemplate {
            namespace,
            start: &start,
            terminals,
            entries,
        }
        .render()
        .map_err(|e| codegen_error(&e))?,
    });

    debug!(files = files.len(), "rendered C# bundle");
    Ok(files)
}

/// Renders the C# bundle and writes it into `out_dir`, creating the
/// directory if needed. Returns the written paths.
///
/// # Errors
/// Returns the rendering errors of [`render_csharp`] or an I/O error.
pub fn generate_csharp_fsm(
    fsm: &FsMachine,
    out_dir: impl AsRef<Path>,
    options: &CsharpOptions,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    let files = render_csharp(fsm, options)?;
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.name);
        fs::write(&path, file.contents)?;
        written.push(path);
    }
    info!(
        files = written.len(),
        dir = %out_dir.display(),
        "generated C# state machine"
    );
    Ok(written)
}
