//! C# bundles for compiled machines.

use statecraft_machine::{CsharpOptions, GeneratedFile, generate_csharp_fsm, render_csharp};

const LOOP: &str = "start\nwhile (items left?) is (yes)\n:pack item;\nendwhile (no)\n:ship;\nstop\n";

fn contents<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
    files
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.contents.as_str())
        .unwrap_or_else(|| panic!("no {name}"))
}

#[test]
fn every_file_uses_the_namespace() {
    let fsm = statecraft_ad::build_fsm_from_plantuml(LOOP).expect("valid diagram");
    let options = CsharpOptions::default().with_namespace("Warehouse.Flow");
    let files = render_csharp(&fsm, &options).expect("renders");
    assert_eq!(files.len(), fsm.transitions().len() + 2);
    for file in &files {
        assert!(file.name.ends_with(".cs"));
        assert!(file.contents.contains("namespace Warehouse.Flow"), "{}", file.name);
    }
}

#[test]
fn state_enum_and_dispatcher_agree() {
    let fsm = statecraft_ad::build_fsm_from_plantuml(LOOP).expect("valid diagram");
    let files = render_csharp(&fsm, &CsharpOptions::default()).expect("renders");
    let state = contents(&files, "State.cs");
    assert!(state.contains("pack_item_1,"), "{state}");
    let dispatcher = contents(&files, "Dispatcher.cs");
    assert!(dispatcher.contains("public const State Start = State.start_0;"));
    assert!(dispatcher.contains("case State.pack_item_1:"));
}

#[test]
fn scl_guards_become_partial_methods() {
    let fsm = statecraft_scl::build_fsm_from_scl(
        "context C { }\n\
         state Wait uses C { next { when n > 0 => Done\n otherwise => Wait } }\n\
         state Done uses C { next { otherwise => Done } }",
    )
    .expect("valid program");
    let files = render_csharp(&fsm, &CsharpOptions::default()).expect("renders");
    let guarded = contents(&files, "Transition_wait_0_done_1.cs");
    assert!(guarded.contains("// n > 0"));
    assert!(guarded.contains("private static partial bool When_n_gt_0(object context);"));
    let fallback = contents(&files, "Transition_wait_0_wait_0.cs");
    assert!(fallback.contains("return true;"));
}

#[test]
fn bundle_is_written_to_disk() {
    let fsm = statecraft_ad::build_fsm_from_plantuml(LOOP).expect("valid diagram");
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("nested").join("csharp");
    let written = generate_csharp_fsm(&fsm, &out, &CsharpOptions::default()).expect("writes");
    assert_eq!(written.len(), fsm.transitions().len() + 2);
    for path in &written {
        assert!(path.starts_with(&out));
        assert!(path.exists());
    }
}
