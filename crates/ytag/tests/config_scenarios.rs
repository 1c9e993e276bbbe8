//! Ambient scenarios 9-11 from SPEC_FULL.md §8: var-file precedence,
//! `--define`, and missing-file diagnostics.

use std::io::Write;
use ytag::config::{apply_define, load_var_file};
use ytag::environment::Frame;

fn write_temp(contents: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("ytag-config-test-{}-{:?}-{}", std::process::id(), std::thread::current().id(), contents.len()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn scenario_9_later_var_file_wins_on_shared_key() {
    let a = write_temp("name: from-a\nother: 1\n");
    let b = write_temp("name: from-b\n");

    let mut frame = Frame::new();
    load_var_file(&mut frame, a.to_str().unwrap()).unwrap();
    load_var_file(&mut frame, b.to_str().unwrap()).unwrap();

    assert_eq!(frame.get("name"), Some(&serde_json::json!("from-b")));
    assert_eq!(frame.get("other"), Some(&serde_json::json!(1)));
}

#[test]
fn scenario_9b_sequence_form_var_file_merges_left_to_right() {
    let path = write_temp("- name: first\n  a: 1\n- name: second\n");
    let mut frame = Frame::new();
    load_var_file(&mut frame, path.to_str().unwrap()).unwrap();
    assert_eq!(frame.get("name"), Some(&serde_json::json!("second")));
    assert_eq!(frame.get("a"), Some(&serde_json::json!(1)));
}

#[test]
fn scenario_10_define_seeds_a_string_variable() {
    let mut frame = Frame::new();
    apply_define(&mut frame, "env=prod").unwrap();

    let mut interp = ytag::Interpreter::new(ytag::Environment::new(frame));
    let result = interp.process(&ytag::Node::scalar("!Var", "env")).unwrap().unwrap();
    assert_eq!(result.as_scalar_text(), Some("prod"));
}

#[test]
fn scenario_11_missing_var_file_surfaces_a_named_diagnostic() {
    let mut frame = Frame::new();
    let err = load_var_file(&mut frame, "/nonexistent/path/to/missing.yaml").unwrap_err();
    assert!(err.to_string().contains("I/O error"));
}
