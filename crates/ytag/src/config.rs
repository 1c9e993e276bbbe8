//! Variable-file, `--include-env`, and `--define` loading for the CLI
//! front end.
//!
//! Grounded on `examples/original_source/cmd/emrichen/main.go`'s
//! `ProcessSettings`/`ProcessCommand` (the var-file merge order: a
//! sequence-of-mappings is merged left-to-right, a single mapping is used
//! directly; `--include-env` splices `os.Environ()`; later sources
//! overwrite earlier ones). Error messages follow this crate's own
//! `YtagError::Config` convention rather than the Go source's, since no
//! exact string was observed to replicate.

use crate::environment::Frame;
use crate::error::{Result, YtagError};
use crate::node::{node_to_value, Node};
use crate::yaml_io::decode_str;
use serde_json::Value as Json;

/// Load one var-file's contents into `frame`, overwriting any existing
/// keys (later files/sources win, per §4.8/§6).
///
/// The file's top-level document must be either a single mapping (used
/// directly) or a sequence of mappings (merged left-to-right); anything
/// else fails.
pub fn load_var_file(frame: &mut Frame, path: &str) -> Result<()> {
    let source = std::fs::read_to_string(path)?;
    let documents = decode_str(&source).map_err(|e| YtagError::Config(format!("{path}: {e}")))?;
    let Some(first) = documents.into_iter().next() else {
        return Err(YtagError::Config(format!("{path}: empty var-file")));
    };
    let root = match &first.kind {
        crate::node::NodeKind::Document(inner) => inner.as_ref(),
        _ => &first,
    };

    match &root.kind {
        crate::node::NodeKind::Mapping(pairs) => {
            for (key, value) in pairs {
                let Some(name) = key.as_scalar_text() else { continue };
                frame.insert(name.to_string(), node_to_value(value));
            }
        }
        crate::node::NodeKind::Sequence(items) => {
            for item in items {
                let pairs = item.as_mapping().ok_or_else(|| {
                    YtagError::Config(format!("{path}: sequence-form var-file elements must all be mappings"))
                })?;
                for (key, value) in pairs {
                    let Some(name) = key.as_scalar_text() else { continue };
                    frame.insert(name.to_string(), node_to_value(value));
                }
            }
        }
        _ => return Err(YtagError::Config(format!("{path}: var-file must be a mapping or a sequence of mappings"))),
    }
    Ok(())
}

/// Splice the current process environment into `frame` as string values.
pub fn include_env(frame: &mut Frame) {
    for (key, value) in std::env::vars() {
        frame.insert(key, Json::String(value));
    }
}

/// Parse one `--define key=value` argument and insert it into `frame`.
pub fn apply_define(frame: &mut Frame, arg: &str) -> Result<()> {
    let (key, value) = arg.split_once('=').ok_or_else(|| YtagError::Config(format!("--define expects key=value, got '{arg}'")))?;
    frame.insert(key.to_string(), Json::String(value.to_string()));
    Ok(())
}

/// Convert a loaded variable frame into the `Node`-producing path used by
/// `!Include`'s own loader, exposed here purely for symmetry/testing.
pub fn frame_value(frame: &Frame) -> Node {
    crate::node::value_to_node(&Json::Object(frame.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn define_parses_first_equals_only() {
        let mut frame = Frame::new();
        apply_define(&mut frame, "env=prod=east").unwrap();
        assert_eq!(frame.get("env"), Some(&json!("prod=east")));
    }

    #[test]
    fn define_rejects_missing_equals() {
        let mut frame = Frame::new();
        assert!(apply_define(&mut frame, "bogus").is_err());
    }

    #[test]
    fn include_env_splices_process_vars() {
        std::env::set_var("YTAG_TEST_VAR", "1");
        let mut frame = Frame::new();
        include_env(&mut frame);
        assert_eq!(frame.get("YTAG_TEST_VAR"), Some(&json!("1")));
        std::env::remove_var("YTAG_TEST_VAR");
    }
}
