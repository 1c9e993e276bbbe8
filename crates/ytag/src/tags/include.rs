//! `!Include`, `!IncludeText`, `!IncludeBinary`, `!IncludeBase64`,
//! `!IncludeGlob` — file inclusion.
//!
//! Grounded on `examples/original_source/pkg/emrichen/include.go`
//! (`handleInclude`/`loadYaml`/`handleIncludeBase64`/`handleIncludeBinary`/
//! `handleIncludeGlob`/`handleIncludeText`).

use crate::dispatch::Interpreter;
use crate::error::{Result, YtagError};
use crate::node::Node;
use crate::yaml_io::decode_str;
use base64::{engine::general_purpose::STANDARD, Engine};
use glob::glob;

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!Include", handle_include).expect("!Include registered once");
    interp.register_tag("!IncludeText", handle_include_text).expect("!IncludeText registered once");
    interp.register_tag("!IncludeBinary", handle_include_binary).expect("!IncludeBinary registered once");
    interp.register_tag("!IncludeBase64", handle_include_base64).expect("!IncludeBase64 registered once");
    interp.register_tag("!IncludeGlob", handle_include_glob).expect("!IncludeGlob registered once");
}

fn path_of(tag: &str, node: &Node) -> Result<&str> {
    node.as_scalar_text().ok_or_else(|| YtagError::Shape { tag: tag.to_string(), message: "operand must be a scalar file path".to_string() })
}

fn load_and_process(interp: &mut Interpreter, path: &str) -> Result<Option<Node>> {
    let source = std::fs::read_to_string(path)?;
    let documents = decode_str(&source).map_err(|e| YtagError::YamlParse(format!("{path}: {e}")))?;
    let mut evaluated = Vec::with_capacity(documents.len());
    for document in documents {
        if let Some(node) = interp.process(&document)? {
            evaluated.push(node);
        }
    }
    Ok(match evaluated.len() {
        0 => None,
        1 => Some(evaluated.into_iter().next().unwrap()),
        _ => Some(Node::sequence(evaluated)),
    })
}

fn handle_include(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let path = path_of("!Include", node)?.to_string();
    load_and_process(interp, &path)
}

fn handle_include_text(_interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let path = path_of("!IncludeText", node)?;
    let text = std::fs::read_to_string(path)?;
    Ok(Some(Node::string(text)))
}

fn handle_include_binary(_interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let path = path_of("!IncludeBinary", node)?;
    let bytes = std::fs::read(path)?;
    Ok(Some(Node::string(String::from_utf8_lossy(&bytes).into_owned())))
}

fn handle_include_base64(_interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let path = path_of("!IncludeBase64", node)?;
    let bytes = std::fs::read(path)?;
    Ok(Some(Node::string(STANDARD.encode(bytes))))
}

fn handle_include_glob(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let pattern = path_of("!IncludeGlob", node)?.to_string();
    let mut out = Vec::new();
    for entry in glob(&pattern)? {
        let path = entry.map_err(|e| YtagError::Io(e.into_error()))?;
        let path = path.to_string_lossy().into_owned();
        if let Some(evaluated) = load_and_process(interp, &path)? {
            out.push(evaluated);
        }
    }
    Ok(Some(Node::sequence(out)))
}
