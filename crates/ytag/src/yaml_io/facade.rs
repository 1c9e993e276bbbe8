//! The streaming façade: decode a multi-document source, evaluate each
//! document, drop absent ones, and re-encode the survivors with `---\n`
//! separators between them (but not before the first).
//!
//! Grounded on §6's "Output format" and testable property 8 (a middle
//! absent document is skipped without leaving a stray separator).

use crate::dispatch::Interpreter;
use crate::error::Result;
use crate::node::Node;
use crate::yaml_io::decoder::decode_str;
use crate::yaml_io::encoder::encode_node;

/// Evaluate every document in `source` against `interp`, returning the
/// surviving (non-absent) evaluated document nodes in stream order.
pub fn process_stream(interp: &mut Interpreter, source: &str) -> Result<Vec<Node>> {
    let documents = decode_str(source).map_err(|e| crate::error::YtagError::YamlParse(e.to_string()))?;
    let mut out = Vec::with_capacity(documents.len());
    for document in documents {
        if let Some(evaluated) = interp.process(&document)? {
            out.push(evaluated);
        }
    }
    Ok(out)
}

/// Render already-evaluated documents as a single YAML stream, with one
/// `---\n` separator before every document after the first.
pub fn render_stream(documents: &[Node]) -> String {
    let mut out = String::new();
    for (i, doc) in documents.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&encode_node(doc));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use serde_json::Map;

    #[test]
    fn absent_middle_document_is_dropped_without_stray_separator() {
        let mut interp = Interpreter::new(Environment::new(Map::new()));
        let source = "---\na: 1\n---\n!Void\n---\nb: 2\n";
        let documents = process_stream(&mut interp, source).unwrap();
        assert_eq!(documents.len(), 2);
        let rendered = render_stream(&documents);
        assert_eq!(rendered.matches("---").count(), 1);
    }
}
