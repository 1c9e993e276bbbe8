//! A hand-rolled block-style YAML emitter for fully-evaluated `Node` trees.
//!
//! Not crate-backed: by the time a node reaches here every custom tag has
//! already been stripped by `Process`, so the only remaining job is
//! rendering a known-small set of canonical-tagged scalars/sequences/
//! mappings in block style — core design per SPEC_FULL.md §4.6, not ambient
//! infrastructure a serialization crate would replace.

use crate::node::{Node, NodeKind, TAG_NULL};

/// Render `node` (must carry no custom tags) as block-style YAML, without a
/// trailing document-separator; the caller (the streaming façade) is
/// responsible for `---` separators between documents.
pub fn encode_node(node: &Node) -> String {
    let mut out = String::new();
    match &node.kind {
        NodeKind::Document(inner) => write_block(&mut out, inner, 0, true),
        NodeKind::Mapping(pairs) if pairs.is_empty() => out.push_str("{}\n"),
        NodeKind::Sequence(items) if items.is_empty() => out.push_str("[]\n"),
        _ => write_block(&mut out, node, 0, true),
    }
    out
}

fn write_block(out: &mut String, node: &Node, indent: usize, top_level: bool) {
    match &node.kind {
        NodeKind::Scalar(_) => {
            out.push_str(&pad(indent));
            out.push_str(&scalar_literal(node));
            out.push('\n');
        }
        NodeKind::Sequence(items) => {
            if items.is_empty() {
                out.push_str(&pad(indent));
                out.push_str("[]\n");
                return;
            }
            for item in items {
                out.push_str(&pad(indent));
                out.push_str("- ");
                write_inline_or_nested(out, item, indent);
            }
        }
        NodeKind::Mapping(pairs) => {
            if pairs.is_empty() {
                out.push_str(&pad(indent));
                out.push_str("{}\n");
                return;
            }
            for (key, value) in pairs {
                out.push_str(&pad(indent));
                out.push_str(&scalar_literal(key));
                out.push(':');
                match &value.kind {
                    NodeKind::Sequence(items) if !items.is_empty() => {
                        out.push('\n');
                        write_block(out, value, indent, false);
                    }
                    NodeKind::Mapping(items) if !items.is_empty() => {
                        out.push('\n');
                        write_block(out, value, indent + 2, false);
                    }
                    _ => {
                        out.push(' ');
                        write_inline(out, value);
                        out.push('\n');
                    }
                }
            }
        }
        NodeKind::Document(inner) => write_block(out, inner, indent, top_level),
        NodeKind::Alias(name) => {
            out.push_str(&pad(indent));
            out.push_str(&format!("*{name}\n"));
        }
    }
}

/// Write a sequence item's value either inline (scalar) or as a nested
/// block starting on the following line, matching common block-YAML
/// emitters' "`- ` followed by either a scalar or a nested collection"
/// convention.
fn write_inline_or_nested(out: &mut String, node: &Node, indent: usize) {
    match &node.kind {
        NodeKind::Scalar(_) => {
            out.push_str(&scalar_literal(node));
            out.push('\n');
        }
        NodeKind::Mapping(pairs) if !pairs.is_empty() => {
            let mut first = true;
            for (key, value) in pairs {
                if !first {
                    out.push_str(&pad(indent + 2));
                }
                first = false;
                out.push_str(&scalar_literal(key));
                out.push(':');
                match &value.kind {
                    NodeKind::Sequence(items) if !items.is_empty() => {
                        out.push('\n');
                        write_block(out, value, indent + 2, false);
                    }
                    NodeKind::Mapping(items) if !items.is_empty() => {
                        out.push('\n');
                        write_block(out, value, indent + 4, false);
                    }
                    _ => {
                        out.push(' ');
                        write_inline(out, value);
                        out.push('\n');
                    }
                }
            }
        }
        _ => {
            out.push('\n');
            write_block(out, node, indent + 2, false);
        }
    }
}

fn write_inline(out: &mut String, node: &Node) {
    match &node.kind {
        NodeKind::Scalar(_) => out.push_str(&scalar_literal(node)),
        NodeKind::Sequence(items) if items.is_empty() => out.push_str("[]"),
        NodeKind::Mapping(pairs) if pairs.is_empty() => out.push_str("{}"),
        _ => out.push_str(&scalar_literal(node)),
    }
}

fn scalar_literal(node: &Node) -> String {
    let Some(text) = node.as_scalar_text() else { return String::new() };
    if node.tag == TAG_NULL {
        return "null".to_string();
    }
    if node.tag == TAG_STR && needs_quoting(text) {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        text.to_string()
    }
}

fn needs_quoting(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if matches!(crate::node::resolve_plain_scalar_tag(text), "!!bool" | "!!int" | "!!float" | "!!null") {
        return true;
    }
    text.starts_with(|c: char| "!&*-?|>%@`\"'#,[]{}:".contains(c))
        || text.contains(": ")
        || text.contains(" #")
        || text.ends_with(':')
        || text.trim() != text
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}
