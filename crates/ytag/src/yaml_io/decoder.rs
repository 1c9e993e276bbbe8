//! The multi-document YAML decoder: a `MarkedEventReceiver` that builds
//! [`Node`] trees directly (instead of an intermediate tree type).
//!
//! Grounded on `examples/other_examples/f984c0d2_saphyr-rs-saphyr__src-yaml.rs.rs`'s
//! `YamlLoader` (`doc_stack`/`key_stack`/`anchor_map`, `insert_new_node`),
//! adapted to build this crate's `Node`/`NodeKind` instead of `Yaml`, and to
//! preserve a custom tag's raw (possibly comma-stacked) suffix verbatim
//! rather than resolving it to a single type, per §3's tag-stack design.
//!
//! This loader parses the whole input stream upfront via
//! `Parser::load(.., true)` rather than driving `Parser::next()` one event
//! at a time; see DESIGN.md's "decoder buffering" note for why lazy
//! per-document incremental scanning was not attempted without a compiler
//! to verify it against.

use crate::node::{Node, NodeKind, TAG_MAP, TAG_NULL, TAG_SEQ, TAG_STR};
use saphyr_parser::{Event, MarkedEventReceiver, Marker, Parser, ScanError, Tag, TScalarStyle};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("YAML parse error: {0}")]
    Scan(#[from] ScanError),
}

/// Decode `source` into one [`Node::document`] per top-level YAML document,
/// in stream order.
pub fn decode_str(source: &str) -> Result<Vec<Node>, DecodeError> {
    let mut parser = Parser::new(source.chars());
    let mut loader = Loader::default();
    parser.load(&mut loader, true)?;
    Ok(loader.documents)
}

#[derive(Default)]
struct Loader {
    documents: Vec<Node>,
    doc_stack: Vec<(Node, usize)>,
    key_stack: Vec<Option<Node>>,
    anchor_map: HashMap<usize, Node>,
}

impl Loader {
    fn insert_new_node(&mut self, node: Node, anchor_id: usize) {
        if anchor_id > 0 {
            self.anchor_map.insert(anchor_id, node.clone());
        }
        let Some((parent, _)) = self.doc_stack.last_mut() else {
            self.doc_stack.push((node, anchor_id));
            return;
        };
        match &mut parent.kind {
            NodeKind::Sequence(items) => items.push(node),
            NodeKind::Mapping(pairs) => {
                let slot = self.key_stack.last_mut().expect("mapping parent has a key slot");
                match slot.take() {
                    None => *slot = Some(node),
                    Some(key) => pairs.push((key, node)),
                }
            }
            _ => unreachable!("only sequence/mapping parents are pushed onto doc_stack"),
        }
    }

    fn tagged(kind: NodeKind, tag: Option<Tag>, style: TScalarStyle, text_ref: Option<&str>) -> Node {
        let tag_string = match tag {
            Some(Tag { handle, suffix }) if handle == "tag:yaml.org,2002:" => canonical_tag(&suffix).to_string(),
            Some(Tag { handle, suffix }) if handle == "!" => format!("!{suffix}"),
            Some(Tag { suffix, .. }) => format!("!{suffix}"),
            None => match &kind {
                NodeKind::Sequence(_) => TAG_SEQ.to_string(),
                NodeKind::Mapping(_) => TAG_MAP.to_string(),
                NodeKind::Scalar(_) if style != TScalarStyle::Plain => TAG_STR.to_string(),
                NodeKind::Scalar(text) => crate::node::resolve_plain_scalar_tag(text).to_string(),
                _ => text_ref.map(crate::node::resolve_plain_scalar_tag).unwrap_or(TAG_STR).to_string(),
            },
        };
        Node { tag: tag_string, kind }
    }
}

fn canonical_tag(suffix: &str) -> &'static str {
    match suffix {
        "bool" => crate::node::TAG_BOOL,
        "int" => crate::node::TAG_INT,
        "float" => crate::node::TAG_FLOAT,
        "null" => TAG_NULL,
        "seq" => TAG_SEQ,
        "map" => TAG_MAP,
        _ => TAG_STR,
    }
}

impl MarkedEventReceiver for Loader {
    fn on_event(&mut self, ev: Event, _marker: Marker) {
        match ev {
            Event::StreamStart | Event::StreamEnd | Event::Nothing | Event::DocumentStart => {}
            Event::DocumentEnd => {
                let root = self.doc_stack.pop().map(|(node, _)| node).unwrap_or_else(Node::null);
                self.documents.push(Node::document(root));
            }
            Event::SequenceStart(aid, tag) => {
                self.doc_stack.push((Loader::tagged(NodeKind::Sequence(Vec::new()), tag, TScalarStyle::Plain, None), aid));
            }
            Event::SequenceEnd => {
                let (node, aid) = self.doc_stack.pop().expect("matching SequenceStart");
                self.insert_new_node(node, aid);
            }
            Event::MappingStart(aid, tag) => {
                self.doc_stack.push((Loader::tagged(NodeKind::Mapping(Vec::new()), tag, TScalarStyle::Plain, None), aid));
                self.key_stack.push(None);
            }
            Event::MappingEnd => {
                self.key_stack.pop();
                let (node, aid) = self.doc_stack.pop().expect("matching MappingStart");
                self.insert_new_node(node, aid);
            }
            Event::Scalar(value, style, aid, tag) => {
                let node = Loader::tagged(NodeKind::Scalar(value.clone()), tag, style, Some(&value));
                self.insert_new_node(node, aid);
            }
            Event::Alias(id) => {
                let resolved = self.anchor_map.get(&id).cloned().unwrap_or_else(|| Node { tag: String::new(), kind: NodeKind::Alias(id.to_string()) });
                self.insert_new_node(resolved, 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_scalars_with_core_schema_types() {
        let docs = decode_str("a: 1\nb: true\nc: 2.5\nd: ~\n").unwrap();
        assert_eq!(docs.len(), 1);
        let NodeKind::Document(root) = &docs[0].kind else { panic!("expected document") };
        let pairs = root.as_mapping().unwrap();
        assert_eq!(pairs[0].1.tag, crate::node::TAG_INT);
        assert_eq!(pairs[1].1.tag, crate::node::TAG_BOOL);
        assert_eq!(pairs[2].1.tag, crate::node::TAG_FLOAT);
        assert_eq!(pairs[3].1.tag, crate::node::TAG_NULL);
    }

    #[test]
    fn decodes_custom_tag_with_comma_stack() {
        let docs = decode_str("x: !Debug,!Var name\n").unwrap();
        let NodeKind::Document(root) = &docs[0].kind else { panic!("expected document") };
        let pairs = root.as_mapping().unwrap();
        assert_eq!(pairs[0].1.tag, "!Debug,!Var");
    }

    #[test]
    fn decodes_multi_document_stream_in_order() {
        let docs = decode_str("---\na: 1\n---\nb: 2\n").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn quoted_scalar_is_always_str() {
        let docs = decode_str("x: \"1\"\n").unwrap();
        let NodeKind::Document(root) = &docs[0].kind else { panic!("expected document") };
        let pairs = root.as_mapping().unwrap();
        assert_eq!(pairs[0].1.tag, crate::node::TAG_STR);
    }
}
