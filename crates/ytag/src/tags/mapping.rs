//! `!Merge` — right-biased mapping merge.
//!
//! Grounded on `examples/original_source/pkg/emrichen/merge.go`'s
//! `handleMerge`; this implementation preserves stable insertion order
//! rather than the source's unspecified map iteration order, a recorded
//! DESIGN.md decision (§9's "Mapping order after `!Merge`" redesign note).

use crate::dispatch::Interpreter;
use crate::error::Result;
use crate::error::YtagError;
use crate::node::Node;

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!Merge", handle_merge).expect("!Merge registered once");
}

fn handle_merge(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let items = node.as_sequence().ok_or_else(|| YtagError::Shape { tag: "!Merge".to_string(), message: "expects a sequence of mappings".to_string() })?;
    let mut out: Vec<(Node, Node)> = Vec::new();
    for item in items {
        let Some(evaluated) = interp.process(item)? else { continue };
        let pairs = evaluated
            .as_mapping()
            .ok_or_else(|| YtagError::Shape { tag: "!Merge".to_string(), message: "each element must evaluate to a mapping".to_string() })?;
        for (key, value) in pairs {
            if let Some(existing) = out.iter_mut().find(|(k, _)| k == key) {
                existing.1 = value.clone();
            } else {
                out.push((key.clone(), value.clone()));
            }
        }
    }
    Ok(Some(Node::mapping(out)))
}

#[cfg(test)]
mod tests {
    use super::super::test_interp;
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn merge_is_right_biased_and_replaces_nested_maps() {
        let mut interp = test_interp();
        let node = Node {
            tag: "!Merge".to_string(),
            kind: NodeKind::Sequence(vec![
                Node::mapping(vec![
                    (Node::string("a"), Node::int(1)),
                    (Node::string("nested"), Node::mapping(vec![(Node::string("x"), Node::int(1))])),
                ]),
                Node::mapping(vec![
                    (Node::string("a"), Node::int(2)),
                    (Node::string("nested"), Node::mapping(vec![(Node::string("y"), Node::int(2))])),
                ]),
            ]),
        };
        let result = interp.process(&node).unwrap().unwrap();
        let pairs = result.as_mapping().unwrap();
        let a = pairs.iter().find(|(k, _)| k.as_scalar_text() == Some("a")).unwrap();
        assert_eq!(a.1.as_scalar_text(), Some("2"));
        let nested = pairs.iter().find(|(k, _)| k.as_scalar_text() == Some("nested")).unwrap();
        assert_eq!(nested.1.as_mapping().unwrap().len(), 1);
    }

    #[test]
    fn merge_skips_absent_elements() {
        let mut interp = test_interp();
        let node = Node {
            tag: "!Merge".to_string(),
            kind: NodeKind::Sequence(vec![Node::scalar("!Void", ""), Node::mapping(vec![(Node::string("a"), Node::int(1))])]),
        };
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_mapping().unwrap().len(), 1);
    }
}
