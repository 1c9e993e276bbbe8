//! `!Var`, `!Defaults`, `!With` — variable lookup and scoping.
//!
//! Grounded on `examples/original_source/pkg/emrichen/var.go` (`handleVar`)
//! and `emrichen.go`'s `updateVars`/`"!Defaults"` handler and `handleWith`
//! (present in `emrichen.go`'s default handler table, though the
//! function body itself was not part of the retrieved source — its shape
//! here follows SPEC_FULL.md §4.2/§4.5 directly: push a frame, store
//! evaluated `vars`, evaluate `template`, pop).

use crate::args::{parse_args, SlotSpec};
use crate::dispatch::Interpreter;
use crate::environment::Frame;
use crate::error::{Result, YtagError};
use crate::node::{node_to_value, value_to_node, Node};

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!Var", handle_var).expect("!Var registered once");
    interp.register_tag("!Defaults", handle_defaults).expect("!Defaults registered once");
    interp.register_tag("!With", handle_with).expect("!With registered once");
}

fn handle_var(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let name = node
        .as_scalar_text()
        .ok_or_else(|| YtagError::Shape { tag: "!Var".to_string(), message: "variable definition must be !Var variable name".to_string() })?;
    let value = interp.environment.get_var(name).cloned().ok_or_else(|| YtagError::VarNotFound(name.to_string()))?;
    Ok(Some(value_to_node(&value)))
}

/// Evaluate each entry and store it into the *current* frame (an
/// assignment, not a fallback per §4.2), then return absent.
fn handle_defaults(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let Some(pairs) = node.as_mapping() else {
        return Ok(None);
    };
    for (key, value) in pairs {
        let Some(name) = key.as_scalar_text() else { continue };
        if let Some(evaluated) = interp.process(value)? {
            interp.environment.set_current(name, node_to_value(&evaluated));
        }
    }
    Ok(None)
}

fn handle_with(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let mut args = parse_args(
        interp,
        node,
        &[SlotSpec::optional("vars"), SlotSpec::deferred("template", true)],
    )?;
    let template = args.take("template").expect("template is required");
    let vars_node = args.take("vars");

    let mut frame: Frame = Frame::new();
    if let Some(vars_node) = vars_node {
        if let Some(pairs) = vars_node.as_mapping() {
            for (key, value) in pairs {
                let Some(name) = key.as_scalar_text() else { continue };
                frame.insert(name.to_string(), node_to_value(&value));
            }
        }
    }

    interp.with_scope(frame, |interp| interp.process(&template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use serde_json::{json, Map};

    #[test]
    fn var_errors_on_unbound_name() {
        let mut interp = Interpreter::new(Environment::new(Map::new()));
        let err = interp.process(&Node::scalar("!Var", "missing")).unwrap_err();
        assert_eq!(err.to_string(), "variable missing not found");
    }

    #[test]
    fn defaults_assigns_into_current_frame_and_is_absent() {
        let mut interp = Interpreter::new(Environment::new(Map::new()));
        let defaults = Node { tag: "!Defaults".to_string(), kind: crate::node::NodeKind::Mapping(vec![(Node::string("x"), Node::int(1))]) };
        let result = interp.process(&defaults).unwrap();
        assert!(result.is_none());
        assert_eq!(interp.environment.get_var("x"), Some(&json!(1)));
    }

    #[test]
    fn with_pushes_frame_and_pops_after() {
        let mut interp = Interpreter::new(Environment::new(Map::new()));
        let node = Node {
            tag: "!With".to_string(),
            kind: crate::node::NodeKind::Mapping(vec![
                (Node::string("vars"), Node::mapping(vec![(Node::string("x"), Node::int(5))])),
                (Node::string("template"), Node::scalar("!Var", "x")),
            ]),
        };
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("5"));
        assert_eq!(interp.environment.depth(), 1);
        assert!(interp.environment.get_var("x").is_none());
    }
}
