//! `!If`, `!Not`, `!All`/`!And`, `!Any`/`!Or` — booleans and branching.
//!
//! Grounded on `examples/original_source/pkg/emrichen/if.go` (`handleIf`)
//! and `not.go` (`handleNot`, which notably does not call `Process` on its
//! operand — preserved as observed, see DESIGN.md). `!All`/`!Any` are not
//! present in the retrieved source (their `handleAll`/`handleAny` bodies
//! were not part of the pack); their short-circuit shape is grounded on
//! `json-expression/src/operators/logical.rs`'s `and`/`or` short-circuit
//! evaluation over a sequence of operands instead.

use crate::args::{parse_args, SlotSpec};
use crate::dispatch::Interpreter;
use crate::error::{Result, YtagError};
use crate::node::{node_truthy, Node};
use crate::value::is_truthy;

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!If", handle_if).expect("!If registered once");
    interp.register_tag("!Not", handle_not).expect("!Not registered once");
    interp.register_tag("!All", handle_all).expect("!All registered once");
    interp.register_tag("!And", handle_all).expect("!And registered once");
    interp.register_tag("!Any", handle_any).expect("!Any registered once");
    interp.register_tag("!Or", handle_any).expect("!Or registered once");
}

fn handle_if(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let mut args = parse_args(
        interp,
        node,
        &[SlotSpec::required("test"), SlotSpec::deferred("then", false), SlotSpec::deferred("else", false)],
    )?;
    let test = args.take("test").expect("test is required");

    if node_truthy(&test) {
        match args.take("then") {
            Some(branch) => interp.process(&branch),
            None => Ok(Some(Node::null())),
        }
    } else {
        match args.take("else") {
            Some(branch) => interp.process(&branch),
            None => Ok(Some(Node::null())),
        }
    }
}

/// `!Not` inspects the raw operand node without evaluating it first — an
/// observed quirk of the source (see DESIGN.md's Open Question decisions).
fn handle_not(_interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    Ok(Some(Node::bool(!node_truthy(node))))
}

fn handle_all(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let items = node
        .as_sequence()
        .ok_or_else(|| YtagError::Shape { tag: "!All".to_string(), message: "expects a sequence".to_string() })?;
    for item in items {
        let evaluated = interp.process(item)?;
        let truthy = evaluated.as_ref().map(|n| is_truthy(&crate::node::node_to_value(n))).unwrap_or(false);
        if !truthy {
            return Ok(Some(Node::bool(false)));
        }
    }
    Ok(Some(Node::bool(true)))
}

fn handle_any(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let items = node
        .as_sequence()
        .ok_or_else(|| YtagError::Shape { tag: "!Any".to_string(), message: "expects a sequence".to_string() })?;
    for item in items {
        let evaluated = interp.process(item)?;
        let truthy = evaluated.as_ref().map(|n| is_truthy(&crate::node::node_to_value(n))).unwrap_or(false);
        if truthy {
            return Ok(Some(Node::bool(true)));
        }
    }
    Ok(Some(Node::bool(false)))
}

#[cfg(test)]
mod tests {
    use super::super::test_interp;
    use super::*;
    use crate::node::NodeKind;

    fn if_node(test: Node, then: Option<Node>, else_: Option<Node>) -> Node {
        let mut pairs = vec![(Node::string("test"), test)];
        if let Some(t) = then {
            pairs.push((Node::string("then"), t));
        }
        if let Some(e) = else_ {
            pairs.push((Node::string("else"), e));
        }
        Node { tag: "!If".to_string(), kind: NodeKind::Mapping(pairs) }
    }

    #[test]
    fn if_picks_then_when_truthy() {
        let mut interp = test_interp();
        let node = if_node(Node::bool(true), Some(Node::string("Yes")), Some(Node::string("No")));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("Yes"));
    }

    #[test]
    fn if_picks_else_when_falsy() {
        let mut interp = test_interp();
        let node = if_node(Node::bool(false), Some(Node::string("Yes")), Some(Node::string("No")));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("No"));
    }

    #[test]
    fn if_null_test_is_falsy() {
        let mut interp = test_interp();
        let node = if_node(Node::null(), Some(Node::string("Yes")), Some(Node::string("No")));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("No"));
    }

    #[test]
    fn if_omitted_branch_yields_null() {
        let mut interp = test_interp();
        let node = if_node(Node::bool(true), None, None);
        let result = interp.process(&node).unwrap().unwrap();
        assert!(result.is_null());
    }

    #[test]
    fn not_checks_raw_scalar_truthiness() {
        let mut interp = test_interp();
        let result = interp.process(&Node::scalar("!Not", "")).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("true"));
    }

    #[test]
    fn all_empty_is_true_any_empty_is_false() {
        let mut interp = test_interp();
        let all_empty = Node { tag: "!All".to_string(), kind: NodeKind::Sequence(vec![]) };
        assert_eq!(interp.process(&all_empty).unwrap().unwrap().as_scalar_text(), Some("true"));
        let any_empty = Node { tag: "!Any".to_string(), kind: NodeKind::Sequence(vec![]) };
        assert_eq!(interp.process(&any_empty).unwrap().unwrap().as_scalar_text(), Some("false"));
    }

    #[test]
    fn all_short_circuits_at_first_falsy() {
        let mut interp = test_interp();
        let node = Node {
            tag: "!All".to_string(),
            kind: NodeKind::Sequence(vec![Node::bool(true), Node::bool(false), Node::scalar("!Error", "should not run")]),
        };
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("false"));
    }
}
