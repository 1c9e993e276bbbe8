//! `!Op` — comparison and arithmetic over a `{a, op, b}` mapping.
//!
//! Grounded on `examples/original_source/pkg/emrichen/op.go` (`handleOp`),
//! ported token-for-token; the floor-division/modulo truncating-toward-zero
//! behavior (rather than Python-style flooring) is carried over from the
//! source's use of Go's native `int(a) / int(b)` / `int(a) % int(b)`, a
//! documented DESIGN.md decision.

use crate::args::{parse_args, SlotSpec};
use crate::dispatch::Interpreter;
use crate::error::{Result, YtagError};
use crate::node::{node_to_value, Node};
use crate::value::{as_f64, deep_eq, is_int_shaped, is_numeric};
use regex::Regex;

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!Op", handle_op).expect("!Op registered once");
}

fn type_err(msg: impl Into<String>) -> YtagError {
    YtagError::Type(msg.into())
}

fn handle_op(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let mut args = parse_args(
        interp,
        node,
        &[SlotSpec::required("op"), SlotSpec::required("a"), SlotSpec::required("b")],
    )?;
    let op_node = args.take("op").expect("op is required");
    let a_node = args.take("a").expect("a is required");
    let b_node = args.take("b").expect("b is required");

    let op = op_node
        .as_scalar_text()
        .ok_or_else(|| YtagError::Shape { tag: "!Op".to_string(), message: "'op' argument must be a scalar".to_string() })?;

    let a_value = node_to_value(&a_node);
    let b_value = node_to_value(&b_node);
    let both_int = is_int_shaped(&a_value) && is_int_shaped(&b_value);

    let is_number_op = matches!(
        op,
        "+" | "plus"
            | "add"
            | "-"
            | "minus"
            | "sub"
            | "subtract"
            | "*"
            | "×"
            | "mul"
            | "times"
            | "/"
            | "÷"
            | "div"
            | "divide"
            | "truediv"
            | "//"
            | "floordiv"
            | "<"
            | "lt"
            | ">"
            | "gt"
            | "<="
            | "le"
            | "lte"
            | ">="
            | "ge"
            | "gte"
            | "%"
            | "mod"
            | "modulo"
    );
    let is_string_op = matches!(op, "contains" | "startswith" | "endswith" | "matches");

    let (a_num, b_num) = if is_number_op {
        let a = as_f64(&a_value).ok_or_else(|| type_err("could not convert first argument to float"))?;
        let b = as_f64(&b_value).ok_or_else(|| type_err("could not convert second argument to float"))?;
        (a, b)
    } else {
        (0.0, 0.0)
    };

    let both_numeric = is_numeric(&a_value) && is_numeric(&b_value);

    let result = match op {
        "=" | "==" | "===" => {
            if both_numeric {
                Node::bool(as_f64(&a_value) == as_f64(&b_value))
            } else {
                Node::bool(deep_eq(&a_value, &b_value))
            }
        }
        "≠" | "!=" | "!==" | "ne" => {
            if both_numeric {
                Node::bool(as_f64(&a_value) != as_f64(&b_value))
            } else {
                Node::bool(!deep_eq(&a_value, &b_value))
            }
        }
        "<" | "lt" => Node::bool(a_num < b_num),
        ">" | "gt" => Node::bool(a_num > b_num),
        "<=" | "le" | "lte" => Node::bool(a_num <= b_num),
        ">=" | "ge" | "gte" => Node::bool(a_num >= b_num),

        "+" | "plus" | "add" => arithmetic_result(both_int, a_num + b_num),
        "-" | "minus" | "sub" | "subtract" => arithmetic_result(both_int, a_num - b_num),
        "*" | "×" | "mul" | "times" => arithmetic_result(both_int, a_num * b_num),
        "/" | "÷" | "div" | "divide" | "truediv" => {
            let result = a_num / b_num;
            if both_int && result == (result as i64) as f64 {
                Node::int(result as i64)
            } else {
                Node::float(result)
            }
        }
        "//" | "floordiv" => {
            if b_num == 0.0 {
                return Err(type_err("division by zero"));
            }
            Node::int((a_num as i64) / (b_num as i64))
        }
        "%" | "mod" | "modulo" => {
            if b_num == 0.0 {
                return Err(type_err("division by zero"));
            }
            Node::int((a_num as i64) % (b_num as i64))
        }

        "contains" => string_op(is_string_op, "contains", &a_node, &b_node, |a, b| a.contains(b))?,
        "startswith" => string_op(is_string_op, "startswith", &a_node, &b_node, |a, b| a.starts_with(b))?,
        "endswith" => string_op(is_string_op, "endswith", &a_node, &b_node, |a, b| a.ends_with(b))?,
        "matches" => {
            if !is_string_op {
                return Err(type_err("matches operator requires string arguments"));
            }
            let a = a_node.as_scalar_text().unwrap_or_default();
            let b = b_node.as_scalar_text().unwrap_or_default();
            let re = Regex::new(b).map_err(|_| type_err("invalid regexp"))?;
            Node::bool(re.is_match(a))
        }

        "in" | "∈" => Node::bool(membership(&a_value, &b_value)?),
        "not in" | "∉" => Node::bool(!membership(&a_value, &b_value)?),

        other => return Err(type_err(format!("unsupported operator: {other}"))),
    };

    Ok(Some(result))
}

fn arithmetic_result(both_int: bool, value: f64) -> Node {
    if both_int {
        Node::int(value as i64)
    } else {
        Node::float(value)
    }
}

fn string_op(
    is_string_op: bool,
    name: &str,
    a: &Node,
    b: &Node,
    f: impl Fn(&str, &str) -> bool,
) -> Result<Node> {
    if !is_string_op {
        return Err(type_err(format!("{name} operator requires string arguments")));
    }
    let a = a.as_scalar_text().unwrap_or_default();
    let b = b.as_scalar_text().unwrap_or_default();
    Ok(Node::bool(f(a, b)))
}

fn membership(a: &serde_json::Value, b: &serde_json::Value) -> Result<bool> {
    let items = b.as_array().ok_or_else(|| type_err("in operator requires a sequence as second argument"))?;
    Ok(items.iter().any(|item| deep_eq(item, a)))
}

#[cfg(test)]
mod tests {
    use super::super::test_interp;
    use crate::node::NodeKind;
    use crate::node::Node;

    fn op_node(a: Node, op: &str, b: Node) -> Node {
        Node {
            tag: "!Op".to_string(),
            kind: NodeKind::Mapping(vec![
                (Node::string("a"), a),
                (Node::string("op"), Node::string(op)),
                (Node::string("b"), b),
            ]),
        }
    }

    #[test]
    fn comparison_returns_bool() {
        let mut interp = test_interp();
        let node = op_node(Node::int(10), ">", Node::int(5));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("true"));
    }

    #[test]
    fn int_plus_int_stays_int() {
        let mut interp = test_interp();
        let node = op_node(Node::int(3), "+", Node::int(4));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.tag, crate::node::TAG_INT);
        assert_eq!(result.as_scalar_text(), Some("7"));
    }

    #[test]
    fn mixed_int_float_yields_float() {
        let mut interp = test_interp();
        let node = op_node(Node::int(3), "+", Node::float(0.5));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.tag, crate::node::TAG_FLOAT);
    }

    #[test]
    fn string_contains() {
        let mut interp = test_interp();
        let node = op_node(Node::string("hello world"), "contains", Node::string("world"));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("true"));
    }

    #[test]
    fn membership_in_sequence() {
        let mut interp = test_interp();
        let node = op_node(Node::string("b"), "in", Node::sequence(vec![Node::string("a"), Node::string("b")]));
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("true"));
    }

    #[test]
    fn unknown_operator_errors() {
        let mut interp = test_interp();
        let node = op_node(Node::int(1), "frobnicate", Node::int(2));
        assert!(interp.process(&node).is_err());
    }
}
