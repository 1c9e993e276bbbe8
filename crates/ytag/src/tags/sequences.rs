//! `!Concat`, `!Join`, `!Filter`, `!Loop`, `!Index`, `!Group` — sequence
//! transforms.
//!
//! `!Concat` and `!Join` are grounded on `examples/original_source/pkg/
//! emrichen/join.go`; `!Filter`/`!Loop`/`!Index`/`!Group` have no matching
//! `handleLoop`/`handleFilter`/`handleIndex`/`handleGroup` bodies in the
//! retrieved source pack, so they are built directly from SPEC_FULL.md
//! §4.5/§4.6's prose, using the per-iteration scope-push shape already
//! established by `variables::handle_with` (push a one-entry frame via
//! `Interpreter::with_scope`, which RAII-pops it even on error).

use crate::args::{parse_args, SlotSpec};
use crate::dispatch::Interpreter;
use crate::environment::Frame;
use crate::error::{Result, YtagError};
use crate::node::{node_to_value, value_to_node, Node};

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!Concat", handle_concat).expect("!Concat registered once");
    interp.register_tag("!Join", handle_join).expect("!Join registered once");
    interp.register_tag("!Filter", handle_filter).expect("!Filter registered once");
    interp.register_tag("!Loop", handle_loop).expect("!Loop registered once");
    interp.register_tag("!Index", handle_index).expect("!Index registered once");
    interp.register_tag("!Group", handle_group).expect("!Group registered once");
}

fn shape_err(tag: &str, message: impl Into<String>) -> YtagError {
    YtagError::Shape { tag: tag.to_string(), message: message.into() }
}

fn handle_concat(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let items = node.as_sequence().ok_or_else(|| shape_err("!Concat", "expects a sequence of sequences"))?;
    let mut out = Vec::new();
    for item in items {
        let Some(evaluated) = interp.process(item)? else { continue };
        let sub = evaluated.as_sequence().ok_or_else(|| shape_err("!Concat", "each element must evaluate to a sequence"))?;
        out.extend(sub.iter().cloned());
    }
    Ok(Some(Node::sequence(out)))
}

fn handle_join(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let (items_node, separator) = if node.as_mapping().is_some() {
        let mut args = parse_args(interp, node, &[SlotSpec::required("items"), SlotSpec::optional("separator")])?;
        let items = args.take("items").expect("items is required");
        let separator = args.take("separator").and_then(|n| n.as_scalar_text().map(str::to_string)).unwrap_or_else(|| " ".to_string());
        (items, separator)
    } else {
        let evaluated = interp.process(node)?.ok_or_else(|| shape_err("!Join", "items must evaluate to a sequence"))?;
        (evaluated, " ".to_string())
    };

    let items = items_node.as_sequence().ok_or_else(|| shape_err("!Join", "items must resolve to a sequence"))?;
    let mut parts = Vec::new();
    for item in items {
        if item.is_null() {
            continue;
        }
        let text = item.as_scalar_text().ok_or_else(|| shape_err("!Join", "items must resolve to a sequence of scalars"))?;
        parts.push(text.to_string());
    }
    Ok(Some(Node::string(parts.join(&separator))))
}

/// Resolve the `over` sequence, evaluating it if a mapping-form slot
/// returned an already-pre-expanded node.
fn resolve_over(over: &Node) -> Result<Vec<Node>> {
    over.as_sequence().map(|s| s.to_vec()).ok_or_else(|| shape_err("over", "must evaluate to a sequence"))
}

fn bind_name(args_name: Option<Node>) -> String {
    args_name.and_then(|n| n.as_scalar_text().map(str::to_string)).unwrap_or_else(|| "item".to_string())
}

fn handle_filter(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let mut args = parse_args(
        interp,
        node,
        &[SlotSpec::deferred("test", true), SlotSpec::required("over")],
    )?;
    let test = args.take("test").expect("test is required");
    let over = args.take("over").expect("over is required");
    let items = resolve_over(&over)?;

    let mut out = Vec::new();
    for element in &items {
        let mut frame: Frame = Frame::new();
        frame.insert("item".to_string(), node_to_value(element));
        let keep = interp.with_scope(frame, |interp| {
            let result = interp.process(&test)?;
            Ok(result.map(|n| crate::node::node_truthy(&n)).unwrap_or(false))
        })?;
        if keep {
            out.push(element.clone());
        }
    }
    Ok(Some(Node::sequence(out)))
}

fn handle_loop(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let mut args = parse_args(
        interp,
        node,
        &[
            SlotSpec::required("over"),
            SlotSpec::deferred("as", false),
            SlotSpec::deferred("template", true),
        ],
    )?;
    let over = args.take("over").expect("over is required");
    let template = args.take("template").expect("template is required");
    let as_name = bind_name(args.take("as"));
    let items = resolve_over(&over)?;

    let mut out = Vec::new();
    for element in &items {
        let mut frame: Frame = Frame::new();
        frame.insert(as_name.clone(), node_to_value(element));
        let evaluated = interp.with_scope(frame, |interp| interp.process(&template))?;
        if let Some(evaluated) = evaluated {
            out.push(evaluated);
        }
    }
    Ok(Some(Node::sequence(out)))
}

/// Shared by `!Index` and `!Group`: iterate `over`, bind each element to
/// `as`, evaluate `by` for the key and (if given) `template` for the value.
/// Returns the collected (key, value) entries plus the raw `duplicates` mode
/// string (unused by `!Group`, which collects every value per key instead).
fn index_entries(interp: &mut Interpreter, node: &Node) -> Result<(Vec<(String, Node)>, String)> {
    let mut args = parse_args(
        interp,
        node,
        &[
            SlotSpec::required("over"),
            SlotSpec::deferred("as", false),
            SlotSpec::deferred("by", true),
            SlotSpec::deferred("template", false),
            SlotSpec::deferred("result_as", false),
            SlotSpec::optional("duplicates"),
        ],
    )?;
    let over = args.take("over").expect("over is required");
    let by = args.take("by").expect("by is required");
    let template = args.take("template");
    let result_as = args.take("result_as").and_then(|n| n.as_scalar_text().map(str::to_string));
    let as_name = bind_name(args.take("as"));
    let duplicates_mode = args.take("duplicates").and_then(|n| n.as_scalar_text().map(str::to_string)).unwrap_or_else(|| "error".to_string());
    let items = resolve_over(&over)?;

    let mut entries = Vec::with_capacity(items.len());
    for element in &items {
        let mut frame: Frame = Frame::new();
        frame.insert(as_name.clone(), node_to_value(element));
        let (key, value) = interp.with_scope(frame, |interp| {
            let key_node = interp.process(&by)?.ok_or_else(|| shape_err("by", "must evaluate to a scalar key"))?;
            let key = key_node.as_scalar_text().ok_or_else(|| shape_err("by", "must evaluate to a scalar key"))?.to_string();

            let value = match &template {
                Some(template) => {
                    if let Some(result_as) = &result_as {
                        let mut inner: Frame = Frame::new();
                        inner.insert(result_as.clone(), node_to_value(element));
                        interp.with_scope(inner, |interp| interp.process(template))?
                    } else {
                        interp.process(template)?
                    }
                }
                None => Some(element.clone()),
            };
            Ok((key, value))
        })?;
        if let Some(value) = value {
            entries.push((key, value));
        }
    }
    Ok((entries, duplicates_mode))
}

fn handle_index(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let (entries, duplicates_mode) = index_entries(interp, node)?;
    let mut out: Vec<(Node, Node)> = Vec::new();
    for (key, value) in entries {
        if let Some(existing) = out.iter_mut().find(|(k, _)| k.as_scalar_text() == Some(key.as_str())) {
            match duplicates_mode.as_str() {
                "ignore" => existing.1 = value,
                _ => return Err(YtagError::Structural(format!("Duplicate key encountered: {key}"))),
            }
        } else {
            out.push((Node::string(key), value));
        }
    }
    Ok(Some(Node::mapping(out)))
}

fn handle_group(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let (entries, _duplicates_mode) = index_entries(interp, node)?;
    let mut out: Vec<(Node, Node)> = Vec::new();
    for (key, value) in entries {
        if let Some(existing) = out.iter_mut().find(|(k, _)| k.as_scalar_text() == Some(key.as_str())) {
            if let crate::node::NodeKind::Sequence(items) = &mut existing.1.kind {
                items.push(value);
            }
        } else {
            out.push((Node::string(key), Node::sequence(vec![value])));
        }
    }
    Ok(Some(Node::mapping(out)))
}
