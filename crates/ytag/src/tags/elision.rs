//! `!Void` (always absent) and `!Format` (format-rewrite and render).
//!
//! Grounded on `examples/original_source/pkg/emrichen/emrichen.go`'s
//! `"!Void"` handler (`return nil, nil`) and `format.go`'s
//! `transformTemplate`/`renderFormatString`.

use crate::dispatch::Interpreter;
use crate::error::{Result, YtagError};
use crate::format::{render_template, rewrite_braces};
use crate::node::Node;

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!Void", handle_void).expect("!Void registered once");
    interp.register_tag("!Format", handle_format).expect("!Format registered once");
}

fn handle_void(_interp: &mut Interpreter, _node: &Node) -> Result<Option<Node>> {
    Ok(None)
}

fn handle_format(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let text = node.as_scalar_text().ok_or_else(|| YtagError::Shape { tag: "!Format".to_string(), message: "expects a scalar template string".to_string() })?;
    let rewritten = rewrite_braces(text);
    let frame = interp.environment.current_frame_value();
    let rendered = render_template(&rewritten, &frame, &interp.environment, interp.template_funcs())?;
    Ok(Some(Node::string(rendered)))
}
