//! `!Debug` and `!Error` — developer diagnostics.
//!
//! Grounded on SPEC_FULL.md §4.5/§4.4: `!Debug` is not present in the
//! retrieved source but follows the same "evaluate, pass value through"
//! shape the other wrapper tags use; `!Error` is grounded on
//! `examples/original_source/pkg/emrichen/format.go`'s `renderFormatString`
//! (the message is rendered through the same format-rewrite path as
//! `!Format`, then raised as a user error rather than returned).

use crate::dispatch::Interpreter;
use crate::error::{Result, YtagError};
use crate::format::{render_template, rewrite_braces};
use crate::node::Node;

pub fn register(interp: &mut Interpreter) {
    interp.register_tag("!Debug", handle_debug).expect("!Debug registered once");
    interp.register_tag("!Error", handle_error).expect("!Error registered once");
}

fn handle_debug(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let evaluated = interp.process(node)?;
    match &evaluated {
        Some(node) => eprintln!("{:?}", crate::node::node_to_value(node)),
        None => eprintln!("(absent)"),
    }
    Ok(evaluated)
}

fn handle_error(interp: &mut Interpreter, node: &Node) -> Result<Option<Node>> {
    let text = node.as_scalar_text().ok_or_else(|| YtagError::Shape { tag: "!Error".to_string(), message: "expects a scalar message".to_string() })?;
    let rewritten = rewrite_braces(text);
    let frame = interp.environment.current_frame_value();
    let message = render_template(&rewritten, &frame, &interp.environment, interp.template_funcs())?;
    Err(YtagError::UserRaised(message))
}
