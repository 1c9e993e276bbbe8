//! The argument parser: decodes a mapping-form tag operand into named,
//! optionally pre-expanded slots.
//!
//! Grounded on `examples/original_source/pkg/emrichen/parser.go`'s
//! `ParseArgs`, reproducing its exact error strings.

use crate::dispatch::Interpreter;
use crate::error::{Result, YtagError};
use crate::node::Node;
use std::collections::BTreeMap;

/// One declared operand slot.
#[derive(Debug, Clone)]
pub struct SlotSpec {
    pub name: &'static str,
    pub required: bool,
    /// If set, the slot's value is run through `Process` before being
    /// handed back; otherwise the raw node is returned (needed for
    /// `then`/`else`/`template`-style deferred operands).
    pub pre_expand: bool,
}

impl SlotSpec {
    pub const fn required(name: &'static str) -> Self {
        SlotSpec { name, required: true, pre_expand: true }
    }

    pub const fn optional(name: &'static str) -> Self {
        SlotSpec { name, required: false, pre_expand: true }
    }

    pub const fn deferred(name: &'static str, required: bool) -> Self {
        SlotSpec { name, required, pre_expand: false }
    }
}

/// The result of parsing: present slots only, in declaration order.
pub struct ParsedArgs {
    values: BTreeMap<&'static str, Node>,
}

impl ParsedArgs {
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.values.get(name)
    }

    pub fn take(&mut self, name: &str) -> Option<Node> {
        // BTreeMap::remove needs a matching key type; slot names are
        // 'static str, so look the key up by value first.
        let key = self.values.keys().find(|k| **k == name).copied()?;
        self.values.remove(key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.keys().any(|k| *k == name)
    }
}

/// Parse `operand` (must be a mapping) against `slots`, pre-expanding any
/// slot so marked via `interp.process`.
pub fn parse_args(interp: &mut Interpreter, operand: &Node, slots: &[SlotSpec]) -> Result<ParsedArgs> {
    let pairs = operand.as_mapping().ok_or(YtagError::ExpectedMapping)?;

    let known: Vec<&str> = slots.iter().map(|s| s.name).collect();
    for (key_node, _) in pairs {
        let key = key_node.as_scalar_text().unwrap_or_default();
        if !known.contains(&key) {
            return Err(YtagError::UnknownKey(key.to_string()));
        }
    }

    let mut values = BTreeMap::new();
    for slot in slots {
        let found = pairs.iter().find(|(k, _)| k.as_scalar_text() == Some(slot.name));
        match found {
            Some((_, value_node)) => {
                let stored = if slot.pre_expand {
                    match interp.process(value_node)? {
                        Some(evaluated) => evaluated,
                        None => continue, // absent: treat as if the slot were unset
                    }
                } else {
                    value_node.clone()
                };
                values.insert(slot.name, stored);
            }
            None if slot.required => {
                return Err(YtagError::RequiredKeyNotFound(slot.name.to_string()));
            }
            None => {}
        }
    }

    Ok(ParsedArgs { values })
}
