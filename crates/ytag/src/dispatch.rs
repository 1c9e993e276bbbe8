//! The core evaluation loop: tag-stack splitting, handler dispatch, and
//! the structural-recursion fallback.
//!
//! Grounded on `examples/original_source/pkg/emrichen/emrichen.go`'s
//! `Process`, combined with `json-expression/src/evaluate.rs`'s
//! dispatch-by-string-key-into-a-map shape and `types.rs`'s
//! `OperatorMap` registry pattern (here: a `TagMap`).

use crate::environment::Environment;
use crate::error::{Result, YtagError};
use crate::node::{Node, NodeKind};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered tag handler: takes the interpreter (for recursive
/// `process` calls and environment access) and the node the tag was
/// attached to, and returns the evaluated node or `None` (absent).
pub type TagFn = fn(&mut Interpreter, &Node) -> Result<Option<Node>>;

/// A user-registered template helper function for the format rewriter,
/// called with a single string argument (the convention every built-in
/// helper — `lookup`, `lookupAll`, `exists` — already follows).
pub type TemplateFn = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;

pub struct Interpreter {
    pub environment: Environment,
    handlers: HashMap<String, TagFn>,
    template_funcs: HashMap<String, TemplateFn>,
}

impl Interpreter {
    pub fn new(environment: Environment) -> Self {
        let mut interp = Interpreter { environment, handlers: HashMap::new(), template_funcs: HashMap::new() };
        crate::tags::register_defaults(&mut interp);
        interp
    }

    /// Install a handler for a new tag name. Fails if the name is taken
    /// (registration error, §7 kind 8).
    pub fn register_tag(&mut self, name: &str, handler: TagFn) -> Result<()> {
        if self.handlers.contains_key(name) {
            return Err(YtagError::AlreadyRegistered(name.to_string()));
        }
        self.handlers.insert(name.to_string(), handler);
        Ok(())
    }

    pub fn register_template_fn(&mut self, name: impl Into<String>, f: TemplateFn) {
        self.template_funcs.insert(name.into(), f);
    }

    /// Push `frame`, run `f`, then pop back to the depth observed before —
    /// even if `f` returns an error. This is the primitive `!With`/
    /// `!Loop`/`!Filter`/`!Index`/`!Group` use to satisfy §5's "frames
    /// must be popped on every exit path including error" invariant.
    pub fn with_scope<F, R>(&mut self, frame: crate::environment::Frame, f: F) -> Result<R>
    where
        F: FnOnce(&mut Interpreter) -> Result<R>,
    {
        let depth_before = self.environment.depth();
        self.environment.push(frame);
        let result = f(self);
        self.environment.truncate_to(depth_before);
        result
    }

    pub fn template_funcs(&self) -> &HashMap<String, TemplateFn> {
        &self.template_funcs
    }

    /// `Process(node) -> node-or-absent`.
    pub fn process(&mut self, node: &Node) -> Result<Option<Node>> {
        match &node.kind {
            NodeKind::Alias(_) => return Err(YtagError::Structural("alias node encountered".to_string())),
            NodeKind::Document(inner) => return self.process(inner),
            _ => {}
        }

        let stack = node.custom_tag_stack();
        if stack.is_empty() {
            return self.structural_recurse(node);
        }

        let mut current = Some(node.clone());
        for (i, token) in stack.iter().enumerate() {
            let Some(cur_node) = current.clone() else { break };
            match self.handlers.get(token).copied() {
                Some(handler) => {
                    // Present the handler a view carrying only the
                    // not-yet-processed tokens, outermost first, so a
                    // handler that re-`process`es its own node doesn't
                    // re-trigger the tag it was just invoked for.
                    let remaining = stack[i + 1..].join(",");
                    let view = Node { tag: remaining, kind: cur_node.kind.clone() };
                    current = handler(self, &view)?;
                }
                None => {
                    current = self.structural_recurse(&cur_node)?;
                    break;
                }
            }
        }
        Ok(current)
    }

    fn structural_recurse(&mut self, node: &Node) -> Result<Option<Node>> {
        match &node.kind {
            NodeKind::Sequence(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(evaluated) = self.process(item)? {
                        out.push(evaluated);
                    }
                }
                Ok(Some(Node::sequence(out)))
            }
            NodeKind::Mapping(pairs) => {
                let mut out = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    if let Some(evaluated) = self.process(value)? {
                        out.push((key.clone(), evaluated));
                    }
                }
                Ok(Some(Node::mapping(out)))
            }
            NodeKind::Scalar(_) => Ok(Some(node.clone())),
            NodeKind::Document(inner) => self.process(inner),
            NodeKind::Alias(_) => Err(YtagError::Structural("alias node encountered".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn interp() -> Interpreter {
        Interpreter::new(Environment::new(Map::new()))
    }

    #[test]
    fn untagged_document_round_trips() {
        let mut interp = interp();
        let doc = Node::document(Node::mapping(vec![(Node::string("key1"), Node::string("value1"))]));
        let result = interp.process(&doc).unwrap().unwrap();
        assert_eq!(result.as_mapping().unwrap().len(), 1);
    }

    #[test]
    fn void_in_mapping_is_dropped() {
        let mut interp = interp();
        let doc = Node::mapping(vec![
            (Node::string("key1"), Node::string("value1")),
            (Node::string("key2"), Node::scalar("!Void", "")),
        ]);
        let result = interp.process(&doc).unwrap().unwrap();
        assert_eq!(result.as_mapping().unwrap().len(), 1);
    }

    #[test]
    fn void_in_sequence_is_dropped() {
        let mut interp = interp();
        let seq = Node::sequence(vec![
            Node::string("item1"),
            Node::scalar("!Void", ""),
            Node::string("item2"),
        ]);
        let result = interp.process(&seq).unwrap().unwrap();
        assert_eq!(result.as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn alias_node_fails() {
        let mut interp = interp();
        let alias = Node { tag: String::new(), kind: NodeKind::Alias("x".into()) };
        assert!(interp.process(&alias).is_err());
    }

    #[test]
    fn var_tag_reads_environment() {
        let mut bottom = Map::new();
        bottom.insert("name".to_string(), json!("Ada"));
        let mut interp = Interpreter::new(Environment::new(bottom));
        let node = Node::scalar("!Var", "name");
        let result = interp.process(&node).unwrap().unwrap();
        assert_eq!(result.as_scalar_text(), Some("Ada"));
    }
}
