//! The scoped variable environment: a LIFO stack of named-value frames,
//! with JSONPath lookup over the union of all frames.
//!
//! Grounded on `json-expression/src/vars.rs`'s `Vars` (name→value store
//! shape) and `examples/original_source/pkg/emrichen/emrichen.go`'s
//! `Environment` (`LookupFirst`/`LookupAll` prepend `"$."`, frames searched
//! top-down).

use crate::value::Value;
use serde_json::{Map, Value as Json};
use ytag_path::{eval_checked, JsonPathEval, JsonPathParser, PathError};

pub type Frame = Map<String, Value>;

pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Construct an environment with one bottom frame holding the initial
    /// variables (from var-files, `--define`, `--include-env`).
    pub fn new(initial: Frame) -> Self {
        Environment { frames: vec![initial] }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Truncate back to a remembered depth, used by the scope guard to
    /// recover even if nested handlers pushed more frames than they popped
    /// before erroring.
    pub fn truncate_to(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }

    /// Search frames top-down for `name`.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Insert/overwrite `name` in the *current* (topmost) frame. This is
    /// what `!Defaults` uses: an assignment, not a fallback.
    pub fn set_current(&mut self, name: impl Into<String>, value: Value) {
        if let Some(top) = self.frames.last_mut() {
            top.insert(name.into(), value);
        }
    }

    /// The synthetic root object JSONPath queries run against: the union
    /// of all frames, top-of-stack taking precedence on key collision.
    pub fn union_root(&self) -> Value {
        let mut merged = Map::new();
        for frame in &self.frames {
            for (k, v) in frame {
                merged.insert(k.clone(), v.clone());
            }
        }
        Json::Object(merged)
    }

    /// The topmost frame alone, as an object — what the format rewriter's
    /// bare `{{.name}}` substitutions resolve against (see `format.go`'s
    /// `renderFormatString`, which passes only the current frame's
    /// variables as template data while binding `lookup`/`lookupAll` to
    /// whole-environment search).
    pub fn current_frame_value(&self) -> Value {
        self.frames.last().cloned().map(Json::Object).unwrap_or(Json::Object(Map::new()))
    }

    fn path_to_jsonpath(path: &str) -> String {
        if path.starts_with('$') {
            path.to_string()
        } else {
            format!("$.{path}")
        }
    }

    pub fn lookup_first(&self, path: &str) -> crate::error::Result<Option<Value>> {
        let full = Self::path_to_jsonpath(path);
        let parsed = JsonPathParser::parse(&full)?;
        let root = self.union_root();
        Ok(JsonPathEval::eval(&parsed, &root).into_iter().next().cloned())
    }

    pub fn lookup_all(&self, path: &str) -> crate::error::Result<Vec<Value>> {
        let full = Self::path_to_jsonpath(path);
        let parsed = JsonPathParser::parse(&full)?;
        let root = self.union_root();
        Ok(JsonPathEval::eval(&parsed, &root).into_iter().cloned().collect())
    }

    /// `!Exists`'s rule: "unrecognized identifier" and "array index out of
    /// bounds" lookup failures coerce to `false`; anything else propagates.
    pub fn exists(&self, path: &str) -> crate::error::Result<bool> {
        let full = Self::path_to_jsonpath(path);
        let parsed = JsonPathParser::parse(&full)?;
        let root = self.union_root();
        match eval_checked(&parsed, &root) {
            Ok(results) => Ok(!results.is_empty()),
            Err(PathError::UnrecognizedIdentifier(_)) | Err(PathError::IndexOutOfBounds) => Ok(false),
        }
    }
}

/// RAII scope guard: pops the frame(s) pushed since its creation when
/// dropped, on every exit path including an early `?`-propagated error.
///
/// This is how §5's "frames must be popped on every exit path including
/// error" resource invariant is enforced without manual pop calls at every
/// return site in each scoping handler.
pub struct ScopeGuard<'a> {
    env: &'a mut Environment,
    depth_before: usize,
}

impl<'a> ScopeGuard<'a> {
    pub fn push(env: &'a mut Environment, frame: Frame) -> Self {
        let depth_before = env.depth();
        env.push(frame);
        ScopeGuard { env, depth_before }
    }

    pub fn env(&mut self) -> &mut Environment {
        self.env
    }
}

impl<'a> Drop for ScopeGuard<'a> {
    fn drop(&mut self) {
        self.env.truncate_to(self.depth_before);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(pairs: &[(&str, Value)]) -> Frame {
        let mut m = Map::new();
        for (k, v) in pairs {
            m.insert(k.to_string(), v.clone());
        }
        m
    }

    #[test]
    fn get_var_searches_top_down() {
        let mut env = Environment::new(frame(&[("name", json!("bottom"))]));
        env.push(frame(&[("name", json!("top"))]));
        assert_eq!(env.get_var("name"), Some(&json!("top")));
    }

    #[test]
    fn scope_guard_pops_on_drop_even_after_error() {
        let mut env = Environment::new(frame(&[]));
        {
            let mut guard = ScopeGuard::push(&mut env, frame(&[("x", json!(1))]));
            guard.env().push(frame(&[("y", json!(2))]));
            // simulate an early return / `?` without an explicit pop
        }
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn union_root_prefers_top_of_stack() {
        let mut env = Environment::new(frame(&[("a", json!(1))]));
        env.push(frame(&[("a", json!(2))]));
        let root = env.union_root();
        assert_eq!(root["a"], json!(2));
    }

    #[test]
    fn exists_coerces_missing_key_to_false() {
        let env = Environment::new(frame(&[("a", json!({"b": 1}))]));
        assert_eq!(env.exists("a.missing").unwrap(), false);
        assert_eq!(env.exists("a.b").unwrap(), true);
    }
}
