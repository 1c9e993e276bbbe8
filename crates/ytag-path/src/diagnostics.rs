//! Error-carrying evaluation for callers that must distinguish "this path
//! segment doesn't exist" from "this path segment is out of range" — the
//! distinction `!Exists` needs to decide whether a lookup failure should be
//! coerced to `false` or propagated as a hard error.
//!
//! [`JsonPathEval::eval`] always just returns an empty `Vec` on a miss,
//! which is the right behavior for `!Lookup`/`!LookupAll`. `eval_checked`
//! walks the same simple (non-wildcard, non-filter, non-recursive) segments
//! one at a time so it can report why a lookup came up empty.

use crate::types::{JSONPath, Selector};
use crate::JsonPathEval;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// A `.name` or `['name']` segment found no such key (and the current
    /// value was a mapping, so the name really is unknown).
    UnrecognizedIdentifier(String),
    /// A `[n]` segment's index fell outside the array bounds.
    IndexOutOfBounds,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::UnrecognizedIdentifier(name) => {
                write!(f, "unrecognized identifier '{name}'")
            }
            PathError::IndexOutOfBounds => write!(f, "array index out of bounds"),
        }
    }
}

/// Evaluate `path` against `doc`, distinguishing a missing-key/out-of-range
/// miss from a genuine zero-length match (e.g. an empty wildcard).
///
/// Only plain `Name`/`Index` segments are walked step by step; as soon as a
/// segment uses `Wildcard`, `Slice` or `Filter`, or is part of a recursive
/// descent, evaluation falls back to [`JsonPathEval::eval`] for the whole
/// path and an empty result is reported as "no error, zero matches" rather
/// than a specific `PathError`.
pub fn eval_checked<'a>(path: &JSONPath, doc: &'a Value) -> Result<Vec<&'a Value>, PathError> {
    let mut current: Vec<&'a Value> = vec![doc];

    for segment in &path.segments {
        if segment.recursive || segment.selectors.len() != 1 {
            return Ok(JsonPathEval::eval(path, doc));
        }
        let selector = &segment.selectors[0];
        match selector {
            Selector::Name(name) => {
                let mut next = Vec::with_capacity(current.len());
                for value in &current {
                    match value {
                        Value::Object(map) => match map.get(name) {
                            Some(child) => next.push(child),
                            None => return Err(PathError::UnrecognizedIdentifier(name.clone())),
                        },
                        _ => return Err(PathError::UnrecognizedIdentifier(name.clone())),
                    }
                }
                current = next;
            }
            Selector::Index(index) => {
                let mut next = Vec::with_capacity(current.len());
                for value in &current {
                    match value {
                        Value::Array(arr) => {
                            let len = arr.len() as isize;
                            let idx = if *index < 0 { len + index } else { *index };
                            if idx < 0 || idx as usize >= arr.len() {
                                return Err(PathError::IndexOutOfBounds);
                            }
                            next.push(&arr[idx as usize]);
                        }
                        _ => return Err(PathError::IndexOutOfBounds),
                    }
                }
                current = next;
            }
            Selector::Wildcard | Selector::Slice { .. } | Selector::Filter(_) => {
                return Ok(JsonPathEval::eval(path, doc));
            }
        }
    }

    Ok(current)
}
