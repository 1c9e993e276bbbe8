//! JSONPath (RFC 9535-leaning) parsing and evaluation.
//!
//! This crate is the environment-query engine behind `!Lookup`,
//! `!LookupAll`, `!Exists` and the format-string `lookup`/`lookupAll`
//! helpers: it parses `$.foo.bar[0]`-style expressions and evaluates them
//! against a `serde_json::Value`.
//!
//! # Example
//!
//! ```
//! use ytag_path::{JsonPathParser, JsonPathEval};
//! use serde_json::json;
//!
//! let path = JsonPathParser::parse("$.store.books[*].author").unwrap();
//!
//! let doc = json!({
//!     "store": {
//!         "books": [
//!             {"author": "Nigel Rees", "title": "Sayings of the Century"},
//!             {"author": "Evelyn Waugh", "title": "Sword of Honour"}
//!         ]
//!     }
//! });
//!
//! let results = JsonPathEval::eval(&path, &doc);
//! assert_eq!(results.len(), 2);
//! ```

mod types;
pub use types::*;

mod ast;
pub use ast::Ast;

mod parser;
pub use parser::{JsonPathParser, ParseError};

mod eval;
pub use eval::JsonPathEval;

mod diagnostics;
pub use diagnostics::{eval_checked, PathError};

mod util;
pub use util::{get_accessed_properties, json_path_equals, json_path_to_string};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_root() {
        let path = JsonPathParser::parse("$").unwrap();
        assert_eq!(path.segments.len(), 0);
    }

    #[test]
    fn test_parse_dot_notation() {
        let path = JsonPathParser::parse("$.store.books").unwrap();
        assert_eq!(path.segments.len(), 2);
    }

    #[test]
    fn test_parse_bracket_notation() {
        let path = JsonPathParser::parse("$['store']['books']").unwrap();
        assert_eq!(path.segments.len(), 2);
    }

    #[test]
    fn test_parse_wildcard() {
        let path = JsonPathParser::parse("$.store.*").unwrap();
        assert_eq!(path.segments.len(), 2);
    }

    #[test]
    fn test_eval_dot_notation() {
        let doc = json!({"a": {"b": 42}});
        let path = JsonPathParser::parse("$.a.b").unwrap();
        let results = JsonPathEval::eval(&path, &doc);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0], &json!(42));
    }

    #[test]
    fn test_eval_wildcard() {
        let doc = json!({"a": 1, "b": 2});
        let path = JsonPathParser::parse("$.*").unwrap();
        let results = JsonPathEval::eval(&path, &doc);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_eval_array_slice() {
        let doc = json!([1, 2, 3, 4, 5]);
        let path = JsonPathParser::parse("$[1:3]").unwrap();
        let results = JsonPathEval::eval(&path, &doc);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], &json!(2));
        assert_eq!(results[1], &json!(3));
    }

    #[test]
    fn test_eval_filter_eq() {
        let doc = json!([
            {"name": "Alice", "age": 30},
            {"name": "Bob", "age": 25},
            {"name": "Alice", "age": 20}
        ]);
        let path = JsonPathParser::parse(r#"$[?(@.name == "Alice")]"#).unwrap();
        let results = JsonPathEval::eval(&path, &doc);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn checked_eval_reports_unrecognized_identifier() {
        let doc = json!({"a": 1});
        let path = JsonPathParser::parse("$.missing").unwrap();
        let err = eval_checked(&path, &doc).unwrap_err();
        assert_eq!(err, PathError::UnrecognizedIdentifier("missing".into()));
    }

    #[test]
    fn checked_eval_reports_out_of_bounds() {
        let doc = json!([1, 2, 3]);
        let path = JsonPathParser::parse("$[10]").unwrap();
        let err = eval_checked(&path, &doc).unwrap_err();
        assert_eq!(err, PathError::IndexOutOfBounds);
    }

    #[test]
    fn checked_eval_falls_back_for_wildcards() {
        let doc = json!({"a": 1, "b": 2});
        let path = JsonPathParser::parse("$.missing.*").unwrap();
        // the wildcard segment triggers fallback to plain eval, which
        // just returns an empty vec rather than erroring
        let path2 = JsonPathParser::parse("$.*").unwrap();
        assert!(eval_checked(&path2, &doc).unwrap().len() == 2);
        let _ = path; // dot-missing.* would error at the `missing` segment first
    }
}
