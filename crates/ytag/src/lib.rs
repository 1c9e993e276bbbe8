//! A YAML tag preprocessor: expands a `!Tag` vocabulary against a scoped
//! variable environment, producing plain YAML with all custom tags erased.
//!
//! ```
//! use serde_json::{json, Map};
//! use ytag::{Environment, Interpreter};
//!
//! let mut vars = Map::new();
//! vars.insert("name".to_string(), json!("Ada"));
//!
//! let mut interp = Interpreter::new(Environment::new(vars));
//! let documents = ytag::process_str(&mut interp, "greeting: !Format Hello, {name}!").unwrap();
//! assert_eq!(documents.len(), 1);
//! ```

pub mod args;
pub mod config;
pub mod dispatch;
pub mod environment;
pub mod error;
pub mod format;
pub mod node;
pub mod tags;
pub mod value;
pub mod yaml_io;

pub use dispatch::Interpreter;
pub use environment::Environment;
pub use error::{Result, YtagError};
pub use node::Node;

/// Decode, evaluate, and return the surviving (non-absent) documents of a
/// YAML source string. A thin convenience wrapper around
/// [`yaml_io::process_stream`] for library consumers that don't need the
/// streaming façade's render step.
pub fn process_str(interp: &mut Interpreter, source: &str) -> Result<Vec<Node>> {
    yaml_io::process_stream(interp, source)
}
