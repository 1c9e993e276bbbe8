//! The host value representation, truthiness, and numeric/deep-equality
//! helpers shared by `!Op`, `!Var`, and the environment.
//!
//! Grounded on `json-expression/src/util.rs`'s `cmp`/`js_gt`/`is_truthy`/
//! deep-equality helpers, adapted to this specification's own truthiness
//! and comparison rules (§4.5).

use serde_json::{Map, Number, Value as Json};

/// The host representation backing environment variables.
///
/// This is `serde_json::Value` directly rather than a bespoke enum: the
/// variant set (null/bool/int/float/string/list/ordered-map) is exactly
/// what `serde_json::Value` already models, and operating on it directly
/// keeps this crate in the same idiom as `json-expression`, whose
/// `EvalCtx`/`Vars` machinery is built the same way.
pub type Value = Json;

/// True iff a host value exposes a text-marshalling capability that should
/// win over a generic to-string capability, per §3's conversion precedence.
///
/// Implemented for the handful of ecosystem types the original's
/// `ValueToNode` chain recognizes (instants, durations, IPs, URLs, UUIDs).
/// A host embedding this crate as a library calls `ToValue::to_value` when
/// seeding environment variables from typed Rust data; the variable-file
/// and CLI loaders only ever produce plain strings, so this trait is not
/// exercised by the `ytag` binary itself.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for chrono::DateTime<chrono::Utc> {
    fn to_value(&self) -> Value {
        Json::String(self.to_rfc3339())
    }
}

impl ToValue for chrono::Duration {
    fn to_value(&self) -> Value {
        Json::String(format!("{}s", self.num_seconds()))
    }
}

impl ToValue for std::net::IpAddr {
    fn to_value(&self) -> Value {
        Json::String(self.to_string())
    }
}

impl ToValue for url::Url {
    fn to_value(&self) -> Value {
        Json::String(self.to_string())
    }
}

impl ToValue for uuid::Uuid {
    fn to_value(&self) -> Value {
        Json::String(self.to_string())
    }
}

/// Truthiness per §4.5: a scalar is falsy iff it is `""`, `"false"`,
/// `"null"`, or `"0"`; a sequence/mapping is truthy iff non-empty;
/// anything else is falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Json::String(s) => !matches!(s.as_str(), "" | "false" | "null" | "0"),
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => {
            // Numbers are scalars too; stringify and apply the same rule
            // so `0` and `0.0` are both falsy.
            let s = n.to_string();
            !matches!(s.as_str(), "" | "false" | "null" | "0")
        }
        Json::Array(items) => !items.is_empty(),
        Json::Object(map) => !map.is_empty(),
    }
}

/// Deep structural equality over decoded host values, used by `!Op`'s
/// equality/membership operators.
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    a == b
}

/// Attempt to read a value as an `f64`, for numeric comparison/arithmetic.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.parse::<f64>().ok(),
        Json::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Attempt to read a value as an `i64`, for integer-tagged arithmetic.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

/// True iff the value is a JSON number with no fractional component, i.e.
/// what this interpreter treats as `!!int`-shaped.
pub fn is_int_shaped(value: &Value) -> bool {
    matches!(value, Json::Number(n) if n.is_i64() || n.is_u64())
}

/// True iff the value is a JSON number (int or float), used to gate `!Op`'s
/// equality operators onto float comparison per §4.5: "if both sides are
/// numeric, compare as floats".
pub fn is_numeric(value: &Value) -> bool {
    matches!(value, Json::Number(_))
}

pub fn int_value(v: i64) -> Value {
    Json::Number(Number::from(v))
}

pub fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Json::Number).unwrap_or(Json::Null)
}

pub fn empty_map() -> Map<String, Value> {
    Map::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_spec_scalars() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("false")));
        assert!(!is_truthy(&json!("null")));
        assert!(!is_truthy(&json!("0")));
        assert!(is_truthy(&json!("0.0")));
        assert!(is_truthy(&json!("anything else")));
    }

    #[test]
    fn truthiness_of_containers() {
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!([1])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!({"a": 1})));
    }

    #[test]
    fn typed_values_stringify_via_to_value() {
        let ip: std::net::IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(ip.to_value(), json!("127.0.0.1"));
    }
}
