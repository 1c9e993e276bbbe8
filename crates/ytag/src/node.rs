//! The YAML node tree: kinds, canonical tag constants, tag-stack
//! splitting, and the node↔value bridge.
//!
//! Grounded on §3/§4.1 of the specification and
//! `examples/original_source/pkg/emrichen/emrichen.go`'s `Process`
//! (tag-string comma-splitting) and `utils.go`'s `NodeToInterface`/
//! `ValueToNode` (scalar coercion precedence).

use crate::value::Value;
use serde_json::{Map, Number, Value as Json};

pub const TAG_STR: &str = "!!str";
pub const TAG_INT: &str = "!!int";
pub const TAG_FLOAT: &str = "!!float";
pub const TAG_BOOL: &str = "!!bool";
pub const TAG_NULL: &str = "!!null";
pub const TAG_SEQ: &str = "!!seq";
pub const TAG_MAP: &str = "!!map";

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
    Document(Box<Node>),
    /// An anchor alias (`*name`); evaluation always rejects these.
    Alias(String),
}

/// A tagged, kinded tree element.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn scalar(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Node { tag: tag.into(), kind: NodeKind::Scalar(text.into()) }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::scalar(TAG_STR, text)
    }

    pub fn int(v: i64) -> Self {
        Node::scalar(TAG_INT, v.to_string())
    }

    pub fn float(v: f64) -> Self {
        Node::scalar(TAG_FLOAT, format_float(v))
    }

    pub fn bool(v: bool) -> Self {
        Node::scalar(TAG_BOOL, if v { "true" } else { "false" })
    }

    pub fn null() -> Self {
        Node::scalar(TAG_NULL, "null")
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Node { tag: TAG_SEQ.to_string(), kind: NodeKind::Sequence(items) }
    }

    pub fn mapping(pairs: Vec<(Node, Node)>) -> Self {
        Node { tag: TAG_MAP.to_string(), kind: NodeKind::Mapping(pairs) }
    }

    pub fn document(inner: Node) -> Self {
        Node { tag: String::new(), kind: NodeKind::Document(Box::new(inner)) }
    }

    pub fn is_null(&self) -> bool {
        self.tag == TAG_NULL
    }

    pub fn as_scalar_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match &self.kind {
            NodeKind::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn map_get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?.iter().find_map(|(k, v)| {
            if k.as_scalar_text() == Some(key) {
                Some(v)
            } else {
                None
            }
        })
    }

    /// Split this node's tag string into a stack of custom-tag tokens,
    /// outermost first.
    ///
    /// The source joins stacked tags with commas (an implementation quirk
    /// of `gopkg.in/yaml.v3`'s raw `Tag` string); tokens after the first
    /// are normalized to carry a leading `!` if missing, then the whole
    /// list is reversed so dispatch processes the outermost tag first.
    pub fn custom_tag_stack(&self) -> Vec<String> {
        if !self.tag.starts_with('!') || self.tag.starts_with("!!") {
            return Vec::new();
        }
        let mut tokens: Vec<String> = self
            .tag
            .split(',')
            .enumerate()
            .map(|(i, raw)| {
                let raw = raw.trim();
                if i == 0 || raw.starts_with('!') {
                    raw.to_string()
                } else {
                    format!("!{raw}")
                }
            })
            .collect();
        tokens.reverse();
        tokens
    }
}

/// What canonical tag this node would carry if its custom tag (if any)
/// were stripped — used by the `!Is*` introspection predicates, which
/// inspect the *unevaluated* operand's shape rather than its value.
///
/// A node's tag string holds either a canonical tag or a custom-tag
/// stack, never both, so a custom-tagged scalar's "natural" shape has to
/// be re-derived from its scalar text using the same core-schema rules
/// the decoder uses for untagged plain scalars (see
/// `resolve_plain_scalar_tag`, grounded on the saphyr-parser loader
/// reference's `parse_f64`/bool/int resolution).
pub fn scalar_shape(node: &Node) -> String {
    if node.tag.starts_with("!!") {
        return node.tag.clone();
    }
    match &node.kind {
        NodeKind::Scalar(text) => resolve_plain_scalar_tag(text).to_string(),
        NodeKind::Sequence(_) => TAG_SEQ.to_string(),
        NodeKind::Mapping(_) => TAG_MAP.to_string(),
        NodeKind::Document(inner) => scalar_shape(inner),
        NodeKind::Alias(_) => TAG_NULL.to_string(),
    }
}

/// Resolve the canonical tag an untagged plain YAML scalar would carry,
/// per the YAML core schema (true/false, int, float incl. `.inf`/`.nan`,
/// null, else string).
pub fn resolve_plain_scalar_tag(text: &str) -> &'static str {
    match text {
        "true" | "false" | "True" | "False" | "TRUE" | "FALSE" => TAG_BOOL,
        "~" | "null" | "Null" | "NULL" | "" => TAG_NULL,
        _ if text.parse::<i64>().is_ok() => TAG_INT,
        _ if is_float_literal(text) => TAG_FLOAT,
        _ => TAG_STR,
    }
}

fn is_float_literal(text: &str) -> bool {
    matches!(
        text,
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" | "-.inf" | "-.Inf" | "-.INF" | ".nan" | ".NaN" | ".NAN"
    ) || text.parse::<f64>().is_ok()
}

/// Truthiness computed directly from an unevaluated node (no `Process`
/// call), per `!Not`'s observed non-evaluation behavior.
pub fn node_truthy(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Scalar(text) => !matches!(text.as_str(), "" | "false" | "null" | "0"),
        NodeKind::Sequence(items) => !items.is_empty(),
        NodeKind::Mapping(pairs) => !pairs.is_empty(),
        NodeKind::Document(inner) => node_truthy(inner),
        NodeKind::Alias(_) => false,
    }
}

fn format_float(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

/// Convert a (fully evaluated) node to a host `Value`, following the
/// canonical-tag-driven precedence of `getScalarValue`/`NodeToInterface`.
pub fn node_to_value(node: &Node) -> Value {
    match &node.kind {
        NodeKind::Scalar(text) => scalar_to_value(&node.tag, text),
        NodeKind::Sequence(items) => Json::Array(items.iter().map(node_to_value).collect()),
        NodeKind::Mapping(pairs) => {
            let mut map = Map::new();
            for (k, v) in pairs {
                let key = k.as_scalar_text().unwrap_or_default().to_string();
                map.insert(key, node_to_value(v));
            }
            Json::Object(map)
        }
        NodeKind::Document(inner) => node_to_value(inner),
        NodeKind::Alias(_) => Json::Null,
    }
}

fn scalar_to_value(tag: &str, text: &str) -> Value {
    match tag {
        TAG_INT => text.parse::<i64>().map(Json::from).unwrap_or(Json::Null),
        TAG_FLOAT => text.parse::<f64>().ok().and_then(Number::from_f64).map(Json::Number).unwrap_or(Json::Null),
        TAG_BOOL => text.parse::<bool>().map(Json::Bool).unwrap_or(Json::Null),
        TAG_NULL => Json::Null,
        _ => Json::String(text.to_string()),
    }
}

/// Convert a host `Value` back into a node, per §3's value→node rules.
/// `ToValue`-backed typed inputs are normalized to strings before reaching
/// this function (see `value::ToValue`); this function only has to handle
/// the plain JSON variant set.
pub fn value_to_node(value: &Value) -> Node {
    match value {
        Json::Null => Node::null(),
        Json::Bool(b) => Node::bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::int(i)
            } else if let Some(f) = n.as_f64() {
                Node::float(f)
            } else {
                Node::null()
            }
        }
        Json::String(s) => Node::string(s.clone()),
        Json::Array(items) => Node::sequence(items.iter().map(value_to_node).collect()),
        Json::Object(map) => {
            Node::mapping(map.iter().map(|(k, v)| (Node::string(k.clone()), value_to_node(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_stack_splits_and_reverses() {
        let node = Node::scalar("!Debug,!Var", "name");
        assert_eq!(node.custom_tag_stack(), vec!["!Var".to_string(), "!Debug".to_string()]);
    }

    #[test]
    fn tag_stack_normalizes_missing_bang() {
        let node = Node::scalar("!Debug,Var", "name");
        assert_eq!(node.custom_tag_stack(), vec!["!Var".to_string(), "!Debug".to_string()]);
    }

    #[test]
    fn canonical_tags_have_no_custom_stack() {
        assert!(Node::string("x").custom_tag_stack().is_empty());
    }

    #[test]
    fn node_to_value_round_trips_int() {
        let node = Node::int(42);
        assert_eq!(node_to_value(&node), serde_json::json!(42));
    }

    #[test]
    fn value_to_node_picks_int_tag_for_whole_numbers() {
        let node = value_to_node(&serde_json::json!(7));
        assert_eq!(node.tag, TAG_INT);
    }
}
