//! The format rewriter: classifies bare `{…}` expressions into a
//! Go-template-like grammar, then executes a small hand-rolled
//! interpreter for the result.
//!
//! Grounded on `examples/original_source/pkg/emrichen/format.go`'s
//! `transformTemplate` (the brace-classification regex and character
//! class) and `renderFormatString` (the `lookup`/`lookupAll`/`exists`
//! helper-function table bound to the environment, executed against the
//! current top frame's variables).

use crate::environment::Environment;
use crate::error::{Result, YtagError};
use crate::value::Value;
use regex::Regex;
use serde_json::Value as Json;
use std::sync::OnceLock;

/// Characters that, if present inside a bare `{…}`, mark it as a complex
/// JSONPath-style expression rather than a plain identifier.
const COMPLEX_CHARS: &str = " .,;+-*/&|<>=()[]{}";

fn brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\{\{.*?\}\})|\{([^{}]+)\}").unwrap())
}

fn action_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").unwrap())
}

/// Rewrite `{name}` → `{{.name}}`, complex `{expr}` → `{{lookup "expr"}}`,
/// leaving pre-existing `{{…}}` directives untouched.
pub fn rewrite_braces(input: &str) -> String {
    brace_re()
        .replace_all(input, |caps: &regex::Captures| {
            if let Some(whole) = caps.get(1) {
                return whole.as_str().to_string();
            }
            let interior = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            if interior.chars().any(|c| COMPLEX_CHARS.contains(c)) {
                format!("{{{{lookup \"{}\"}}}}", interior.replace('"', "\\\""))
            } else {
                format!("{{{{.{interior}}}}}")
            }
        })
        .into_owned()
}

/// Render a (post-rewrite) template string against the current frame's
/// variables, resolving `lookup`/`lookupAll`/`exists` helper calls against
/// the full environment. `extra` holds any additional helper functions
/// registered via `Interpreter::register_template_fn`.
pub fn render_template(
    template: &str,
    frame: &Value,
    env: &Environment,
    extra: &std::collections::HashMap<String, crate::dispatch::TemplateFn>,
) -> Result<String> {
    let mut out = String::new();
    let mut last_end = 0;
    for caps in action_re().captures_iter(template) {
        let whole = caps.get(0).unwrap();
        out.push_str(&template[last_end..whole.start()]);
        let action = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        out.push_str(&render_action(action, frame, env, extra)?);
        last_end = whole.end();
    }
    out.push_str(&template[last_end..]);
    Ok(out)
}

fn render_action(
    action: &str,
    frame: &Value,
    env: &Environment,
    extra: &std::collections::HashMap<String, crate::dispatch::TemplateFn>,
) -> Result<String> {
    if let Some(field) = action.strip_prefix('.') {
        let value = frame.get(field).cloned().unwrap_or(Json::Null);
        return Ok(display_value(&value));
    }
    if let Some(arg) = strip_call(action, "lookupAll") {
        let results = env.lookup_all(&arg)?;
        let rendered: Vec<Json> = results;
        return Ok(display_value(&Json::Array(rendered)));
    }
    if let Some(arg) = strip_call(action, "lookup") {
        let value = env.lookup_first(&arg)?.unwrap_or(Json::Null);
        return Ok(display_value(&value));
    }
    if let Some(arg) = strip_call(action, "exists") {
        let found = env.exists(&arg)?;
        return Ok(found.to_string());
    }
    for (name, f) in extra {
        if let Some(arg) = strip_call(action, name) {
            return Ok(display_value(&f(&arg)?));
        }
    }
    Err(YtagError::Format(format!("unsupported template action '{action}'")))
}

/// Extract `func`'s quoted string argument from an action like
/// `lookup "$.user.age"`, if `action` calls `func`.
fn strip_call(action: &str, func: &str) -> Option<String> {
    let rest = action.strip_prefix(func)?.trim_start();
    let rest = rest.strip_prefix('"')?;
    let rest = rest.strip_suffix('"')?;
    Some(rest.replace("\\\"", "\""))
}

fn display_value(value: &Value) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        Json::Bool(b) => b.to_string(),
        Json::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use serde_json::{json, Map};

    #[test]
    fn rewrite_identifier_vs_path() {
        let rewritten = rewrite_braces("Hello, {name}! {$.user.age}");
        assert_eq!(rewritten, "Hello, {{.name}}! {{lookup \"$.user.age\"}}");
    }

    #[test]
    fn rewrite_passes_through_existing_templates() {
        assert_eq!(rewrite_braces("already {{.done}}"), "already {{.done}}");
    }

    #[test]
    fn rewrite_is_idempotent() {
        let once = rewrite_braces("Hi {name}, score {a+b}");
        let twice = rewrite_braces(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn render_substitutes_field_and_lookup() {
        let mut bottom = Map::new();
        bottom.insert("name".to_string(), json!("Ada"));
        let env = Environment::new(bottom);
        let frame = env.current_frame_value();
        let no_extra = std::collections::HashMap::new();
        let rendered = render_template("Hello, {{.name}}!", &frame, &env, &no_extra).unwrap();
        assert_eq!(rendered, "Hello, Ada!");
    }

    #[test]
    fn render_exists_and_lookup_query_full_union() {
        let mut bottom = Map::new();
        bottom.insert("user".to_string(), json!({"age": 30}));
        let env = Environment::new(bottom);
        let frame = env.current_frame_value();
        let no_extra = std::collections::HashMap::new();
        let rendered =
            render_template("{{lookup \"$.user.age\"}} {{exists \"$.user.age\"}}", &frame, &env, &no_extra).unwrap();
        assert_eq!(rendered, "30 true");
    }
}
