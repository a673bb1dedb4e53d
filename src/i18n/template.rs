//! Placeholder rendering for translation templates.
//!
//! Templates use `{name}` markers. Missing variables leave the marker in the
//! output untouched, so rendering never fails.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Variables available to a template, keyed by placeholder name.
pub type Variables = HashMap<String, String>;

/// Variable that replaces a placeholder-free template wholesale.
pub const FALLBACK_VARIABLE: &str = "fallback";

static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Whether the template contains at least one `{...}` marker.
pub fn has_placeholders(template: &str) -> bool {
    let regex = MARKER_REGEX.get_or_init(|| Regex::new(r"\{.+\}").unwrap());
    regex.is_match(template)
}

/// Render a resolved translation value.
///
/// Non-string values pass through unchanged.
pub fn render(value: &Value, variables: &Variables) -> Value {
    match value {
        Value::String(template) => Value::String(render_str(template, variables)),
        other => other.clone(),
    }
}

/// Render a string template against `variables`.
pub fn render_str(template: &str, variables: &Variables) -> String {
    let mut source = template;
    if let Some(fallback) = variables
        .get(FALLBACK_VARIABLE)
        .filter(|value| !value.is_empty())
    {
        if !has_placeholders(template) {
            source = fallback;
        }
    }

    let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([^}]+)\}").unwrap());
    regex
        .replace_all(source, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
