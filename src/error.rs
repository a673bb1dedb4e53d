use thiserror::Error;

/// Failure while fetching a translation resource.
///
/// These never reach callers of `Translator::translate`; the loading layer
/// degrades every variant to an empty map and logs it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} for {locator}")]
    Status { status: u16, locator: String },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid locator '{0}'")]
    InvalidLocator(String),
}

/// Failure while reading a language manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("manifest entry '{0}' must be a string locator")]
    InvalidEntry(String),
}

/// Short name of a JSON value's kind, used in diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            status: 404,
            locator: "http://localhost/translations/xx.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected status 404 for http://localhost/translations/xx.json"
        );
    }

    #[test]
    fn test_not_an_object_message() {
        let err = FetchError::NotAnObject(json_kind(&json!([1, 2])));
        assert_eq!(err.to_string(), "expected a JSON object, got array");
    }

    #[test]
    fn test_parse_error_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FetchError = parse.into();
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!(true)), "boolean");
        assert_eq!(json_kind(&json!(3)), "number");
        assert_eq!(json_kind(&json!("x")), "string");
        assert_eq!(json_kind(&json!({})), "object");
    }
}
