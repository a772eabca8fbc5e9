//! Response expectations
//!
//! Every configured check runs, and each violation becomes one message, so
//! a failing step reports all of its problems at once.

use std::borrow::Cow;

use regex::Regex;
use serde_json::Value;

use super::config::Expectation;

/// A response body, parsed as JSON when possible
#[derive(Debug, Clone)]
pub struct ResponseBody {
    raw: String,
    parsed: Option<Value>,
}

impl ResponseBody {
    pub fn new(raw: String) -> Self {
        let parsed = serde_json::from_str(&raw).ok();
        Self { raw, parsed }
    }

    /// Text that `body_contains` searches
    ///
    /// JSON bodies are re-serialized compactly; anything else is used raw.
    pub fn serialized(&self) -> Cow<'_, str> {
        match &self.parsed {
            Some(value) => match serde_json::to_string(value) {
                Ok(text) => Cow::Owned(text),
                Err(_) => Cow::Borrowed(&self.raw),
            },
            None => Cow::Borrowed(&self.raw),
        }
    }

    /// The body as a value: parsed JSON, or the raw text as a string
    pub fn value(&self) -> Value {
        match &self.parsed {
            Some(value) => value.clone(),
            None => Value::String(self.raw.clone()),
        }
    }

    /// Parsed JSON object or array, the only bodies fields can be read from
    pub fn structured(&self) -> Option<&Value> {
        self.parsed
            .as_ref()
            .filter(|v| v.is_object() || v.is_array())
    }

    /// Look up a dot-separated field path
    pub fn field(&self, path: &str) -> Option<&Value> {
        self.structured().and_then(|v| lookup_path(v, path))
    }
}

/// Walk a dot-separated path through objects (by key) and arrays (by index)
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Render a value as plain text: strings unquoted, missing or null as empty
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Check every expectation against a response, returning all violations
pub fn check_expectations(expect: &Expectation, status: u16, body: &ResponseBody) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(expected) = &expect.status {
        if expected.as_u64() != Some(u64::from(status)) {
            errors.push(format!("Status: expected {}, got {}", expected, status));
        }
    }

    if !expect.body_contains.is_empty() {
        let text = body.serialized();
        for needle in &expect.body_contains {
            if !text.contains(needle.as_str()) {
                errors.push(format!("Body: expected to contain '{}'", needle));
            }
        }
    }

    for (field, pattern) in &expect.body_matches {
        let actual = stringify(body.field(field));
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(&actual) {
                    errors.push(format!(
                        "Field '{}': '{}' does not match /{}/",
                        field, actual, pattern
                    ));
                }
            }
            Err(e) => {
                errors.push(format!("Field '{}': invalid pattern /{}/: {}", field, pattern, e));
            }
        }
    }

    for (field, expected) in &expect.body_equals {
        let actual = body.field(field).cloned().unwrap_or(Value::Null);
        if &actual != expected {
            errors.push(format!(
                "Field '{}': expected {}, got {}",
                field, expected, actual
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> ResponseBody {
        ResponseBody::new(value.to_string())
    }

    fn expect_yaml(yaml: &str) -> Expectation {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_status_and_contains_pass() {
        let expect = expect_yaml("status: 200\nbody_contains: [investigation_number]");
        let b = body(json!({"id": "inv-001", "investigation_number": "GQ-2026-1001"}));
        assert!(check_expectations(&expect, 200, &b).is_empty());
    }

    #[test]
    fn test_status_mismatch_message() {
        let expect = expect_yaml("status: 200");
        let b = body(json!({}));
        assert_eq!(
            check_expectations(&expect, 404, &b),
            vec!["Status: expected 200, got 404".to_string()]
        );
    }

    #[test]
    fn test_quoted_status_never_matches() {
        let expect = expect_yaml("status: \"200\"");
        let b = body(json!({}));
        assert_eq!(
            check_expectations(&expect, 200, &b),
            vec![r#"Status: expected "200", got 200"#.to_string()]
        );
    }

    #[test]
    fn test_all_failures_are_collected() {
        let expect = expect_yaml(
            r#"
status: 201
body_contains: ["missing-one", "missing-two"]
body_matches:
  code: "^X"
body_equals:
  state: closed
"#,
        );
        let b = body(json!({"code": "A1", "state": "open"}));
        let errors = check_expectations(&expect, 500, &b);
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0], "Status: expected 201, got 500");
    }

    #[test]
    fn test_contains_searches_whole_serialized_body() {
        let expect = expect_yaml(r#"body_contains: ['"nested":{"k":1}']"#);
        let b = ResponseBody::new("{ \"nested\" : { \"k\" : 1 } }".to_string());
        assert!(check_expectations(&expect, 200, &b).is_empty());
    }

    #[test]
    fn test_contains_on_non_json_body() {
        let expect = expect_yaml("body_contains: [healthy]");
        let b = ResponseBody::new("service healthy".to_string());
        assert!(check_expectations(&expect, 200, &b).is_empty());
        assert_eq!(b.value(), Value::String("service healthy".to_string()));
        assert!(b.structured().is_none());
    }

    #[test]
    fn test_matches_coerces_to_string() {
        let expect = expect_yaml(
            r#"
body_matches:
  count: "^\\d+$"
  flag: "^true$"
  absent: "^$"
"#,
        );
        let b = body(json!({"count": 42, "flag": true}));
        assert!(check_expectations(&expect, 200, &b).is_empty());
    }

    #[test]
    fn test_matches_invalid_regex_reports_error() {
        let expect = expect_yaml("body_matches:\n  id: \"([\"");
        let b = body(json!({"id": "x"}));
        let errors = check_expectations(&expect, 200, &b);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Field 'id': invalid pattern"));
    }

    #[test]
    fn test_equals_is_structural() {
        let expect = expect_yaml(
            r#"
body_equals:
  meta: { b: 2, a: 1 }
  tags: [x, y]
"#,
        );
        let b = ResponseBody::new(r#"{"meta": {"a": 1, "b": 2}, "tags": ["x", "y"]}"#.to_string());
        assert!(check_expectations(&expect, 200, &b).is_empty());

        let reordered = ResponseBody::new(r#"{"meta": {"a": 1, "b": 2}, "tags": ["y", "x"]}"#.to_string());
        let errors = check_expectations(&expect, 200, &reordered);
        assert_eq!(errors, vec![r#"Field 'tags': expected ["x","y"], got ["y","x"]"#.to_string()]);
    }

    #[test]
    fn test_equals_missing_field_is_null() {
        let expect = expect_yaml("body_equals:\n  gone: 1");
        let b = body(json!({}));
        assert_eq!(
            check_expectations(&expect, 200, &b),
            vec!["Field 'gone': expected 1, got null".to_string()]
        );
    }

    #[test]
    fn test_lookup_path_objects_and_arrays() {
        let v = json!({"data": {"items": [{"id": "a"}, {"id": "b"}]}});
        assert_eq!(lookup_path(&v, "data.items.1.id"), Some(&json!("b")));
        assert_eq!(lookup_path(&v, "data.items.9.id"), None);
        assert_eq!(lookup_path(&v, "data.missing"), None);
        assert_eq!(lookup_path(&v, "data.items.x"), None);
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(None), "");
        assert_eq!(stringify(Some(&Value::Null)), "");
        assert_eq!(stringify(Some(&json!("abc"))), "abc");
        assert_eq!(stringify(Some(&json!(12))), "12");
        assert_eq!(stringify(Some(&json!({"a": 1}))), r#"{"a":1}"#);
    }
}
