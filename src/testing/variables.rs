//! Variable scopes and `{{name}}` substitution
//!
//! Two scopes feed substitution: read-only builtins shared by the whole run,
//! and values captured from responses, owned by one scenario at a time.
//! Captured values win over builtins. Tokens that resolve in neither scope
//! are left in place untouched.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(\w+)\}\}").expect("token pattern is valid")
});

/// Run-wide constants (seeded tokens, base URL)
#[derive(Debug, Clone, Default)]
pub struct Builtins(HashMap<String, String>);

impl Builtins {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self(vars)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Values captured from responses during one scenario
#[derive(Debug, Clone, Default)]
pub struct CapturedScope(HashMap<String, String>);

impl CapturedScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Set a variable, replacing any earlier value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Borrowed view over both scopes for a single substitution pass
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    builtins: &'a Builtins,
    captured: &'a CapturedScope,
}

impl<'a> Resolver<'a> {
    pub fn new(builtins: &'a Builtins, captured: &'a CapturedScope) -> Self {
        Self { builtins, captured }
    }

    fn lookup(&self, name: &str) -> Option<&'a str> {
        self.captured.get(name).or_else(|| self.builtins.get(name))
    }

    /// Substitute every `{{name}}` token in a string
    pub fn resolve_str(&self, template: &str) -> String {
        TOKEN_RE
            .replace_all(template, |caps: &Captures| match self.lookup(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Substitute tokens in every string leaf of a nested value
    ///
    /// Object keys, numbers, booleans and nulls are left as they are.
    pub fn resolve_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.resolve_str(s)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.resolve_value(v)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_value(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}
