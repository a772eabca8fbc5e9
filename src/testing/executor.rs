//! Step execution
//!
//! Issues one HTTP request per step, times it, checks expectations and
//! captures variables from the response.

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::common::{normalize_base_url, Error, Result};

use super::assertions::{check_expectations, lookup_path, stringify, ResponseBody};
use super::config::{Expectation, Step};
use super::variables::{Builtins, CapturedScope, Resolver};

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub name: String,
    pub method: String,
    pub url: String,
    pub passed: bool,
    pub latency_ms: u64,
    /// Every violation found; empty iff the step passed
    pub errors: Vec<String>,
    /// Expectations of a failed step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Expectation>,
    /// Response observed by a failed step, if one arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<ActualResponse>,
}

/// Snapshot of a response for diagnostics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActualResponse {
    pub status: u16,
    pub body: Value,
}

/// A step with all templates resolved
#[derive(Debug)]
struct PreparedRequest {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

/// Executes steps against one API base URL
pub struct StepExecutor {
    client: reqwest::Client,
    api_url: String,
    builtins: Builtins,
}

impl StepExecutor {
    pub fn new(api_url: &str, builtins: Builtins) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(Error::HttpClient)?;
        Ok(Self {
            client,
            api_url: normalize_base_url(api_url),
            builtins,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Run one step, updating `captured` with any declared captures
    ///
    /// Never fails: transport errors and assertion failures are recorded
    /// in the returned result.
    pub async fn execute(&self, step: &Step, captured: &mut CapturedScope) -> StepResult {
        let prepared = self.prepare(step, &Resolver::new(&self.builtins, captured));
        let mut result = StepResult {
            name: step.display_name(),
            method: prepared.method.clone(),
            url: prepared.url.clone(),
            passed: false,
            latency_ms: 0,
            errors: Vec::new(),
            expected: None,
            actual: None,
        };

        let request = match self.build_request(&prepared) {
            Ok(request) => request,
            Err(message) => {
                result.errors.push(message);
                result.expected = step.expect.clone();
                return result;
            }
        };

        tracing::debug!(method = %prepared.method, url = %prepared.url, "Sending request");

        let started = Instant::now();
        let response = send(request).await;
        result.latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (status, body) = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %prepared.url, error = %e, "Request failed");
                result.errors.push(format!("Request failed: {}", e));
                result.expected = step.expect.clone();
                return result;
            }
        };

        tracing::debug!(status, latency_ms = result.latency_ms, "Received response");

        if let Some(expect) = &step.expect {
            result.errors = check_expectations(expect, status, &body);
        }

        capture_values(step, &body, captured);

        result.passed = result.errors.is_empty();
        if !result.passed {
            result.expected = step.expect.clone();
            result.actual = Some(ActualResponse {
                status,
                body: body.value(),
            });
        }

        result
    }

    fn prepare(&self, step: &Step, resolver: &Resolver<'_>) -> PreparedRequest {
        let method = step.method();
        let body = if method_carries_body(&method) {
            step.body.as_ref().map(|b| resolver.resolve_value(b))
        } else {
            None
        };

        PreparedRequest {
            url: format!("{}{}", self.api_url, resolver.resolve_str(&step.path)),
            headers: step
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), resolver.resolve_str(v)))
                .collect(),
            body,
            method,
        }
    }

    fn build_request(
        &self,
        prepared: &PreparedRequest,
    ) -> std::result::Result<reqwest::RequestBuilder, String> {
        let method = Method::from_bytes(prepared.method.as_bytes())
            .map_err(|e| format!("Request failed: invalid method '{}': {}", prepared.method, e))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (key, value) in &prepared.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| format!("Request failed: invalid header name '{}': {}", key, e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| format!("Request failed: invalid value for header '{}': {}", key, e))?;
            headers.insert(name, value);
        }

        let mut builder = self.client.request(method, &prepared.url).headers(headers);
        if let Some(body) = &prepared.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| format!("Request failed: could not serialize body: {}", e))?;
            builder = builder.body(bytes);
        }

        Ok(builder)
    }
}

/// Send a request and read the full body
async fn send(
    request: reqwest::RequestBuilder,
) -> std::result::Result<(u16, ResponseBody), reqwest::Error> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let text = response.text().await?;
    Ok((status, ResponseBody::new(text)))
}

fn method_carries_body(method: &str) -> bool {
    !matches!(method, "GET" | "HEAD")
}

/// Copy declared captures from a structured response into the scope
///
/// Paths that do not resolve are skipped without error.
fn capture_values(step: &Step, body: &ResponseBody, captured: &mut CapturedScope) {
    let Some(root) = body.structured() else {
        return;
    };

    for (name, path) in &step.capture {
        match lookup_path(root, path) {
            Some(value) => {
                let value = match value {
                    Value::Null => "null".to_string(),
                    other => stringify(Some(other)),
                };
                tracing::debug!(variable = %name, value = %value, "Captured variable");
                captured.set(name.clone(), value);
            }
            None => {
                tracing::debug!(variable = %name, path = %path, "Capture path did not resolve");
            }
        }
    }
}
