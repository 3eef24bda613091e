//! Formatting of outbound HTTP exchanges for the debug log.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde_json::Value;
use std::borrow::Cow;

const MASK: &str = "***REDACTED***";
const PREFIX: &str = "[http-debug]";

/// Compared case-insensitively against header names and JSON object keys.
const SENSITIVE: &[&str] = &[
    "authorization",
    "api_key",
    "apikey",
    "openai_api_key",
    "token",
    "access_token",
    "secret",
    "password",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDebugConfig {
    pub enabled: bool,
    pub redact_secrets: bool,
    pub max_body_chars: usize,
}

impl HttpDebugConfig {
    pub fn from_flag(enabled: bool) -> Self {
        Self {
            enabled,
            redact_secrets: true,
            max_body_chars: 4_000,
        }
    }

    pub fn disabled() -> Self {
        Self::from_flag(false)
    }

    pub(crate) fn request_lines(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: &str,
    ) -> Vec<String> {
        let mut lines = vec![format!("{PREFIX} > {method} {url}")];
        self.push_headers_and_body(&mut lines, '>', headers, body);
        lines
    }

    pub(crate) fn response_lines(&self, status: u16, headers: &HeaderMap, body: &str) -> Vec<String> {
        let mut lines = vec![format!("{PREFIX} < HTTP {status}")];
        self.push_headers_and_body(&mut lines, '<', headers, body);
        lines
    }

    fn push_headers_and_body(
        &self,
        lines: &mut Vec<String>,
        marker: char,
        headers: &HeaderMap,
        body: &str,
    ) {
        lines.extend(headers.iter().map(|(name, value)| {
            format!("{PREFIX} {marker} {name}: {}", self.header_value(name, value))
        }));
        lines.push(format!("{PREFIX} {marker}"));

        let body = self.body_preview(body);
        if body.is_empty() {
            lines.push(format!("{PREFIX} {marker} <empty body>"));
        } else {
            lines.extend(body.lines().map(|line| format!("{PREFIX} {marker} {line}")));
        }
    }

    fn header_value<'a>(&self, name: &HeaderName, value: &'a HeaderValue) -> Cow<'a, str> {
        if self.redact_secrets && is_sensitive(name.as_str()) {
            return Cow::Borrowed(MASK);
        }
        match value.to_str() {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => Cow::Borrowed("<non-utf8>"),
        }
    }

    /// Masks secrets in JSON bodies, then caps the length. Non-JSON bodies are only capped.
    fn body_preview(&self, raw: &str) -> String {
        let masked = if self.redact_secrets {
            mask_json_body(raw)
        } else {
            None
        };
        let text = masked.as_deref().unwrap_or(raw);

        let total = text.chars().count();
        if total <= self.max_body_chars {
            return text.to_string();
        }
        let kept: String = text.chars().take(self.max_body_chars).collect();
        format!("{kept}... <truncated {} chars>", total - self.max_body_chars)
    }
}

fn mask_json_body(raw: &str) -> Option<String> {
    let mut json = serde_json::from_str::<Value>(raw).ok()?;
    mask_secrets(&mut json);
    serde_json::to_string(&json).ok()
}

fn mask_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                if is_sensitive(key) {
                    *item = Value::String(MASK.to_string());
                } else {
                    mask_secrets(item);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE.iter().any(|s| s.eq_ignore_ascii_case(key))
}
