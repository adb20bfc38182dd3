//! Canonical Request
//!
//! One request value for every entry shape: method, path, query multimap,
//! lowercased header map, and a parsed JSON body. The `__path` query
//! parameter and `x-tessaro-path` header overrides are applied when the
//! request is constructed, so downstream code only ever sees the
//! effective path.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::shared::api_common::normalize_string;
use crate::shared::error::{ApiError, Result};

/// Header through which a front door can tunnel the true request path.
pub const PATH_OVERRIDE_HEADER: &str = "x-tessaro-path";

/// Query parameter carrying a (doubly percent-encoded) path override.
pub const PATH_OVERRIDE_PARAM: &str = "__path";

/// Percent-decode, treating `+` as space.
fn unquote_plus(value: &str) -> String {
    let plus_decoded = value.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => plus_decoded,
    }
}

/// Percent-decode, leaving `+` alone.
fn unquote(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Query parameter multimap, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string into decoded pairs.
    pub fn parse(raw: &str) -> Self {
        let pairs = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First non-empty value for a key. Values arrive percent-decoded once
    /// by query parsing; front doors that tunnel the request encode twice,
    /// so the value is decoded again, and once more while a `%` remains
    /// from the second layer.
    pub fn first(&self, key: &str) -> Option<String> {
        for (k, v) in &self.pairs {
            if k != key {
                continue;
            }
            if let Some(normalized) = normalize_string(Some(v)) {
                let decoded = unquote_plus(&normalized);
                return Some(if decoded.contains('%') {
                    unquote_plus(&decoded)
                } else {
                    decoded
                });
            }
        }
        None
    }

    /// Remove every value for a key, returning the first non-empty one
    /// undecoded.
    fn take_raw(&mut self, key: &str) -> Option<String> {
        let value = self
            .pairs
            .iter()
            .filter(|(k, _)| k == key)
            .find_map(|(_, v)| normalize_string(Some(v)));
        self.pairs.retain(|(k, _)| k != key);
        value
    }
}

/// Header map with case-insensitive (lowercased) names.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Build from a JSON header mapping. Values may be strings or arrays
    /// of strings (first element wins).
    pub fn from_json(value: Option<&Value>) -> Self {
        let mut headers = Self::new();
        if let Some(map) = value.and_then(Value::as_object) {
            for (name, value) in map {
                let resolved = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Array(items) => items.iter().find_map(|v| v.as_str().map(String::from)),
                    _ => None,
                };
                if let Some(v) = resolved {
                    headers.insert(name, v);
                }
            }
        }
        headers
    }
}

/// Parse a string/bytes body into JSON. Empty input is an empty object;
/// malformed JSON is the caller's fault.
pub fn parse_body_text(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(trimmed)
        .map_err(|err| ApiError::validation(format!("Invalid JSON payload: {}", err)))
}

/// The canonical request every handler consumes.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: Query,
    pub headers: Headers,
    pub body: Value,
}

impl ApiRequest {
    /// Assemble a request, applying the path-override mechanism: the
    /// `__path` query parameter wins over the `x-tessaro-path` header;
    /// either replaces the resolved path and query entirely.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        mut query: Query,
        headers: Headers,
        body: Value,
    ) -> Self {
        let mut path = path.into();

        let override_path = query
            .take_raw(PATH_OVERRIDE_PARAM)
            .map(|raw| unquote(&unquote(&raw)))
            .or_else(|| {
                headers
                    .get(PATH_OVERRIDE_HEADER)
                    .and_then(|v| normalize_string(Some(v)))
            });

        if let Some(target) = override_path {
            let rooted = if target.starts_with('/') {
                target
            } else {
                format!("/{}", target.trim_start_matches('/'))
            };
            let (new_path, new_query) = match rooted.split_once('?') {
                Some((p, q)) => (p.to_string(), Query::parse(q)),
                None => (rooted, Query::new()),
            };
            path = if new_path.is_empty() { "/".to_string() } else { new_path };
            query = new_query;
        }

        let method = method.into().to_uppercase();
        let path = if path.is_empty() { "/".to_string() } else { path };

        Self { method, path, query, headers, body }
    }

    /// Adapt an HTTP request that the web framework already parsed.
    pub fn from_http(
        method: &axum::http::Method,
        uri: &axum::http::Uri,
        header_map: &axum::http::HeaderMap,
        body_bytes: &[u8],
    ) -> Result<Self> {
        let mut headers = Headers::new();
        for (name, value) in header_map {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str(), v);
            }
        }

        let text = std::str::from_utf8(body_bytes)
            .map_err(|_| ApiError::validation("Invalid JSON payload: body is not valid UTF-8"))?;
        let body = parse_body_text(text)?;

        Ok(Self::new(
            method.as_str(),
            uri.path(),
            Query::parse(uri.query().unwrap_or("")),
            headers,
            body,
        ))
    }

    /// Non-empty path segments.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}
