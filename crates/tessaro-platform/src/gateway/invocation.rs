//! Function-runtime invocation envelope
//!
//! Some front doors deliver requests as a generic `(context, data)` pair
//! instead of plain HTTP: `context` is a JSON mapping that may carry a
//! nested `request` object (method, url, path, headers, body) or bare
//! `url`/`path` keys, and `data` is the raw or pre-parsed body. This
//! module recovers the canonical [`ApiRequest`] from that shape.

use serde_json::{Map, Value};
use url::Url;

use crate::gateway::request::{parse_body_text, ApiRequest, Headers, Query};
use crate::shared::error::{ApiError, Result};

/// A generic function-runtime invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub context: Value,
    pub data: Option<Value>,
}

impl Invocation {
    pub fn new(context: Value, data: Option<Value>) -> Self {
        Self { context, data }
    }

    /// Normalize into the canonical request.
    ///
    /// Resolution order: a nested `request` mapping wins over top-level
    /// `url`/`path`; a resolvable URL string supplies both path and query.
    /// Path overrides are applied by [`ApiRequest::new`].
    pub fn normalize(&self) -> Result<ApiRequest> {
        let empty = Map::new();
        let context = self.context.as_object().unwrap_or(&empty);
        let request = context
            .get("request")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let method = request
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET");

        let raw_url = request
            .get("url")
            .or_else(|| context.get("url"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        let mut path = request
            .get("path")
            .or_else(|| context.get("path"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("/")
            .to_string();
        let mut query = Query::new();

        if let Some(raw) = raw_url {
            if let Some((url_path, url_query)) = split_url(raw) {
                if !url_path.is_empty() {
                    path = url_path;
                }
                query = Query::parse(&url_query);
            }
        }

        let headers = Headers::from_json(request.get("headers"));
        let body = self.body_value(request)?;

        Ok(ApiRequest::new(method, path, query, headers, body))
    }

    /// The request body: `data` wins; a string `body` inside the nested
    /// request mapping is the fallback. Strings are parsed as JSON (empty
    /// string means an empty object); a pre-parsed object passes through.
    fn body_value(&self, request: &Map<String, Value>) -> Result<Value> {
        let candidate = match &self.data {
            Some(value) => Some(value.clone()),
            None => request.get("body").filter(|v| v.is_string()).cloned(),
        };

        match candidate {
            None => Ok(Value::Object(Map::new())),
            Some(Value::Null) => Ok(Value::Object(Map::new())),
            Some(Value::String(text)) => parse_body_text(&text),
            Some(value @ Value::Object(_)) => Ok(value),
            Some(_) => Err(ApiError::validation("Unsupported request body type")),
        }
    }
}

/// Split a URL string (absolute or relative) into path and query.
fn split_url(raw: &str) -> Option<(String, String)> {
    let parsed = Url::parse(raw)
        .ok()
        .or_else(|| Url::parse("http://localhost").ok()?.join(raw).ok())?;
    Some((
        parsed.path().to_string(),
        parsed.query().unwrap_or("").to_string(),
    ))
}
