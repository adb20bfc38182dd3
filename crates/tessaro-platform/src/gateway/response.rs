//! Response Formatter
//!
//! A status code plus optional JSON body, convertible both into an axum
//! response and into the function-runtime `(body, status, headers)`
//! tuple. Timestamps are rendered as RFC 3339 strings by the DTO layer
//! before they reach this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::shared::error::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Option<Value>,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        Ok(Self { status, body: Some(value) })
    }

    /// 200 with a JSON body
    pub fn ok<T: Serialize>(body: &T) -> Result<Self> {
        Self::json(StatusCode::OK, body)
    }

    /// 201 with a JSON body
    pub fn created<T: Serialize>(body: &T) -> Result<Self> {
        Self::json(StatusCode::CREATED, body)
    }

    /// 201 without a body
    pub fn created_empty() -> Self {
        Self { status: StatusCode::CREATED, body: None }
    }

    /// 204
    pub fn no_content() -> Self {
        Self { status: StatusCode::NO_CONTENT, body: None }
    }

    /// An error rendered as `{"message": ...}` with its mapped status.
    pub fn error(err: &ApiError) -> Self {
        if err.status() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status: err.status(),
            body: Some(serde_json::json!({ "message": err.public_message() })),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The function-runtime contract: serialized body, status, headers.
    pub fn into_parts(self) -> (String, u16, Vec<(String, String)>) {
        match self.body {
            Some(value) => (
                value.to_string(),
                self.status.as_u16(),
                vec![("content-type".to_string(), "application/json".to_string())],
            ),
            None => (String::new(), self.status.as_u16(), Vec::new()),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(value) => (self.status, Json(value)).into_response(),
            None => self.status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_carries_json_body_and_content_type() {
        let response = ApiResponse::ok(&json!({"count": 3})).unwrap();
        let (body, status, headers) = response.into_parts();
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"count":3}"#);
        assert_eq!(headers[0].1, "application/json");
    }

    #[test]
    fn no_content_has_empty_body_and_no_headers() {
        let (body, status, headers) = ApiResponse::no_content().into_parts();
        assert_eq!(status, 204);
        assert!(body.is_empty());
        assert!(headers.is_empty());
    }

    #[test]
    fn created_empty_is_201() {
        let (_, status, _) = ApiResponse::created_empty().into_parts();
        assert_eq!(status, 201);
    }

    #[test]
    fn error_body_carries_the_message() {
        let response = ApiResponse::error(&ApiError::not_found("Session not found"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().unwrap(), &json!({"message": "Session not found"}));
    }
}
