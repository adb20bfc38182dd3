//! Common API types and utilities

use serde::Serialize;

use crate::shared::error::{ApiError, Result};

/// Count-only summary response (`?summary=count`)
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Trim a string value; empty-after-trim is treated as absent.
pub fn normalize_string(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalize an owned optional string in place.
pub fn normalize_opt(value: Option<String>) -> Option<String> {
    normalize_string(value.as_deref())
}

/// Normalize a JSON value that should be a string field. Non-string values
/// count as absent, matching the loose wire contract.
pub fn normalize_json_string(value: Option<&serde_json::Value>) -> Option<String> {
    normalize_string(value.and_then(|v| v.as_str()))
}

/// Deduplicate identifiers, preserving first-seen order and dropping
/// blank entries.
pub fn dedupe_identifiers(raw: &[serde_json::Value]) -> Vec<String> {
    let mut seen = Vec::new();
    for value in raw {
        if let Some(id) = normalize_string(value.as_str()) {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
    }
    seen
}

/// Parse a JSON value that must be an integer; numeric strings are
/// accepted, anything else fails with the given message.
pub fn require_integer(value: Option<&serde_json::Value>, message: &str) -> Result<i64> {
    match value {
        Some(serde_json::Value::Number(n)) => {
            n.as_i64().ok_or_else(|| ApiError::validation(message))
        }
        Some(serde_json::Value::String(s)) => {
            s.trim().parse().map_err(|_| ApiError::validation(message))
        }
        _ => Err(ApiError::validation(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_string_trims_and_drops_empty() {
        assert_eq!(normalize_string(Some("  acme  ")), Some("acme".to_string()));
        assert_eq!(normalize_string(Some("   ")), None);
        assert_eq!(normalize_string(None), None);
    }

    #[test]
    fn normalize_json_string_rejects_non_strings() {
        assert_eq!(normalize_json_string(Some(&json!(42))), None);
        assert_eq!(normalize_json_string(Some(&json!(null))), None);
        assert_eq!(
            normalize_json_string(Some(&json!(" x "))),
            Some("x".to_string())
        );
    }

    #[test]
    fn dedupe_preserves_first_seen_order() {
        let raw = vec![json!("b"), json!("a"), json!("b"), json!(" a "), json!("")];
        assert_eq!(dedupe_identifiers(&raw), vec!["b", "a"]);
    }

    #[test]
    fn require_integer_accepts_numbers_and_numeric_strings() {
        assert_eq!(require_integer(Some(&json!(7)), "bad").unwrap(), 7);
        assert_eq!(require_integer(Some(&json!("12")), "bad").unwrap(), 12);
        assert!(require_integer(Some(&json!("twelve")), "bad").is_err());
        assert!(require_integer(Some(&json!(1.5)), "bad").is_err());
        assert!(require_integer(None, "bad").is_err());
    }
}
