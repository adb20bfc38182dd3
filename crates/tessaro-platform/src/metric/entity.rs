//! Metric Entity

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metric kind; together with the key it forms the composite identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Number,
    Timestamp,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Timestamp => "timestamp",
        }
    }
}

/// The stored value: an integer for number metrics, an opaque string for
/// timestamp metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Text(String),
}

/// Metric entity. The document `_id` is driver-assigned; identity is the
/// unique (key, kind) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub kind: MetricKind,
    #[serde(default)]
    pub value: Option<MetricValue>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Metric {
    /// Number metrics report 0 when the value field is missing.
    pub fn integer_value(&self) -> i64 {
        match self.value {
            Some(MetricValue::Integer(v)) => v,
            _ => 0,
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            Some(MetricValue::Text(v)) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(kind: MetricKind, value: Option<MetricValue>) -> Metric {
        let now = Utc::now();
        Metric {
            key: "k".to_string(),
            kind,
            value,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn integer_value_defaults_to_zero() {
        assert_eq!(metric(MetricKind::Number, None).integer_value(), 0);
        assert_eq!(
            metric(MetricKind::Number, Some(MetricValue::Integer(41))).integer_value(),
            41
        );
    }

    #[test]
    fn text_value_only_reads_text() {
        assert_eq!(metric(MetricKind::Timestamp, None).text_value(), None);
        assert_eq!(
            metric(
                MetricKind::Timestamp,
                Some(MetricValue::Text("2024-05-01".to_string()))
            )
            .text_value(),
            Some("2024-05-01")
        );
        assert_eq!(
            metric(MetricKind::Number, Some(MetricValue::Integer(1))).text_value(),
            None
        );
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MetricKind::Number).unwrap(),
            "\"number\""
        );
        assert_eq!(
            serde_json::to_string(&MetricKind::Timestamp).unwrap(),
            "\"timestamp\""
        );
    }
}
