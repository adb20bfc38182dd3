//! Metrics API
//!
//! Number metrics (get/set/increment) and timestamp metrics (get/set),
//! addressed by key.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::entity::MetricKind;
use super::repository::MetricRepository;
use crate::gateway::request::Query;
use crate::gateway::response::ApiResponse;
use crate::shared::api_common::{normalize_json_string, require_integer};
use crate::shared::error::{ApiError, Result};

/// Metrics service state
#[derive(Clone)]
pub struct MetricsState {
    pub metric_repo: Arc<MetricRepository>,
}

#[derive(Debug, Serialize)]
struct NumberMetricResponse {
    value: i64,
}

#[derive(Debug, Serialize)]
struct TimestampMetricResponse {
    value: Option<String>,
}

fn required_key(body: &Value) -> Result<String> {
    normalize_json_string(body.get("key")).ok_or_else(|| ApiError::validation("key is required"))
}

pub async fn increment_metric(state: &MetricsState, body: &Value) -> Result<ApiResponse> {
    let key = required_key(body)?;
    let metric = state.metric_repo.increment(&key).await?;
    ApiResponse::ok(&NumberMetricResponse {
        value: metric.integer_value(),
    })
}

pub async fn get_number_metric(state: &MetricsState, query: &Query) -> Result<ApiResponse> {
    let key = query
        .first("key")
        .ok_or_else(|| ApiError::validation("key is required"))?;
    let metric = state
        .metric_repo
        .find(&key, MetricKind::Number)
        .await?
        .ok_or_else(|| ApiError::not_found("Metric not found"))?;
    ApiResponse::ok(&NumberMetricResponse {
        value: metric.integer_value(),
    })
}

pub async fn set_number_metric(state: &MetricsState, body: &Value) -> Result<ApiResponse> {
    let key = required_key(body)?;
    let value = require_integer(body.get("value"), "value must be an integer")?;
    state.metric_repo.set_number(&key, value).await?;
    Ok(ApiResponse::no_content())
}

pub async fn get_timestamp_metric(state: &MetricsState, query: &Query) -> Result<ApiResponse> {
    let key = query
        .first("key")
        .ok_or_else(|| ApiError::validation("key is required"))?;
    let metric = state
        .metric_repo
        .find(&key, MetricKind::Timestamp)
        .await?
        .ok_or_else(|| ApiError::not_found("Metric not found"))?;
    ApiResponse::ok(&TimestampMetricResponse {
        value: metric.text_value().map(String::from),
    })
}

pub async fn set_timestamp_metric(state: &MetricsState, body: &Value) -> Result<ApiResponse> {
    let key = required_key(body)?;
    let value = normalize_json_string(body.get("value"));
    state.metric_repo.set_timestamp(&key, value).await?;
    Ok(ApiResponse::no_content())
}
