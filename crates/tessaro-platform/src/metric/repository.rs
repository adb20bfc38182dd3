//! Metric Repository
//!
//! Upsert-centric access keyed by (key, kind). The unique compound index
//! makes concurrent upserts converge on one document.

use chrono::Utc;
use mongodb::bson::{doc, Bson};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument, UpdateOptions};
use mongodb::{Collection, Database};

use super::entity::{Metric, MetricKind};
use crate::shared::error::{ApiError, Result};

pub struct MetricRepository {
    collection: Collection<Metric>,
}

impl MetricRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("metrics"),
        }
    }

    pub async fn find(&self, key: &str, kind: MetricKind) -> Result<Option<Metric>> {
        Ok(self
            .collection
            .find_one(doc! { "key": key, "kind": kind.as_str() })
            .await?)
    }

    /// Atomic increment-or-create returning the post-increment document.
    pub async fn increment(&self, key: &str) -> Result<Metric> {
        let now = mongodb::bson::DateTime::from_chrono(Utc::now());
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "key": key, "kind": MetricKind::Number.as_str() },
                doc! {
                    "$inc": { "value": 1 },
                    "$set": { "updated_at": now },
                    "$setOnInsert": { "created_at": now },
                },
            )
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .upsert(true)
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await?;

        updated.ok_or_else(|| ApiError::internal("metric upsert returned no document"))
    }

    /// Full set of a number metric (not an increment).
    pub async fn set_number(&self, key: &str, value: i64) -> Result<()> {
        self.upsert_value(key, MetricKind::Number, Bson::Int64(value))
            .await
    }

    pub async fn set_timestamp(&self, key: &str, value: Option<String>) -> Result<()> {
        let value = match value {
            Some(text) => Bson::String(text),
            None => Bson::Null,
        };
        self.upsert_value(key, MetricKind::Timestamp, value).await
    }

    async fn upsert_value(&self, key: &str, kind: MetricKind, value: Bson) -> Result<()> {
        let now = mongodb::bson::DateTime::from_chrono(Utc::now());
        self.collection
            .update_one(
                doc! { "key": key, "kind": kind.as_str() },
                doc! {
                    "$set": { "value": value, "updated_at": now },
                    "$setOnInsert": { "created_at": now },
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Repository tests require MongoDB connection
    // These would typically be integration tests
}
