//! Organization Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, bson::Document, Collection, Database};

use super::entity::Organization;
use crate::shared::error::Result;

pub struct OrganizationRepository {
    collection: Collection<Organization>,
}

impl OrganizationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("organizations"),
        }
    }

    pub async fn insert(&self, organization: &Organization) -> Result<()> {
        self.collection.insert_one(organization).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Organization>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Organization>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.collection.find(doc! { "_id": { "$in": ids } }).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_all(&self) -> Result<Vec<Organization>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    /// Apply a staged partial update.
    pub async fn update_fields(&self, id: &str, updates: Document) -> Result<()> {
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": updates })
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
