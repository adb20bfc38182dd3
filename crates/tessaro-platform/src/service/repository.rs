//! Service Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, bson::Document, Collection, Database};

use super::entity::Service;
use crate::shared::error::Result;

pub struct ServiceRepository {
    collection: Collection<Service>,
}

impl ServiceRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("services"),
        }
    }

    pub async fn insert(&self, service: &Service) -> Result<()> {
        self.collection.insert_one(service).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Service>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<Service>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Services assigned to any of the given organizations.
    pub async fn find_by_organization_ids(&self, ids: &[String]) -> Result<Vec<Service>> {
        let cursor = self
            .collection
            .find(doc! { "organization_ids": { "$in": ids } })
            .await?;
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

    /// Pull a deleted organization id out of every service's assignment
    /// list.
    pub async fn remove_organization(&self, organization_id: &str) -> Result<u64> {
        let result = self
            .collection
            .update_many(
                doc! {},
                doc! { "$pull": { "organization_ids": organization_id } },
            )
            .await?;
        Ok(result.modified_count)
    }
}

#[cfg(test)]
mod tests {
    // Repository tests require MongoDB connection
    // These would typically be integration tests
}
