//! Session Repository

use mongodb::options::ReplaceOptions;
use mongodb::{bson::doc, Collection, Database};

use super::entity::Session;
use crate::shared::error::Result;

pub struct SessionRepository {
    collection: Collection<Session>,
}

impl SessionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("sessions"),
        }
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> Result<Option<Session>> {
        Ok(self.collection.find_one(doc! { "_id": token_hash }).await?)
    }

    /// Full replace-upsert keyed by token hash.
    pub async fn replace(&self, session: &Session) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &session.id }, session)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await?;
        Ok(())
    }

    pub async fn delete(&self, token_hash: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": token_hash }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    // Repository tests require MongoDB connection
    // These would typically be integration tests
}
