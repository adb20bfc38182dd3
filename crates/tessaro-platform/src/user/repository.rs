//! User Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, bson::Document, Collection, Database};
use tracing::warn;

use super::entity::User;
use crate::shared::error::Result;

pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    pub async fn insert(&self, user: &User) -> Result<()> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    /// Fetch every user, best-effort: a stored document that no longer
    /// decodes is dropped from the result with a warning rather than
    /// failing the whole listing.
    pub async fn find_all(&self) -> Result<Vec<User>> {
        let raw = self.collection.clone_with_type::<Document>();
        let mut cursor = raw.find(doc! {}).await?;

        let mut users = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            let id = document.get_str("_id").unwrap_or("<unknown>").to_string();
            match bson::from_document::<User>(document) {
                Ok(user) => users.push(user),
                Err(err) => {
                    warn!(user_id = %id, error = %err, "skipping malformed user document");
                }
            }
        }
        Ok(users)
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

    /// Pull a deleted organization id out of every user's membership list.
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
