//! Credential Repository

use chrono::Utc;
use mongodb::options::UpdateOptions;
use mongodb::{bson::doc, Collection, Database};

use super::entity::UserCredential;
use crate::shared::error::Result;

pub struct CredentialRepository {
    collection: Collection<UserCredential>,
}

impl CredentialRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("user_credentials"),
        }
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserCredential>> {
        Ok(self.collection.find_one(doc! { "_id": user_id }).await?)
    }

    /// Upsert the credential for a user; `created_at` is written only on
    /// first insert.
    pub async fn upsert(&self, user_id: &str, password_hash: &str, salt: &str) -> Result<()> {
        let now = mongodb::bson::DateTime::from_chrono(Utc::now());
        self.collection
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$set": {
                        "user_id": user_id,
                        "password_hash": password_hash,
                        "salt": salt,
                        "updated_at": now,
                    },
                    "$setOnInsert": { "created_at": now },
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await?;
        Ok(())
    }
}
