//! MongoDB Index Initialization
//!
//! Creates the uniqueness indexes for all collections on application
//! startup. Conflict handling at request time relies on these.

use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};
use tracing::info;

/// Initialize all MongoDB indexes
pub async fn initialize_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    info!("Initializing MongoDB indexes...");

    create_user_indexes(db).await?;
    create_organization_indexes(db).await?;
    create_service_indexes(db).await?;
    create_metric_indexes(db).await?;
    create_session_indexes(db).await?;
    create_credential_indexes(db).await?;

    info!("MongoDB indexes initialized successfully");
    Ok(())
}

async fn create_user_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let users = db.collection::<mongodb::bson::Document>("users");

    // Email lookup (unique)
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).background(true).build())
                .build(),
        )
        .await?;

    info!("Created indexes on users");
    Ok(())
}

async fn create_organization_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let organizations = db.collection::<mongodb::bson::Document>("organizations");

    // Name lookup (unique)
    organizations
        .create_index(
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().unique(true).background(true).build())
                .build(),
        )
        .await?;

    info!("Created indexes on organizations");
    Ok(())
}

async fn create_service_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let services = db.collection::<mongodb::bson::Document>("services");

    // Name lookup (unique)
    services
        .create_index(
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().unique(true).background(true).build())
                .build(),
        )
        .await?;

    // Membership queries
    services
        .create_index(
            IndexModel::builder()
                .keys(doc! { "organization_ids": 1 })
                .options(IndexOptions::builder().background(true).build())
                .build(),
        )
        .await?;

    info!("Created indexes on services");
    Ok(())
}

async fn create_metric_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let metrics = db.collection::<mongodb::bson::Document>("metrics");

    // Composite key: a number and a timestamp metric may share a key
    metrics
        .create_index(
            IndexModel::builder()
                .keys(doc! { "key": 1, "kind": 1 })
                .options(IndexOptions::builder().unique(true).background(true).build())
                .build(),
        )
        .await?;

    info!("Created indexes on metrics");
    Ok(())
}

async fn create_session_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let sessions = db.collection::<mongodb::bson::Document>("sessions");

    // Token hash lookup (unique)
    sessions
        .create_index(
            IndexModel::builder()
                .keys(doc! { "token_hash": 1 })
                .options(IndexOptions::builder().unique(true).background(true).build())
                .build(),
        )
        .await?;

    info!("Created indexes on sessions");
    Ok(())
}

async fn create_credential_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let credentials = db.collection::<mongodb::bson::Document>("user_credentials");

    // One credential document per user (unique)
    credentials
        .create_index(
            IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(IndexOptions::builder().unique(true).background(true).build())
                .build(),
        )
        .await?;

    info!("Created indexes on user_credentials");
    Ok(())
}
