//! Pulpit server binary
//!
//! Reads `PULPIT_CONFIG` plus environment overrides, picks the storage
//! backend and serves the content API.

use anyhow::Result;
use pulpit::config::{ServerConfig, StorageBackend};
use pulpit::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pulpit=debug,tower_http=info")),
        )
        .init();

    let config = ServerConfig::load()?;
    tracing::info!(
        backend = ?config.storage.backend,
        prefix = %config.api_prefix,
        upload_dir = %config.upload_dir.display(),
        "Starting pulpit"
    );

    let builder = match config.storage.backend {
        StorageBackend::Memory => ServerBuilder::new()
            .register::<Sermon>(InMemoryDataService::new())
            .register::<Devotion>(InMemoryDataService::new())
            .register::<GalleryImage>(InMemoryDataService::new()),
        StorageBackend::Mongodb => mongodb_builder(&config).await?,
    };

    builder
        .with_config(&config)
        .serve(&config.bind_address())
        .await
}

#[cfg(feature = "mongodb_backend")]
async fn mongodb_builder(config: &ServerConfig) -> Result<ServerBuilder> {
    use pulpit::storage::mongodb::connect;

    let database = connect(&config.storage.uri, &config.storage.database).await?;
    tracing::info!(database = %config.storage.database, "Connected to MongoDB");

    let sermons = MongoDataService::<Sermon>::new(database.clone());
    let devotions = MongoDataService::<Devotion>::new(database.clone());
    let gallery = MongoDataService::<GalleryImage>::new(database);
    sermons.ensure_indexes().await?;
    devotions.ensure_indexes().await?;
    gallery.ensure_indexes().await?;

    Ok(ServerBuilder::new()
        .register::<Sermon>(sermons)
        .register::<Devotion>(devotions)
        .register::<GalleryImage>(gallery))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn mongodb_builder(_config: &ServerConfig) -> Result<ServerBuilder> {
    anyhow::bail!("MongoDB storage requested but pulpit was built without the `mongodb_backend` feature")
}
