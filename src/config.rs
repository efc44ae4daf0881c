use anyhow::Result;
use moka::future::Cache;
use sea_orm::Database;
use std::sync::Arc;
use std::time::Duration;

use crate::schemas::AppState;
use crate::storage::LocalBlobStore;

/// Initialize application configuration and state
pub async fn initialize_app_state() -> Result<AppState> {
    // Load configuration
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://landrust.db".to_string());
    initialize_app_state_with_url(&database_url).await
}

/// Initialize application state against a specific database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Initialize cache for the dashboard aggregation
    let cache = Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes
        .build();

    // Uploaded files land in the media root; the returned URLs are served
    // by whatever fronts this service.
    let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
    let blobs = Arc::new(LocalBlobStore::new(media_root));

    Ok(AppState { db, cache, blobs })
}

/// Get bind address from environment or use default
pub fn get_bind_address() -> String {
    std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
