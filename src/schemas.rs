use std::sync::Arc;

use common::{CurrentOwnerEntry, DashboardStats, ParcelStats, RecentActivity, UserDistribution};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::records::{
    OwnershipRecordResponse, TransferOwnershipRequest, TransferResponse, VerifyRecordRequest,
};
use crate::storage::BlobStore;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive aggregations
    pub cache: Cache<String, CachedData>,
    /// Destination for uploaded files
    pub blobs: Arc<dyn BlobStore>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Dashboard(DashboardStats),
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::dashboard::dashboard_stats,
        crate::handlers::parcels::get_parcel_owners,
        crate::handlers::parcels::get_my_parcels,
        crate::handlers::records::get_current_owners,
        crate::handlers::records::get_owner_history,
        crate::handlers::records::get_parcel_history,
        crate::handlers::records::transfer_record,
        crate::handlers::records::verify_record,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ApiResponse<DashboardStats>,
            ApiResponse<Vec<CurrentOwnerEntry>>,
            ApiResponse<TransferResponse>,
            ApiResponse<Vec<OwnershipRecordResponse>>,
            OwnershipRecordResponse,
            TransferResponse,
            TransferOwnershipRequest,
            VerifyRecordRequest,
            DashboardStats,
            UserDistribution,
            RecentActivity,
            CurrentOwnerEntry,
            ParcelStats,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User administration"),
        (name = "owners", description = "Owner profile endpoints"),
        (name = "parcels", description = "Land parcel endpoints"),
        (name = "ownership-records", description = "Ownership record and derivation endpoints"),
        (name = "documents", description = "Document endpoints"),
        (name = "applications", description = "Application workflow endpoints"),
        (name = "dashboard", description = "Dashboard statistics"),
    ),
    info(
        title = "LandRust API",
        description = "Land registry record keeping API - parcels, owners and ownership history",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
