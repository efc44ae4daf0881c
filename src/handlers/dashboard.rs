use axum::{extract::State, response::Json};
use common::{DashboardStats, RecentActivity, UserDistribution};
use model::entities::{land_parcel, owner_profile, user};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{debug, error, instrument};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};

const DASHBOARD_CACHE_KEY: &str = "dashboard_stats";

/// Computes the staff-level dashboard aggregate. Any failure here is
/// surfaced to the caller as a generic server error; the cause only goes
/// to the log.
async fn compute_dashboard_stats(state: &AppState) -> Result<DashboardStats, ApiError> {
    let db = &state.db;

    // User statistics
    let total_users = user::Entity::find().count(db).await?;
    let owners = user::Entity::find()
        .filter(user::Column::Role.eq(user::Role::Owner))
        .count(db)
        .await?;
    let officers = user::Entity::find()
        .filter(user::Column::Role.eq(user::Role::Officer))
        .count(db)
        .await?;
    let admins = user::Entity::find()
        .filter(user::Column::Role.eq(user::Role::Admin))
        .count(db)
        .await?;

    // Owner statistics
    let total_owners = owner_profile::Entity::find().count(db).await?;

    // Land statistics
    let total_lands = land_parcel::Entity::find().count(db).await?;
    let active_lands = land_parcel::Entity::find()
        .filter(land_parcel::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let inactive_lands = land_parcel::Entity::find()
        .filter(land_parcel::Column::IsActive.eq(false))
        .count(db)
        .await?;

    // Total land value; parcels without an assessed value count as zero
    let values: Vec<Option<Decimal>> = land_parcel::Entity::find()
        .select_only()
        .column(land_parcel::Column::CurrentMarketValue)
        .into_tuple()
        .all(db)
        .await?;
    let land_value = values
        .into_iter()
        .flatten()
        .fold(Decimal::ZERO, |acc, value| acc + value);

    // Recent activity: the five most recently registered owners
    let recent_owners = owner_profile::Entity::find()
        .order_by_desc(owner_profile::Column::CreatedAt)
        .limit(5)
        .all(db)
        .await?;
    let recent_activities = recent_owners
        .iter()
        .map(|owner| RecentActivity::owner_registration(owner.id, &owner.full_name()))
        .collect();

    Ok(DashboardStats {
        total_users,
        total_owners,
        total_lands,
        active_lands,
        inactive_lands,
        pending_lands: 0,
        land_value,
        user_distribution: UserDistribution {
            owners,
            officers,
            admins,
        },
        owners_with_profiles: total_owners,
        total_registered_owners: owners,
        recent_activities,
    })
}

/// Dashboard statistics. Requires an authenticated identity of any role;
/// the role decides the content: staff get the real aggregate, everyone
/// else gets the all-zero payload rather than a permission error.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/dashboard-stats",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Missing or invalid identity", body = ErrorResponse),
        (status = 500, description = "Aggregation failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn dashboard_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    if !auth.is_registry_staff() {
        debug!(
            "Soft-denying dashboard stats for non-staff user {}",
            auth.user.username
        );
        return Ok(Json(ApiResponse {
            data: DashboardStats::default(),
            message: "Dashboard statistics retrieved successfully".to_string(),
            success: true,
        }));
    }

    // Check cache first
    if let Some(CachedData::Dashboard(stats)) = state.cache.get(DASHBOARD_CACHE_KEY).await {
        return Ok(Json(ApiResponse {
            data: stats,
            message: "Dashboard statistics retrieved from cache".to_string(),
            success: true,
        }));
    }

    let stats = compute_dashboard_stats(&state).await.map_err(|err| {
        error!("Dashboard aggregation failed: {}", err);
        ApiError::Internal
    })?;

    state
        .cache
        .insert(
            DASHBOARD_CACHE_KEY.to_string(),
            CachedData::Dashboard(stats.clone()),
        )
        .await;

    Ok(Json(ApiResponse {
        data: stats,
        message: "Dashboard statistics retrieved successfully".to_string(),
        success: true,
    }))
}
