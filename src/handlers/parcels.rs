use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::{CurrentOwnerEntry, ParcelStats};
use model::entities::{land_parcel, owner_profile, ownership_record};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{check_valid, parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for registering a new land parcel
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateParcelRequest {
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub area: f64,
    #[validate(length(min = 1, max = 100))]
    pub cadastral_number: String,
    pub survey_number: Option<String>,
    pub block_number: Option<String>,
    pub sector_number: Option<String>,
    pub mouza_name: Option<String>,
    /// "Residential", "Commercial", "Industrial", "Agricultural", "Public" or "Mixed"
    pub land_use_zone: Option<String>,
    pub status: Option<String>,
    pub in_north: Option<String>,
    pub in_east: Option<String>,
    pub in_west: Option<String>,
    pub in_south: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub title_deed_number: Option<String>,
    pub current_market_value: Option<Decimal>,
    pub annual_tax_value: Option<Decimal>,
    /// "Undeveloped", "Under_Construction", "Developed" or "Government_Hold"
    pub development_status: Option<String>,
    pub has_structures: Option<bool>,
}

/// Request body for updating a land parcel
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateParcelRequest {
    pub location: Option<String>,
    pub area: Option<f64>,
    pub survey_number: Option<String>,
    pub block_number: Option<String>,
    pub sector_number: Option<String>,
    pub mouza_name: Option<String>,
    pub land_use_zone: Option<String>,
    pub status: Option<String>,
    pub in_north: Option<String>,
    pub in_east: Option<String>,
    pub in_west: Option<String>,
    pub in_south: Option<String>,
    pub registration_number: Option<String>,
    pub title_deed_number: Option<String>,
    pub current_market_value: Option<Decimal>,
    pub annual_tax_value: Option<Decimal>,
    pub development_status: Option<String>,
    pub has_structures: Option<bool>,
    pub is_active: Option<bool>,
}

/// Land parcel response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParcelResponse {
    pub parcel_id: i32,
    pub location: String,
    pub area: f64,
    pub cadastral_number: String,
    pub survey_number: Option<String>,
    pub block_number: Option<String>,
    pub sector_number: Option<String>,
    pub mouza_name: Option<String>,
    pub land_use_zone: Option<String>,
    pub status: String,
    pub in_north: Option<String>,
    pub in_east: Option<String>,
    pub in_west: Option<String>,
    pub in_south: Option<String>,
    pub registration_date: NaiveDate,
    pub registration_number: Option<String>,
    pub title_deed_number: Option<String>,
    pub current_market_value: Option<Decimal>,
    pub annual_tax_value: Option<Decimal>,
    pub development_status: Option<String>,
    pub has_structures: bool,
    pub is_active: bool,
}

impl From<land_parcel::Model> for ParcelResponse {
    fn from(model: land_parcel::Model) -> Self {
        Self {
            parcel_id: model.parcel_id,
            location: model.location,
            area: model.area,
            cadastral_number: model.cadastral_number,
            survey_number: model.survey_number,
            block_number: model.block_number,
            sector_number: model.sector_number,
            mouza_name: model.mouza_name,
            land_use_zone: model.land_use_zone.map(|zone| zone.to_value()),
            status: model.status,
            in_north: model.in_north,
            in_east: model.in_east,
            in_west: model.in_west,
            in_south: model.in_south,
            registration_date: model.registration_date,
            registration_number: model.registration_number,
            title_deed_number: model.title_deed_number,
            current_market_value: model.current_market_value,
            annual_tax_value: model.annual_tax_value,
            development_status: model.development_status.map(|status| status.to_value()),
            has_structures: model.has_structures,
            is_active: model.is_active,
        }
    }
}

/// Query parameters for listing parcels
#[derive(Debug, Deserialize, ToSchema)]
pub struct ParcelListQuery {
    /// Restrict to parcels currently owned by this owner profile
    pub owner: Option<i32>,
    /// Restrict to parcels currently owned by owners whose name contains
    /// this substring
    pub owner_name: Option<String>,
    pub status: Option<String>,
    pub land_use_zone: Option<String>,
    pub is_active: Option<bool>,
}

/// Parcels currently owned by owners whose name matches the substring,
/// resolved through the ownership-record join.
async fn parcel_ids_for_owner_name(
    state: &AppState,
    owner_name: &str,
) -> Result<Vec<i32>, ApiError> {
    let owner_ids: Vec<i32> = owner_profile::Entity::find()
        .select_only()
        .column(owner_profile::Column::Id)
        .filter(
            Condition::any()
                .add(owner_profile::Column::FirstName.contains(owner_name))
                .add(owner_profile::Column::MiddleName.contains(owner_name))
                .add(owner_profile::Column::LastName.contains(owner_name)),
        )
        .into_tuple()
        .all(&state.db)
        .await?;

    let parcel_ids: Vec<i32> = ownership_record::Entity::find()
        .select_only()
        .column(ownership_record::Column::ParcelId)
        .filter(ownership_record::Column::OwnerId.is_in(owner_ids))
        .filter(ownership_record::Column::IsCurrentOwner.eq(true))
        .into_tuple()
        .all(&state.db)
        .await?;
    Ok(parcel_ids)
}

/// List land parcels with owner-derivation filters, scoped by role
#[utoipa::path(
    get,
    path = "/api/v1/parcels",
    tag = "parcels",
    responses(
        (status = 200, description = "Parcels retrieved successfully", body = ApiResponse<Vec<ParcelResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_parcels(
    auth: AuthUser,
    Query(query): Query<ParcelListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ParcelResponse>>>, ApiError> {
    let mut finder = land_parcel::Entity::find();

    // Owners only ever see parcels they currently hold a share of
    if !auth.is_registry_staff() {
        let Some(profile) = auth.owner_profile(&state.db).await? else {
            return Ok(Json(ApiResponse {
                data: Vec::new(),
                message: "Parcels retrieved successfully".to_string(),
                success: true,
            }));
        };
        let owned = registry::ownership::owned_parcel_ids(&state.db, profile.id).await?;
        finder = finder.filter(land_parcel::Column::ParcelId.is_in(owned));
    }

    if let Some(owner_id) = query.owner {
        let owned = registry::ownership::owned_parcel_ids(&state.db, owner_id).await?;
        finder = finder.filter(land_parcel::Column::ParcelId.is_in(owned));
    }
    if let Some(owner_name) = &query.owner_name {
        let matching = parcel_ids_for_owner_name(&state, owner_name).await?;
        finder = finder.filter(land_parcel::Column::ParcelId.is_in(matching));
    }
    if let Some(status) = &query.status {
        finder = finder.filter(land_parcel::Column::Status.eq(status));
    }
    if let Some(zone) = &query.land_use_zone {
        let zone: land_parcel::LandUseZone = parse_enum(zone, "land_use_zone")?;
        finder = finder.filter(land_parcel::Column::LandUseZone.eq(zone));
    }
    if let Some(is_active) = query.is_active {
        finder = finder.filter(land_parcel::Column::IsActive.eq(is_active));
    }

    let parcels = finder
        .order_by_desc(land_parcel::Column::CreatedAt)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} parcels", parcels.len());

    let response = ApiResponse {
        data: parcels.into_iter().map(ParcelResponse::from).collect(),
        message: "Parcels retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Parcels currently owned by the calling user. Owner-role users without a
/// profile get an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/my-parcels",
    tag = "parcels",
    responses(
        (status = 200, description = "Owned parcels retrieved successfully", body = ApiResponse<Vec<ParcelResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_parcels(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ParcelResponse>>>, ApiError> {
    let parcels = match auth.owner_profile(&state.db).await? {
        Some(profile) => registry::ownership::owned_parcels(&state.db, profile.id).await?,
        None => Vec::new(),
    };

    let response = ApiResponse {
        data: parcels.into_iter().map(ParcelResponse::from).collect(),
        message: "Owned parcels retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Aggregate parcel statistics (staff only)
#[utoipa::path(
    get,
    path = "/api/v1/parcels/stats",
    tag = "parcels",
    responses(
        (status = 200, description = "Parcel statistics", body = ApiResponse<ParcelStats>),
        (status = 403, description = "Caller is not registry staff", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_parcel_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ParcelStats>>, ApiError> {
    auth.require_staff()?;

    let total = land_parcel::Entity::find().count(&state.db).await?;
    let active = land_parcel::Entity::find()
        .filter(land_parcel::Column::Status.eq("active"))
        .count(&state.db)
        .await?;
    let inactive = land_parcel::Entity::find()
        .filter(land_parcel::Column::Status.eq("inactive"))
        .count(&state.db)
        .await?;
    let pending = land_parcel::Entity::find()
        .filter(land_parcel::Column::Status.eq("pending"))
        .count(&state.db)
        .await?;

    let rows: Vec<(Option<Decimal>, f64)> = land_parcel::Entity::find()
        .select_only()
        .column(land_parcel::Column::CurrentMarketValue)
        .column(land_parcel::Column::Area)
        .into_tuple()
        .all(&state.db)
        .await?;
    let total_value = rows
        .iter()
        .filter_map(|(value, _)| *value)
        .fold(Decimal::ZERO, |acc, value| acc + value);
    let total_area = rows.iter().map(|(_, area)| area).sum();

    let stats = ParcelStats {
        total,
        active,
        inactive,
        pending,
        total_value,
        total_area,
    };
    Ok(Json(ApiResponse {
        data: stats,
        message: "Parcel statistics retrieved successfully".to_string(),
        success: true,
    }))
}

/// Loads a parcel and applies owner-role scoping: a non-staff caller only
/// sees parcels they currently own, everything else reads as missing.
async fn load_scoped_parcel(
    auth: &AuthUser,
    state: &AppState,
    parcel_id: i32,
) -> Result<land_parcel::Model, ApiError> {
    let parcel = land_parcel::Entity::find_by_id(parcel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Parcel {parcel_id} does not exist")))?;

    if !auth.is_registry_staff() {
        let owned = match auth.owner_profile(&state.db).await? {
            Some(profile) => registry::ownership::owned_parcel_ids(&state.db, profile.id).await?,
            None => Vec::new(),
        };
        if !owned.contains(&parcel_id) {
            warn!(
                "User {} denied access to parcel {}",
                auth.user.username, parcel_id
            );
            return Err(ApiError::not_found(format!(
                "Parcel {parcel_id} does not exist"
            )));
        }
    }
    Ok(parcel)
}

/// Get a specific parcel
#[utoipa::path(
    get,
    path = "/api/v1/parcels/{parcel_id}",
    tag = "parcels",
    params(
        ("parcel_id" = i32, Path, description = "Parcel ID"),
    ),
    responses(
        (status = 200, description = "Parcel retrieved successfully", body = ApiResponse<ParcelResponse>),
        (status = 404, description = "Parcel not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_parcel(
    auth: AuthUser,
    Path(parcel_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ParcelResponse>>, ApiError> {
    let parcel = load_scoped_parcel(&auth, &state, parcel_id).await?;

    let response = ApiResponse {
        data: ParcelResponse::from(parcel),
        message: "Parcel retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Current owners of a parcel, derived through ownership records
#[utoipa::path(
    get,
    path = "/api/v1/parcels/{parcel_id}/owners",
    tag = "parcels",
    params(
        ("parcel_id" = i32, Path, description = "Parcel ID"),
    ),
    responses(
        (status = 200, description = "Current owners of the parcel", body = ApiResponse<Vec<CurrentOwnerEntry>>),
        (status = 404, description = "Parcel not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_parcel_owners(
    auth: AuthUser,
    Path(parcel_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CurrentOwnerEntry>>>, ApiError> {
    load_scoped_parcel(&auth, &state, parcel_id).await?;

    let rows = registry::ownership::current_owners_with_profiles(&state.db, parcel_id).await?;
    let owners: Vec<CurrentOwnerEntry> = rows
        .into_iter()
        .map(|(record, owner)| CurrentOwnerEntry {
            record_id: record.id,
            owner_id: owner.id,
            national_id: owner.national_id.clone(),
            full_name: owner.full_name(),
            owner_status: owner.status.to_value(),
            ownership_type: record.ownership_type.to_value(),
            ownership_percentage: record.ownership_percentage,
            acquisition_date: record.acquisition_date,
            verification_status: record.verification_status.to_value(),
        })
        .collect();

    debug!("Parcel {} has {} current owners", parcel_id, owners.len());
    let response = ApiResponse {
        data: owners,
        message: "Current owners retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Register a new parcel (staff only)
#[utoipa::path(
    post,
    path = "/api/v1/parcels",
    tag = "parcels",
    request_body = CreateParcelRequest,
    responses(
        (status = 201, description = "Parcel created successfully", body = ApiResponse<ParcelResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is not registry staff", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_parcel(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateParcelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ParcelResponse>>), ApiError> {
    auth.require_staff()?;
    check_valid(&request)?;

    if request.area <= 0.0 {
        return Err(ApiError::validation("area must be positive"));
    }

    let land_use_zone = match request.land_use_zone.as_deref() {
        Some(raw) => Some(parse_enum::<land_parcel::LandUseZone>(raw, "land_use_zone")?),
        None => None,
    };
    let development_status = match request.development_status.as_deref() {
        Some(raw) => Some(parse_enum::<land_parcel::DevelopmentStatus>(
            raw,
            "development_status",
        )?),
        None => None,
    };

    let parcel = land_parcel::ActiveModel {
        location: Set(request.location.clone()),
        area: Set(request.area),
        cadastral_number: Set(request.cadastral_number.clone()),
        survey_number: Set(request.survey_number.clone()),
        block_number: Set(request.block_number.clone()),
        sector_number: Set(request.sector_number.clone()),
        mouza_name: Set(request.mouza_name.clone()),
        land_use_zone: Set(land_use_zone),
        status: Set(request.status.clone().unwrap_or_else(|| "active".to_string())),
        in_north: Set(request.in_north.clone()),
        in_east: Set(request.in_east.clone()),
        in_west: Set(request.in_west.clone()),
        in_south: Set(request.in_south.clone()),
        registration_date: Set(request
            .registration_date
            .unwrap_or_else(|| Utc::now().date_naive())),
        registration_number: Set(request.registration_number.clone()),
        title_deed_number: Set(request.title_deed_number.clone()),
        current_market_value: Set(request.current_market_value),
        annual_tax_value: Set(request.annual_tax_value),
        development_status: Set(development_status),
        has_structures: Set(request.has_structures.unwrap_or(false)),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Parcel created with ID: {}, cadastral number: {}",
        parcel.parcel_id, parcel.cadastral_number
    );
    let response = ApiResponse {
        data: ParcelResponse::from(parcel),
        message: "Parcel created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a parcel (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/parcels/{parcel_id}",
    tag = "parcels",
    params(
        ("parcel_id" = i32, Path, description = "Parcel ID"),
    ),
    request_body = UpdateParcelRequest,
    responses(
        (status = 200, description = "Parcel updated successfully", body = ApiResponse<ParcelResponse>),
        (status = 404, description = "Parcel not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_parcel(
    auth: AuthUser,
    Path(parcel_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateParcelRequest>,
) -> Result<Json<ApiResponse<ParcelResponse>>, ApiError> {
    auth.require_staff()?;
    check_valid(&request)?;

    let existing = land_parcel::Entity::find_by_id(parcel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Parcel {parcel_id} does not exist")))?;

    let land_use_zone = match request.land_use_zone.as_deref() {
        Some(raw) => Some(parse_enum::<land_parcel::LandUseZone>(raw, "land_use_zone")?),
        None => None,
    };
    let development_status = match request.development_status.as_deref() {
        Some(raw) => Some(parse_enum::<land_parcel::DevelopmentStatus>(
            raw,
            "development_status",
        )?),
        None => None,
    };

    let mut active: land_parcel::ActiveModel = existing.into();
    if let Some(location) = request.location {
        active.location = Set(location);
    }
    if let Some(area) = request.area {
        if area <= 0.0 {
            return Err(ApiError::validation("area must be positive"));
        }
        active.area = Set(area);
    }
    if let Some(survey_number) = request.survey_number {
        active.survey_number = Set(Some(survey_number));
    }
    if let Some(block_number) = request.block_number {
        active.block_number = Set(Some(block_number));
    }
    if let Some(sector_number) = request.sector_number {
        active.sector_number = Set(Some(sector_number));
    }
    if let Some(mouza_name) = request.mouza_name {
        active.mouza_name = Set(Some(mouza_name));
    }
    if let Some(zone) = land_use_zone {
        active.land_use_zone = Set(Some(zone));
    }
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    if let Some(in_north) = request.in_north {
        active.in_north = Set(Some(in_north));
    }
    if let Some(in_east) = request.in_east {
        active.in_east = Set(Some(in_east));
    }
    if let Some(in_west) = request.in_west {
        active.in_west = Set(Some(in_west));
    }
    if let Some(in_south) = request.in_south {
        active.in_south = Set(Some(in_south));
    }
    if let Some(registration_number) = request.registration_number {
        active.registration_number = Set(Some(registration_number));
    }
    if let Some(title_deed_number) = request.title_deed_number {
        active.title_deed_number = Set(Some(title_deed_number));
    }
    if let Some(value) = request.current_market_value {
        active.current_market_value = Set(Some(value));
    }
    if let Some(value) = request.annual_tax_value {
        active.annual_tax_value = Set(Some(value));
    }
    if let Some(status) = development_status {
        active.development_status = Set(Some(status));
    }
    if let Some(has_structures) = request.has_structures {
        active.has_structures = Set(has_structures);
    }
    if let Some(is_active) = request.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active.update(&state.db).await?;
    info!("Parcel {} updated successfully", parcel_id);

    let response = ApiResponse {
        data: ParcelResponse::from(updated),
        message: "Parcel updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a parcel (staff only); ownership records and documents cascade.
#[utoipa::path(
    delete,
    path = "/api/v1/parcels/{parcel_id}",
    tag = "parcels",
    params(
        ("parcel_id" = i32, Path, description = "Parcel ID"),
    ),
    responses(
        (status = 200, description = "Parcel deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Parcel not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_parcel(
    auth: AuthUser,
    Path(parcel_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_staff()?;

    let delete_result = land_parcel::Entity::delete_by_id(parcel_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Parcel {parcel_id} does not exist"
        )));
    }

    info!("Parcel {} deleted successfully", parcel_id);
    let response = ApiResponse {
        data: format!("Parcel {parcel_id} deleted"),
        message: "Parcel deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
