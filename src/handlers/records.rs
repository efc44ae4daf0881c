use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use model::entities::{land_parcel, owner_profile, ownership_record};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::{parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating an ownership record
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateOwnershipRecordRequest {
    pub parcel_id: i32,
    pub owner_id: i32,
    /// "Sole", "Joint", "Co-owner", "Leasehold", "Mortgage", "Easement"
    /// or "Power_of_Attorney" (default: "Sole")
    pub ownership_type: Option<String>,
    /// Share in percent, (0, 100]; defaults to 100
    pub ownership_percentage: Option<Decimal>,
    /// "Purchase", "Inheritance", "Gift", "Government_Allocation",
    /// "Auction", "Exchange", "Court_Order" or "Partition" (default: "Purchase")
    pub acquisition_type: Option<String>,
    pub acquisition_date: NaiveDate,
    pub acquisition_value: Option<Decimal>,
    pub deed_number: Option<String>,
    pub deed_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub registrar_office: Option<String>,
    pub stamp_duty_paid: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub lease_amount: Option<Decimal>,
    pub mortgage_amount: Option<Decimal>,
    pub mortgagee_name: Option<String>,
    pub history_notes: Option<String>,
}

/// Request body for updating an ownership record. Current-owner state and
/// verification status deliberately have no fields here; they only change
/// through the transfer and verify operations.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateOwnershipRecordRequest {
    pub ownership_type: Option<String>,
    pub ownership_percentage: Option<Decimal>,
    pub acquisition_value: Option<Decimal>,
    pub deed_number: Option<String>,
    pub deed_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub registrar_office: Option<String>,
    pub stamp_duty_paid: Option<Decimal>,
    pub mortgagee_name: Option<String>,
    pub history_notes: Option<String>,
}

/// Request body for the atomic ownership transfer
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TransferOwnershipRequest {
    /// The current record being closed
    pub record_id: i32,
    /// The owner profile receiving the share
    pub to_owner_id: i32,
    /// "Sale", "Gift", "Inheritance", "Foreclosure" or "Surrender"
    pub transfer_type: String,
    /// Defaults to today
    pub transfer_date: Option<NaiveDate>,
    /// Share to hand over; defaults to the full share of the source record
    pub percentage: Option<Decimal>,
    pub transfer_value: Option<Decimal>,
    pub notes: Option<String>,
}

/// Request body for a verification transition
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyRecordRequest {
    /// Target status: "Pending", "Verified", "Rejected", "Under_Review"
    /// or "Disputed"
    pub status: String,
    pub notes: Option<String>,
}

/// Ownership record response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnershipRecordResponse {
    pub id: i32,
    pub parcel_id: i32,
    pub owner_id: i32,
    pub ownership_type: String,
    pub ownership_percentage: Decimal,
    pub acquisition_type: String,
    pub acquisition_date: NaiveDate,
    pub acquisition_value: Option<Decimal>,
    pub deed_number: Option<String>,
    pub deed_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub registrar_office: Option<String>,
    pub stamp_duty_paid: Option<Decimal>,
    pub transfer_date: Option<NaiveDate>,
    pub transfer_type: Option<String>,
    pub transfer_to: Option<i32>,
    pub verification_status: String,
    pub verified_by: Option<i32>,
    pub verification_date: Option<NaiveDate>,
    pub verification_notes: Option<String>,
    pub is_current_owner: bool,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub history_notes: Option<String>,
}

impl From<ownership_record::Model> for OwnershipRecordResponse {
    fn from(model: ownership_record::Model) -> Self {
        Self {
            id: model.id,
            parcel_id: model.parcel_id,
            owner_id: model.owner_id,
            ownership_type: model.ownership_type.to_value(),
            ownership_percentage: model.ownership_percentage,
            acquisition_type: model.acquisition_type.to_value(),
            acquisition_date: model.acquisition_date,
            acquisition_value: model.acquisition_value,
            deed_number: model.deed_number,
            deed_date: model.deed_date,
            registration_number: model.registration_number,
            registration_date: model.registration_date,
            registrar_office: model.registrar_office,
            stamp_duty_paid: model.stamp_duty_paid,
            transfer_date: model.transfer_date,
            transfer_type: model.transfer_type.map(|t| t.to_value()),
            transfer_to: model.transfer_to,
            verification_status: model.verification_status.to_value(),
            verified_by: model.verified_by,
            verification_date: model.verification_date,
            verification_notes: model.verification_notes,
            is_current_owner: model.is_current_owner,
            created_by: model.created_by,
            created_at: model.created_at,
            history_notes: model.history_notes,
        }
    }
}

/// The two sides of a committed transfer
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferResponse {
    pub closed: OwnershipRecordResponse,
    pub opened: OwnershipRecordResponse,
}

/// Query parameters for listing ownership records
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordListQuery {
    pub owner_id: Option<i32>,
    pub parcel_id: Option<i32>,
    /// When true, restrict to current records
    pub current_only: Option<bool>,
    pub verification_status: Option<String>,
}

/// Query parameters for the history endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryQuery {
    pub owner_id: Option<i32>,
    pub parcel_id: Option<i32>,
}

fn wrap(records: Vec<ownership_record::Model>, message: &str) -> Json<ApiResponse<Vec<OwnershipRecordResponse>>> {
    Json(ApiResponse {
        data: records.into_iter().map(OwnershipRecordResponse::from).collect(),
        message: message.to_string(),
        success: true,
    })
}

/// The caller's owner profile id, or an empty marker for non-staff users
/// without a profile.
async fn scope_owner_id(auth: &AuthUser, state: &AppState) -> Result<Option<Option<i32>>, ApiError> {
    if auth.is_registry_staff() {
        return Ok(None);
    }
    let profile = auth.owner_profile(&state.db).await?;
    Ok(Some(profile.map(|p| p.id)))
}

/// Validates that a new or resized share keeps the parcel's current total
/// within 100 percent.
async fn check_share_fits(
    state: &AppState,
    parcel_id: i32,
    percentage: Decimal,
    exclude_record: Option<i32>,
) -> Result<(), ApiError> {
    if percentage <= Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(ApiError::validation(format!(
            "ownership_percentage {percentage} is outside (0, 100]"
        )));
    }
    let available = registry::ownership::available_share(&state.db, parcel_id, exclude_record).await?;
    if percentage > available {
        return Err(ApiError::validation(format!(
            "ownership_percentage {percentage} exceeds the available share of {available} on parcel {parcel_id}"
        )));
    }
    Ok(())
}

/// List ownership records with filters, scoped by role
#[utoipa::path(
    get,
    path = "/api/v1/ownership-records",
    tag = "ownership-records",
    responses(
        (status = 200, description = "Ownership records retrieved successfully", body = ApiResponse<Vec<OwnershipRecordResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_records(
    auth: AuthUser,
    Query(query): Query<RecordListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OwnershipRecordResponse>>>, ApiError> {
    let mut finder = ownership_record::Entity::find();

    match scope_owner_id(&auth, &state).await? {
        Some(Some(own_id)) => {
            finder = finder.filter(ownership_record::Column::OwnerId.eq(own_id));
        }
        Some(None) => return Ok(wrap(Vec::new(), "Ownership records retrieved successfully")),
        None => {}
    }

    if let Some(owner_id) = query.owner_id {
        finder = finder.filter(ownership_record::Column::OwnerId.eq(owner_id));
    }
    if let Some(parcel_id) = query.parcel_id {
        finder = finder.filter(ownership_record::Column::ParcelId.eq(parcel_id));
    }
    if query.current_only.unwrap_or(false) {
        finder = finder.filter(ownership_record::Column::IsCurrentOwner.eq(true));
    }
    if let Some(raw) = &query.verification_status {
        let status: ownership_record::VerificationStatus = parse_enum(raw, "verification_status")?;
        finder = finder.filter(ownership_record::Column::VerificationStatus.eq(status));
    }

    let records = finder
        .order_by_desc(ownership_record::Column::AcquisitionDate)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} ownership records", records.len());
    Ok(wrap(records, "Ownership records retrieved successfully"))
}

/// All current ownership records, scoped by role
#[utoipa::path(
    get,
    path = "/api/v1/ownership-records/current_owners",
    tag = "ownership-records",
    responses(
        (status = 200, description = "Current ownership records", body = ApiResponse<Vec<OwnershipRecordResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_current_owners(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OwnershipRecordResponse>>>, ApiError> {
    let mut finder = ownership_record::Entity::find()
        .filter(ownership_record::Column::IsCurrentOwner.eq(true));

    match scope_owner_id(&auth, &state).await? {
        Some(Some(own_id)) => {
            finder = finder.filter(ownership_record::Column::OwnerId.eq(own_id));
        }
        Some(None) => return Ok(wrap(Vec::new(), "Current ownership records retrieved")),
        None => {}
    }

    let records = finder
        .order_by_desc(ownership_record::Column::AcquisitionDate)
        .all(&state.db)
        .await?;
    Ok(wrap(records, "Current ownership records retrieved"))
}

/// Ownership history of one owner; `owner_id` is required
#[utoipa::path(
    get,
    path = "/api/v1/ownership-records/owner_history",
    tag = "ownership-records",
    params(
        ("owner_id" = i32, Query, description = "Owner profile ID"),
    ),
    responses(
        (status = 200, description = "Ownership history of the owner", body = ApiResponse<Vec<OwnershipRecordResponse>>),
        (status = 400, description = "owner_id parameter missing", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_owner_history(
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OwnershipRecordResponse>>>, ApiError> {
    let owner_id = query
        .owner_id
        .ok_or_else(|| ApiError::validation("owner_id parameter is required"))?;

    if let Some(own) = scope_owner_id(&auth, &state).await? {
        if own != Some(owner_id) {
            return Err(ApiError::Forbidden);
        }
    }

    let records = registry::ownership::owner_history(&state.db, owner_id).await?;
    Ok(wrap(records, "Owner history retrieved successfully"))
}

/// Ownership history of one parcel; `parcel_id` is required
#[utoipa::path(
    get,
    path = "/api/v1/ownership-records/parcel_history",
    tag = "ownership-records",
    params(
        ("parcel_id" = i32, Query, description = "Parcel ID"),
    ),
    responses(
        (status = 200, description = "Ownership history of the parcel", body = ApiResponse<Vec<OwnershipRecordResponse>>),
        (status = 400, description = "parcel_id parameter missing", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_parcel_history(
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OwnershipRecordResponse>>>, ApiError> {
    let parcel_id = query
        .parcel_id
        .ok_or_else(|| ApiError::validation("parcel_id parameter is required"))?;

    if let Some(own) = scope_owner_id(&auth, &state).await? {
        let owned = match own {
            Some(owner_id) => registry::ownership::owned_parcel_ids(&state.db, owner_id).await?,
            None => Vec::new(),
        };
        if !owned.contains(&parcel_id) {
            return Err(ApiError::Forbidden);
        }
    }

    let records = registry::ownership::parcel_history(&state.db, parcel_id).await?;
    Ok(wrap(records, "Parcel history retrieved successfully"))
}

/// Get a specific ownership record
#[utoipa::path(
    get,
    path = "/api/v1/ownership-records/{record_id}",
    tag = "ownership-records",
    params(
        ("record_id" = i32, Path, description = "Ownership record ID"),
    ),
    responses(
        (status = 200, description = "Ownership record retrieved successfully", body = ApiResponse<OwnershipRecordResponse>),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_record(
    auth: AuthUser,
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OwnershipRecordResponse>>, ApiError> {
    let record = ownership_record::Entity::find_by_id(record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Ownership record {record_id} does not exist")))?;

    if let Some(own) = scope_owner_id(&auth, &state).await? {
        if own != Some(record.owner_id) {
            warn!(
                "User {} denied access to ownership record {}",
                auth.user.username, record_id
            );
            return Err(ApiError::not_found(format!(
                "Ownership record {record_id} does not exist"
            )));
        }
    }

    let response = ApiResponse {
        data: OwnershipRecordResponse::from(record),
        message: "Ownership record retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Create an ownership record (staff only). The share must fit in the
/// parcel's remaining percentage.
#[utoipa::path(
    post,
    path = "/api/v1/ownership-records",
    tag = "ownership-records",
    request_body = CreateOwnershipRecordRequest,
    responses(
        (status = 201, description = "Ownership record created successfully", body = ApiResponse<OwnershipRecordResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Parcel or owner not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateOwnershipRecordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OwnershipRecordResponse>>), ApiError> {
    auth.require_staff()?;

    land_parcel::Entity::find_by_id(request.parcel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Parcel {} does not exist", request.parcel_id))
        })?;
    owner_profile::Entity::find_by_id(request.owner_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Owner profile {} does not exist", request.owner_id))
        })?;

    let ownership_type: ownership_record::OwnershipType = match request.ownership_type.as_deref() {
        Some(raw) => parse_enum(raw, "ownership_type")?,
        None => ownership_record::OwnershipType::Sole,
    };
    let acquisition_type: ownership_record::AcquisitionType =
        match request.acquisition_type.as_deref() {
            Some(raw) => parse_enum(raw, "acquisition_type")?,
            None => ownership_record::AcquisitionType::Purchase,
        };
    let percentage = request.ownership_percentage.unwrap_or(Decimal::ONE_HUNDRED);

    check_share_fits(&state, request.parcel_id, percentage, None).await?;

    let record = ownership_record::ActiveModel {
        parcel_id: Set(request.parcel_id),
        owner_id: Set(request.owner_id),
        ownership_type: Set(ownership_type),
        ownership_percentage: Set(percentage),
        acquisition_type: Set(acquisition_type),
        acquisition_date: Set(request.acquisition_date),
        acquisition_value: Set(request.acquisition_value),
        deed_number: Set(request.deed_number.clone()),
        deed_date: Set(request.deed_date),
        registration_number: Set(request.registration_number.clone()),
        registration_date: Set(request.registration_date),
        registrar_office: Set(request.registrar_office.clone()),
        stamp_duty_paid: Set(request.stamp_duty_paid),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        lease_amount: Set(request.lease_amount),
        mortgage_amount: Set(request.mortgage_amount),
        mortgagee_name: Set(request.mortgagee_name.clone()),
        verification_status: Set(ownership_record::VerificationStatus::Pending),
        is_current_owner: Set(true),
        created_by: Set(Some(auth.id())),
        history_notes: Set(request.history_notes.clone()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Ownership record {} created: parcel {}, owner {}, {}%",
        record.id, record.parcel_id, record.owner_id, record.ownership_percentage
    );
    let response = ApiResponse {
        data: OwnershipRecordResponse::from(record),
        message: "Ownership record created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update an ownership record (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/ownership-records/{record_id}",
    tag = "ownership-records",
    params(
        ("record_id" = i32, Path, description = "Ownership record ID"),
    ),
    request_body = UpdateOwnershipRecordRequest,
    responses(
        (status = 200, description = "Ownership record updated successfully", body = ApiResponse<OwnershipRecordResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_record(
    auth: AuthUser,
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateOwnershipRecordRequest>,
) -> Result<Json<ApiResponse<OwnershipRecordResponse>>, ApiError> {
    auth.require_staff()?;

    let existing = ownership_record::Entity::find_by_id(record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Ownership record {record_id} does not exist")))?;

    let ownership_type = match request.ownership_type.as_deref() {
        Some(raw) => Some(parse_enum::<ownership_record::OwnershipType>(
            raw,
            "ownership_type",
        )?),
        None => None,
    };
    if let Some(percentage) = request.ownership_percentage {
        // A historical record's share is frozen; only current shares can
        // be resized, and only within the parcel's remaining capacity.
        if !existing.is_current_owner {
            return Err(ApiError::validation(
                "Cannot change the share of a historical ownership record",
            ));
        }
        check_share_fits(&state, existing.parcel_id, percentage, Some(existing.id)).await?;
    }

    let mut active: ownership_record::ActiveModel = existing.into();
    if let Some(ownership_type) = ownership_type {
        active.ownership_type = Set(ownership_type);
    }
    if let Some(percentage) = request.ownership_percentage {
        active.ownership_percentage = Set(percentage);
    }
    if let Some(value) = request.acquisition_value {
        active.acquisition_value = Set(Some(value));
    }
    if let Some(deed_number) = request.deed_number {
        active.deed_number = Set(Some(deed_number));
    }
    if let Some(deed_date) = request.deed_date {
        active.deed_date = Set(Some(deed_date));
    }
    if let Some(registration_number) = request.registration_number {
        active.registration_number = Set(Some(registration_number));
    }
    if let Some(registration_date) = request.registration_date {
        active.registration_date = Set(Some(registration_date));
    }
    if let Some(registrar_office) = request.registrar_office {
        active.registrar_office = Set(Some(registrar_office));
    }
    if let Some(stamp_duty_paid) = request.stamp_duty_paid {
        active.stamp_duty_paid = Set(Some(stamp_duty_paid));
    }
    if let Some(mortgagee_name) = request.mortgagee_name {
        active.mortgagee_name = Set(Some(mortgagee_name));
    }
    if let Some(history_notes) = request.history_notes {
        active.history_notes = Set(Some(history_notes));
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active.update(&state.db).await?;
    info!("Ownership record {} updated successfully", record_id);

    let response = ApiResponse {
        data: OwnershipRecordResponse::from(updated),
        message: "Ownership record updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an ownership record (staff only)
#[utoipa::path(
    delete,
    path = "/api/v1/ownership-records/{record_id}",
    tag = "ownership-records",
    params(
        ("record_id" = i32, Path, description = "Ownership record ID"),
    ),
    responses(
        (status = 200, description = "Ownership record deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_record(
    auth: AuthUser,
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_staff()?;

    let delete_result = ownership_record::Entity::delete_by_id(record_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Ownership record {record_id} does not exist"
        )));
    }

    info!("Ownership record {} deleted successfully", record_id);
    let response = ApiResponse {
        data: format!("Ownership record {record_id} deleted"),
        message: "Ownership record deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Atomically transfer ownership to another owner (staff only).
/// Closes the source record and opens the successor in one transaction.
#[utoipa::path(
    post,
    path = "/api/v1/ownership-records/transfer",
    tag = "ownership-records",
    request_body = TransferOwnershipRequest,
    responses(
        (status = 200, description = "Transfer committed", body = ApiResponse<TransferResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Record or receiving owner not found", body = ErrorResponse),
        (status = 409, description = "Record is already historical", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn transfer_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<TransferOwnershipRequest>,
) -> Result<Json<ApiResponse<TransferResponse>>, ApiError> {
    auth.require_staff()?;

    let transfer_type: ownership_record::TransferType =
        parse_enum(&request.transfer_type, "transfer_type")?;

    let outcome = registry::transfer::transfer_ownership(
        &state.db,
        registry::transfer::TransferRequest {
            record_id: request.record_id,
            to_owner_id: request.to_owner_id,
            transfer_type,
            transfer_date: request.transfer_date.unwrap_or_else(|| Utc::now().date_naive()),
            percentage: request.percentage,
            transfer_value: request.transfer_value,
            created_by: Some(auth.id()),
            notes: request.notes.clone(),
        },
    )
    .await?;

    info!(
        "Ownership record {} transferred to owner {} as record {}",
        outcome.closed.id, outcome.opened.owner_id, outcome.opened.id
    );
    let response = ApiResponse {
        data: TransferResponse {
            closed: OwnershipRecordResponse::from(outcome.closed),
            opened: OwnershipRecordResponse::from(outcome.opened),
        },
        message: "Ownership transferred successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Apply a verification transition to a record (staff only)
#[utoipa::path(
    post,
    path = "/api/v1/ownership-records/{record_id}/verify",
    tag = "ownership-records",
    params(
        ("record_id" = i32, Path, description = "Ownership record ID"),
    ),
    request_body = VerifyRecordRequest,
    responses(
        (status = 200, description = "Verification status updated", body = ApiResponse<OwnershipRecordResponse>),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn verify_record(
    auth: AuthUser,
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<VerifyRecordRequest>,
) -> Result<Json<ApiResponse<OwnershipRecordResponse>>, ApiError> {
    auth.require_staff()?;

    let status: ownership_record::VerificationStatus = parse_enum(&request.status, "status")?;
    let updated = registry::verification::apply_verification(
        &state.db,
        record_id,
        status,
        Some(auth.id()),
        request.notes.clone(),
        Utc::now().date_naive(),
    )
    .await?;

    let response = ApiResponse {
        data: OwnershipRecordResponse::from(updated),
        message: "Verification status updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
