use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use model::entities::{application, land_parcel, user};
use sea_orm::{ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::{parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for submitting an application
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateApplicationRequest {
    pub parcel_id: i32,
    /// "change_use", "subdivision", "consolidation" or "lease"
    pub application_type: String,
    /// Staff may file on behalf of another user; defaults to the caller
    pub applicant_id: Option<i32>,
}

/// Request body for updating an application
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateApplicationRequest {
    /// Free-form status tag, e.g. "submitted", "in_review", "closed"
    pub status: Option<String>,
}

/// Application response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: i32,
    pub applicant_id: i32,
    pub parcel_id: i32,
    pub application_type: String,
    pub submitted_date: NaiveDate,
    pub status: String,
}

impl From<application::Model> for ApplicationResponse {
    fn from(model: application::Model) -> Self {
        Self {
            id: model.id,
            applicant_id: model.applicant_id,
            parcel_id: model.parcel_id,
            application_type: model.application_type.to_value(),
            submitted_date: model.submitted_date,
            status: model.status,
        }
    }
}

/// Query parameters for listing applications
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationListQuery {
    pub parcel_id: Option<i32>,
    pub status: Option<String>,
}

/// Submit an application. Non-staff callers always file for themselves.
#[utoipa::path(
    post,
    path = "/api/v1/applications",
    tag = "applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application submitted successfully", body = ApiResponse<ApplicationResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Parcel not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationResponse>>), ApiError> {
    let application_type: application::ApplicationType =
        parse_enum(&request.application_type, "application_type")?;

    land_parcel::Entity::find_by_id(request.parcel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Parcel {} does not exist", request.parcel_id))
        })?;

    let applicant_id = match request.applicant_id {
        Some(other) if other != auth.id() => {
            auth.require_staff()?;
            user::Entity::find_by_id(other)
                .one(&state.db)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("User {other} does not exist")))?;
            other
        }
        _ => auth.id(),
    };

    let submitted = application::ActiveModel {
        applicant_id: Set(applicant_id),
        parcel_id: Set(request.parcel_id),
        application_type: Set(application_type),
        submitted_date: Set(Utc::now().date_naive()),
        status: Set("submitted".to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Application {} submitted for parcel {} by user {}",
        submitted.id, submitted.parcel_id, applicant_id
    );
    let response = ApiResponse {
        data: ApplicationResponse::from(submitted),
        message: "Application submitted successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List applications; staff see all, others their own
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    tag = "applications",
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<Vec<ApplicationResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_applications(
    auth: AuthUser,
    Query(query): Query<ApplicationListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ApplicationResponse>>>, ApiError> {
    let mut finder = application::Entity::find();
    if !auth.is_registry_staff() {
        finder = finder.filter(application::Column::ApplicantId.eq(auth.id()));
    }
    if let Some(parcel_id) = query.parcel_id {
        finder = finder.filter(application::Column::ParcelId.eq(parcel_id));
    }
    if let Some(status) = &query.status {
        finder = finder.filter(application::Column::Status.eq(status));
    }

    let applications = finder
        .order_by_desc(application::Column::SubmittedDate)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} applications", applications.len());

    let response = ApiResponse {
        data: applications
            .into_iter()
            .map(ApplicationResponse::from)
            .collect(),
        message: "Applications retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific application
#[utoipa::path(
    get,
    path = "/api/v1/applications/{application_id}",
    tag = "applications",
    params(
        ("application_id" = i32, Path, description = "Application ID"),
    ),
    responses(
        (status = 200, description = "Application retrieved successfully", body = ApiResponse<ApplicationResponse>),
        (status = 404, description = "Application not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_application(
    auth: AuthUser,
    Path(application_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ApplicationResponse>>, ApiError> {
    let app_model = application::Entity::find_by_id(application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Application {application_id} does not exist"))
        })?;

    if !auth.is_registry_staff() && app_model.applicant_id != auth.id() {
        return Err(ApiError::not_found(format!(
            "Application {application_id} does not exist"
        )));
    }

    let response = ApiResponse {
        data: ApplicationResponse::from(app_model),
        message: "Application retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an application's status (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/applications/{application_id}",
    tag = "applications",
    params(
        ("application_id" = i32, Path, description = "Application ID"),
    ),
    request_body = UpdateApplicationRequest,
    responses(
        (status = 200, description = "Application updated successfully", body = ApiResponse<ApplicationResponse>),
        (status = 404, description = "Application not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_application(
    auth: AuthUser,
    Path(application_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateApplicationRequest>,
) -> Result<Json<ApiResponse<ApplicationResponse>>, ApiError> {
    auth.require_staff()?;

    let existing = application::Entity::find_by_id(application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Application {application_id} does not exist"))
        })?;

    let mut active: application::ActiveModel = existing.into();
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    let updated = active.update(&state.db).await?;
    info!("Application {} updated successfully", application_id);

    let response = ApiResponse {
        data: ApplicationResponse::from(updated),
        message: "Application updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an application (staff only)
#[utoipa::path(
    delete,
    path = "/api/v1/applications/{application_id}",
    tag = "applications",
    params(
        ("application_id" = i32, Path, description = "Application ID"),
    ),
    responses(
        (status = 200, description = "Application deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Application not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_application(
    auth: AuthUser,
    Path(application_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_staff()?;

    let delete_result = application::Entity::delete_by_id(application_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Application {application_id} does not exist"
        )));
    }

    info!("Application {} deleted successfully", application_id);
    let response = ApiResponse {
        data: format!("Application {application_id} deleted"),
        message: "Application deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
