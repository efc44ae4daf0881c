use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use model::entities::{application, approval};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for recording an approval verdict
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateApprovalRequest {
    pub application_id: i32,
    /// Free-form verdict tag, e.g. "approved", "rejected" (default: "pending")
    pub status: Option<String>,
    pub comments: Option<String>,
}

/// Request body for updating an approval
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateApprovalRequest {
    pub status: Option<String>,
    pub comments: Option<String>,
}

/// Approval response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApprovalResponse {
    pub id: i32,
    pub application_id: i32,
    pub reviewer_id: i32,
    pub status: String,
    pub comments: Option<String>,
    pub date: NaiveDate,
}

impl From<approval::Model> for ApprovalResponse {
    fn from(model: approval::Model) -> Self {
        Self {
            id: model.id,
            application_id: model.application_id,
            reviewer_id: model.reviewer_id,
            status: model.status,
            comments: model.comments,
            date: model.date,
        }
    }
}

/// Query parameters for listing approvals
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApprovalListQuery {
    pub application_id: Option<i32>,
}

/// Record an approval verdict (staff only); the reviewer is the caller.
#[utoipa::path(
    post,
    path = "/api/v1/approvals",
    tag = "applications",
    request_body = CreateApprovalRequest,
    responses(
        (status = 201, description = "Approval recorded successfully", body = ApiResponse<ApprovalResponse>),
        (status = 404, description = "Application not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_approval(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateApprovalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ApprovalResponse>>), ApiError> {
    auth.require_staff()?;

    application::Entity::find_by_id(request.application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Application {} does not exist",
                request.application_id
            ))
        })?;

    let recorded = approval::ActiveModel {
        application_id: Set(request.application_id),
        reviewer_id: Set(auth.id()),
        status: Set(request.status.clone().unwrap_or_else(|| "pending".to_string())),
        comments: Set(request.comments.clone()),
        date: Set(Utc::now().date_naive()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Approval {} recorded for application {}",
        recorded.id, recorded.application_id
    );
    let response = ApiResponse {
        data: ApprovalResponse::from(recorded),
        message: "Approval recorded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List approvals (staff only)
#[utoipa::path(
    get,
    path = "/api/v1/approvals",
    tag = "applications",
    responses(
        (status = 200, description = "Approvals retrieved successfully", body = ApiResponse<Vec<ApprovalResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_approvals(
    auth: AuthUser,
    Query(query): Query<ApprovalListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ApprovalResponse>>>, ApiError> {
    auth.require_staff()?;

    let mut finder = approval::Entity::find();
    if let Some(application_id) = query.application_id {
        finder = finder.filter(approval::Column::ApplicationId.eq(application_id));
    }
    let approvals = finder
        .order_by_desc(approval::Column::Date)
        .all(&state.db)
        .await?;

    let response = ApiResponse {
        data: approvals.into_iter().map(ApprovalResponse::from).collect(),
        message: "Approvals retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific approval (staff only)
#[utoipa::path(
    get,
    path = "/api/v1/approvals/{approval_id}",
    tag = "applications",
    params(
        ("approval_id" = i32, Path, description = "Approval ID"),
    ),
    responses(
        (status = 200, description = "Approval retrieved successfully", body = ApiResponse<ApprovalResponse>),
        (status = 404, description = "Approval not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_approval(
    auth: AuthUser,
    Path(approval_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ApprovalResponse>>, ApiError> {
    auth.require_staff()?;

    let approval_model = approval::Entity::find_by_id(approval_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Approval {approval_id} does not exist")))?;

    let response = ApiResponse {
        data: ApprovalResponse::from(approval_model),
        message: "Approval retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an approval (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/approvals/{approval_id}",
    tag = "applications",
    params(
        ("approval_id" = i32, Path, description = "Approval ID"),
    ),
    request_body = UpdateApprovalRequest,
    responses(
        (status = 200, description = "Approval updated successfully", body = ApiResponse<ApprovalResponse>),
        (status = 404, description = "Approval not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_approval(
    auth: AuthUser,
    Path(approval_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateApprovalRequest>,
) -> Result<Json<ApiResponse<ApprovalResponse>>, ApiError> {
    auth.require_staff()?;

    let existing = approval::Entity::find_by_id(approval_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Approval {approval_id} does not exist")))?;

    let mut active: approval::ActiveModel = existing.into();
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    if let Some(comments) = request.comments {
        active.comments = Set(Some(comments));
    }
    let updated = active.update(&state.db).await?;

    let response = ApiResponse {
        data: ApprovalResponse::from(updated),
        message: "Approval updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an approval (staff only)
#[utoipa::path(
    delete,
    path = "/api/v1/approvals/{approval_id}",
    tag = "applications",
    params(
        ("approval_id" = i32, Path, description = "Approval ID"),
    ),
    responses(
        (status = 200, description = "Approval deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Approval not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_approval(
    auth: AuthUser,
    Path(approval_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_staff()?;

    let delete_result = approval::Entity::delete_by_id(approval_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Approval {approval_id} does not exist"
        )));
    }

    let response = ApiResponse {
        data: format!("Approval {approval_id} deleted"),
        message: "Approval deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
