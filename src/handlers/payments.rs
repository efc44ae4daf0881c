use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use model::entities::{land_parcel, payment, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::{parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for recording a payment
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub parcel_id: i32,
    pub payer_id: i32,
    pub amount: Decimal,
    /// "tax", "fee" or "penalty"
    pub payment_type: String,
    pub payment_date: NaiveDate,
    /// Free-form status tag (default: "pending")
    pub status: Option<String>,
}

/// Request body for updating a payment
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub status: Option<String>,
    pub amount: Option<Decimal>,
}

/// Payment response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub parcel_id: i32,
    pub payer_id: i32,
    pub amount: Decimal,
    pub payment_type: String,
    pub payment_date: NaiveDate,
    pub status: String,
}

impl From<payment::Model> for PaymentResponse {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            parcel_id: model.parcel_id,
            payer_id: model.payer_id,
            amount: model.amount,
            payment_type: model.payment_type.to_value(),
            payment_date: model.payment_date,
            status: model.status,
        }
    }
}

/// Query parameters for listing payments
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentListQuery {
    pub parcel_id: Option<i32>,
    pub payment_type: Option<String>,
}

/// Record a payment (staff only)
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "applications",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded successfully", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Parcel or payer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ApiError> {
    auth.require_staff()?;

    if request.amount <= Decimal::ZERO {
        return Err(ApiError::validation("amount must be positive"));
    }
    let payment_type: payment::PaymentType = parse_enum(&request.payment_type, "payment_type")?;

    land_parcel::Entity::find_by_id(request.parcel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Parcel {} does not exist", request.parcel_id))
        })?;
    user::Entity::find_by_id(request.payer_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} does not exist", request.payer_id)))?;

    let recorded = payment::ActiveModel {
        parcel_id: Set(request.parcel_id),
        payer_id: Set(request.payer_id),
        amount: Set(request.amount),
        payment_type: Set(payment_type),
        payment_date: Set(request.payment_date),
        status: Set(request.status.clone().unwrap_or_else(|| "pending".to_string())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Payment {} of {} recorded for parcel {}",
        recorded.id, recorded.amount, recorded.parcel_id
    );
    let response = ApiResponse {
        data: PaymentResponse::from(recorded),
        message: "Payment recorded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List payments; staff see all, others only payments they made
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "applications",
    responses(
        (status = 200, description = "Payments retrieved successfully", body = ApiResponse<Vec<PaymentResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_payments(
    auth: AuthUser,
    Query(query): Query<PaymentListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>, ApiError> {
    let mut finder = payment::Entity::find();
    if !auth.is_registry_staff() {
        finder = finder.filter(payment::Column::PayerId.eq(auth.id()));
    }
    if let Some(parcel_id) = query.parcel_id {
        finder = finder.filter(payment::Column::ParcelId.eq(parcel_id));
    }
    if let Some(raw) = &query.payment_type {
        let payment_type: payment::PaymentType = parse_enum(raw, "payment_type")?;
        finder = finder.filter(payment::Column::PaymentType.eq(payment_type));
    }

    let payments = finder
        .order_by_desc(payment::Column::PaymentDate)
        .all(&state.db)
        .await?;

    let response = ApiResponse {
        data: payments.into_iter().map(PaymentResponse::from).collect(),
        message: "Payments retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific payment
#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_id}",
    tag = "applications",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Payment retrieved successfully", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_payment(
    auth: AuthUser,
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PaymentResponse>>, ApiError> {
    let payment_model = payment::Entity::find_by_id(payment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Payment {payment_id} does not exist")))?;

    if !auth.is_registry_staff() && payment_model.payer_id != auth.id() {
        return Err(ApiError::not_found(format!(
            "Payment {payment_id} does not exist"
        )));
    }

    let response = ApiResponse {
        data: PaymentResponse::from(payment_model),
        message: "Payment retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a payment (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}",
    tag = "applications",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated successfully", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_payment(
    auth: AuthUser,
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, ApiError> {
    auth.require_staff()?;

    let existing = payment::Entity::find_by_id(payment_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Payment {payment_id} does not exist")))?;

    let mut active: payment::ActiveModel = existing.into();
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    if let Some(amount) = request.amount {
        if amount <= Decimal::ZERO {
            return Err(ApiError::validation("amount must be positive"));
        }
        active.amount = Set(amount);
    }
    let updated = active.update(&state.db).await?;

    let response = ApiResponse {
        data: PaymentResponse::from(updated),
        message: "Payment updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a payment (staff only)
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{payment_id}",
    tag = "applications",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Payment deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_payment(
    auth: AuthUser,
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_staff()?;

    let delete_result = payment::Entity::delete_by_id(payment_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Payment {payment_id} does not exist"
        )));
    }

    let response = ApiResponse {
        data: format!("Payment {payment_id} deleted"),
        message: "Payment deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
