use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use model::entities::{land_parcel, land_transaction, owner_profile};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::{parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for recording a land transaction
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTransactionRequest {
    pub parcel_id: i32,
    pub buyer_id: Option<i32>,
    pub seller_id: Option<i32>,
    /// "sale", "lease", "inheritance" or "transfer"
    pub transaction_type: String,
    pub transaction_date: NaiveDate,
    pub amount: Decimal,
    /// Free-form status tag (default: "pending")
    pub status: Option<String>,
}

/// Request body for updating a land transaction
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTransactionRequest {
    pub status: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_date: Option<NaiveDate>,
}

/// Land transaction response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub parcel_id: i32,
    pub buyer_id: Option<i32>,
    pub seller_id: Option<i32>,
    pub transaction_type: String,
    pub transaction_date: NaiveDate,
    pub amount: Decimal,
    pub status: String,
}

impl From<land_transaction::Model> for TransactionResponse {
    fn from(model: land_transaction::Model) -> Self {
        Self {
            id: model.id,
            parcel_id: model.parcel_id,
            buyer_id: model.buyer_id,
            seller_id: model.seller_id,
            transaction_type: model.transaction_type.to_value(),
            transaction_date: model.transaction_date,
            amount: model.amount,
            status: model.status,
        }
    }
}

/// Query parameters for listing land transactions
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransactionListQuery {
    pub parcel_id: Option<i32>,
    pub transaction_type: Option<String>,
}

async fn check_owner_exists(state: &AppState, owner_id: i32) -> Result<(), ApiError> {
    owner_profile::Entity::find_by_id(owner_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Owner profile {owner_id} does not exist")))?;
    Ok(())
}

/// Record a land transaction (staff only)
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "parcels",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Parcel, buyer or seller not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_transaction(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ApiError> {
    auth.require_staff()?;

    if request.amount < Decimal::ZERO {
        return Err(ApiError::validation("amount must not be negative"));
    }
    let transaction_type: land_transaction::TransactionType =
        parse_enum(&request.transaction_type, "transaction_type")?;

    land_parcel::Entity::find_by_id(request.parcel_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Parcel {} does not exist", request.parcel_id))
        })?;
    if let Some(buyer_id) = request.buyer_id {
        check_owner_exists(&state, buyer_id).await?;
    }
    if let Some(seller_id) = request.seller_id {
        check_owner_exists(&state, seller_id).await?;
    }

    let recorded = land_transaction::ActiveModel {
        parcel_id: Set(request.parcel_id),
        buyer_id: Set(request.buyer_id),
        seller_id: Set(request.seller_id),
        transaction_type: Set(transaction_type),
        transaction_date: Set(request.transaction_date),
        amount: Set(request.amount),
        status: Set(request.status.clone().unwrap_or_else(|| "pending".to_string())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Land transaction {} recorded for parcel {}",
        recorded.id, recorded.parcel_id
    );
    let response = ApiResponse {
        data: TransactionResponse::from(recorded),
        message: "Transaction recorded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List land transactions; staff see all, owners only their own side
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "parcels",
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    auth: AuthUser,
    Query(query): Query<TransactionListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, ApiError> {
    let mut finder = land_transaction::Entity::find();

    if !auth.is_registry_staff() {
        let Some(profile) = auth.owner_profile(&state.db).await? else {
            return Ok(Json(ApiResponse {
                data: Vec::new(),
                message: "Transactions retrieved successfully".to_string(),
                success: true,
            }));
        };
        finder = finder.filter(
            Condition::any()
                .add(land_transaction::Column::BuyerId.eq(profile.id))
                .add(land_transaction::Column::SellerId.eq(profile.id)),
        );
    }

    if let Some(parcel_id) = query.parcel_id {
        finder = finder.filter(land_transaction::Column::ParcelId.eq(parcel_id));
    }
    if let Some(raw) = &query.transaction_type {
        let transaction_type: land_transaction::TransactionType =
            parse_enum(raw, "transaction_type")?;
        finder = finder.filter(land_transaction::Column::TransactionType.eq(transaction_type));
    }

    let transactions = finder
        .order_by_desc(land_transaction::Column::TransactionDate)
        .all(&state.db)
        .await?;

    let response = ApiResponse {
        data: transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
        message: "Transactions retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific land transaction
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "parcels",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction(
    auth: AuthUser,
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ApiError> {
    let transaction = land_transaction::Entity::find_by_id(transaction_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Transaction {transaction_id} does not exist"))
        })?;

    if !auth.is_registry_staff() {
        let own_side = match auth.owner_profile(&state.db).await? {
            Some(profile) => {
                transaction.buyer_id == Some(profile.id) || transaction.seller_id == Some(profile.id)
            }
            None => false,
        };
        if !own_side {
            return Err(ApiError::not_found(format!(
                "Transaction {transaction_id} does not exist"
            )));
        }
    }

    let response = ApiResponse {
        data: TransactionResponse::from(transaction),
        message: "Transaction retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a land transaction (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "parcels",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_transaction(
    auth: AuthUser,
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ApiError> {
    auth.require_staff()?;

    let existing = land_transaction::Entity::find_by_id(transaction_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Transaction {transaction_id} does not exist"))
        })?;

    let mut active: land_transaction::ActiveModel = existing.into();
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    if let Some(amount) = request.amount {
        if amount < Decimal::ZERO {
            return Err(ApiError::validation("amount must not be negative"));
        }
        active.amount = Set(amount);
    }
    if let Some(transaction_date) = request.transaction_date {
        active.transaction_date = Set(transaction_date);
    }
    let updated = active.update(&state.db).await?;

    let response = ApiResponse {
        data: TransactionResponse::from(updated),
        message: "Transaction updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a land transaction (staff only)
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "parcels",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_transaction(
    auth: AuthUser,
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_staff()?;

    let delete_result = land_transaction::Entity::delete_by_id(transaction_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Transaction {transaction_id} does not exist"
        )));
    }

    let response = ApiResponse {
        data: format!("Transaction {transaction_id} deleted"),
        message: "Transaction deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
