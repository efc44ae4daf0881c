use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{check_valid, parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    /// Role tag: "owner", "officer" or "admin" (default: "owner")
    pub role: Option<String>,
    /// Opaque credential hash supplied by the auth service
    pub password_hash: Option<String>,
}

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    /// Role tag: "owner", "officer" or "admin"
    pub role: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

/// User response model; never exposes the credential hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role.as_str().to_string(),
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserListQuery {
    /// Exact username filter
    pub username: Option<String>,
}

/// Create a new user (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    auth.require_admin()?;
    check_valid(&request)?;
    debug!("Creating user with username: {}", request.username);

    let role: user::Role = match request.role.as_deref() {
        Some(raw) => parse_enum(raw, "role")?,
        None => user::Role::Owner,
    };

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        role: Set(role),
        password_hash: Set(request.password_hash.clone()),
        is_active: Set(true),
        is_staff: Set(role.is_staff()),
        is_superuser: Set(role == user::Role::Admin),
        ..Default::default()
    };

    let user_model = new_user.insert(&state.db).await?;
    info!(
        "User created successfully with ID: {}, username: {}, role: {}",
        user_model.id,
        user_model.username,
        user_model.role.as_str()
    );

    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all users (admin only), optionally filtered by exact username
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    auth: AuthUser,
    Query(query): Query<UserListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    auth.require_admin()?;

    let mut finder = user::Entity::find();
    if let Some(username) = &query.username {
        finder = finder.filter(user::Column::Username.eq(username));
    }
    let users = finder.all(&state.db).await?;
    debug!("Retrieved {} users from database", users.len());

    let response = ApiResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        message: "Users retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific user by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    auth: AuthUser,
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    auth.require_admin()?;

    let user_model = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("User with ID {} not found", user_id);
            ApiError::not_found(format!("User {user_id} does not exist"))
        })?;

    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "User retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a user (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_user(
    auth: AuthUser,
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    auth.require_admin()?;
    check_valid(&request)?;

    let existing = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {user_id} does not exist")))?;

    let mut active: user::ActiveModel = existing.into();
    if let Some(username) = request.username {
        debug!("Updating username of user {} to {}", user_id, username);
        active.username = Set(username);
    }
    if let Some(raw_role) = request.role {
        let role: user::Role = parse_enum(&raw_role, "role")?;
        active.role = Set(role);
        active.is_staff = Set(role.is_staff());
        active.is_superuser = Set(role == user::Role::Admin);
    }
    if let Some(password_hash) = request.password_hash {
        active.password_hash = Set(Some(password_hash));
    }
    if let Some(is_active) = request.is_active {
        active.is_active = Set(is_active);
    }

    let updated = active.update(&state.db).await?;
    info!("User with ID {} updated successfully", user_id);

    let response = ApiResponse {
        data: UserResponse::from(updated),
        message: "User updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a user (admin only); the owner profile, if any, cascades.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    auth: AuthUser,
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_admin()?;

    let delete_result = user::Entity::delete_by_id(user_id).exec(&state.db).await?;
    if delete_result.rows_affected == 0 {
        warn!("User with ID {} not found for deletion", user_id);
        return Err(ApiError::not_found(format!("User {user_id} does not exist")));
    }

    info!("User with ID {} deleted successfully", user_id);
    let response = ApiResponse {
        data: format!("User {user_id} deleted"),
        message: "User deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
