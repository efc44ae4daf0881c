use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use model::entities::{owner_profile, user};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{check_valid, parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating an owner profile. The profile always extends
/// an existing owner-role user, addressed by username.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateOwnerProfileRequest {
    /// Username of the owner-role user this profile belongs to
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1, max = 50))]
    pub national_id: String,
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// "Male", "Female" or "Other"
    pub gender: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    #[validate(length(min = 1))]
    pub permanent_address: String,
    pub current_address: Option<String>,
    /// "Individual", "Company", "Government" or "Trust" (default: "Individual")
    pub owner_type: Option<String>,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub contact_person: Option<String>,
    pub notes: Option<String>,
}

/// Request body for updating an owner profile
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateOwnerProfileRequest {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub permanent_address: Option<String>,
    pub current_address: Option<String>,
    pub profile_picture_url: Option<String>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub signature_url: Option<String>,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub contact_person: Option<String>,
    pub notes: Option<String>,
    /// "Active", "Inactive" or "Deceased"
    pub status: Option<String>,
}

/// Owner profile response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub national_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub profile_picture_url: Option<String>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub signature_url: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub permanent_address: String,
    pub current_address: Option<String>,
    pub owner_type: String,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub contact_person: Option<String>,
    pub notes: Option<String>,
    pub status: String,
}

impl From<owner_profile::Model> for OwnerProfileResponse {
    fn from(model: owner_profile::Model) -> Self {
        let full_name = model.full_name();
        Self {
            id: model.id,
            user_id: model.user_id,
            national_id: model.national_id,
            first_name: model.first_name,
            middle_name: model.middle_name,
            last_name: model.last_name,
            full_name,
            date_of_birth: model.date_of_birth,
            gender: model.gender.to_value(),
            profile_picture_url: model.profile_picture_url,
            id_card_front_url: model.id_card_front_url,
            id_card_back_url: model.id_card_back_url,
            signature_url: model.signature_url,
            contact_phone: model.contact_phone,
            contact_email: model.contact_email,
            permanent_address: model.permanent_address,
            current_address: model.current_address,
            owner_type: model.owner_type.to_value(),
            registration_number: model.registration_number,
            tax_id: model.tax_id,
            contact_person: model.contact_person,
            notes: model.notes,
            status: model.status.to_value(),
        }
    }
}

/// Query parameters for listing and searching owner profiles
#[derive(Debug, Deserialize, ToSchema)]
pub struct OwnerListQuery {
    /// Exact username of the backing user
    pub username: Option<String>,
}

async fn profiles_by_username(
    state: &AppState,
    username: &str,
) -> Result<Vec<owner_profile::Model>, ApiError> {
    let Some(user_model) = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&state.db)
        .await?
    else {
        return Ok(Vec::new());
    };

    let profiles = owner_profile::Entity::find()
        .filter(owner_profile::Column::UserId.eq(user_model.id))
        .all(&state.db)
        .await?;
    Ok(profiles)
}

/// Create an owner profile (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/owners",
    tag = "owners",
    request_body = CreateOwnerProfileRequest,
    responses(
        (status = 201, description = "Owner profile created successfully", body = ApiResponse<OwnerProfileResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Backing user not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_owner(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateOwnerProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OwnerProfileResponse>>), ApiError> {
    auth.require_admin()?;
    check_valid(&request)?;
    debug!("Creating owner profile for username: {}", request.username);

    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(&request.username))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("User '{}' does not exist", request.username))
        })?;

    if user_model.role != user::Role::Owner {
        return Err(ApiError::validation(format!(
            "User '{}' has role '{}', owner profiles can only extend owner-role users",
            user_model.username,
            user_model.role.as_str()
        )));
    }

    let existing = profile_for_user(&state, user_model.id).await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "User '{}' already has an owner profile",
            user_model.username
        )));
    }

    let gender: owner_profile::Gender = parse_enum(&request.gender, "gender")?;
    let owner_type: owner_profile::OwnerType = match request.owner_type.as_deref() {
        Some(raw) => parse_enum(raw, "owner_type")?,
        None => owner_profile::OwnerType::Individual,
    };

    let profile = owner_profile::ActiveModel {
        user_id: Set(user_model.id),
        national_id: Set(request.national_id.clone()),
        first_name: Set(request.first_name.clone()),
        middle_name: Set(request.middle_name.clone()),
        last_name: Set(request.last_name.clone()),
        date_of_birth: Set(request.date_of_birth),
        gender: Set(gender),
        contact_phone: Set(request.contact_phone.clone()),
        contact_email: Set(request.contact_email.clone()),
        permanent_address: Set(request.permanent_address.clone()),
        current_address: Set(request.current_address.clone()),
        owner_type: Set(owner_type),
        registration_number: Set(request.registration_number.clone()),
        tax_id: Set(request.tax_id.clone()),
        contact_person: Set(request.contact_person.clone()),
        notes: Set(request.notes.clone()),
        status: Set(owner_profile::OwnerStatus::Active),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        "Owner profile created with ID: {} for user {}",
        profile.id, user_model.username
    );
    let response = ApiResponse {
        data: OwnerProfileResponse::from(profile),
        message: "Owner profile created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

async fn profile_for_user(
    state: &AppState,
    user_id: i32,
) -> Result<Option<owner_profile::Model>, ApiError> {
    let profile = owner_profile::Entity::find()
        .filter(owner_profile::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?;
    Ok(profile)
}

/// List owner profiles, scoped by role
#[utoipa::path(
    get,
    path = "/api/v1/owners",
    tag = "owners",
    responses(
        (status = 200, description = "Owner profiles retrieved successfully", body = ApiResponse<Vec<OwnerProfileResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_owners(
    auth: AuthUser,
    Query(query): Query<OwnerListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OwnerProfileResponse>>>, ApiError> {
    let profiles = if auth.is_registry_staff() {
        match &query.username {
            Some(username) => profiles_by_username(&state, username).await?,
            None => {
                owner_profile::Entity::find()
                    .order_by_desc(owner_profile::Column::CreatedAt)
                    .all(&state.db)
                    .await?
            }
        }
    } else {
        // Owners see only their own profile; no profile means an empty
        // list, not an error.
        auth.owner_profile(&state.db).await?.into_iter().collect()
    };

    debug!("Retrieved {} owner profiles", profiles.len());
    let response = ApiResponse {
        data: profiles.into_iter().map(OwnerProfileResponse::from).collect(),
        message: "Owner profiles retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Search owner profiles by exact username (staff only)
#[utoipa::path(
    get,
    path = "/api/v1/owners/search",
    tag = "owners",
    responses(
        (status = 200, description = "Matching owner profiles (possibly empty)", body = ApiResponse<Vec<OwnerProfileResponse>>),
        (status = 400, description = "username parameter missing", body = ErrorResponse),
        (status = 403, description = "Caller is not registry staff", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_owners(
    auth: AuthUser,
    Query(query): Query<OwnerListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OwnerProfileResponse>>>, ApiError> {
    auth.require_staff()?;
    let username = query
        .username
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::validation("username required"))?;

    // No match is a successful empty result, never an error.
    let profiles = profiles_by_username(&state, username).await?;
    info!(
        "Owner search for username '{}' matched {} profiles",
        username,
        profiles.len()
    );

    let response = ApiResponse {
        data: profiles.into_iter().map(OwnerProfileResponse::from).collect(),
        message: "Owner search completed".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get the calling owner's profile
#[utoipa::path(
    get,
    path = "/api/v1/owners/me",
    tag = "owners",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<OwnerProfileResponse>),
        (status = 404, description = "Caller has no owner profile", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OwnerProfileResponse>>, ApiError> {
    let profile = auth
        .owner_profile(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("No owner profile exists for this user"))?;

    let response = ApiResponse {
        data: OwnerProfileResponse::from(profile),
        message: "Owner profile retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific owner profile
#[utoipa::path(
    get,
    path = "/api/v1/owners/{owner_id}",
    tag = "owners",
    params(
        ("owner_id" = i32, Path, description = "Owner profile ID"),
    ),
    responses(
        (status = 200, description = "Owner profile retrieved successfully", body = ApiResponse<OwnerProfileResponse>),
        (status = 404, description = "Owner profile not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_owner(
    auth: AuthUser,
    Path(owner_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OwnerProfileResponse>>, ApiError> {
    let profile = owner_profile::Entity::find_by_id(owner_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Owner profile {owner_id} does not exist")))?;

    // Owners can only see their own profile; respond as if the row does
    // not exist to avoid leaking other owners' data.
    if !auth.is_registry_staff() && profile.user_id != auth.id() {
        warn!(
            "User {} denied access to owner profile {}",
            auth.user.username, owner_id
        );
        return Err(ApiError::not_found(format!(
            "Owner profile {owner_id} does not exist"
        )));
    }

    let response = ApiResponse {
        data: OwnerProfileResponse::from(profile),
        message: "Owner profile retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an owner profile (staff, or the owner themselves)
#[utoipa::path(
    put,
    path = "/api/v1/owners/{owner_id}",
    tag = "owners",
    params(
        ("owner_id" = i32, Path, description = "Owner profile ID"),
    ),
    request_body = UpdateOwnerProfileRequest,
    responses(
        (status = 200, description = "Owner profile updated successfully", body = ApiResponse<OwnerProfileResponse>),
        (status = 403, description = "Owners may only update their own profile", body = ErrorResponse),
        (status = 404, description = "Owner profile not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_owner(
    auth: AuthUser,
    Path(owner_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateOwnerProfileRequest>,
) -> Result<Json<ApiResponse<OwnerProfileResponse>>, ApiError> {
    check_valid(&request)?;

    let existing = owner_profile::Entity::find_by_id(owner_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Owner profile {owner_id} does not exist")))?;

    if !auth.is_registry_staff() && existing.user_id != auth.id() {
        return Err(ApiError::Forbidden);
    }

    let status = match request.status.as_deref() {
        Some(raw) => Some(parse_enum::<owner_profile::OwnerStatus>(raw, "status")?),
        None => None,
    };

    let mut active: owner_profile::ActiveModel = existing.into();
    if let Some(first_name) = request.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(middle_name) = request.middle_name {
        active.middle_name = Set(Some(middle_name));
    }
    if let Some(last_name) = request.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(date_of_birth) = request.date_of_birth {
        active.date_of_birth = Set(Some(date_of_birth));
    }
    if let Some(contact_phone) = request.contact_phone {
        active.contact_phone = Set(Some(contact_phone));
    }
    if let Some(contact_email) = request.contact_email {
        active.contact_email = Set(Some(contact_email));
    }
    if let Some(permanent_address) = request.permanent_address {
        active.permanent_address = Set(permanent_address);
    }
    if let Some(current_address) = request.current_address {
        active.current_address = Set(Some(current_address));
    }
    if let Some(url) = request.profile_picture_url {
        active.profile_picture_url = Set(Some(url));
    }
    if let Some(url) = request.id_card_front_url {
        active.id_card_front_url = Set(Some(url));
    }
    if let Some(url) = request.id_card_back_url {
        active.id_card_back_url = Set(Some(url));
    }
    if let Some(url) = request.signature_url {
        active.signature_url = Set(Some(url));
    }
    if let Some(registration_number) = request.registration_number {
        active.registration_number = Set(Some(registration_number));
    }
    if let Some(tax_id) = request.tax_id {
        active.tax_id = Set(Some(tax_id));
    }
    if let Some(contact_person) = request.contact_person {
        active.contact_person = Set(Some(contact_person));
    }
    if let Some(notes) = request.notes {
        active.notes = Set(Some(notes));
    }
    if let Some(status) = status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active.update(&state.db).await?;
    info!("Owner profile {} updated successfully", owner_id);

    let response = ApiResponse {
        data: OwnerProfileResponse::from(updated),
        message: "Owner profile updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an owner profile (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/owners/{owner_id}",
    tag = "owners",
    params(
        ("owner_id" = i32, Path, description = "Owner profile ID"),
    ),
    responses(
        (status = 200, description = "Owner profile deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Owner profile not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_owner(
    auth: AuthUser,
    Path(owner_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_admin()?;

    let delete_result = owner_profile::Entity::delete_by_id(owner_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Owner profile {owner_id} does not exist"
        )));
    }

    info!("Owner profile {} deleted successfully", owner_id);
    let response = ApiResponse {
        data: format!("Owner profile {owner_id} deleted"),
        message: "Owner profile deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
