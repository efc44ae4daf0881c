//! Authenticated-principal extractor.
//!
//! Token issuance and validation live in the upstream auth service; by the
//! time a request reaches this server the gateway has already resolved the
//! token and injects the principal's user id in the `x-user-id` header.
//! The extractor resolves that id to a user row so handlers can match on
//! the role enum.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use model::entities::{owner_profile, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::warn;

use crate::error::ApiError;
use crate::schemas::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: user::Model,
}

impl AuthUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    pub fn role(&self) -> user::Role {
        self.user.role
    }

    /// Officers and admins: unrestricted read access.
    pub fn is_registry_staff(&self) -> bool {
        self.user.role.is_staff()
    }

    pub fn require_staff(&self) -> Result<(), ApiError> {
        match self.user.role {
            user::Role::Officer | user::Role::Admin => Ok(()),
            user::Role::Owner => Err(ApiError::Forbidden),
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.user.role {
            user::Role::Admin => Ok(()),
            user::Role::Officer | user::Role::Owner => Err(ApiError::Forbidden),
        }
    }

    /// The caller's owner profile, if any. An owner-role user without a
    /// profile is a legitimate state and yields `None`, not an error.
    pub async fn owner_profile(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Option<owner_profile::Model>, ApiError> {
        let profile = owner_profile::Entity::find()
            .filter(owner_profile::Column::UserId.eq(self.user.id))
            .one(db)
            .await?;
        Ok(profile)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let user_id: i32 = raw.parse().map_err(|_| {
            warn!("Rejecting request with malformed {} header", USER_ID_HEADER);
            ApiError::Unauthorized
        })?;

        let user = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if !user.is_active {
            warn!("Rejecting request from disabled user {}", user.username);
            return Err(ApiError::Unauthorized);
        }

        Ok(Self { user })
    }
}
