//! API error type and its JSON rendering.
//!
//! Library errors (sea-orm, registry) convert into [`ApiError`] so handlers
//! can use `?` throughout. Internal failures are logged with their cause and
//! surfaced with a fixed message; permission failures always use the same
//! generic wording.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registry::RegistryError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("You do not have permission to perform this action")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Internal => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Conflict("A record with the same unique value already exists".to_string())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::Validation("A referenced record does not exist".to_string())
            }
            _ => {
                error!("Database error: {}", err);
                Self::Internal
            }
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Database(db_err) => Self::from(db_err),
            RegistryError::Validation(message) => Self::Validation(message),
            RegistryError::NotFound(message) => Self::NotFound(message),
            RegistryError::Consistency(message) => Self::Conflict(message),
            RegistryError::InvalidTransition { from, to } => Self::Conflict(format!(
                "Invalid verification transition: {from:?} -> {to:?}"
            )),
        }
    }
}

/// Runs validator-derived checks and maps failures to a 400.
pub fn check_valid<T: validator::Validate>(value: &T) -> Result<(), ApiError> {
    value
        .validate()
        .map_err(|errors| ApiError::Validation(errors.to_string()))
}

/// Parses a string into a sea-orm active enum, rejecting unknown values
/// with a 400 naming the field.
pub fn parse_enum<T>(value: &str, field: &str) -> Result<T, ApiError>
where
    T: sea_orm::ActiveEnum<Value = String>,
{
    T::try_from_value(&value.to_string())
        .map_err(|_| ApiError::Validation(format!("{field} has invalid value '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::ownership_record::VerificationStatus;
    use model::entities::user::Role;

    #[test]
    fn test_parse_enum_accepts_wire_values() {
        let role: Role = parse_enum("officer", "role").unwrap();
        assert_eq!(role, Role::Officer);

        let status: VerificationStatus = parse_enum("Under_Review", "verification_status").unwrap();
        assert_eq!(status, VerificationStatus::UnderReview);
    }

    #[test]
    fn test_parse_enum_rejects_unknown_values() {
        let err = parse_enum::<Role>("citizen", "role").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("citizen"));
    }

    #[test]
    fn test_registry_errors_map_to_api_statuses() {
        let conflict = ApiError::from(RegistryError::Consistency("closed".to_string()));
        assert!(matches!(conflict, ApiError::Conflict(_)));

        let invalid = ApiError::from(RegistryError::InvalidTransition {
            from: VerificationStatus::Verified,
            to: VerificationStatus::Pending,
        });
        assert!(matches!(invalid, ApiError::Conflict(_)));

        let missing = ApiError::from(RegistryError::NotFound("record 5".to_string()));
        assert!(matches!(missing, ApiError::NotFound(_)));
    }
}
