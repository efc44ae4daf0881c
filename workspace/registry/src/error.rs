use model::entities::ownership_record::VerificationStatus;
use thiserror::Error;

/// Error types for the registry module
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A field or parameter failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced parcel, owner or record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation would leave the ownership history inconsistent
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// The requested verification transition is not in the allowed table
    #[error("Invalid verification transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: VerificationStatus,
        to: VerificationStatus,
    },
}

/// Type alias for Result with RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;
