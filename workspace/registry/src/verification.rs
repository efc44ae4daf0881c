//! Verification state machine for ownership claims.
//!
//! The status column itself is an open string in many registries; here the
//! allowed transitions are a closed table and everything else fails with
//! [`RegistryError::InvalidTransition`].

use chrono::NaiveDate;
use model::entities::ownership_record::{self, VerificationStatus};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use tracing::{info, instrument};

use crate::error::{RegistryError, Result};

/// Whether `from -> to` is an allowed verification transition.
///
/// Pending may move into review or be decided directly; a review may end
/// in a decision or escalate to Disputed; a dispute can only be decided.
/// Verified and Rejected are terminal.
pub fn transition_allowed(from: VerificationStatus, to: VerificationStatus) -> bool {
    use VerificationStatus::*;
    matches!(
        (from, to),
        (Pending, Verified | Rejected | UnderReview)
            | (UnderReview, Verified | Rejected | Disputed)
            | (Disputed, Verified | Rejected)
    )
}

/// Applies a verification transition to a record, stamping reviewer and
/// date on success.
#[instrument(skip(db))]
pub async fn apply_verification<C: ConnectionTrait>(
    db: &C,
    record_id: i32,
    to: VerificationStatus,
    verified_by: Option<i32>,
    notes: Option<String>,
    verification_date: NaiveDate,
) -> Result<ownership_record::Model> {
    let record = ownership_record::Entity::find_by_id(record_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            RegistryError::NotFound(format!("Ownership record {record_id} does not exist"))
        })?;

    let from = record.verification_status;
    if !transition_allowed(from, to) {
        return Err(RegistryError::InvalidTransition { from, to });
    }

    let mut active: ownership_record::ActiveModel = record.into();
    active.verification_status = Set(to);
    active.verified_by = Set(verified_by);
    active.verification_date = Set(Some(verification_date));
    if notes.is_some() {
        active.verification_notes = Set(notes);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(db).await?;

    info!(record = record_id, ?from, ?to, "Verification status updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, new_owner, new_parcel, new_record, setup_db, RecordSpec};
    use VerificationStatus::*;

    #[test]
    fn test_transition_table() {
        // Allowed
        assert!(transition_allowed(Pending, Verified));
        assert!(transition_allowed(Pending, Rejected));
        assert!(transition_allowed(Pending, UnderReview));
        assert!(transition_allowed(UnderReview, Verified));
        assert!(transition_allowed(UnderReview, Rejected));
        assert!(transition_allowed(UnderReview, Disputed));
        assert!(transition_allowed(Disputed, Verified));
        assert!(transition_allowed(Disputed, Rejected));

        // Terminal states never move
        for to in [Pending, Verified, Rejected, UnderReview, Disputed] {
            assert!(!transition_allowed(Verified, to));
            assert!(!transition_allowed(Rejected, to));
        }

        // No self-loops or backward moves
        assert!(!transition_allowed(Pending, Pending));
        assert!(!transition_allowed(Pending, Disputed));
        assert!(!transition_allowed(UnderReview, Pending));
        assert!(!transition_allowed(Disputed, UnderReview));
        assert!(!transition_allowed(Disputed, Pending));
    }

    #[tokio::test]
    async fn test_pending_to_verified_succeeds() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let owner = new_owner(&db).await;
        let record = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: owner.id,
                ..Default::default()
            },
        )
        .await;

        let updated = apply_verification(
            &db,
            record.id,
            Verified,
            None,
            Some("Deed checked against archive".to_string()),
            date(2024, 3, 10),
        )
        .await
        .unwrap();

        assert_eq!(updated.verification_status, Verified);
        assert_eq!(updated.verification_date, Some(date(2024, 3, 10)));
        assert_eq!(
            updated.verification_notes.as_deref(),
            Some("Deed checked against archive")
        );
    }

    #[tokio::test]
    async fn test_verified_to_pending_fails() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let owner = new_owner(&db).await;
        let record = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: owner.id,
                verification_status: Verified,
                ..Default::default()
            },
        )
        .await;

        let err = apply_verification(&db, record.id, Pending, None, None, date(2024, 3, 10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidTransition {
                from: Verified,
                to: Pending
            }
        ));

        // Status unchanged
        let reloaded = ownership_record::Entity::find_by_id(record.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.verification_status, Verified);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let db = setup_db().await;
        let err = apply_verification(&db, 777, Verified, None, None, date(2024, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }
}
