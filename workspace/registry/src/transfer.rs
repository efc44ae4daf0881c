//! The atomic ownership transfer operation.
//!
//! A transfer closes the source record and opens a new current record for
//! the receiving owner inside one database transaction; a failure at any
//! point rolls back both writes. This is the only code path that flips
//! `is_current_owner`.

use chrono::{NaiveDate, Utc};
use model::entities::{owner_profile, ownership_record};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionError, TransactionTrait,
};
use tracing::{info, instrument};

use crate::error::{RegistryError, Result};

/// Parameters of an ownership transfer.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// The current ownership record being closed.
    pub record_id: i32,
    /// The owner profile receiving the share.
    pub to_owner_id: i32,
    pub transfer_type: ownership_record::TransferType,
    pub transfer_date: NaiveDate,
    /// Share to hand over; defaults to the full share of the source record.
    pub percentage: Option<Decimal>,
    /// Monetary value recorded as the acquisition value of the new record.
    pub transfer_value: Option<Decimal>,
    pub created_by: Option<i32>,
    pub notes: Option<String>,
}

/// Both sides of a committed transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The closed record of the previous owner.
    pub closed: ownership_record::Model,
    /// The newly opened current record of the receiving owner.
    pub opened: ownership_record::Model,
}

/// How the receiving record's acquisition is classified for each kind of
/// transfer.
fn acquisition_for(transfer_type: ownership_record::TransferType) -> ownership_record::AcquisitionType {
    use ownership_record::{AcquisitionType, TransferType};
    match transfer_type {
        TransferType::Sale => AcquisitionType::Purchase,
        TransferType::Gift => AcquisitionType::Gift,
        TransferType::Inheritance => AcquisitionType::Inheritance,
        TransferType::Foreclosure => AcquisitionType::CourtOrder,
        TransferType::Surrender => AcquisitionType::GovernmentAllocation,
    }
}

/// Executes the transfer as a single transaction: close the source record,
/// open the new one, or commit nothing at all.
#[instrument(skip(db))]
pub async fn transfer_ownership(
    db: &DatabaseConnection,
    request: TransferRequest,
) -> Result<TransferOutcome> {
    let outcome = db
        .transaction::<_, TransferOutcome, RegistryError>(|txn| {
            Box::pin(async move {
                let record = ownership_record::Entity::find_by_id(request.record_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        RegistryError::NotFound(format!(
                            "Ownership record {} does not exist",
                            request.record_id
                        ))
                    })?;

                if !record.is_current_owner {
                    return Err(RegistryError::Consistency(format!(
                        "Ownership record {} is already historical and cannot be transferred",
                        record.id
                    )));
                }

                let percentage = request.percentage.unwrap_or(record.ownership_percentage);
                if percentage <= Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
                    return Err(RegistryError::Validation(format!(
                        "Transfer percentage {percentage} is outside (0, 100]"
                    )));
                }
                if percentage > record.ownership_percentage {
                    return Err(RegistryError::Validation(format!(
                        "Transfer percentage {percentage} exceeds the source share of {}",
                        record.ownership_percentage
                    )));
                }

                let now = Utc::now().naive_utc();

                // Close the source record
                let mut closing: ownership_record::ActiveModel = record.into();
                closing.is_current_owner = Set(false);
                closing.transfer_date = Set(Some(request.transfer_date));
                closing.transfer_type = Set(Some(request.transfer_type));
                closing.transfer_to = Set(Some(request.to_owner_id));
                closing.updated_at = Set(now);
                let closed = closing.update(txn).await?;

                // The receiving owner must still exist at commit time; a
                // failure here rolls the close back.
                owner_profile::Entity::find_by_id(request.to_owner_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        RegistryError::NotFound(format!(
                            "Owner profile {} does not exist",
                            request.to_owner_id
                        ))
                    })?;

                // Open the new current record; verification starts over.
                let opened = ownership_record::ActiveModel {
                    parcel_id: Set(closed.parcel_id),
                    owner_id: Set(request.to_owner_id),
                    ownership_type: Set(closed.ownership_type),
                    ownership_percentage: Set(percentage),
                    acquisition_type: Set(acquisition_for(request.transfer_type)),
                    acquisition_date: Set(request.transfer_date),
                    acquisition_value: Set(request.transfer_value),
                    verification_status: Set(ownership_record::VerificationStatus::Pending),
                    is_current_owner: Set(true),
                    created_by: Set(request.created_by),
                    history_notes: Set(request.notes.clone()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                Ok(TransferOutcome { closed, opened })
            })
        })
        .await
        .map_err(|err| match err {
            TransactionError::Connection(db_err) => RegistryError::Database(db_err),
            TransactionError::Transaction(registry_err) => registry_err,
        })?;

    info!(
        record = outcome.closed.id,
        successor = outcome.opened.id,
        parcel = outcome.opened.parcel_id,
        new_owner = outcome.opened.owner_id,
        "Ownership transfer committed"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::{current_owners, parcel_history};
    use crate::testing::{date, new_owner, new_parcel, new_record, setup_db, RecordSpec};
    use model::entities::ownership_record::{AcquisitionType, TransferType, VerificationStatus};
    use sea_orm::{ColumnTrait, QueryFilter};

    fn request(record_id: i32, to_owner_id: i32) -> TransferRequest {
        TransferRequest {
            record_id,
            to_owner_id,
            transfer_type: TransferType::Sale,
            transfer_date: date(2024, 2, 1),
            percentage: None,
            transfer_value: Some(Decimal::new(75000000, 2)),
            created_by: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_transfer_closes_old_and_opens_new() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let seller = new_owner(&db).await;
        let buyer = new_owner(&db).await;
        let record = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: seller.id,
                acquisition_date: date(2019, 5, 1),
                ..Default::default()
            },
        )
        .await;

        let outcome = transfer_ownership(&db, request(record.id, buyer.id))
            .await
            .unwrap();

        assert!(!outcome.closed.is_current_owner);
        assert_eq!(outcome.closed.transfer_date, Some(date(2024, 2, 1)));
        assert_eq!(outcome.closed.transfer_to, Some(buyer.id));
        assert_eq!(outcome.closed.transfer_type, Some(TransferType::Sale));

        assert!(outcome.opened.is_current_owner);
        assert_eq!(outcome.opened.owner_id, buyer.id);
        assert_eq!(outcome.opened.parcel_id, parcel.parcel_id);
        assert_eq!(outcome.opened.ownership_percentage, Decimal::ONE_HUNDRED);
        assert_eq!(outcome.opened.acquisition_type, AcquisitionType::Purchase);
        assert_eq!(outcome.opened.acquisition_date, date(2024, 2, 1));
        assert_eq!(
            outcome.opened.verification_status,
            VerificationStatus::Pending
        );

        // The parcel now has exactly one current owner: the buyer
        let current = current_owners(&db, parcel.parcel_id).await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].owner_id, buyer.id);

        // History keeps both sides of the transfer
        let history = parcel_history(&db, parcel.parcel_id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_transfer_to_missing_owner_commits_nothing() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let seller = new_owner(&db).await;
        let record = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: seller.id,
                acquisition_date: date(2019, 5, 1),
                ..Default::default()
            },
        )
        .await;

        // The close has already happened inside the transaction when the
        // missing owner is detected; the whole thing must roll back.
        let err = transfer_ownership(&db, request(record.id, 9999))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));

        let reloaded = ownership_record::Entity::find_by_id(record.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.is_current_owner);
        assert_eq!(reloaded.transfer_date, None);
        assert_eq!(reloaded.transfer_to, None);

        let all = ownership_record::Entity::find()
            .filter(ownership_record::Column::ParcelId.eq(parcel.parcel_id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_of_historical_record_is_rejected() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let seller = new_owner(&db).await;
        let buyer = new_owner(&db).await;
        let record = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: seller.id,
                acquisition_date: date(2010, 1, 1),
                is_current: false,
                ..Default::default()
            },
        )
        .await;

        let err = transfer_ownership(&db, request(record.id, buyer.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Consistency(_)));
    }

    #[tokio::test]
    async fn test_transfer_of_missing_record_is_rejected() {
        let db = setup_db().await;
        let buyer = new_owner(&db).await;

        let err = transfer_ownership(&db, request(4242, buyer.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_transfer_cannot_exceed_source_share() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let seller = new_owner(&db).await;
        let buyer = new_owner(&db).await;
        let record = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: seller.id,
                percentage: Decimal::new(4000, 2), // 40.00
                acquisition_date: date(2019, 5, 1),
                ..Default::default()
            },
        )
        .await;

        let mut req = request(record.id, buyer.id);
        req.percentage = Some(Decimal::new(6000, 2)); // 60.00
        let err = transfer_ownership(&db, req).await.unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));

        // Nothing changed
        let reloaded = ownership_record::Entity::find_by_id(record.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.is_current_owner);
    }

    #[tokio::test]
    async fn test_partial_transfer_keeps_share_sum_bounded() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let seller = new_owner(&db).await;
        let buyer = new_owner(&db).await;
        let record = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: seller.id,
                percentage: Decimal::new(7000, 2), // 70.00
                acquisition_date: date(2019, 5, 1),
                ..Default::default()
            },
        )
        .await;

        let mut req = request(record.id, buyer.id);
        req.percentage = Some(Decimal::new(3000, 2)); // 30.00
        let outcome = transfer_ownership(&db, req).await.unwrap();
        assert_eq!(outcome.opened.ownership_percentage, Decimal::new(3000, 2));

        let total = crate::ownership::current_share_total(&db, parcel.parcel_id, None)
            .await
            .unwrap();
        assert!(total <= Decimal::ONE_HUNDRED);
    }
}
