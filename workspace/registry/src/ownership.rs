//! Current-owner derivation queries.
//!
//! Every function takes a [`ConnectionTrait`] so the same queries run
//! against the pooled connection and inside the transfer transaction.

use model::entities::{land_parcel, owner_profile, ownership_record};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::instrument;

use crate::error::Result;

/// All ownership records that make up the parcel's current ownership,
/// most recent acquisition first. Joint ownership means more than one row.
#[instrument(skip(db))]
pub async fn current_owners<C: ConnectionTrait>(
    db: &C,
    parcel_id: i32,
) -> Result<Vec<ownership_record::Model>> {
    let records = ownership_record::Entity::find()
        .filter(ownership_record::Column::ParcelId.eq(parcel_id))
        .filter(ownership_record::Column::IsCurrentOwner.eq(true))
        .order_by_desc(ownership_record::Column::AcquisitionDate)
        .all(db)
        .await?;
    Ok(records)
}

/// Current records joined with their owner profiles, same ordering as
/// [`current_owners`].
#[instrument(skip(db))]
pub async fn current_owners_with_profiles<C: ConnectionTrait>(
    db: &C,
    parcel_id: i32,
) -> Result<Vec<(ownership_record::Model, owner_profile::Model)>> {
    let rows = ownership_record::Entity::find()
        .filter(ownership_record::Column::ParcelId.eq(parcel_id))
        .filter(ownership_record::Column::IsCurrentOwner.eq(true))
        .order_by_desc(ownership_record::Column::AcquisitionDate)
        .find_also_related(owner_profile::Entity)
        .all(db)
        .await?;

    // The owner FK is non-null, so a missing profile only happens on a
    // torn database; drop such rows rather than failing the listing.
    Ok(rows
        .into_iter()
        .filter_map(|(record, owner)| owner.map(|o| (record, o)))
        .collect())
}

/// The most recently acquired current record, used for display purposes
/// only. `None` is the "no owner" sentinel for unowned parcels.
#[instrument(skip(db))]
pub async fn primary_owner<C: ConnectionTrait>(
    db: &C,
    parcel_id: i32,
) -> Result<Option<ownership_record::Model>> {
    Ok(current_owners(db, parcel_id).await?.into_iter().next())
}

/// IDs of all parcels the owner currently holds a share of.
#[instrument(skip(db))]
pub async fn owned_parcel_ids<C: ConnectionTrait>(db: &C, owner_id: i32) -> Result<Vec<i32>> {
    let ids = ownership_record::Entity::find()
        .select_only()
        .column(ownership_record::Column::ParcelId)
        .filter(ownership_record::Column::OwnerId.eq(owner_id))
        .filter(ownership_record::Column::IsCurrentOwner.eq(true))
        .into_tuple::<i32>()
        .all(db)
        .await?;
    Ok(ids)
}

/// Parcels the owner currently holds a share of (the inverse derivation).
#[instrument(skip(db))]
pub async fn owned_parcels<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
) -> Result<Vec<land_parcel::Model>> {
    let ids = owned_parcel_ids(db, owner_id).await?;
    let parcels = land_parcel::Entity::find()
        .filter(land_parcel::Column::ParcelId.is_in(ids))
        .all(db)
        .await?;
    Ok(parcels)
}

/// Sum of current ownership percentages on a parcel, optionally excluding
/// one record (used when that record is about to be replaced or resized).
#[instrument(skip(db))]
pub async fn current_share_total<C: ConnectionTrait>(
    db: &C,
    parcel_id: i32,
    exclude_record: Option<i32>,
) -> Result<Decimal> {
    let records = current_owners(db, parcel_id).await?;
    let total = records
        .iter()
        .filter(|r| exclude_record != Some(r.id))
        .map(|r| r.ownership_percentage)
        .sum();
    Ok(total)
}

/// Share of a parcel not yet claimed by any current record.
#[instrument(skip(db))]
pub async fn available_share<C: ConnectionTrait>(
    db: &C,
    parcel_id: i32,
    exclude_record: Option<i32>,
) -> Result<Decimal> {
    let taken = current_share_total(db, parcel_id, exclude_record).await?;
    Ok(Decimal::ONE_HUNDRED - taken)
}

/// Full ownership history of one owner, current and closed records alike.
#[instrument(skip(db))]
pub async fn owner_history<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
) -> Result<Vec<ownership_record::Model>> {
    let records = ownership_record::Entity::find()
        .filter(ownership_record::Column::OwnerId.eq(owner_id))
        .order_by_desc(ownership_record::Column::AcquisitionDate)
        .all(db)
        .await?;
    Ok(records)
}

/// Full ownership history of one parcel.
#[instrument(skip(db))]
pub async fn parcel_history<C: ConnectionTrait>(
    db: &C,
    parcel_id: i32,
) -> Result<Vec<ownership_record::Model>> {
    let records = ownership_record::Entity::find()
        .filter(ownership_record::Column::ParcelId.eq(parcel_id))
        .order_by_desc(ownership_record::Column::AcquisitionDate)
        .all(db)
        .await?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, new_owner, new_parcel, new_record, setup_db, RecordSpec};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_current_owners_orders_newest_first() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let older = new_owner(&db).await;
        let newer = new_owner(&db).await;

        new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: older.id,
                percentage: Decimal::new(5000, 2),
                acquisition_date: date(2020, 1, 15),
                ..Default::default()
            },
        )
        .await;
        new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: newer.id,
                percentage: Decimal::new(5000, 2),
                acquisition_date: date(2023, 6, 1),
                ..Default::default()
            },
        )
        .await;

        let current = current_owners(&db, parcel.parcel_id).await.unwrap();
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].owner_id, newer.id);
        assert_eq!(current[1].owner_id, older.id);

        let primary = primary_owner(&db, parcel.parcel_id).await.unwrap().unwrap();
        assert_eq!(primary.owner_id, newer.id);
    }

    #[tokio::test]
    async fn test_primary_owner_none_for_unowned_parcel() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;

        let primary = primary_owner(&db, parcel.parcel_id).await.unwrap();
        assert!(primary.is_none());
        assert!(current_owners(&db, parcel.parcel_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_historical_records_are_not_current_owners() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let past = new_owner(&db).await;
        let present = new_owner(&db).await;

        new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: past.id,
                acquisition_date: date(2015, 3, 1),
                is_current: false,
                ..Default::default()
            },
        )
        .await;
        new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: present.id,
                acquisition_date: date(2022, 8, 20),
                ..Default::default()
            },
        )
        .await;

        let current = current_owners(&db, parcel.parcel_id).await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].owner_id, present.id);

        // History still shows both
        let history = parcel_history(&db, parcel.parcel_id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_owned_parcels_inverse_derivation() {
        let db = setup_db().await;
        let owner = new_owner(&db).await;
        let parcel1 = new_parcel(&db).await;
        let parcel2 = new_parcel(&db).await;
        let unowned = new_parcel(&db).await;

        for parcel_id in [parcel1.parcel_id, parcel2.parcel_id] {
            new_record(
                &db,
                RecordSpec {
                    parcel_id,
                    owner_id: owner.id,
                    acquisition_date: date(2021, 1, 1),
                    ..Default::default()
                },
            )
            .await;
        }

        let mut ids = owned_parcel_ids(&db, owner.id).await.unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![parcel1.parcel_id, parcel2.parcel_id]);

        let parcels = owned_parcels(&db, owner.id).await.unwrap();
        assert_eq!(parcels.len(), 2);
        assert!(parcels.iter().all(|p| p.parcel_id != unowned.parcel_id));
    }

    #[tokio::test]
    async fn test_share_totals() {
        let db = setup_db().await;
        let parcel = new_parcel(&db).await;
        let a = new_owner(&db).await;
        let b = new_owner(&db).await;

        let record_a = new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: a.id,
                percentage: Decimal::new(6000, 2),
                acquisition_date: date(2020, 1, 1),
                ..Default::default()
            },
        )
        .await;
        new_record(
            &db,
            RecordSpec {
                parcel_id: parcel.parcel_id,
                owner_id: b.id,
                percentage: Decimal::new(2500, 2),
                acquisition_date: date(2021, 1, 1),
                ..Default::default()
            },
        )
        .await;

        let total = current_share_total(&db, parcel.parcel_id, None).await.unwrap();
        assert_eq!(total, Decimal::new(8500, 2));

        let available = available_share(&db, parcel.parcel_id, None).await.unwrap();
        assert_eq!(available, Decimal::new(1500, 2));

        // Excluding a record frees its share
        let without_a = available_share(&db, parcel.parcel_id, Some(record_a.id))
            .await
            .unwrap();
        assert_eq!(without_a, Decimal::new(7500, 2));
    }
}
