use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

use model::entities::{land_parcel, owner_profile, ownership_record, user};

static SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    SEQ.fetch_add(1, Ordering::SeqCst)
}

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn new_owner(db: &DatabaseConnection) -> owner_profile::Model {
    let seq = next_seq();
    let user = user::ActiveModel {
        username: Set(format!("owner_{seq}")),
        role: Set(user::Role::Owner),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test user");

    owner_profile::ActiveModel {
        user_id: Set(user.id),
        national_id: Set(format!("NID-{seq:06}")),
        first_name: Set(format!("Owner{seq}")),
        last_name: Set("Test".to_string()),
        gender: Set(owner_profile::Gender::Other),
        permanent_address: Set("1 Test Lane".to_string()),
        owner_type: Set(owner_profile::OwnerType::Individual),
        status: Set(owner_profile::OwnerStatus::Active),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test owner profile")
}

pub async fn new_parcel(db: &DatabaseConnection) -> land_parcel::Model {
    let seq = next_seq();
    land_parcel::ActiveModel {
        location: Set(format!("Test location {seq}")),
        area: Set(500.0),
        cadastral_number: Set(format!("CAD-{seq:06}")),
        status: Set("active".to_string()),
        registration_date: Set(date(2020, 1, 1)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test parcel")
}

/// Knobs for test ownership records; defaults give a full-share current
/// record acquired by purchase.
pub struct RecordSpec {
    pub parcel_id: i32,
    pub owner_id: i32,
    pub percentage: Decimal,
    pub acquisition_date: NaiveDate,
    pub is_current: bool,
    pub verification_status: ownership_record::VerificationStatus,
}

impl Default for RecordSpec {
    fn default() -> Self {
        Self {
            parcel_id: 0,
            owner_id: 0,
            percentage: Decimal::ONE_HUNDRED,
            acquisition_date: date(2020, 1, 1),
            is_current: true,
            verification_status: ownership_record::VerificationStatus::Pending,
        }
    }
}

pub async fn new_record(db: &DatabaseConnection, spec: RecordSpec) -> ownership_record::Model {
    ownership_record::ActiveModel {
        parcel_id: Set(spec.parcel_id),
        owner_id: Set(spec.owner_id),
        ownership_type: Set(ownership_record::OwnershipType::Sole),
        ownership_percentage: Set(spec.percentage),
        acquisition_type: Set(ownership_record::AcquisitionType::Purchase),
        acquisition_date: Set(spec.acquisition_date),
        verification_status: Set(spec.verification_status),
        is_current_owner: Set(spec.is_current),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test ownership record")
}
