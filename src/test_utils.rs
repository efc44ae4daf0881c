use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use moka::future::Cache;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set,
};

use model::entities::{land_parcel, owner_profile, ownership_record, user};

use crate::router::create_router;
use crate::schemas::AppState;
use crate::storage::LocalBlobStore;

static SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    SEQ.fetch_add(1, Ordering::SeqCst)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Seeded principals and handles shared by the integration tests.
pub struct TestContext {
    pub state: AppState,
    pub admin: user::Model,
    pub officer: user::Model,
    pub owner_user: user::Model,
    // Keeps the media directory alive for the duration of the test
    _media: Arc<tempfile::TempDir>,
}

impl TestContext {
    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }
}

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    // Run migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState plus one user per role for the tests to act as
pub async fn setup_test_context() -> TestContext {
    let db = setup_test_db().await;

    let admin = user::ActiveModel {
        username: Set("alice_admin".to_string()),
        role: Set(user::Role::Admin),
        is_active: Set(true),
        is_staff: Set(true),
        is_superuser: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("Failed to create admin user");

    let officer = user::ActiveModel {
        username: Set("oscar_officer".to_string()),
        role: Set(user::Role::Officer),
        is_active: Set(true),
        is_staff: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("Failed to create officer user");

    let owner_user = user::ActiveModel {
        username: Set("olivia_owner".to_string()),
        role: Set(user::Role::Owner),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("Failed to create owner user");

    let media = Arc::new(tempfile::tempdir().expect("Failed to create media dir"));
    let state = AppState {
        db,
        cache: Cache::new(100),
        blobs: Arc::new(LocalBlobStore::new(media.path())),
    };

    TestContext {
        state,
        admin,
        officer,
        owner_user,
        _media: media,
    }
}

/// Create axum app for testing
pub async fn setup_test_app() -> (Router, TestContext) {
    let context = setup_test_context().await;
    let router = create_router(context.state.clone());
    (router, context)
}

/// Identity header the auth extractor resolves, as injected by the
/// upstream gateway in production.
pub fn auth_headers(user_id: i32) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&user_id.to_string()).unwrap(),
    )
}

/// Seed an owner-role user plus profile directly in the database.
pub async fn seed_owner(db: &DatabaseConnection, first_name: &str) -> owner_profile::Model {
    let seq = next_seq();
    let backing_user = user::ActiveModel {
        username: Set(format!("{}_{}", first_name.to_lowercase(), seq)),
        role: Set(user::Role::Owner),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create backing user");

    owner_profile::ActiveModel {
        user_id: Set(backing_user.id),
        national_id: Set(format!("NID-{seq:06}")),
        first_name: Set(first_name.to_string()),
        last_name: Set("Test".to_string()),
        gender: Set(owner_profile::Gender::Other),
        permanent_address: Set("1 Test Lane".to_string()),
        owner_type: Set(owner_profile::OwnerType::Individual),
        status: Set(owner_profile::OwnerStatus::Active),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create owner profile")
}

/// Seed an owner profile for an existing user.
pub async fn seed_profile_for(
    db: &DatabaseConnection,
    backing_user: &user::Model,
    first_name: &str,
) -> owner_profile::Model {
    let seq = next_seq();
    owner_profile::ActiveModel {
        user_id: Set(backing_user.id),
        national_id: Set(format!("NID-{seq:06}")),
        first_name: Set(first_name.to_string()),
        last_name: Set("Test".to_string()),
        gender: Set(owner_profile::Gender::Other),
        permanent_address: Set("1 Test Lane".to_string()),
        owner_type: Set(owner_profile::OwnerType::Individual),
        status: Set(owner_profile::OwnerStatus::Active),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create owner profile")
}

/// Seed a parcel.
pub async fn seed_parcel(db: &DatabaseConnection, is_active: bool) -> land_parcel::Model {
    let seq = next_seq();
    land_parcel::ActiveModel {
        location: Set(format!("Test location {seq}")),
        area: Set(750.0),
        cadastral_number: Set(format!("CAD-{seq:06}")),
        status: Set(if is_active { "active" } else { "inactive" }.to_string()),
        registration_date: Set(date(2020, 1, 1)),
        current_market_value: Set(Some(Decimal::new(10000000, 2))),
        is_active: Set(is_active),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create parcel")
}

/// Seed a current ownership record.
pub async fn seed_record(
    db: &DatabaseConnection,
    parcel_id: i32,
    owner_id: i32,
    percentage: Decimal,
    acquisition_date: NaiveDate,
) -> ownership_record::Model {
    ownership_record::ActiveModel {
        parcel_id: Set(parcel_id),
        owner_id: Set(owner_id),
        ownership_type: Set(ownership_record::OwnershipType::Sole),
        ownership_percentage: Set(percentage),
        acquisition_type: Set(ownership_record::AcquisitionType::Purchase),
        acquisition_date: Set(acquisition_date),
        verification_status: Set(ownership_record::VerificationStatus::Pending),
        is_current_owner: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create ownership record")
}
