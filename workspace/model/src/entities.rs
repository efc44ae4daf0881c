//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the land registry application here.
//! Ownership is deliberately modeled as a join table between parcels and
//! owner profiles rather than a foreign key on the parcel, so joint
//! ownership and transfer history stay representable.

pub mod application;
pub mod approval;
pub mod document;
pub mod land_parcel;
pub mod land_transaction;
pub mod owner_profile;
pub mod ownership_record;
pub mod payment;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::application::Entity as Application;
    pub use super::approval::Entity as Approval;
    pub use super::document::Entity as Document;
    pub use super::land_parcel::Entity as LandParcel;
    pub use super::land_transaction::Entity as LandTransaction;
    pub use super::owner_profile::Entity as OwnerProfile;
    pub use super::ownership_record::Entity as OwnershipRecord;
    pub use super::payment::Entity as Payment;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create users, one per role
        let admin = user::ActiveModel {
            username: Set("registrar".to_string()),
            role: Set(user::Role::Admin),
            is_staff: Set(true),
            is_superuser: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let owner_user = user::ActiveModel {
            username: Set("fatema".to_string()),
            role: Set(user::Role::Owner),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let second_owner_user = user::ActiveModel {
            username: Set("rahim".to_string()),
            role: Set(user::Role::Owner),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create owner profiles
        let owner = owner_profile::ActiveModel {
            user_id: Set(owner_user.id),
            national_id: Set("NID-1001".to_string()),
            first_name: Set("Fatema".to_string()),
            last_name: Set("Begum".to_string()),
            gender: Set(owner_profile::Gender::Female),
            permanent_address: Set("12 Lake Road".to_string()),
            owner_type: Set(owner_profile::OwnerType::Individual),
            status: Set(owner_profile::OwnerStatus::Active),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let second_owner = owner_profile::ActiveModel {
            user_id: Set(second_owner_user.id),
            national_id: Set("NID-1002".to_string()),
            first_name: Set("Rahim".to_string()),
            last_name: Set("Uddin".to_string()),
            gender: Set(owner_profile::Gender::Male),
            permanent_address: Set("7 Hill Street".to_string()),
            owner_type: Set(owner_profile::OwnerType::Individual),
            status: Set(owner_profile::OwnerStatus::Active),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a parcel; note there is no owner column to set
        let parcel = land_parcel::ActiveModel {
            location: Set("Ward 4, Block B".to_string()),
            area: Set(1200.5),
            cadastral_number: Set("CAD-2023-0001".to_string()),
            status: Set("active".to_string()),
            land_use_zone: Set(Some(land_parcel::LandUseZone::Residential)),
            registration_date: Set(date(2023, 3, 1)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Joint ownership: two current records on the same parcel
        let record1 = ownership_record::ActiveModel {
            parcel_id: Set(parcel.parcel_id),
            owner_id: Set(owner.id),
            ownership_type: Set(ownership_record::OwnershipType::Joint),
            ownership_percentage: Set(Decimal::new(6000, 2)), // 60.00
            acquisition_type: Set(ownership_record::AcquisitionType::Purchase),
            acquisition_date: Set(date(2023, 3, 1)),
            verification_status: Set(ownership_record::VerificationStatus::Pending),
            is_current_owner: Set(true),
            created_by: Set(Some(admin.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let record2 = ownership_record::ActiveModel {
            parcel_id: Set(parcel.parcel_id),
            owner_id: Set(second_owner.id),
            ownership_type: Set(ownership_record::OwnershipType::Joint),
            ownership_percentage: Set(Decimal::new(4000, 2)), // 40.00
            acquisition_type: Set(ownership_record::AcquisitionType::Inheritance),
            acquisition_date: Set(date(2023, 5, 10)),
            verification_status: Set(ownership_record::VerificationStatus::Verified),
            is_current_owner: Set(true),
            created_by: Set(Some(admin.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Attach a document to the first record
        let deed = document::ActiveModel {
            ownership_record_id: Set(Some(record1.id)),
            related_parcel_id: Set(Some(parcel.parcel_id)),
            doc_type: Set(document::DocumentType::TitleDeed),
            file_url: Set(Some("/media/deeds/deed-0001.pdf".to_string())),
            uploaded_by: Set(Some(admin.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Workflow entities
        let application = application::ActiveModel {
            applicant_id: Set(owner_user.id),
            parcel_id: Set(parcel.parcel_id),
            application_type: Set(application::ApplicationType::ChangeUse),
            submitted_date: Set(date(2023, 6, 1)),
            status: Set("submitted".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        approval::ActiveModel {
            application_id: Set(application.id),
            reviewer_id: Set(admin.id),
            status: Set("pending".to_string()),
            date: Set(date(2023, 6, 2)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        payment::ActiveModel {
            parcel_id: Set(parcel.parcel_id),
            payer_id: Set(owner_user.id),
            amount: Set(Decimal::new(150000, 2)),
            payment_type: Set(payment::PaymentType::Tax),
            payment_date: Set(date(2023, 7, 1)),
            status: Set("paid".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        land_transaction::ActiveModel {
            parcel_id: Set(parcel.parcel_id),
            buyer_id: Set(Some(second_owner.id)),
            seller_id: Set(Some(owner.id)),
            transaction_type: Set(land_transaction::TransactionType::Sale),
            transaction_date: Set(date(2023, 5, 10)),
            amount: Set(Decimal::new(50000000, 2)),
            status: Set("completed".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 3);
        assert!(users.iter().any(|u| u.role == user::Role::Admin));

        let owners = OwnerProfile::find().all(&db).await?;
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].full_name(), "Fatema Begum");

        // Current owners of the parcel derive purely from ownership records
        let current = OwnershipRecord::find()
            .filter(ownership_record::Column::ParcelId.eq(parcel.parcel_id))
            .filter(ownership_record::Column::IsCurrentOwner.eq(true))
            .all(&db)
            .await?;
        assert_eq!(current.len(), 2);
        let share: Decimal = current.iter().map(|r| r.ownership_percentage).sum();
        assert_eq!(share, Decimal::new(10000, 2));

        // Documents hang off both record and parcel
        let documents = Document::find()
            .filter(document::Column::OwnershipRecordId.eq(record1.id))
            .all(&db)
            .await?;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, deed.id);

        // Join through the owner relation
        let fatema_records = OwnershipRecord::find()
            .filter(ownership_record::Column::OwnerId.eq(owner.id))
            .all(&db)
            .await?;
        assert_eq!(fatema_records.len(), 1);
        assert_eq!(fatema_records[0].id, record1.id);
        assert_eq!(record2.owner_id, second_owner.id);

        Ok(())
    }
}
