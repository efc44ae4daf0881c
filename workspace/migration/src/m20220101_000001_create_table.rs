use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string_len(Users::Role, 20).default("owner"))
                    .col(string_null(Users::PasswordHash))
                    .col(boolean(Users::IsActive).default(true))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(boolean(Users::IsSuperuser).default(false))
                    .to_owned(),
            )
            .await?;

        // Create owner_profiles table (1:1 extension of owner-role users)
        manager
            .create_table(
                Table::create()
                    .table(OwnerProfiles::Table)
                    .if_not_exists()
                    .col(pk_auto(OwnerProfiles::Id))
                    .col(integer(OwnerProfiles::UserId).unique_key())
                    .col(string(OwnerProfiles::NationalId).unique_key())
                    .col(string(OwnerProfiles::FirstName))
                    .col(string_null(OwnerProfiles::MiddleName))
                    .col(string(OwnerProfiles::LastName))
                    .col(date_null(OwnerProfiles::DateOfBirth))
                    .col(string_len(OwnerProfiles::Gender, 10))
                    .col(string_null(OwnerProfiles::ProfilePictureUrl))
                    .col(string_null(OwnerProfiles::IdCardFrontUrl))
                    .col(string_null(OwnerProfiles::IdCardBackUrl))
                    .col(string_null(OwnerProfiles::SignatureUrl))
                    .col(string_null(OwnerProfiles::ContactPhone))
                    .col(string_null(OwnerProfiles::ContactEmail))
                    .col(text(OwnerProfiles::PermanentAddress))
                    .col(text_null(OwnerProfiles::CurrentAddress))
                    .col(string_len(OwnerProfiles::OwnerType, 20).default("Individual"))
                    .col(string_null(OwnerProfiles::RegistrationNumber))
                    .col(string_null(OwnerProfiles::TaxId))
                    .col(string_null(OwnerProfiles::ContactPerson))
                    .col(text_null(OwnerProfiles::Notes))
                    .col(string_len(OwnerProfiles::Status, 20).default("Active"))
                    .col(timestamp(OwnerProfiles::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(OwnerProfiles::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_owner_profile_user")
                            .from(OwnerProfiles::Table, OwnerProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create land_parcels table. Ownership is derived through
        // ownership_records; there is deliberately no owner column here.
        manager
            .create_table(
                Table::create()
                    .table(LandParcels::Table)
                    .if_not_exists()
                    .col(pk_auto(LandParcels::ParcelId))
                    .col(string(LandParcels::Location))
                    .col(double(LandParcels::Area))
                    .col(string(LandParcels::CadastralNumber).unique_key())
                    .col(string_null(LandParcels::SurveyNumber))
                    .col(string_null(LandParcels::BlockNumber))
                    .col(string_null(LandParcels::SectorNumber))
                    .col(string_null(LandParcels::MouzaName))
                    .col(string_null(LandParcels::LandUseZone))
                    .col(string_len(LandParcels::Status, 50).default("active"))
                    .col(string_null(LandParcels::InNorth))
                    .col(string_null(LandParcels::InEast))
                    .col(string_null(LandParcels::InWest))
                    .col(string_null(LandParcels::InSouth))
                    .col(date(LandParcels::RegistrationDate))
                    .col(string_null(LandParcels::RegistrationNumber).unique_key())
                    .col(string_null(LandParcels::TitleDeedNumber))
                    .col(decimal_len_null(LandParcels::CurrentMarketValue, 15, 2))
                    .col(decimal_len_null(LandParcels::AnnualTaxValue, 15, 2))
                    .col(string_null(LandParcels::DevelopmentStatus))
                    .col(boolean(LandParcels::HasStructures).default(false))
                    .col(boolean(LandParcels::IsActive).default(true))
                    .col(timestamp(LandParcels::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(LandParcels::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create ownership_records table (the derivation core)
        manager
            .create_table(
                Table::create()
                    .table(OwnershipRecords::Table)
                    .if_not_exists()
                    .col(pk_auto(OwnershipRecords::Id))
                    .col(integer(OwnershipRecords::ParcelId))
                    .col(integer(OwnershipRecords::OwnerId))
                    .col(string_len(OwnershipRecords::OwnershipType, 20).default("Sole"))
                    .col(decimal_len(OwnershipRecords::OwnershipPercentage, 5, 2).default(100))
                    .col(string_len(OwnershipRecords::AcquisitionType, 25).default("Purchase"))
                    .col(date(OwnershipRecords::AcquisitionDate))
                    .col(decimal_len_null(OwnershipRecords::AcquisitionValue, 15, 2))
                    .col(string_null(OwnershipRecords::DeedNumber))
                    .col(date_null(OwnershipRecords::DeedDate))
                    .col(string_null(OwnershipRecords::RegistrationNumber))
                    .col(date_null(OwnershipRecords::RegistrationDate))
                    .col(string_null(OwnershipRecords::RegistrarOffice))
                    .col(decimal_len_null(OwnershipRecords::StampDutyPaid, 12, 2))
                    .col(date_null(OwnershipRecords::StartDate))
                    .col(date_null(OwnershipRecords::EndDate))
                    .col(decimal_len_null(OwnershipRecords::LeaseAmount, 12, 2))
                    .col(decimal_len_null(OwnershipRecords::MortgageAmount, 15, 2))
                    .col(string_null(OwnershipRecords::MortgageeName))
                    .col(date_null(OwnershipRecords::TransferDate))
                    .col(string_null(OwnershipRecords::TransferType))
                    .col(integer_null(OwnershipRecords::TransferTo))
                    .col(string_len(OwnershipRecords::VerificationStatus, 20).default("Pending"))
                    .col(integer_null(OwnershipRecords::VerifiedBy))
                    .col(date_null(OwnershipRecords::VerificationDate))
                    .col(text_null(OwnershipRecords::VerificationNotes))
                    .col(boolean(OwnershipRecords::IsCurrentOwner).default(true))
                    .col(integer_null(OwnershipRecords::CreatedBy))
                    .col(timestamp(OwnershipRecords::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(OwnershipRecords::UpdatedAt).default(Expr::current_timestamp()))
                    .col(text_null(OwnershipRecords::HistoryNotes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ownership_record_parcel")
                            .from(OwnershipRecords::Table, OwnershipRecords::ParcelId)
                            .to(LandParcels::Table, LandParcels::ParcelId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ownership_record_owner")
                            .from(OwnershipRecords::Table, OwnershipRecords::OwnerId)
                            .to(OwnerProfiles::Table, OwnerProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ownership_record_transfer_to")
                            .from(OwnershipRecords::Table, OwnershipRecords::TransferTo)
                            .to(OwnerProfiles::Table, OwnerProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ownership_record_verified_by")
                            .from(OwnershipRecords::Table, OwnershipRecords::VerifiedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ownership_record_created_by")
                            .from(OwnershipRecords::Table, OwnershipRecords::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes backing the current-owner derivation queries
        manager
            .create_index(
                Index::create()
                    .name("idx_ownership_records_parcel_current")
                    .table(OwnershipRecords::Table)
                    .col(OwnershipRecords::ParcelId)
                    .col(OwnershipRecords::IsCurrentOwner)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_ownership_records_owner_current")
                    .table(OwnershipRecords::Table)
                    .col(OwnershipRecords::OwnerId)
                    .col(OwnershipRecords::IsCurrentOwner)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_ownership_records_acquisition_date")
                    .table(OwnershipRecords::Table)
                    .col(OwnershipRecords::AcquisitionDate)
                    .to_owned(),
            )
            .await?;

        // Create documents table
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(pk_auto(Documents::Id))
                    .col(integer_null(Documents::OwnershipRecordId))
                    .col(integer_null(Documents::RelatedParcelId))
                    .col(string_len(Documents::DocType, 50))
                    .col(string_null(Documents::DocumentNumber))
                    .col(date_null(Documents::DocumentDate))
                    .col(string_null(Documents::IssuingAuthority))
                    .col(string_null(Documents::FileUrl))
                    .col(big_integer_null(Documents::FileSize))
                    .col(string_null(Documents::FileType))
                    .col(text_null(Documents::Description))
                    .col(integer_null(Documents::UploadedBy))
                    .col(timestamp(Documents::UploadedAt).default(Expr::current_timestamp()))
                    .col(boolean(Documents::IsVerified).default(false))
                    .col(integer_null(Documents::VerifiedBy))
                    .col(date_null(Documents::VerificationDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_ownership_record")
                            .from(Documents::Table, Documents::OwnershipRecordId)
                            .to(OwnershipRecords::Table, OwnershipRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_parcel")
                            .from(Documents::Table, Documents::RelatedParcelId)
                            .to(LandParcels::Table, LandParcels::ParcelId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_uploaded_by")
                            .from(Documents::Table, Documents::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create applications table
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(pk_auto(Applications::Id))
                    .col(integer(Applications::ApplicantId))
                    .col(integer(Applications::ParcelId))
                    .col(string_len(Applications::ApplicationType, 50))
                    .col(date(Applications::SubmittedDate))
                    .col(string_len(Applications::Status, 50).default("submitted"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_applicant")
                            .from(Applications::Table, Applications::ApplicantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_parcel")
                            .from(Applications::Table, Applications::ParcelId)
                            .to(LandParcels::Table, LandParcels::ParcelId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create approvals table
        manager
            .create_table(
                Table::create()
                    .table(Approvals::Table)
                    .if_not_exists()
                    .col(pk_auto(Approvals::Id))
                    .col(integer(Approvals::ApplicationId))
                    .col(integer(Approvals::ReviewerId))
                    .col(string_len(Approvals::Status, 50).default("pending"))
                    .col(text_null(Approvals::Comments))
                    .col(date(Approvals::Date))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_approval_application")
                            .from(Approvals::Table, Approvals::ApplicationId)
                            .to(Applications::Table, Applications::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_approval_reviewer")
                            .from(Approvals::Table, Approvals::ReviewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create payments table
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(integer(Payments::ParcelId))
                    .col(integer(Payments::PayerId))
                    .col(decimal_len(Payments::Amount, 12, 2))
                    .col(string_len(Payments::PaymentType, 50))
                    .col(date(Payments::PaymentDate))
                    .col(string_len(Payments::Status, 50).default("pending"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_parcel")
                            .from(Payments::Table, Payments::ParcelId)
                            .to(LandParcels::Table, LandParcels::ParcelId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_payer")
                            .from(Payments::Table, Payments::PayerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create land_transactions table
        manager
            .create_table(
                Table::create()
                    .table(LandTransactions::Table)
                    .if_not_exists()
                    .col(pk_auto(LandTransactions::Id))
                    .col(integer(LandTransactions::ParcelId))
                    .col(integer_null(LandTransactions::BuyerId))
                    .col(integer_null(LandTransactions::SellerId))
                    .col(string_len(LandTransactions::TransactionType, 50))
                    .col(date(LandTransactions::TransactionDate))
                    .col(decimal_len(LandTransactions::Amount, 12, 2))
                    .col(string_len(LandTransactions::Status, 50).default("pending"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_land_transaction_parcel")
                            .from(LandTransactions::Table, LandTransactions::ParcelId)
                            .to(LandParcels::Table, LandParcels::ParcelId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_land_transaction_buyer")
                            .from(LandTransactions::Table, LandTransactions::BuyerId)
                            .to(OwnerProfiles::Table, OwnerProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_land_transaction_seller")
                            .from(LandTransactions::Table, LandTransactions::SellerId)
                            .to(OwnerProfiles::Table, OwnerProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LandTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Approvals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OwnershipRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LandParcels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OwnerProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Role,
    PasswordHash,
    IsActive,
    IsStaff,
    IsSuperuser,
}

#[derive(DeriveIden)]
enum OwnerProfiles {
    Table,
    Id,
    UserId,
    NationalId,
    FirstName,
    MiddleName,
    LastName,
    DateOfBirth,
    Gender,
    ProfilePictureUrl,
    IdCardFrontUrl,
    IdCardBackUrl,
    SignatureUrl,
    ContactPhone,
    ContactEmail,
    PermanentAddress,
    CurrentAddress,
    OwnerType,
    RegistrationNumber,
    TaxId,
    ContactPerson,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LandParcels {
    Table,
    ParcelId,
    Location,
    Area,
    CadastralNumber,
    SurveyNumber,
    BlockNumber,
    SectorNumber,
    MouzaName,
    LandUseZone,
    Status,
    InNorth,
    InEast,
    InWest,
    InSouth,
    RegistrationDate,
    RegistrationNumber,
    TitleDeedNumber,
    CurrentMarketValue,
    AnnualTaxValue,
    DevelopmentStatus,
    HasStructures,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OwnershipRecords {
    Table,
    Id,
    ParcelId,
    OwnerId,
    OwnershipType,
    OwnershipPercentage,
    AcquisitionType,
    AcquisitionDate,
    AcquisitionValue,
    DeedNumber,
    DeedDate,
    RegistrationNumber,
    RegistrationDate,
    RegistrarOffice,
    StampDutyPaid,
    StartDate,
    EndDate,
    LeaseAmount,
    MortgageAmount,
    MortgageeName,
    TransferDate,
    TransferType,
    TransferTo,
    VerificationStatus,
    VerifiedBy,
    VerificationDate,
    VerificationNotes,
    IsCurrentOwner,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    HistoryNotes,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    OwnershipRecordId,
    RelatedParcelId,
    DocType,
    DocumentNumber,
    DocumentDate,
    IssuingAuthority,
    FileUrl,
    FileSize,
    FileType,
    Description,
    UploadedBy,
    UploadedAt,
    IsVerified,
    VerifiedBy,
    VerificationDate,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    ApplicantId,
    ParcelId,
    ApplicationType,
    SubmittedDate,
    Status,
}

#[derive(DeriveIden)]
enum Approvals {
    Table,
    Id,
    ApplicationId,
    ReviewerId,
    Status,
    Comments,
    Date,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    ParcelId,
    PayerId,
    Amount,
    PaymentType,
    PaymentDate,
    Status,
}

#[derive(DeriveIden)]
enum LandTransactions {
    Table,
    Id,
    ParcelId,
    BuyerId,
    SellerId,
    TransactionType,
    TransactionDate,
    Amount,
    Status,
}
