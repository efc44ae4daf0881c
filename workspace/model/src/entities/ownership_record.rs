use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{land_parcel, owner_profile, user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OwnershipType {
    #[sea_orm(string_value = "Sole")]
    Sole,
    #[sea_orm(string_value = "Joint")]
    Joint,
    #[sea_orm(string_value = "Co-owner")]
    CoOwner,
    #[sea_orm(string_value = "Leasehold")]
    Leasehold,
    #[sea_orm(string_value = "Mortgage")]
    Mortgage,
    #[sea_orm(string_value = "Easement")]
    Easement,
    #[sea_orm(string_value = "Power_of_Attorney")]
    PowerOfAttorney,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
pub enum AcquisitionType {
    #[sea_orm(string_value = "Purchase")]
    Purchase,
    #[sea_orm(string_value = "Inheritance")]
    Inheritance,
    #[sea_orm(string_value = "Gift")]
    Gift,
    #[sea_orm(string_value = "Government_Allocation")]
    GovernmentAllocation,
    #[sea_orm(string_value = "Auction")]
    Auction,
    #[sea_orm(string_value = "Exchange")]
    Exchange,
    #[sea_orm(string_value = "Court_Order")]
    CourtOrder,
    #[sea_orm(string_value = "Partition")]
    Partition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TransferType {
    #[sea_orm(string_value = "Sale")]
    Sale,
    #[sea_orm(string_value = "Gift")]
    Gift,
    #[sea_orm(string_value = "Inheritance")]
    Inheritance,
    #[sea_orm(string_value = "Foreclosure")]
    Foreclosure,
    #[sea_orm(string_value = "Surrender")]
    Surrender,
}

/// Legal-review state of an ownership claim. The allowed transitions are
/// enforced in the registry crate, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Verified")]
    Verified,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Under_Review")]
    UnderReview,
    #[sea_orm(string_value = "Disputed")]
    Disputed,
}

/// A timestamped claim linking one owner to one parcel with a percentage
/// share. Rows are never rewritten to point at a new owner; a transfer
/// closes the current row (`is_current_owner = false`) and opens a new one,
/// so the table keeps the full ownership history of every parcel.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ownership_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub parcel_id: i32,
    pub owner_id: i32,
    pub ownership_type: OwnershipType,
    /// Share of the parcel in percent, within [0, 100]. Current shares of a
    /// parcel must sum to at most 100; the registry crate enforces this.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub ownership_percentage: Decimal,
    pub acquisition_type: AcquisitionType,
    pub acquisition_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub acquisition_value: Option<Decimal>,
    pub deed_number: Option<String>,
    pub deed_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub registrar_office: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub stamp_duty_paid: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub lease_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub mortgage_amount: Option<Decimal>,
    pub mortgagee_name: Option<String>,
    pub transfer_date: Option<NaiveDate>,
    pub transfer_type: Option<TransferType>,
    /// Set on a closed record to the owner the share went to.
    pub transfer_to: Option<i32>,
    pub verification_status: VerificationStatus,
    pub verified_by: Option<i32>,
    pub verification_date: Option<NaiveDate>,
    pub verification_notes: Option<String>,
    /// True while this record is part of the parcel's current ownership.
    /// Only the atomic transfer operation flips it.
    #[sea_orm(default_value = "true")]
    pub is_current_owner: bool,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub history_notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "land_parcel::Entity",
        from = "Column::ParcelId",
        to = "land_parcel::Column::ParcelId",
        on_delete = "Cascade"
    )]
    Parcel,
    #[sea_orm(
        belongs_to = "owner_profile::Entity",
        from = "Column::OwnerId",
        to = "owner_profile::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "owner_profile::Entity",
        from = "Column::TransferTo",
        to = "owner_profile::Column::Id",
        on_delete = "SetNull"
    )]
    TransferToOwner,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::VerifiedBy",
        to = "user::Column::Id",
        on_delete = "SetNull"
    )]
    VerifiedBy,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::CreatedBy",
        to = "user::Column::Id",
        on_delete = "SetNull"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::document::Entity")]
    Document,
}

impl Related<land_parcel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parcel.def()
    }
}

/// The primary owner link; the `transfer_to` link stays reachable through
/// `Relation::TransferToOwner` explicitly.
impl Related<owner_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
