use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum LandUseZone {
    #[sea_orm(string_value = "Residential")]
    Residential,
    #[sea_orm(string_value = "Commercial")]
    Commercial,
    #[sea_orm(string_value = "Industrial")]
    Industrial,
    #[sea_orm(string_value = "Agricultural")]
    Agricultural,
    #[sea_orm(string_value = "Public")]
    Public,
    #[sea_orm(string_value = "Mixed")]
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
pub enum DevelopmentStatus {
    #[sea_orm(string_value = "Undeveloped")]
    Undeveloped,
    #[sea_orm(string_value = "Under_Construction")]
    UnderConstruction,
    #[sea_orm(string_value = "Developed")]
    Developed,
    #[sea_orm(string_value = "Government_Hold")]
    GovernmentHold,
}

/// A unit of land identified by its cadastral number.
///
/// Deliberately carries no owner foreign key: ownership is a time-varying
/// many-to-many relation derived through `ownership_records`, which is what
/// makes joint ownership, history and transfers representable without
/// schema changes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "land_parcels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub parcel_id: i32,
    pub location: String,
    #[sea_orm(column_type = "Double")]
    pub area: f64,
    #[sea_orm(unique)]
    pub cadastral_number: String,
    pub survey_number: Option<String>,
    pub block_number: Option<String>,
    pub sector_number: Option<String>,
    pub mouza_name: Option<String>,
    pub land_use_zone: Option<LandUseZone>,
    /// Free-form lifecycle tag ("active", "inactive", "pending"); not a
    /// validated state machine.
    pub status: String,
    pub in_north: Option<String>,
    pub in_east: Option<String>,
    pub in_west: Option<String>,
    pub in_south: Option<String>,
    pub registration_date: NaiveDate,
    #[sea_orm(unique)]
    pub registration_number: Option<String>,
    pub title_deed_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub current_market_value: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub annual_tax_value: Option<Decimal>,
    pub development_status: Option<DevelopmentStatus>,
    #[sea_orm(default_value = "false")]
    pub has_structures: bool,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ownership_record::Entity")]
    OwnershipRecord,
    #[sea_orm(has_many = "super::document::Entity")]
    Document,
    #[sea_orm(has_many = "super::application::Entity")]
    Application,
}

impl Related<super::ownership_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnershipRecord.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
