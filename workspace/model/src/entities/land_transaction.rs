use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{land_parcel, owner_profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TransactionType {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "lease")]
    Lease,
    #[sea_orm(string_value = "inheritance")]
    Inheritance,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// A monetary event between two owners over a parcel. Records the business
/// side of a transfer; the legal side lives in `ownership_records`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "land_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub parcel_id: i32,
    pub buyer_id: Option<i32>,
    pub seller_id: Option<i32>,
    pub transaction_type: TransactionType,
    pub transaction_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub status: String,
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
        from = "Column::BuyerId",
        to = "owner_profile::Column::Id",
        on_delete = "SetNull"
    )]
    Buyer,
    #[sea_orm(
        belongs_to = "owner_profile::Entity",
        from = "Column::SellerId",
        to = "owner_profile::Column::Id",
        on_delete = "SetNull"
    )]
    Seller,
}

impl Related<land_parcel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parcel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
