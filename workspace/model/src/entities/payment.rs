use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{land_parcel, user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentType {
    #[sea_orm(string_value = "tax")]
    Tax,
    #[sea_orm(string_value = "fee")]
    Fee,
    #[sea_orm(string_value = "penalty")]
    Penalty,
}

/// A fee, tax or penalty payment against a parcel.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub parcel_id: i32,
    pub payer_id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub payment_date: NaiveDate,
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
        belongs_to = "user::Entity",
        from = "Column::PayerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Payer,
}

impl Related<land_parcel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parcel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
