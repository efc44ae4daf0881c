use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::*;

use super::user;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Gender {
    #[sea_orm(string_value = "Male")]
    Male,
    #[sea_orm(string_value = "Female")]
    Female,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OwnerType {
    #[sea_orm(string_value = "Individual")]
    Individual,
    #[sea_orm(string_value = "Company")]
    Company,
    #[sea_orm(string_value = "Government")]
    Government,
    #[sea_orm(string_value = "Trust")]
    Trust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OwnerStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
    #[sea_orm(string_value = "Deceased")]
    Deceased,
}

/// Biographic extension of an owner-role user. Exactly one profile per
/// user; parcels are never linked to this table directly, only through
/// ownership records.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "owner_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(unique)]
    pub national_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    /// Image references are URLs handed back by the external blob store.
    pub profile_picture_url: Option<String>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub signature_url: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub permanent_address: String,
    pub current_address: Option<String>,
    pub owner_type: OwnerType,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub contact_person: Option<String>,
    pub notes: Option<String>,
    pub status: OwnerStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Model {
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::ownership_record::Entity")]
    OwnershipRecord,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ownership_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnershipRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
