use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{land_parcel, user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ApplicationType {
    #[sea_orm(string_value = "change_use")]
    ChangeUse,
    #[sea_orm(string_value = "subdivision")]
    Subdivision,
    #[sea_orm(string_value = "consolidation")]
    Consolidation,
    #[sea_orm(string_value = "lease")]
    Lease,
}

/// A citizen request concerning a parcel. Status is a free-form tag with no
/// validated transitions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub applicant_id: i32,
    pub parcel_id: i32,
    pub application_type: ApplicationType,
    pub submitted_date: NaiveDate,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::ApplicantId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Applicant,
    #[sea_orm(
        belongs_to = "land_parcel::Entity",
        from = "Column::ParcelId",
        to = "land_parcel::Column::ParcelId",
        on_delete = "Cascade"
    )]
    Parcel,
    #[sea_orm(has_many = "super::approval::Entity")]
    Approval,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applicant.def()
    }
}

impl Related<land_parcel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parcel.def()
    }
}

impl Related<super::approval::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approval.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
