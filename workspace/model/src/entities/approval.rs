use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{application, user};

/// A review verdict on an application, written by registry staff.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "approvals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub application_id: i32,
    pub reviewer_id: i32,
    pub status: String,
    pub comments: Option<String>,
    pub date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "application::Entity",
        from = "Column::ApplicationId",
        to = "application::Column::Id",
        on_delete = "Cascade"
    )]
    Application,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::ReviewerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Reviewer,
}

impl Related<application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Application.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
