use sea_orm::entity::prelude::*;

/// The role a user acts under. Every authorization decision in the
/// application matches exhaustively on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "officer")]
    Officer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Officers and admins form the registry staff with unrestricted reads.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Officer | Self::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Officer => "officer",
            Self::Admin => "admin",
        }
    }
}

/// Represents a user of the system.
///
/// Credentials are issued by the external authentication service; the
/// `password_hash` column only stores the opaque hash that service hands us.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub role: Role,
    pub password_hash: Option<String>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An owner-role user has at most one owner profile.
    #[sea_orm(has_many = "super::owner_profile::Entity")]
    OwnerProfile,
    #[sea_orm(has_many = "super::application::Entity")]
    Application,
}

impl Related<super::owner_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnerProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
