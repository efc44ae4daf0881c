use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::*;

use super::{land_parcel, ownership_record, user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum DocumentType {
    #[sea_orm(string_value = "Title_Deed")]
    TitleDeed,
    #[sea_orm(string_value = "Survey_Map")]
    SurveyMap,
    #[sea_orm(string_value = "Tax_Receipt")]
    TaxReceipt,
    #[sea_orm(string_value = "Identity_Proof")]
    IdentityProof,
    #[sea_orm(string_value = "Address_Proof")]
    AddressProof,
    #[sea_orm(string_value = "Sale_Deed")]
    SaleDeed,
    #[sea_orm(string_value = "Gift_Deed")]
    GiftDeed,
    #[sea_orm(string_value = "Mortgage_Deed")]
    MortgageDeed,
    #[sea_orm(string_value = "Partition_Deed")]
    PartitionDeed,
    #[sea_orm(string_value = "Court_Order")]
    CourtOrder,
    #[sea_orm(string_value = "Death_Certificate")]
    DeathCertificate,
    #[sea_orm(string_value = "Succession_Certificate")]
    SuccessionCertificate,
    #[sea_orm(string_value = "Building_Permit")]
    BuildingPermit,
    #[sea_orm(string_value = "Encumbrance_Certificate")]
    EncumbranceCertificate,
}

/// Evidence attached to an ownership record or a parcel. At least one of
/// the two links must be set; creation enforces it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ownership_record_id: Option<i32>,
    pub related_parcel_id: Option<i32>,
    pub doc_type: DocumentType,
    pub document_number: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub issuing_authority: Option<String>,
    /// URL the blob store returned for the uploaded file.
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<i32>,
    pub uploaded_at: NaiveDateTime,
    #[sea_orm(default_value = "false")]
    pub is_verified: bool,
    pub verified_by: Option<i32>,
    pub verification_date: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "ownership_record::Entity",
        from = "Column::OwnershipRecordId",
        to = "ownership_record::Column::Id",
        on_delete = "Cascade"
    )]
    OwnershipRecord,
    #[sea_orm(
        belongs_to = "land_parcel::Entity",
        from = "Column::RelatedParcelId",
        to = "land_parcel::Column::ParcelId",
        on_delete = "Cascade"
    )]
    Parcel,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UploadedBy",
        to = "user::Column::Id",
        on_delete = "SetNull"
    )]
    UploadedBy,
}

impl Related<ownership_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnershipRecord.def()
    }
}

impl Related<land_parcel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parcel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
