use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One current owner of a parcel: profile summary plus the share and
/// acquisition date taken from the ownership record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentOwnerEntry {
    pub record_id: i32,
    pub owner_id: i32,
    pub national_id: String,
    pub full_name: String,
    pub owner_status: String,
    pub ownership_type: String,
    pub ownership_percentage: Decimal,
    pub acquisition_date: NaiveDate,
    pub verification_status: String,
}

/// Aggregate numbers for the parcel listing screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParcelStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub pending: u64,
    pub total_value: Decimal,
    pub total_area: f64,
}
