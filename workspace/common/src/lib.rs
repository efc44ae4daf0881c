//! Common transport-layer types shared across the backend.
//! These structs mirror the handlers' response payloads so aggregation
//! results can be cached and serialized without duplicating shapes.

mod dashboard;
mod owners;

pub use dashboard::{DashboardStats, RecentActivity, UserDistribution};
pub use owners::{CurrentOwnerEntry, ParcelStats};
