use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-role user counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDistribution {
    pub owners: u64,
    pub officers: u64,
    pub admins: u64,
}

/// A recent-activity feed entry; currently only owner registrations are
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecentActivity {
    pub id: i32,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub description: String,
    pub time: String,
}

impl RecentActivity {
    pub fn owner_registration(id: i32, full_name: &str) -> Self {
        Self {
            id,
            activity_type: "owner_registration".to_string(),
            description: format!("New owner registered: {full_name}"),
            time: "Recently".to_string(),
        }
    }
}

/// The dashboard aggregate. Field names are camelCase on the wire for
/// compatibility with existing dashboard clients.
///
/// Non-staff callers receive the `Default` value of this struct rather
/// than a permission error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_owners: u64,
    pub total_lands: u64,
    pub active_lands: u64,
    pub inactive_lands: u64,
    pub pending_lands: u64,
    /// Sum of current market values over all parcels; null values count
    /// as zero.
    pub land_value: Decimal,
    pub user_distribution: UserDistribution,
    pub owners_with_profiles: u64,
    pub total_registered_owners: u64,
    pub recent_activities: Vec<RecentActivity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_field_names_are_camel_case() {
        let stats = DashboardStats {
            total_users: 3,
            total_lands: 2,
            active_lands: 1,
            inactive_lands: 1,
            recent_activities: vec![RecentActivity::owner_registration(7, "Fatema Begum")],
            ..Default::default()
        };

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalUsers"], 3);
        assert_eq!(value["totalLands"], 2);
        assert_eq!(value["activeLands"], 1);
        assert_eq!(value["inactiveLands"], 1);
        assert_eq!(value["pendingLands"], 0);
        assert_eq!(value["userDistribution"]["owners"], 0);
        assert_eq!(value["recentActivities"][0]["type"], "owner_registration");
        assert_eq!(
            value["recentActivities"][0]["description"],
            "New owner registered: Fatema Begum"
        );
    }

    #[test]
    fn test_default_is_the_soft_denial_payload() {
        let stats = DashboardStats::default();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.land_value, Decimal::ZERO);
        assert!(stats.recent_activities.is_empty());
    }
}
