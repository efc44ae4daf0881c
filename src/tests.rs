#[cfg(test)]
mod integration_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use common::DashboardStats;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::handlers::owners::OwnerProfileResponse;
    use crate::handlers::parcels::ParcelResponse;
    use crate::handlers::records::{OwnershipRecordResponse, TransferResponse};
    use crate::handlers::users::UserResponse;
    use crate::schemas::ApiResponse;
    use crate::test_utils::{
        auth_headers, date, seed_owner, seed_parcel, seed_profile_for, seed_record,
        setup_test_app,
    };

    #[tokio::test]
    async fn test_health_check() {
        let (app, _context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_requests_without_identity_are_unauthorized() {
        let (app, _context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/parcels").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_my_parcels_empty_without_profile() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // The owner-role user has no owner profile; the endpoint must
        // return an empty list, not an error.
        let (name, value) = auth_headers(context.owner_user.id);
        let response = server.get("/api/v1/my-parcels").add_header(name, value).await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<ParcelResponse>> = response.json();
        assert!(body.success);
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_my_parcels_returns_owned_parcels() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let profile = seed_profile_for(context.db(), &context.owner_user, "Olivia").await;
        let owned = seed_parcel(context.db(), true).await;
        let other = seed_parcel(context.db(), true).await;
        seed_record(
            context.db(),
            owned.parcel_id,
            profile.id,
            Decimal::ONE_HUNDRED,
            date(2021, 4, 1),
        )
        .await;

        let (name, value) = auth_headers(context.owner_user.id);
        let response = server.get("/api/v1/my-parcels").add_header(name, value).await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<ParcelResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].parcel_id, owned.parcel_id);
        assert_ne!(body.data[0].parcel_id, other.parcel_id);
    }

    #[tokio::test]
    async fn test_transfer_closes_old_and_opens_new() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let seller = seed_owner(context.db(), "Selma").await;
        let buyer = seed_owner(context.db(), "Bashir").await;
        let parcel = seed_parcel(context.db(), true).await;
        let record = seed_record(
            context.db(),
            parcel.parcel_id,
            seller.id,
            Decimal::ONE_HUNDRED,
            date(2018, 6, 1),
        )
        .await;

        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .post("/api/v1/ownership-records/transfer")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "record_id": record.id,
                "to_owner_id": buyer.id,
                "transfer_type": "Sale",
                "transfer_date": "2024-02-01",
            }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<TransferResponse> = response.json();
        assert!(!body.data.closed.is_current_owner);
        assert_eq!(body.data.closed.transfer_date, Some(date(2024, 2, 1)));
        assert_eq!(body.data.closed.transfer_to, Some(buyer.id));
        assert!(body.data.opened.is_current_owner);
        assert_eq!(body.data.opened.owner_id, buyer.id);
        assert_eq!(body.data.opened.parcel_id, parcel.parcel_id);

        // The parcel's current owner set is now exactly the buyer
        let response = server
            .get("/api/v1/ownership-records")
            .add_header(name, value)
            .add_query_param("parcel_id", parcel.parcel_id)
            .add_query_param("current_only", "true")
            .await;
        let body: ApiResponse<Vec<OwnershipRecordResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].owner_id, buyer.id);
    }

    #[tokio::test]
    async fn test_transfer_to_missing_owner_commits_nothing() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let seller = seed_owner(context.db(), "Selma").await;
        let parcel = seed_parcel(context.db(), true).await;
        let record = seed_record(
            context.db(),
            parcel.parcel_id,
            seller.id,
            Decimal::ONE_HUNDRED,
            date(2018, 6, 1),
        )
        .await;

        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .post("/api/v1/ownership-records/transfer")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "record_id": record.id,
                "to_owner_id": 99999,
                "transfer_type": "Sale",
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // Neither the close nor the insert may have survived
        let response = server
            .get("/api/v1/ownership-records/parcel_history")
            .add_header(name, value)
            .add_query_param("parcel_id", parcel.parcel_id)
            .await;
        let body: ApiResponse<Vec<OwnershipRecordResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert!(body.data[0].is_current_owner);
        assert_eq!(body.data[0].transfer_date, None);
    }

    #[tokio::test]
    async fn test_transfer_of_historical_record_conflicts() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let seller = seed_owner(context.db(), "Selma").await;
        let buyer = seed_owner(context.db(), "Bashir").await;
        let parcel = seed_parcel(context.db(), true).await;
        let record = seed_record(
            context.db(),
            parcel.parcel_id,
            seller.id,
            Decimal::ONE_HUNDRED,
            date(2018, 6, 1),
        )
        .await;

        let (name, value) = auth_headers(context.officer.id);
        let transfer = json!({
            "record_id": record.id,
            "to_owner_id": buyer.id,
            "transfer_type": "Gift",
        });
        let response = server
            .post("/api/v1/ownership-records/transfer")
            .add_header(name.clone(), value.clone())
            .json(&transfer)
            .await;
        response.assert_status(StatusCode::OK);

        // The source record is historical now; transferring it again is a
        // consistency error.
        let response = server
            .post("/api/v1/ownership-records/transfer")
            .add_header(name, value)
            .json(&transfer)
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_verification_transitions() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let owner = seed_owner(context.db(), "Selma").await;
        let parcel = seed_parcel(context.db(), true).await;
        let record = seed_record(
            context.db(),
            parcel.parcel_id,
            owner.id,
            Decimal::ONE_HUNDRED,
            date(2018, 6, 1),
        )
        .await;

        // Pending -> Verified succeeds
        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .post(&format!("/api/v1/ownership-records/{}/verify", record.id))
            .add_header(name.clone(), value.clone())
            .json(&json!({"status": "Verified", "notes": "Deed checked"}))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<OwnershipRecordResponse> = response.json();
        assert_eq!(body.data.verification_status, "Verified");
        assert_eq!(body.data.verified_by, Some(context.officer.id));

        // Verified is terminal: Verified -> Pending fails
        let response = server
            .post(&format!("/api/v1/ownership-records/{}/verify", record.id))
            .add_header(name, value)
            .json(&json!({"status": "Pending"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_verification_requires_staff() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let owner = seed_owner(context.db(), "Selma").await;
        let parcel = seed_parcel(context.db(), true).await;
        let record = seed_record(
            context.db(),
            parcel.parcel_id,
            owner.id,
            Decimal::ONE_HUNDRED,
            date(2018, 6, 1),
        )
        .await;

        let (name, value) = auth_headers(context.owner_user.id);
        let response = server
            .post(&format!("/api/v1/ownership-records/{}/verify", record.id))
            .add_header(name, value)
            .json(&json!({"status": "Verified"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_share_sum_enforced_on_create() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let first = seed_owner(context.db(), "Selma").await;
        let second = seed_owner(context.db(), "Bashir").await;
        let parcel = seed_parcel(context.db(), true).await;
        seed_record(
            context.db(),
            parcel.parcel_id,
            first.id,
            Decimal::new(6000, 2), // 60.00
            date(2020, 1, 1),
        )
        .await;

        // 60 + 50 would exceed 100
        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .post("/api/v1/ownership-records")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "parcel_id": parcel.parcel_id,
                "owner_id": second.id,
                "ownership_type": "Joint",
                "ownership_percentage": "50",
                "acquisition_date": "2023-01-01",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // 60 + 40 fits exactly
        let response = server
            .post("/api/v1/ownership-records")
            .add_header(name, value)
            .json(&json!({
                "parcel_id": parcel.parcel_id,
                "owner_id": second.id,
                "ownership_type": "Joint",
                "ownership_percentage": "40",
                "acquisition_date": "2023-01-01",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_parcel_owners_lists_current_owners() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let older = seed_owner(context.db(), "Selma").await;
        let newer = seed_owner(context.db(), "Bashir").await;
        let parcel = seed_parcel(context.db(), true).await;
        seed_record(
            context.db(),
            parcel.parcel_id,
            older.id,
            Decimal::new(7000, 2),
            date(2019, 1, 1),
        )
        .await;
        seed_record(
            context.db(),
            parcel.parcel_id,
            newer.id,
            Decimal::new(3000, 2),
            date(2022, 1, 1),
        )
        .await;

        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .get(&format!("/api/v1/parcels/{}/owners", parcel.parcel_id))
            .add_header(name, value)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<common::CurrentOwnerEntry>> = response.json();
        assert_eq!(body.data.len(), 2);
        // Most recent acquisition first
        assert_eq!(body.data[0].owner_id, newer.id);
        assert_eq!(body.data[0].acquisition_date, date(2022, 1, 1));
        assert_eq!(body.data[1].owner_id, older.id);
        let total: Decimal = body.data.iter().map(|entry| entry.ownership_percentage).sum();
        assert_eq!(total, Decimal::ONE_HUNDRED);
    }

    #[tokio::test]
    async fn test_dashboard_stats_seeded() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Seed: the context already has 3 users (1 owner, 1 officer,
        // 1 admin); add 1 owner profile and 2 parcels, one inactive.
        seed_profile_for(context.db(), &context.owner_user, "Olivia").await;
        seed_parcel(context.db(), true).await;
        seed_parcel(context.db(), false).await;

        let (name, value) = auth_headers(context.admin.id);
        let response = server
            .get("/api/v1/accounts/dashboard-stats")
            .add_header(name, value)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<DashboardStats> = response.json();
        let stats = body.data;
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_owners, 1);
        assert_eq!(stats.total_lands, 2);
        assert_eq!(stats.active_lands, 1);
        assert_eq!(stats.inactive_lands, 1);
        assert_eq!(stats.pending_lands, 0);
        assert_eq!(stats.user_distribution.owners, 1);
        assert_eq!(stats.user_distribution.officers, 1);
        assert_eq!(stats.user_distribution.admins, 1);
        assert_eq!(stats.recent_activities.len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_stats_soft_denial_for_owner() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        seed_parcel(context.db(), true).await;

        // Non-staff callers get the all-zero payload with a success
        // status, not a permission error.
        let (name, value) = auth_headers(context.owner_user.id);
        let response = server
            .get("/api/v1/accounts/dashboard-stats")
            .add_header(name, value)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<DashboardStats> = response.json();
        assert_eq!(body.data, DashboardStats::default());
    }

    #[tokio::test]
    async fn test_owner_search() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        seed_profile_for(context.db(), &context.owner_user, "Olivia").await;

        // Match
        let (name, value) = auth_headers(context.admin.id);
        let response = server
            .get("/api/v1/owners/search")
            .add_header(name.clone(), value.clone())
            .add_query_param("username", &context.owner_user.username)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<OwnerProfileResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].first_name, "Olivia");

        // No match is still a success with an empty list
        let response = server
            .get("/api/v1/owners/search")
            .add_header(name.clone(), value.clone())
            .add_query_param("username", "nobody_here")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<OwnerProfileResponse>> = response.json();
        assert!(body.data.is_empty());

        // Missing parameter is a validation error
        let response = server
            .get("/api/v1/owners/search")
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Owners cannot search at all
        let (name, value) = auth_headers(context.owner_user.id);
        let response = server
            .get("/api/v1/owners/search")
            .add_header(name, value)
            .add_query_param("username", "anyone")
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_owner_history_requires_parameter() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .get("/api/v1/ownership-records/owner_history")
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_record_listing_is_scoped_to_own_records() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let own_profile = seed_profile_for(context.db(), &context.owner_user, "Olivia").await;
        let other = seed_owner(context.db(), "Selma").await;
        let parcel_a = seed_parcel(context.db(), true).await;
        let parcel_b = seed_parcel(context.db(), true).await;
        seed_record(
            context.db(),
            parcel_a.parcel_id,
            own_profile.id,
            Decimal::ONE_HUNDRED,
            date(2020, 1, 1),
        )
        .await;
        seed_record(
            context.db(),
            parcel_b.parcel_id,
            other.id,
            Decimal::ONE_HUNDRED,
            date(2020, 1, 1),
        )
        .await;

        // The owner sees one record, staff see both
        let (name, value) = auth_headers(context.owner_user.id);
        let response = server
            .get("/api/v1/ownership-records")
            .add_header(name, value)
            .await;
        let body: ApiResponse<Vec<OwnershipRecordResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].owner_id, own_profile.id);

        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .get("/api/v1/ownership-records")
            .add_header(name, value)
            .await;
        let body: ApiResponse<Vec<OwnershipRecordResponse>> = response.json();
        assert_eq!(body.data.len(), 2);
    }

    #[tokio::test]
    async fn test_user_management_is_admin_only() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let request = json!({"username": "new_officer", "role": "officer"});

        // Officers cannot manage users
        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .post("/api/v1/users")
            .add_header(name, value)
            .json(&request)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        // Admins can
        let (name, value) = auth_headers(context.admin.id);
        let response = server
            .post("/api/v1/users")
            .add_header(name.clone(), value.clone())
            .json(&request)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.data.username, "new_officer");
        assert_eq!(body.data.role, "officer");
        assert!(body.data.is_staff);

        // Unknown role strings are rejected
        let response = server
            .post("/api/v1/users")
            .add_header(name, value)
            .json(&json!({"username": "x", "role": "citizen"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_owner_profile_requires_owner_role_user() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (name, value) = auth_headers(context.admin.id);
        let response = server
            .post("/api/v1/owners")
            .add_header(name, value)
            .json(&json!({
                "username": context.officer.username,
                "national_id": "NID-X-1",
                "first_name": "Oscar",
                "last_name": "Officer",
                "gender": "Male",
                "permanent_address": "2 Office Road",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parcel_filter_by_owner_name() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let selma = seed_owner(context.db(), "Selma").await;
        seed_owner(context.db(), "Bashir").await;
        let owned = seed_parcel(context.db(), true).await;
        seed_parcel(context.db(), true).await;
        seed_record(
            context.db(),
            owned.parcel_id,
            selma.id,
            Decimal::ONE_HUNDRED,
            date(2021, 1, 1),
        )
        .await;

        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .get("/api/v1/parcels")
            .add_header(name, value)
            .add_query_param("owner_name", "Selm")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<ParcelResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].parcel_id, owned.parcel_id);
    }

    #[tokio::test]
    async fn test_document_must_reference_record_or_parcel() {
        let (app, context) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (name, value) = auth_headers(context.officer.id);
        let response = server
            .post("/api/v1/documents")
            .add_header(name.clone(), value.clone())
            .json(&json!({"doc_type": "Title_Deed"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let parcel = seed_parcel(context.db(), true).await;
        let response = server
            .post("/api/v1/documents")
            .add_header(name, value)
            .json(&json!({
                "doc_type": "Title_Deed",
                "related_parcel_id": parcel.parcel_id,
                "file_url": "/media/deeds/deed-1.pdf",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }
}
