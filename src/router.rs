use crate::handlers::{
    applications::{
        create_application, delete_application, get_application, get_applications,
        update_application,
    },
    approvals::{create_approval, delete_approval, get_approval, get_approvals, update_approval},
    dashboard::dashboard_stats,
    documents::{
        create_document, delete_document, get_document, get_documents, update_document,
        upload_document,
    },
    health::health_check,
    owners::{
        create_owner, delete_owner, get_my_profile, get_owner, get_owners, search_owners,
        update_owner,
    },
    parcels::{
        create_parcel, delete_parcel, get_my_parcels, get_parcel, get_parcel_owners,
        get_parcel_stats, get_parcels, update_parcel,
    },
    payments::{create_payment, delete_payment, get_payment, get_payments, update_payment},
    records::{
        create_record, delete_record, get_current_owners, get_owner_history, get_parcel_history,
        get_record, get_records, transfer_record, update_record, verify_record,
    },
    transactions::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes (admin only)
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Owner profile routes
        .route("/api/v1/owners", post(create_owner))
        .route("/api/v1/owners", get(get_owners))
        .route("/api/v1/owners/search", get(search_owners))
        .route("/api/v1/owners/me", get(get_my_profile))
        .route("/api/v1/owners/:owner_id", get(get_owner))
        .route("/api/v1/owners/:owner_id", put(update_owner))
        .route("/api/v1/owners/:owner_id", delete(delete_owner))
        // Parcel routes, including the owner-derivation views
        .route("/api/v1/parcels", post(create_parcel))
        .route("/api/v1/parcels", get(get_parcels))
        .route("/api/v1/parcels/stats", get(get_parcel_stats))
        .route("/api/v1/parcels/:parcel_id", get(get_parcel))
        .route("/api/v1/parcels/:parcel_id", put(update_parcel))
        .route("/api/v1/parcels/:parcel_id", delete(delete_parcel))
        .route("/api/v1/parcels/:parcel_id/owners", get(get_parcel_owners))
        .route("/api/v1/my-parcels", get(get_my_parcels))
        // Ownership record routes: CRUD plus derivation, transfer and
        // verification operations
        .route("/api/v1/ownership-records", post(create_record))
        .route("/api/v1/ownership-records", get(get_records))
        .route(
            "/api/v1/ownership-records/current_owners",
            get(get_current_owners),
        )
        .route(
            "/api/v1/ownership-records/owner_history",
            get(get_owner_history),
        )
        .route(
            "/api/v1/ownership-records/parcel_history",
            get(get_parcel_history),
        )
        .route("/api/v1/ownership-records/transfer", post(transfer_record))
        .route("/api/v1/ownership-records/:record_id", get(get_record))
        .route("/api/v1/ownership-records/:record_id", put(update_record))
        .route(
            "/api/v1/ownership-records/:record_id",
            delete(delete_record),
        )
        .route(
            "/api/v1/ownership-records/:record_id/verify",
            post(verify_record),
        )
        // Document routes
        .route("/api/v1/documents", post(create_document))
        .route("/api/v1/documents", get(get_documents))
        .route("/api/v1/documents/upload", post(upload_document))
        .route("/api/v1/documents/:document_id", get(get_document))
        .route("/api/v1/documents/:document_id", put(update_document))
        .route("/api/v1/documents/:document_id", delete(delete_document))
        // Application workflow routes
        .route("/api/v1/applications", post(create_application))
        .route("/api/v1/applications", get(get_applications))
        .route("/api/v1/applications/:application_id", get(get_application))
        .route(
            "/api/v1/applications/:application_id",
            put(update_application),
        )
        .route(
            "/api/v1/applications/:application_id",
            delete(delete_application),
        )
        .route("/api/v1/approvals", post(create_approval))
        .route("/api/v1/approvals", get(get_approvals))
        .route("/api/v1/approvals/:approval_id", get(get_approval))
        .route("/api/v1/approvals/:approval_id", put(update_approval))
        .route("/api/v1/approvals/:approval_id", delete(delete_approval))
        // Payment routes
        .route("/api/v1/payments", post(create_payment))
        .route("/api/v1/payments", get(get_payments))
        .route("/api/v1/payments/:payment_id", get(get_payment))
        .route("/api/v1/payments/:payment_id", put(update_payment))
        .route("/api/v1/payments/:payment_id", delete(delete_payment))
        // Land transaction routes
        .route("/api/v1/transactions", post(create_transaction))
        .route("/api/v1/transactions", get(get_transactions))
        .route("/api/v1/transactions/:transaction_id", get(get_transaction))
        .route(
            "/api/v1/transactions/:transaction_id",
            put(update_transaction),
        )
        .route(
            "/api/v1/transactions/:transaction_id",
            delete(delete_transaction),
        )
        // Dashboard statistics
        .route("/api/v1/accounts/dashboard-stats", get(dashboard_stats))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
