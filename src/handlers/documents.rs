use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use model::entities::{document, land_parcel, ownership_record};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::{parse_enum, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for registering a document. At least one of
/// `ownership_record_id` / `related_parcel_id` must be set.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateDocumentRequest {
    pub ownership_record_id: Option<i32>,
    pub related_parcel_id: Option<i32>,
    /// One of the registered document types, e.g. "Title_Deed"
    pub doc_type: String,
    pub document_number: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub issuing_authority: Option<String>,
    /// URL returned by the blob store for an already-uploaded file
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub description: Option<String>,
}

/// Request body for updating a document
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateDocumentRequest {
    pub document_number: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub issuing_authority: Option<String>,
    pub description: Option<String>,
    pub is_verified: Option<bool>,
}

/// Document response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: i32,
    pub ownership_record_id: Option<i32>,
    pub related_parcel_id: Option<i32>,
    pub doc_type: String,
    pub document_number: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub issuing_authority: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<i32>,
    pub uploaded_at: NaiveDateTime,
    pub is_verified: bool,
}

impl From<document::Model> for DocumentResponse {
    fn from(model: document::Model) -> Self {
        Self {
            id: model.id,
            ownership_record_id: model.ownership_record_id,
            related_parcel_id: model.related_parcel_id,
            doc_type: model.doc_type.to_value(),
            document_number: model.document_number,
            document_date: model.document_date,
            issuing_authority: model.issuing_authority,
            file_url: model.file_url,
            file_size: model.file_size,
            file_type: model.file_type,
            description: model.description,
            uploaded_by: model.uploaded_by,
            uploaded_at: model.uploaded_at,
            is_verified: model.is_verified,
        }
    }
}

/// Query parameters for listing documents
#[derive(Debug, Deserialize, ToSchema)]
pub struct DocumentListQuery {
    /// Filter by ownership record
    pub ownership_record: Option<i32>,
    /// Filter by related parcel
    pub parcel_id: Option<i32>,
    pub doc_type: Option<String>,
}

/// Ensures the document links point at existing rows and at least one
/// link is present.
async fn check_links(
    state: &AppState,
    ownership_record_id: Option<i32>,
    related_parcel_id: Option<i32>,
) -> Result<(), ApiError> {
    if ownership_record_id.is_none() && related_parcel_id.is_none() {
        return Err(ApiError::validation(
            "A document must reference an ownership record or a parcel",
        ));
    }
    if let Some(record_id) = ownership_record_id {
        ownership_record::Entity::find_by_id(record_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                ApiError::not_found(format!("Ownership record {record_id} does not exist"))
            })?;
    }
    if let Some(parcel_id) = related_parcel_id {
        land_parcel::Entity::find_by_id(parcel_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Parcel {parcel_id} does not exist")))?;
    }
    Ok(())
}

/// List documents with filters, scoped by role
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Documents retrieved successfully", body = ApiResponse<Vec<DocumentResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_documents(
    auth: AuthUser,
    Query(query): Query<DocumentListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DocumentResponse>>>, ApiError> {
    let mut finder = document::Entity::find();

    // Owners see documents reachable through their own profile: attached
    // to their records or to parcels they currently own.
    if !auth.is_registry_staff() {
        let Some(profile) = auth.owner_profile(&state.db).await? else {
            return Ok(Json(ApiResponse {
                data: Vec::new(),
                message: "Documents retrieved successfully".to_string(),
                success: true,
            }));
        };
        let record_ids: Vec<i32> = ownership_record::Entity::find()
            .select_only()
            .column(ownership_record::Column::Id)
            .filter(ownership_record::Column::OwnerId.eq(profile.id))
            .into_tuple()
            .all(&state.db)
            .await?;
        let parcel_ids = registry::ownership::owned_parcel_ids(&state.db, profile.id).await?;
        finder = finder.filter(
            Condition::any()
                .add(document::Column::OwnershipRecordId.is_in(record_ids))
                .add(document::Column::RelatedParcelId.is_in(parcel_ids)),
        );
    }

    if let Some(record_id) = query.ownership_record {
        finder = finder.filter(document::Column::OwnershipRecordId.eq(record_id));
    }
    if let Some(parcel_id) = query.parcel_id {
        finder = finder.filter(document::Column::RelatedParcelId.eq(parcel_id));
    }
    if let Some(raw) = &query.doc_type {
        let doc_type: document::DocumentType = parse_enum(raw, "doc_type")?;
        finder = finder.filter(document::Column::DocType.eq(doc_type));
    }

    let documents = finder
        .order_by_desc(document::Column::UploadedAt)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} documents", documents.len());

    let response = ApiResponse {
        data: documents.into_iter().map(DocumentResponse::from).collect(),
        message: "Documents retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific document
#[utoipa::path(
    get,
    path = "/api/v1/documents/{document_id}",
    tag = "documents",
    params(
        ("document_id" = i32, Path, description = "Document ID"),
    ),
    responses(
        (status = 200, description = "Document retrieved successfully", body = ApiResponse<DocumentResponse>),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_document(
    auth: AuthUser,
    Path(document_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DocumentResponse>>, ApiError> {
    let doc = document::Entity::find_by_id(document_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Document {document_id} does not exist")))?;

    if !auth.is_registry_staff() {
        let reachable = match auth.owner_profile(&state.db).await? {
            Some(profile) => {
                let own_records: Vec<i32> = ownership_record::Entity::find()
                    .select_only()
                    .column(ownership_record::Column::Id)
                    .filter(ownership_record::Column::OwnerId.eq(profile.id))
                    .into_tuple()
                    .all(&state.db)
                    .await?;
                let own_parcels =
                    registry::ownership::owned_parcel_ids(&state.db, profile.id).await?;
                doc.ownership_record_id
                    .map(|id| own_records.contains(&id))
                    .unwrap_or(false)
                    || doc
                        .related_parcel_id
                        .map(|id| own_parcels.contains(&id))
                        .unwrap_or(false)
            }
            None => false,
        };
        if !reachable {
            warn!(
                "User {} denied access to document {}",
                auth.user.username, document_id
            );
            return Err(ApiError::not_found(format!(
                "Document {document_id} does not exist"
            )));
        }
    }

    let response = ApiResponse {
        data: DocumentResponse::from(doc),
        message: "Document retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Register a document with an already-stored file (staff only)
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created successfully", body = ApiResponse<DocumentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DocumentResponse>>), ApiError> {
    auth.require_staff()?;
    check_links(&state, request.ownership_record_id, request.related_parcel_id).await?;

    let doc_type: document::DocumentType = parse_enum(&request.doc_type, "doc_type")?;

    let doc = document::ActiveModel {
        ownership_record_id: Set(request.ownership_record_id),
        related_parcel_id: Set(request.related_parcel_id),
        doc_type: Set(doc_type),
        document_number: Set(request.document_number.clone()),
        document_date: Set(request.document_date),
        issuing_authority: Set(request.issuing_authority.clone()),
        file_url: Set(request.file_url.clone()),
        file_size: Set(request.file_size),
        file_type: Set(request.file_type.clone()),
        description: Set(request.description.clone()),
        uploaded_by: Set(Some(auth.id())),
        is_verified: Set(false),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Document {} created", doc.id);
    let response = ApiResponse {
        data: DocumentResponse::from(doc),
        message: "Document created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Upload a document file and register it in one request (staff only).
/// Multipart fields: `file` plus the textual fields of
/// [`CreateDocumentRequest`].
#[utoipa::path(
    post,
    path = "/api/v1/documents/upload",
    tag = "documents",
    responses(
        (status = 201, description = "Document uploaded successfully", body = ApiResponse<DocumentResponse>),
        (status = 400, description = "Invalid multipart payload", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn upload_document(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<DocumentResponse>>), ApiError> {
    auth.require_staff()?;

    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut doc_type: Option<String> = None;
    let mut ownership_record_id: Option<i32> = None;
    let mut related_parcel_id: Option<i32> = None;
    let mut document_number: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::validation(format!("Malformed multipart payload: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let content_type = field.content_type().map(|value| value.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::validation(format!("Failed to read upload: {err}")))?;
                file = Some((filename, content_type, data.to_vec()));
            }
            "doc_type" => doc_type = Some(read_text(field).await?),
            "ownership_record_id" => {
                ownership_record_id = Some(read_int(field, "ownership_record_id").await?);
            }
            "related_parcel_id" => {
                related_parcel_id = Some(read_int(field, "related_parcel_id").await?);
            }
            "document_number" => document_number = Some(read_text(field).await?),
            "description" => description = Some(read_text(field).await?),
            other => {
                debug!("Ignoring unknown multipart field '{}'", other);
            }
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| ApiError::validation("file field is required"))?;
    let raw_doc_type = doc_type.ok_or_else(|| ApiError::validation("doc_type field is required"))?;
    let doc_type: document::DocumentType = parse_enum(&raw_doc_type, "doc_type")?;

    check_links(&state, ownership_record_id, related_parcel_id).await?;

    let file_url = state.blobs.store(&filename, &data).await.map_err(|err| {
        error!("Blob store rejected upload '{}': {}", filename, err);
        ApiError::Internal
    })?;

    let doc = document::ActiveModel {
        ownership_record_id: Set(ownership_record_id),
        related_parcel_id: Set(related_parcel_id),
        doc_type: Set(doc_type),
        document_number: Set(document_number),
        file_url: Set(Some(file_url)),
        file_size: Set(Some(data.len() as i64)),
        file_type: Set(content_type),
        description: Set(description),
        uploaded_by: Set(Some(auth.id())),
        is_verified: Set(false),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Document {} uploaded ({} bytes)", doc.id, data.len());
    let response = ApiResponse {
        data: DocumentResponse::from(doc),
        message: "Document uploaded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| ApiError::validation(format!("Malformed multipart field: {err}")))
}

async fn read_int(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<i32, ApiError> {
    let text = read_text(field).await?;
    text.parse()
        .map_err(|_| ApiError::validation(format!("{name} must be an integer")))
}

/// Update document metadata (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/documents/{document_id}",
    tag = "documents",
    params(
        ("document_id" = i32, Path, description = "Document ID"),
    ),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated successfully", body = ApiResponse<DocumentResponse>),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_document(
    auth: AuthUser,
    Path(document_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<ApiResponse<DocumentResponse>>, ApiError> {
    auth.require_staff()?;

    let existing = document::Entity::find_by_id(document_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Document {document_id} does not exist")))?;

    let mut active: document::ActiveModel = existing.into();
    if let Some(document_number) = request.document_number {
        active.document_number = Set(Some(document_number));
    }
    if let Some(document_date) = request.document_date {
        active.document_date = Set(Some(document_date));
    }
    if let Some(issuing_authority) = request.issuing_authority {
        active.issuing_authority = Set(Some(issuing_authority));
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(is_verified) = request.is_verified {
        active.is_verified = Set(is_verified);
        if is_verified {
            active.verified_by = Set(Some(auth.id()));
            active.verification_date = Set(Some(chrono::Utc::now().date_naive()));
        }
    }

    let updated = active.update(&state.db).await?;
    info!("Document {} updated successfully", document_id);

    let response = ApiResponse {
        data: DocumentResponse::from(updated),
        message: "Document updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a document (staff only)
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{document_id}",
    tag = "documents",
    params(
        ("document_id" = i32, Path, description = "Document ID"),
    ),
    responses(
        (status = 200, description = "Document deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_document(
    auth: AuthUser,
    Path(document_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    auth.require_staff()?;

    let delete_result = document::Entity::delete_by_id(document_id)
        .exec(&state.db)
        .await?;
    if delete_result.rows_affected == 0 {
        return Err(ApiError::not_found(format!(
            "Document {document_id} does not exist"
        )));
    }

    info!("Document {} deleted successfully", document_id);
    let response = ApiResponse {
        data: format!("Document {document_id} deleted"),
        message: "Document deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
