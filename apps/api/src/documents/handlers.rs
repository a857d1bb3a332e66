use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::documents::export::{export_file_name, EXPORT_CONTENT_TYPE};
use crate::documents::models::{
    CollectionKind, DocumentKind, EntryData, EntryId, FieldUpdate, PersonalInfo,
    PortfolioDocument, ProjectField, ProjectImage, ResumeDocument,
};
use crate::documents::preview::render_portfolio_preview;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EntryCreatedResponse {
    pub id: EntryId,
    pub collection: CollectionKind,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSkillsRequest {
    /// Comma-separated, as typed into the skills box.
    pub skills: String,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub added: usize,
    pub skills: Vec<String>,
}

/// GET /api/v1/sessions/:id/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    let resume = state
        .sessions
        .read(session_id, |s| s.store.resume().clone())
        .await?;
    Ok(Json(resume))
}

/// GET /api/v1/sessions/:id/portfolio
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PortfolioDocument>, AppError> {
    let portfolio = state
        .sessions
        .read(session_id, |s| s.store.portfolio().clone())
        .await?;
    Ok(Json(portfolio))
}

/// PATCH /api/v1/sessions/:id/resume/personal-info
///
/// Keys omitted from the body keep their current value.
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(patch): Json<PersonalInfo>,
) -> Result<Json<PersonalInfo>, AppError> {
    let info = state
        .sessions
        .update(session_id, |s| {
            s.store.update_personal_info(patch);
            s.store.resume().personal_info.clone()
        })
        .await?;
    Ok(Json(info))
}

/// PUT /api/v1/sessions/:id/resume/summary
pub async fn handle_set_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SummaryRequest>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .update(session_id, |s| s.store.set_summary(req.summary))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/collections/:collection
///
/// Body holds the defaults for the new entry; omitted fields are empty.
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((session_id, collection)): Path<(Uuid, CollectionKind)>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<EntryCreatedResponse>), AppError> {
    let defaults = EntryData::from_json(collection, body)
        .map_err(|e| AppError::Validation(format!("Invalid {collection} entry: {e}")))?;
    let id = state
        .sessions
        .update(session_id, |s| s.store.add_entry(defaults))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EntryCreatedResponse { id, collection }),
    ))
}

/// PATCH /api/v1/sessions/:id/collections/:collection/:entry_id
///
/// Body: `{ "field": "<name>", "value": <value> }`.
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((session_id, collection, entry_id)): Path<(Uuid, CollectionKind, EntryId)>,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let update = FieldUpdate::from_json(collection, body)
        .map_err(|e| AppError::Validation(format!("Invalid {collection} field update: {e}")))?;
    state
        .sessions
        .update(session_id, |s| s.store.update_field(entry_id, update))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id/collections/:collection/:entry_id
///
/// Always 204 for a live session, even if the entry was already gone.
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((session_id, collection, entry_id)): Path<(Uuid, CollectionKind, EntryId)>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .update(session_id, |s| s.store.remove_entry(collection, entry_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/skills
pub async fn handle_add_skills(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AddSkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let response = state
        .sessions
        .update(session_id, |s| {
            let added = s.store.add_skills(&req.skills);
            SkillsResponse {
                added,
                skills: s.store.resume().skills.iter().cloned().collect(),
            }
        })
        .await?;
    Ok(Json(response))
}

/// DELETE /api/v1/sessions/:id/skills/:name
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((session_id, name)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .update(session_id, |s| s.store.remove_skill(&name))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/portfolio/projects/:entry_id/image
///
/// Multipart upload; the first file part becomes the project image.
pub async fn handle_upload_project_image(
    State(state): State<AppState>,
    Path((session_id, entry_id)): Path<(Uuid, EntryId)>,
    mut multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::Validation("No image part in upload".to_string()))?;

    let file_name = field.file_name().unwrap_or("image").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(AppError::Validation(format!(
            "Expected an image upload, got {content_type}"
        )));
    }
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?
        .to_vec();

    let image = ProjectImage {
        file_name,
        content_type,
        data,
    };
    state
        .sessions
        .update(session_id, |s| {
            s.store.update_field(
                entry_id,
                FieldUpdate::PortfolioProject(ProjectField::Image(Some(image))),
            )
        })
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/portfolio/preview
pub async fn handle_portfolio_preview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let markdown = state
        .sessions
        .read(session_id, |s| render_portfolio_preview(s.store.portfolio()))
        .await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}

/// GET /api/v1/sessions/:id/export/:document
///
/// Downloads a snapshot named `resume_<YYYYMMDD>_<HHMMSS>.json`.
pub async fn handle_export(
    State(state): State<AppState>,
    Path((session_id, document)): Path<(Uuid, DocumentKind)>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .sessions
        .read(session_id, |s| s.store.export_document(document))
        .await?
        .map_err(|e| AppError::Internal(e.into()))?;

    let file_name = export_file_name(document, chrono::Local::now().naive_local());
    tracing::info!("Session {session_id} exported {file_name}");
    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

/// POST /api/v1/sessions/:id/import/:document
///
/// Replaces the document with a previously exported snapshot.
pub async fn handle_import(
    State(state): State<AppState>,
    Path((session_id, document)): Path<(Uuid, DocumentKind)>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .update(session_id, |s| s.store.import_document(document, &body))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}
