//! Axum route handlers for the AI assistant.
//!
//! Each handler clones the session's gateway and awaits the provider with no
//! registry lock held. If the client goes away the future is dropped and
//! nothing reaches the document.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::documents::models::{CollectionKind, EntryId, FieldUpdate};
use crate::documents::store::StoreError;
use crate::errors::AppError;
use crate::gateway::{GenerateOptions, GeneratedText};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub options: GenerateOptions,
}

/// Text field that receives the generated suggestion.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuggestionTarget {
    pub collection: CollectionKind,
    pub entry_id: EntryId,
    pub field: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: GenerateOptions,
    pub target: SuggestionTarget,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub target: SuggestionTarget,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/sessions/:id/ai/credential
pub async fn handle_configure(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<CredentialRequest>,
) -> Result<StatusCode, AppError> {
    if req.api_key.trim().is_empty() {
        return Err(AppError::Validation("api_key cannot be empty".to_string()));
    }
    state
        .sessions
        .update(session_id, |s| s.gateway.configure(req.api_key))
        .await?;
    info!("Session {session_id} configured its AI credential");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/ai/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GeneratedText>, AppError> {
    let gateway = state.sessions.gateway(session_id).await?;
    let generated = gateway.generate(&req.prompt, &req.options).await?;
    Ok(Json(generated))
}

/// POST /api/v1/sessions/:id/ai/analyze
///
/// Only the first 500 characters of `text` are sent; the rest is dropped silently.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<GeneratedText>, AppError> {
    let gateway = state.sessions.gateway(session_id).await?;
    let analysis = gateway.analyze(&req.text, &req.options).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/sessions/:id/ai/suggest
///
/// Generates text and writes it into `target` through the document store.
pub async fn handle_suggest(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, AppError> {
    let SuggestRequest {
        prompt,
        options,
        target,
    } = req;

    // Reject a bad target before spending a provider call on it.
    FieldUpdate::text(target.collection, &target.field, String::new()).map_err(|e| {
        AppError::Validation(format!(
            "'{}' is not a text field of {}: {e}",
            target.field, target.collection
        ))
    })?;

    let (gateway, exists) = state
        .sessions
        .read(session_id, |s| {
            (
                s.gateway.clone(),
                s.store.contains(target.collection, target.entry_id),
            )
        })
        .await?;
    if !exists {
        return Err(StoreError::NotFound {
            collection: target.collection,
            id: target.entry_id,
        }
        .into());
    }

    let generated = gateway.generate(&prompt, &options).await?;

    let update = FieldUpdate::text(target.collection, &target.field, generated.text.clone())
        .map_err(|e| AppError::Internal(e.into()))?;
    // The entry may have been removed while the provider was working.
    state
        .sessions
        .update(session_id, |s| s.store.update_field(target.entry_id, update))
        .await??;

    Ok(Json(SuggestResponse {
        target,
        text: generated.text,
    }))
}
