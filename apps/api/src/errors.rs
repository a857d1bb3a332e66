use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::store::StoreError;
use crate::gateway::GatewayError;
use crate::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("AI gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Malformed(_) | StoreError::DuplicateId(_) => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Gateway(GatewayError::RequestFailed(msg)) => {
                tracing::warn!("AI request failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_REQUEST_FAILED",
                    msg.clone(),
                )
            }
            AppError::Gateway(GatewayError::EmptyResponse) => (
                StatusCode::BAD_GATEWAY,
                "AI_EMPTY_RESPONSE",
                "The AI provider returned no text".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::models::{CollectionKind, EntryId};

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err: AppError = StoreError::NotFound {
            collection: CollectionKind::Experience,
            id: EntryId(3),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_id_maps_to_400() {
        let err: AppError = StoreError::DuplicateId(EntryId(1)).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_gateway_errors_map_to_502() {
        let failed: AppError = GatewayError::RequestFailed("boom".into()).into();
        let empty: AppError = GatewayError::EmptyResponse.into();
        assert_eq!(failed.into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(empty.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
