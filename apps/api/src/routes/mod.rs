pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::documents::handlers as documents;
use crate::gateway::handlers as ai;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route("/api/v1/sessions/:id", delete(sessions::handle_end_session))
        // Documents
        .route(
            "/api/v1/sessions/:id/resume",
            get(documents::handle_get_resume),
        )
        .route(
            "/api/v1/sessions/:id/resume/personal-info",
            patch(documents::handle_update_personal_info),
        )
        .route(
            "/api/v1/sessions/:id/resume/summary",
            put(documents::handle_set_summary),
        )
        .route(
            "/api/v1/sessions/:id/portfolio",
            get(documents::handle_get_portfolio),
        )
        .route(
            "/api/v1/sessions/:id/portfolio/preview",
            get(documents::handle_portfolio_preview),
        )
        .route(
            "/api/v1/sessions/:id/portfolio/projects/:entry_id/image",
            put(documents::handle_upload_project_image),
        )
        .route(
            "/api/v1/sessions/:id/collections/:collection",
            post(documents::handle_add_entry),
        )
        .route(
            "/api/v1/sessions/:id/collections/:collection/:entry_id",
            patch(documents::handle_update_entry).delete(documents::handle_remove_entry),
        )
        .route(
            "/api/v1/sessions/:id/skills",
            post(documents::handle_add_skills),
        )
        .route(
            "/api/v1/sessions/:id/skills/:name",
            delete(documents::handle_remove_skill),
        )
        .route(
            "/api/v1/sessions/:id/export/:document",
            get(documents::handle_export),
        )
        .route(
            "/api/v1/sessions/:id/import/:document",
            post(documents::handle_import),
        )
        // AI assistant
        .route(
            "/api/v1/sessions/:id/ai/credential",
            put(ai::handle_configure),
        )
        .route("/api/v1/sessions/:id/ai/generate", post(ai::handle_generate))
        .route("/api/v1/sessions/:id/ai/analyze", post(ai::handle_analyze))
        .route("/api/v1/sessions/:id/ai/suggest", post(ai::handle_suggest))
        .with_state(state)
}
