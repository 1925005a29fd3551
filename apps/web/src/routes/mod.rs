pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::form::handlers as forms;
use crate::form::page as form_page;
use crate::resume::handlers as resumes;
use crate::state::AppState;
use crate::submission::handlers as submissions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(resumes::handle_landing))
        .route("/resume", get(resumes::handle_fallback))
        .route("/resume/:id", get(resumes::handle_resume_page))
        .route("/resume/:id/pdf", get(resumes::handle_download_pdf))
        .route("/get-started", get(form_page::handle_start))
        .route(
            "/get-started/:id",
            get(form_page::handle_form_page).post(form_page::handle_form_post),
        )
        // Form API
        .route("/api/v1/forms", post(forms::handle_create_form))
        .route(
            "/api/v1/forms/:id",
            get(forms::handle_get_form).delete(forms::handle_discard_form),
        )
        .route("/api/v1/forms/:id/actions", post(forms::handle_apply_action))
        .route("/api/v1/forms/:id/request", get(forms::handle_preview_request))
        // Submission API
        .route(
            "/api/v1/forms/:id/submission",
            post(submissions::handle_submit).delete(submissions::handle_cancel),
        )
        // Result API
        .route("/api/v1/resumes/:id", get(resumes::handle_get_document))
        .with_state(state)
}
