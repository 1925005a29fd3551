use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::compose;
use crate::resume::document::ResumeDocument;
use crate::resume::export::{download_filename, export_pdf};
use crate::resume::render::render;
use crate::state::AppState;

async fn load(state: &AppState, submission_id: Uuid) -> Result<Option<ResumeDocument>, AppError> {
    Ok(state.documents.get(submission_id).await?)
}

/// GET /
pub async fn handle_landing(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.landing()?))
}

/// GET /resume
pub async fn handle_fallback(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.fallback()?))
}

/// GET /resume/:id
/// Unknown, expired or malformed ids get the fallback page, not an error.
pub async fn handle_resume_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let Ok(submission_id) = raw_id.parse::<Uuid>() else {
        return Ok(Html(state.pages.fallback()?));
    };
    match load(&state, submission_id).await? {
        Some(document) => Ok(Html(state.pages.resume(submission_id, &render(&document))?)),
        None => {
            debug!("No stored resume for {submission_id}");
            Ok(Html(state.pages.fallback()?))
        }
    }
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    load(&state, submission_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {submission_id} not found")))
}

/// GET /resume/:id/pdf
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let document = load(&state, submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {submission_id} not found")))?;

    let filename = download_filename(&document);
    let page_config = state.page_config.clone();

    // printpdf documents are not Send; build and serialize on the blocking pool
    let bytes = tokio::task::spawn_blocking(move || {
        let composed = compose(&render(&document), &page_config);
        let title = document.subject_name().unwrap_or("Resume").to_string();
        export_pdf(&composed, &page_config, &title)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF export task failed: {e}")))??;

    info!(
        "Exported {} ({} bytes) for submission {submission_id}",
        filename,
        bytes.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
