use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::submission::controller::{self, SubmissionReceipt};

/// POST /api/v1/forms/:id/submission
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), AppError> {
    let receipt = controller::submit(
        &state.forms,
        state.generator.clone(),
        state.documents.as_ref(),
        form_id,
        state.config.generation_timeout,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// DELETE /api/v1/forms/:id/submission
pub async fn handle_cancel(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if controller::cancel(&state.forms, form_id)? {
        Ok(StatusCode::ACCEPTED)
    } else {
        Err(AppError::Conflict(
            "No submission is in progress for this form".to_string(),
        ))
    }
}
