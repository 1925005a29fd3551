use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::models::ResumeRequest;
use crate::form::registry::FormView;
use crate::form::store::FormAction;
use crate::state::AppState;

fn form_not_found(form_id: Uuid) -> AppError {
    AppError::NotFound(format!("Form {form_id} not found"))
}

/// POST /api/v1/forms
pub async fn handle_create_form(
    State(state): State<AppState>,
) -> (StatusCode, Json<FormView>) {
    let view = state.forms.create();
    debug!("Created form {}", view.form_id);
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/forms/:id
pub async fn handle_get_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<FormView>, AppError> {
    state
        .forms
        .view(form_id)
        .map(Json)
        .ok_or_else(|| form_not_found(form_id))
}

/// DELETE /api/v1/forms/:id
pub async fn handle_discard_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.forms.discard(form_id) {
        return Err(form_not_found(form_id));
    }
    debug!("Discarded form {form_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/forms/:id/actions
pub async fn handle_apply_action(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    Json(action): Json<FormAction>,
) -> Result<Json<FormView>, AppError> {
    let view = state.forms.apply(form_id, &action)?;
    Ok(Json(view))
}

/// GET /api/v1/forms/:id/request
/// The payload a submit would send right now.
pub async fn handle_preview_request(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<ResumeRequest>, AppError> {
    let form = state
        .forms
        .snapshot(form_id)
        .ok_or_else(|| form_not_found(form_id))?;
    Ok(Json(form.to_request()))
}
