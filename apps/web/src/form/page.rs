//! Browser form at `/get-started`.
//!
//! A plain HTML form posting back to its own session. Every post first stores
//! the posted values through the session reducer, then runs the button that
//! was pressed: add an entry, remove one, or submit. Unknown or expired
//! sessions start over with a fresh one.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::models::{ListName, ScalarField};
use crate::form::registry::ApplyError;
use crate::form::store::FormAction;
use crate::pages::FormNotice;
use crate::state::AppState;
use crate::submission::controller::{self, SubmitError};

pub const FORM_PATH: &str = "/get-started";

/// The button that sent the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Submit,
    Add(ListName),
    Remove(ListName, usize),
}

fn parse_list(raw: &str) -> Option<ListName> {
    match raw {
        "education" => Some(ListName::Education),
        "experience" => Some(ListName::Experience),
        "projects" => Some(ListName::Projects),
        _ => None,
    }
}

fn parse_op(raw: &str) -> Option<Op> {
    let mut parts = raw.split(':');
    match (parts.next()?, parts.next(), parts.next(), parts.next()) {
        ("submit", None, None, None) => Some(Op::Submit),
        ("add", Some(list), None, None) => Some(Op::Add(parse_list(list)?)),
        ("remove", Some(list), Some(index), None) => {
            Some(Op::Remove(parse_list(list)?, index.parse().ok()?))
        }
        _ => None,
    }
}

/// Maps one posted input to the action that stores it. Inputs of list
/// entries are named `list[index].field`.
fn field_action(key: &str, value: String) -> Option<FormAction> {
    let scalar = match key {
        "job_description" => Some(ScalarField::JobDescription),
        "name" => Some(ScalarField::Name),
        "email" => Some(ScalarField::Email),
        "phone" => Some(ScalarField::Phone),
        "skills" => Some(ScalarField::Skills),
        _ => None,
    };
    if let Some(field) = scalar {
        return Some(FormAction::SetField { field, value });
    }

    let (list, rest) = key.split_once('[')?;
    let (index, field) = rest.split_once("].")?;
    Some(FormAction::UpdateEntry {
        list: parse_list(list)?,
        index: index.parse().ok()?,
        field: field.to_string(),
        value,
    })
}

fn form_url(form_id: Uuid) -> String {
    format!("{FORM_PATH}/{form_id}")
}

fn start_over() -> Response {
    Redirect::to(FORM_PATH).into_response()
}

/// GET /get-started
/// Opens a fresh session and sends the browser to its page.
pub async fn handle_start(State(state): State<AppState>) -> Redirect {
    let form_id = state.forms.create().form_id;
    debug!("Created browser form {form_id}");
    Redirect::to(&form_url(form_id))
}

/// GET /get-started/:id
pub async fn handle_form_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(form_id) = raw_id.parse::<Uuid>() else {
        return Ok(start_over());
    };
    let Some(view) = state.forms.view(form_id) else {
        return Ok(start_over());
    };
    let notice = view.last_error.map(|message| FormNotice {
        message,
        missing: Vec::new(),
    });
    Ok(Html(state.pages.form(form_id, &view.state, notice.as_ref())?).into_response())
}

/// POST /get-started/:id
pub async fn handle_form_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let Ok(form_id) = raw_id.parse::<Uuid>() else {
        return Ok(start_over());
    };

    let mut op = Op::Submit;
    for (key, value) in fields {
        if key == "op" {
            op = parse_op(&value).ok_or_else(|| {
                AppError::Validation(format!("Unknown form operation '{value}'"))
            })?;
            continue;
        }
        let Some(action) = field_action(&key, value) else {
            debug!("Ignoring unknown input '{key}' on form {form_id}");
            continue;
        };
        match state.forms.apply(form_id, &action) {
            Ok(_) => {}
            Err(ApplyError::UnknownForm) => return Ok(start_over()),
            Err(e) => return Err(e.into()),
        }
    }

    let action = match op {
        Op::Submit => return submit(&state, form_id).await,
        Op::Add(list) => FormAction::AppendEntry { list },
        Op::Remove(list, index) => FormAction::RemoveEntry { list, index },
    };
    match state.forms.apply(form_id, &action) {
        Ok(_) => Ok(Redirect::to(&form_url(form_id)).into_response()),
        Err(ApplyError::UnknownForm) => Ok(start_over()),
        Err(e) => Err(e.into()),
    }
}

/// Runs the submission and sends the browser to the result, or back to the
/// form with the reason it failed.
async fn submit(state: &AppState, form_id: Uuid) -> Result<Response, AppError> {
    let error = match controller::submit(
        &state.forms,
        state.generator.clone(),
        state.documents.as_ref(),
        form_id,
        state.config.generation_timeout,
    )
    .await
    {
        Ok(receipt) => return Ok(Redirect::to(&receipt.result_url).into_response()),
        Err(SubmitError::UnknownForm) => return Ok(start_over()),
        Err(e) => e,
    };

    let notice = match &error {
        SubmitError::MissingFields(fields) => FormNotice {
            message: "Please fill in all required fields.".to_string(),
            missing: fields.clone(),
        },
        SubmitError::Busy => FormNotice {
            message: "A submission is already in progress for this form.".to_string(),
            missing: Vec::new(),
        },
        other => FormNotice {
            message: other.user_message().to_string(),
            missing: Vec::new(),
        },
    };
    let status = AppError::from(error).status();

    let Some(form) = state.forms.snapshot(form_id) else {
        return Ok(start_over());
    };
    let html = state.pages.form(form_id, &form, Some(&notice))?;
    Ok((status, Html(html)).into_response())
}
