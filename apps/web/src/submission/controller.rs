//! Submission pipeline: validate, call the generation service, store the
//! result.
//!
//! At most one submission runs per form session. The outbound call runs on
//! its own task so it can be aborted by a cancel request, by the deadline, or
//! by the caller going away.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::{AbortHandle, JoinError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::form::registry::FormRegistry;
use crate::resume::document::{DocumentError, ResumeDocument};
use crate::resume::store::{DocumentStore, StoreError};
use crate::submission::client::{GenerationError, ResumeGenerator};

/// Shown to the user for every failed generation, whatever the cause.
pub const GENERIC_FAILURE: &str = "Failed to generate resume. Please try again.";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form session not found")]
    UnknownForm,

    #[error("a submission is already in progress for this form")]
    Busy,

    #[error("required fields are missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("generation request failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("generation response rejected: {0}")]
    InvalidDocument(#[from] DocumentError),

    #[error("generation service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("submission was cancelled")]
    Cancelled,

    #[error("generation task failed: {0}")]
    Task(JoinError),

    #[error("could not store the generated resume: {0}")]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// What the form shows after this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::Cancelled => "Submission cancelled.",
            _ => GENERIC_FAILURE,
        }
    }
}

/// Where the stored result can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub result_url: String,
    pub pdf_url: String,
}

impl SubmissionReceipt {
    fn new(submission_id: Uuid) -> Self {
        Self {
            submission_id,
            result_url: format!("/resume/{submission_id}"),
            pdf_url: format!("/resume/{submission_id}/pdf"),
        }
    }
}

/// Clears the busy flag when the submission ends, however it ends. If the
/// submitting future is dropped mid-flight the outbound request is aborted
/// as well.
struct InFlightGuard {
    forms: FormRegistry,
    form_id: Uuid,
    handle: Option<AbortHandle>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        if let Some(session) = self.forms.lock().get_mut(&self.form_id) {
            session.submission.loading = false;
            session.submission.in_flight = None;
        }
    }
}

/// Submits the form's current values and stores the generated resume.
///
/// The form state itself is never modified, on success or failure.
pub async fn submit(
    forms: &FormRegistry,
    generator: Arc<dyn ResumeGenerator>,
    documents: &dyn DocumentStore,
    form_id: Uuid,
    deadline: Duration,
) -> Result<SubmissionReceipt, SubmitError> {
    let request = {
        let mut sessions = forms.lock();
        let session = sessions.get_mut(&form_id).ok_or(SubmitError::UnknownForm)?;
        session.touch();
        if session.submission.loading {
            return Err(SubmitError::Busy);
        }
        let missing = session.state.missing_required();
        if !missing.is_empty() {
            return Err(SubmitError::MissingFields(missing));
        }
        session.submission.loading = true;
        session.submission.last_error = None;
        session.state.to_request()
    };
    let mut guard = InFlightGuard {
        forms: forms.clone(),
        form_id,
        handle: None,
    };

    info!(
        "Submitting form {form_id} ({} education, {} experience, {} projects)",
        request.education.len(),
        request.experience.len(),
        request.projects.len()
    );

    let task = tokio::spawn(async move { generator.generate(&request).await });
    guard.handle = Some(task.abort_handle());
    match forms.lock().get_mut(&form_id) {
        Some(session) => session.submission.in_flight = Some(task.abort_handle()),
        // discarded while we were spawning
        None => task.abort(),
    }

    let outcome = match tokio::time::timeout(deadline, task).await {
        Err(_) => Err(SubmitError::Timeout(deadline)),
        Ok(Err(e)) if e.is_cancelled() => Err(SubmitError::Cancelled),
        Ok(Err(e)) => Err(SubmitError::Task(e)),
        Ok(Ok(response)) => response
            .map_err(SubmitError::from)
            .and_then(|value| ResumeDocument::from_value(value).map_err(SubmitError::from)),
    };

    let result = match outcome {
        Ok(document) => {
            let submission_id = Uuid::new_v4();
            documents
                .put(submission_id, &document)
                .await
                .map(|()| SubmissionReceipt::new(submission_id))
                .map_err(SubmitError::from)
        }
        Err(e) => Err(e),
    };

    if let Some(session) = forms.lock().get_mut(&form_id) {
        match &result {
            Ok(receipt) => {
                session.submission.last_submission_id = Some(receipt.submission_id);
                session.submission.last_error = None;
            }
            Err(e) => session.submission.last_error = Some(e.user_message().to_string()),
        }
    }

    match &result {
        Ok(receipt) => info!(
            "Form {form_id} produced submission {}",
            receipt.submission_id
        ),
        Err(e) => warn!("Submission for form {form_id} failed: {e}"),
    }

    drop(guard);
    result
}

/// Aborts the form's in-flight request. Returns `false` when nothing was in
/// flight.
pub fn cancel(forms: &FormRegistry, form_id: Uuid) -> Result<bool, SubmitError> {
    let mut sessions = forms.lock();
    let session = sessions.get_mut(&form_id).ok_or(SubmitError::UnknownForm)?;
    match session.submission.in_flight.take() {
        Some(handle) => {
            handle.abort();
            info!("Cancelled in-flight submission for form {form_id}");
            Ok(true)
        }
        None => Ok(false),
    }
}
