//! In-memory registry of live form sessions.
//!
//! The map lock is a `std::sync::Mutex` and is never held across an `.await`,
//! which lets the submission drop guard release the busy flag synchronously.
//!
//! A closed browser tab never discards its session, so sessions idle for
//! longer than the idle TTL are swept whenever a new one is created. A
//! session with a submission in progress is never swept.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::task::AbortHandle;
use tracing::debug;
use uuid::Uuid;

use crate::form::models::FormState;
use crate::form::store::{FormAction, FormError};

/// Submission bookkeeping for one form session.
#[derive(Debug, Default)]
pub struct SubmissionStatus {
    pub loading: bool,
    /// Handle of the outbound request while one is in flight.
    pub in_flight: Option<AbortHandle>,
    pub last_error: Option<String>,
    pub last_submission_id: Option<Uuid>,
}

/// Idle lifetime of a form session unless configured otherwise.
pub const DEFAULT_IDLE_TTL_SECS: u64 = 2 * 60 * 60;
/// Upper bound so expiry arithmetic cannot overflow.
const MAX_IDLE_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug)]
pub struct FormSession {
    pub state: FormState,
    pub submission: SubmissionStatus,
    /// Last time the session was read or changed.
    pub touched_at: DateTime<Utc>,
}

impl FormSession {
    fn new() -> Self {
        Self {
            state: FormState::new(),
            submission: SubmissionStatus::default(),
            touched_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.touched_at = Utc::now();
    }
}

/// Read-only snapshot returned by the form API.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub form_id: Uuid,
    pub state: FormState,
    pub loading: bool,
    pub last_error: Option<String>,
    pub last_submission_id: Option<Uuid>,
}

#[derive(Debug)]
pub enum ApplyError {
    UnknownForm,
    Rejected(FormError),
}

#[derive(Clone)]
pub struct FormRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, FormSession>>>,
    idle_ttl: Duration,
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL_SECS)
    }
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl_secs: u64) -> Self {
        let secs = i64::try_from(idle_ttl_secs)
            .map_or(MAX_IDLE_TTL_SECS, |secs| secs.min(MAX_IDLE_TTL_SECS));
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl: Duration::seconds(secs),
        }
    }

    /// Locks the session map. A poisoned lock is recovered since every
    /// critical section leaves the map consistent.
    pub(crate) fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, FormSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Opens a new session seeded with a blank form, sweeping idle ones.
    pub fn create(&self) -> FormView {
        let form_id = Uuid::new_v4();
        let session = FormSession::new();
        let view = view_of(form_id, &session);

        let mut sessions = self.lock();
        let cutoff = session.touched_at - self.idle_ttl;
        let before = sessions.len();
        sessions.retain(|_, s| s.submission.loading || s.touched_at > cutoff);
        if sessions.len() < before {
            debug!("Swept {} idle form sessions", before - sessions.len());
        }
        sessions.insert(form_id, session);
        view
    }

    pub fn view(&self, form_id: Uuid) -> Option<FormView> {
        self.lock().get_mut(&form_id).map(|session| {
            session.touch();
            view_of(form_id, session)
        })
    }

    /// Current form values, cloned so callers can work without the lock.
    pub fn snapshot(&self, form_id: Uuid) -> Option<FormState> {
        self.lock().get_mut(&form_id).map(|session| {
            session.touch();
            session.state.clone()
        })
    }

    /// Runs one action through the reducer and swaps in the result.
    pub fn apply(&self, form_id: Uuid, action: &FormAction) -> Result<FormView, ApplyError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&form_id).ok_or(ApplyError::UnknownForm)?;
        session.touch();
        session.state = session.state.apply(action).map_err(ApplyError::Rejected)?;
        Ok(view_of(form_id, session))
    }

    /// Drops the session, aborting any request still in flight.
    pub fn discard(&self, form_id: Uuid) -> bool {
        match self.lock().remove(&form_id) {
            Some(session) => {
                if let Some(handle) = session.submission.in_flight {
                    handle.abort();
                }
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

fn view_of(form_id: Uuid, session: &FormSession) -> FormView {
    FormView {
        form_id,
        state: session.state.clone(),
        loading: session.submission.loading,
        last_error: session.submission.last_error.clone(),
        last_submission_id: session.submission.last_submission_id,
    }
}
