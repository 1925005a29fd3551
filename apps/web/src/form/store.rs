//! Reducer for the resume form.
//!
//! Every mutation goes through [`FormState::apply`], which returns a new state
//! and leaves the receiver untouched. List edits rebuild the targeted list, so
//! an entry that was not addressed compares equal before and after, and a
//! rejected action changes nothing at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::models::{FormEntry, FormState, ListName, ResumeRequest, ScalarField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormAction {
    SetField {
        field: ScalarField,
        value: String,
    },
    UpdateEntry {
        list: ListName,
        index: usize,
        field: String,
        value: String,
    },
    AppendEntry {
        list: ListName,
    },
    RemoveEntry {
        list: ListName,
        index: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{list}[{index}] is out of bounds (length {len})")]
    IndexOutOfBounds {
        list: ListName,
        index: usize,
        len: usize,
    },

    #[error("'{field}' is not a field of {list} entries")]
    UnknownField { list: ListName, field: String },

    #[error("{list} must keep at least one entry")]
    LastEntry { list: ListName },
}

impl FormState {
    /// Applies one action, returning the next state.
    pub fn apply(&self, action: &FormAction) -> Result<FormState, FormError> {
        let mut next = self.clone();
        match action {
            FormAction::SetField { field, value } => {
                let slot = match field {
                    ScalarField::JobDescription => &mut next.job_description,
                    ScalarField::Name => &mut next.personal_info.name,
                    ScalarField::Email => &mut next.personal_info.email,
                    ScalarField::Phone => &mut next.personal_info.phone,
                    ScalarField::Skills => &mut next.skills_input,
                };
                *slot = value.clone();
            }
            FormAction::UpdateEntry {
                list,
                index,
                field,
                value,
            } => match list {
                ListName::Education => {
                    next.education = updated(&self.education, *list, *index, field, value)?
                }
                ListName::Experience => {
                    next.experience = updated(&self.experience, *list, *index, field, value)?
                }
                ListName::Projects => {
                    next.projects = updated(&self.projects, *list, *index, field, value)?
                }
            },
            FormAction::AppendEntry { list } => match list {
                ListName::Education => next.education = appended(&self.education),
                ListName::Experience => next.experience = appended(&self.experience),
                ListName::Projects => next.projects = appended(&self.projects),
            },
            FormAction::RemoveEntry { list, index } => match list {
                ListName::Education => {
                    next.education = removed(&self.education, *list, *index)?
                }
                ListName::Experience => {
                    next.experience = removed(&self.experience, *list, *index)?
                }
                ListName::Projects => next.projects = removed(&self.projects, *list, *index)?,
            },
        }
        Ok(next)
    }

    /// Builds the outbound payload from the current values.
    pub fn to_request(&self) -> ResumeRequest {
        ResumeRequest {
            job_description: self.job_description.clone(),
            personal_info: self.personal_info.clone(),
            education: self.education.clone(),
            experience: self.experience.clone(),
            projects: self.projects.clone(),
            skills: parse_skills(&self.skills_input),
        }
    }

    /// Dotted paths of every required field that is blank.
    ///
    /// Every input on the form is required. Whitespace-only counts as blank
    /// and the email must look like `local@domain`.
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if is_blank(&self.job_description) {
            missing.push("job_description".to_string());
        }
        if is_blank(&self.personal_info.name) {
            missing.push("personal_info.name".to_string());
        }
        if !looks_like_email(&self.personal_info.email) {
            missing.push("personal_info.email".to_string());
        }
        if is_blank(&self.personal_info.phone) {
            missing.push("personal_info.phone".to_string());
        }

        collect_blank_entries(&self.education, ListName::Education, &mut missing);
        collect_blank_entries(&self.experience, ListName::Experience, &mut missing);
        collect_blank_entries(&self.projects, ListName::Projects, &mut missing);

        if parse_skills(&self.skills_input).is_empty() {
            missing.push("skills".to_string());
        }

        missing
    }
}

/// Splits the comma-separated skills input, trimming each token and
/// discarding empty ones.
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// List helpers
// ────────────────────────────────────────────────────────────────────────────

fn updated<T: FormEntry>(
    entries: &[T],
    list: ListName,
    index: usize,
    field: &str,
    value: &str,
) -> Result<Vec<T>, FormError> {
    check_bounds(entries, list, index)?;
    if !T::FIELDS.contains(&field) {
        return Err(FormError::UnknownField {
            list,
            field: field.to_string(),
        });
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut entry = entry.clone();
            if i == index {
                let slot = entry.field_mut(field).ok_or_else(|| FormError::UnknownField {
                    list,
                    field: field.to_string(),
                })?;
                *slot = value.to_string();
            }
            Ok(entry)
        })
        .collect()
}

fn appended<T: FormEntry>(entries: &[T]) -> Vec<T> {
    let mut next = entries.to_vec();
    next.push(T::default());
    next
}

fn removed<T: FormEntry>(entries: &[T], list: ListName, index: usize) -> Result<Vec<T>, FormError> {
    check_bounds(entries, list, index)?;
    if entries.len() == 1 {
        return Err(FormError::LastEntry { list });
    }

    Ok(entries
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, entry)| entry.clone())
        .collect())
}

fn check_bounds<T>(entries: &[T], list: ListName, index: usize) -> Result<(), FormError> {
    if index >= entries.len() {
        return Err(FormError::IndexOutOfBounds {
            list,
            index,
            len: entries.len(),
        });
    }
    Ok(())
}

fn collect_blank_entries<T: FormEntry>(entries: &[T], list: ListName, missing: &mut Vec<String>) {
    for (i, entry) in entries.iter().enumerate() {
        for field in T::FIELDS {
            if entry.field(field).map_or(true, is_blank) {
                missing.push(format!("{list}[{i}].{field}"));
            }
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
