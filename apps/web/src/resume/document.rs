//! The generation service's response, treated as an untrusted payload.
//!
//! Every field is optional because the service may omit any section, but the
//! types of the fields that are present are enforced: a `skills` that is not a
//! list of strings rejects the whole document instead of rendering garbage.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response does not match the resume schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("generation service reported failure")]
    Unsuccessful,

    #[error("response contains no resume content")]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPersonalInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentEducation {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentExperience {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Bullet-style experience, accepted by the backend as an alternative to
    /// a paragraph description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub technologies: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A generated resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default)]
    pub personal_info: Option<DocumentPersonalInfo>,
    #[serde(default)]
    pub professional_summary: Option<String>,
    #[serde(default)]
    pub education: Option<Vec<DocumentEducation>>,
    #[serde(default)]
    pub experience: Option<Vec<DocumentExperience>>,
    #[serde(default)]
    pub projects: Option<Vec<DocumentProject>>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords_extracted: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    /// Backend bookkeeping, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_enhancements: Option<Value>,
}

impl ResumeDocument {
    /// Validates a raw response body and converts it into a document.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        if !value.is_object() {
            return Err(DocumentError::NotAnObject);
        }

        let document: ResumeDocument = serde_json::from_value(value)?;

        if document.success == Some(false) {
            return Err(DocumentError::Unsuccessful);
        }
        if !document.has_content() {
            return Err(DocumentError::Empty);
        }
        Ok(document)
    }

    /// The subject's name, if the document carries a non-blank one.
    pub fn subject_name(&self) -> Option<&str> {
        self.personal_info
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    fn has_content(&self) -> bool {
        self.subject_name().is_some()
            || self
                .professional_summary
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty())
            || self.education.as_ref().is_some_and(|v| !v.is_empty())
            || self.experience.as_ref().is_some_and(|v| !v.is_empty())
            || self.projects.as_ref().is_some_and(|v| !v.is_empty())
            || self.skills.as_ref().is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_backend_response_is_accepted() {
        let value = json!({
            "success": true,
            "keywords_extracted": ["Python", "NLP"],
            "professional_summary": "Results-driven Software Developer.",
            "personal_info": {"name": "John Doe", "email": "john@example.com", "phone": "+1234567890"},
            "education": [{"degree": "BSc", "university": "Example University", "year": "2020"}],
            "experience": [{"title": "Dev", "company": "Tech Corp", "duration": "2020-2023", "description": "Built things"}],
            "projects": [{"name": "NLP Chatbot", "technologies": "Python", "description": "Chatbot"}],
            "skills": ["Python", "NLP"],
            "match_score": 66.7,
            "ai_enhancements": {"skills_reordered": true, "projects_selected": 1}
        });

        let doc = ResumeDocument::from_value(value).unwrap();
        assert_eq!(doc.subject_name(), Some("John Doe"));
        assert_eq!(doc.match_score, Some(66.7));
        assert_eq!(doc.projects.as_ref().map(Vec::len), Some(1));
        assert!(doc.ai_enhancements.is_some());
    }

    #[test]
    fn test_partial_document_is_accepted() {
        let doc = ResumeDocument::from_value(json!({"skills": ["Rust"]})).unwrap();
        assert!(doc.personal_info.is_none());
        assert_eq!(doc.subject_name(), None);
    }

    #[test]
    fn test_null_fields_are_treated_as_absent() {
        let doc = ResumeDocument::from_value(json!({
            "personal_info": {"name": "Ada", "email": null},
            "professional_summary": null
        }))
        .unwrap();
        assert_eq!(doc.personal_info.unwrap().email, None);
        assert_eq!(doc.professional_summary, None);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            ResumeDocument::from_value(json!(["not", "a", "resume"])),
            Err(DocumentError::NotAnObject)
        ));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        assert!(matches!(
            ResumeDocument::from_value(json!({"skills": "Python, Rust"})),
            Err(DocumentError::Schema(_))
        ));
    }

    #[test]
    fn test_explicit_failure_is_rejected() {
        assert!(matches!(
            ResumeDocument::from_value(json!({"success": false, "skills": ["Rust"]})),
            Err(DocumentError::Unsuccessful)
        ));
    }

    #[test]
    fn test_empty_object_is_rejected() {
        assert!(matches!(
            ResumeDocument::from_value(json!({"success": true})),
            Err(DocumentError::Empty)
        ));
    }
}
