//! Server-rendered pages: landing, resume form, resume result and the no-data
//! fallback.
//!
//! Templates are compiled into the binary and rendered with Tera, with
//! autoescaping on for every `.html` template. Generated resume text is
//! untrusted, so nothing here builds markup by hand.

use std::sync::Arc;

use tera::{Context, Tera};
use uuid::Uuid;

use crate::form::models::FormState;
use crate::resume::render::RenderedResume;

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("landing.html", include_str!("../templates/landing.html")),
    ("fallback.html", include_str!("../templates/fallback.html")),
    ("resume.html", include_str!("../templates/resume.html")),
    ("form.html", include_str!("../templates/form.html")),
];

/// Message and offending fields shown above the form after a failed submit.
#[derive(Debug, Clone, Default)]
pub struct FormNotice {
    pub message: String,
    pub missing: Vec<String>,
}

#[derive(Clone)]
pub struct Pages {
    tera: Arc<Tera>,
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn landing(&self) -> Result<String, tera::Error> {
        self.tera.render("landing.html", &Context::new())
    }

    /// Shown when there is no result to display. A normal state, not an error.
    pub fn fallback(&self) -> Result<String, tera::Error> {
        self.tera.render("fallback.html", &Context::new())
    }

    pub fn resume(
        &self,
        submission_id: Uuid,
        resume: &RenderedResume,
    ) -> Result<String, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("submission_id", &submission_id);
        ctx.insert("resume", resume);
        self.tera.render("resume.html", &ctx)
    }

    pub fn form(
        &self,
        form_id: Uuid,
        state: &FormState,
        notice: Option<&FormNotice>,
    ) -> Result<String, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("form_id", &form_id);
        ctx.insert("state", state);
        if let Some(notice) = notice {
            ctx.insert("error", &notice.message);
            ctx.insert("missing", &notice.missing);
        }
        self.tera.render("form.html", &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::models::{FormState, ListName};
    use crate::form::store::FormAction;
    use crate::resume::render::render;
    use crate::state::test_helpers::{john_doe_form, sample_document};

    fn pages() -> Pages {
        Pages::new().unwrap()
    }

    #[test]
    fn test_resume_page_contains_sections_and_download_link() {
        let id = Uuid::new_v4();
        let html = pages().resume(id, &render(&sample_document())).unwrap();
        assert!(html.contains("<h1>John Doe</h1>"));
        assert!(html.contains("<h2>Professional Summary</h2>"));
        assert!(html.contains("NLP Chatbot — <em>Python, TensorFlow, NLP</em>"));
        assert!(html.contains(&format!("/resume/{id}/pdf")));
        assert!(html.contains("href=\"/get-started\""));
    }

    #[test]
    fn test_resume_page_omits_empty_projects_heading() {
        let mut document = sample_document();
        document.projects = Some(vec![]);
        let html = pages().resume(Uuid::new_v4(), &render(&document)).unwrap();
        assert!(!html.contains("<h2>Projects</h2>"));
        assert!(html.contains("<h2>Experience</h2>"));
    }

    #[test]
    fn test_resume_page_escapes_generated_text() {
        let mut document = sample_document();
        document.professional_summary = Some("<script>alert(1)</script>".to_string());
        document.skills = Some(vec!["\"quoted\" & <b>".to_string()]);
        let html = pages().resume(Uuid::new_v4(), &render(&document)).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&quot;quoted&quot; &amp;"));
    }

    #[test]
    fn test_resume_page_shows_match_score() {
        let mut document = sample_document();
        document.match_score = Some(66.7);
        let html = pages().resume(Uuid::new_v4(), &render(&document)).unwrap();
        assert!(html.contains("Job match score: 66.7%"));

        let html = pages()
            .resume(Uuid::new_v4(), &render(&sample_document()))
            .unwrap();
        assert!(!html.contains("Job match score"));
    }

    #[test]
    fn test_fallback_page_links_back_to_form() {
        let html = pages().fallback().unwrap();
        assert!(html.contains("No data found. Please go back and submit the form."));
        assert!(html.contains("href=\"/get-started\""));
    }

    #[test]
    fn test_landing_page_links_to_form() {
        let html = pages().landing().unwrap();
        assert!(html.contains("Get Started"));
        assert!(html.contains("href=\"/get-started\""));
    }

    #[test]
    fn test_form_page_renders_every_entry_as_required_input() {
        let form_id = Uuid::new_v4();
        let html = pages().form(form_id, &john_doe_form(), None).unwrap();
        assert!(html.contains(&format!("action=\"/get-started/{form_id}\"")));
        assert!(html.contains("name=\"education[0].degree\" value=\"Bachelor of Computer Science\" required"));
        assert!(html.contains("name=\"projects[1].name\" value=\"E-commerce Website\" required"));
        assert!(html.contains("value=\"add:experience\""));
        // two projects, so each can be removed; the single education cannot
        assert!(html.contains("value=\"remove:projects:1\""));
        assert!(!html.contains("value=\"remove:education:0\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_form_page_escapes_values_and_shows_notice() {
        let state = FormState::new()
            .apply(&FormAction::UpdateEntry {
                list: ListName::Projects,
                index: 0,
                field: "name".to_string(),
                value: "\"><script>".to_string(),
            })
            .unwrap();
        let notice = FormNotice {
            message: "Please fill in all required fields.".to_string(),
            missing: vec!["personal_info.email".to_string()],
        };
        let html = pages().form(Uuid::new_v4(), &state, Some(&notice)).unwrap();
        assert!(!html.contains("\"><script>"));
        assert!(html.contains("Please fill in all required fields."));
        assert!(html.contains("<li>personal_info.email</li>"));
    }
}
