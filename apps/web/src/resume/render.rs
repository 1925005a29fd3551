//! Neutral section model of a generated resume.
//!
//! Both the HTML page and the PDF composer consume [`RenderedResume`], so the
//! rule that an absent or empty section is omitted lives only here.

use serde::{Serialize, Serializer};

use crate::resume::document::ResumeDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Education,
    Experience,
    Projects,
    Skills,
}

impl SectionKind {
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::Summary => "Professional Summary",
            SectionKind::Education => "Education",
            SectionKind::Experience => "Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Skills => "Skills",
        }
    }
}

/// Serialized as its heading, which is what the page templates print.
impl Serialize for SectionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.heading())
    }
}

/// Text shown after the item heading, separated by a dash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aside {
    pub text: String,
    pub italic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedItem {
    pub heading: String,
    pub aside: Option<Aside>,
    /// Secondary line: "University (2020)" or a duration.
    pub detail: Option<String>,
    pub body: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub kind: SectionKind,
    /// Free text for summary and skills sections.
    pub paragraph: Option<String>,
    pub items: Vec<RenderedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedHeader {
    pub name: String,
    /// "email • phone", skipping whichever is absent.
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResume {
    pub header: RenderedHeader,
    pub sections: Vec<RenderedSection>,
    /// Keyword match percentage reported by the generation service.
    pub match_score: Option<f64>,
}

impl RenderedResume {
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }
}

/// Lays a document out as header plus the sections that have content, in
/// summary, education, experience, projects, skills order.
pub fn render(document: &ResumeDocument) -> RenderedResume {
    let mut sections = Vec::new();

    if let Some(summary) = non_blank(document.professional_summary.as_deref()) {
        sections.push(RenderedSection {
            kind: SectionKind::Summary,
            paragraph: Some(summary),
            items: vec![],
        });
    }

    if let Some(education) = document.education.as_deref().filter(|v| !v.is_empty()) {
        let items = education
            .iter()
            .map(|e| {
                let university = non_blank(e.university.as_deref());
                let year = non_blank(e.year.as_deref());
                let detail = match (university, year) {
                    (Some(u), Some(y)) => Some(format!("{u} ({y})")),
                    (Some(u), None) => Some(u),
                    (None, Some(y)) => Some(format!("({y})")),
                    (None, None) => None,
                };
                RenderedItem {
                    heading: non_blank(e.degree.as_deref()).unwrap_or_default(),
                    detail,
                    ..Default::default()
                }
            })
            .collect();
        sections.push(section(SectionKind::Education, items));
    }

    if let Some(experience) = document.experience.as_deref().filter(|v| !v.is_empty()) {
        let items = experience
            .iter()
            .map(|x| RenderedItem {
                heading: non_blank(x.title.as_deref()).unwrap_or_default(),
                aside: non_blank(x.company.as_deref()).map(|text| Aside {
                    text,
                    italic: false,
                }),
                detail: non_blank(x.duration.as_deref()),
                body: non_blank(x.description.as_deref()),
                bullets: x
                    .bullets
                    .iter()
                    .flatten()
                    .filter_map(|b| non_blank(Some(b.as_str())))
                    .collect(),
            })
            .collect();
        sections.push(section(SectionKind::Experience, items));
    }

    if let Some(projects) = document.projects.as_deref().filter(|v| !v.is_empty()) {
        let items = projects
            .iter()
            .map(|p| RenderedItem {
                heading: non_blank(p.name.as_deref()).unwrap_or_default(),
                aside: non_blank(p.technologies.as_deref())
                    .map(|text| Aside { text, italic: true }),
                body: non_blank(p.description.as_deref()),
                ..Default::default()
            })
            .collect();
        sections.push(section(SectionKind::Projects, items));
    }

    if let Some(skills) = document.skills.as_deref().filter(|v| !v.is_empty()) {
        sections.push(RenderedSection {
            kind: SectionKind::Skills,
            paragraph: Some(skills.join(", ")),
            items: vec![],
        });
    }

    RenderedResume {
        header: render_header(document),
        sections,
        match_score: document.match_score,
    }
}

fn render_header(document: &ResumeDocument) -> RenderedHeader {
    let Some(info) = document.personal_info.as_ref() else {
        return RenderedHeader::default();
    };

    let contact: Vec<String> = [info.email.as_deref(), info.phone.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .collect();

    RenderedHeader {
        name: non_blank(info.name.as_deref()).unwrap_or_default(),
        contact: (!contact.is_empty()).then(|| contact.join(" • ")),
    }
}

fn section(kind: SectionKind, items: Vec<RenderedItem>) -> RenderedSection {
    RenderedSection {
        kind,
        paragraph: None,
        items,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::document::{DocumentExperience, DocumentPersonalInfo, DocumentProject};
    use crate::state::test_helpers::sample_document;

    #[test]
    fn test_full_document_renders_all_sections_in_order() {
        let rendered = render(&sample_document());
        let kinds: Vec<SectionKind> = rendered.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::Education,
                SectionKind::Experience,
                SectionKind::Projects,
                SectionKind::Skills
            ]
        );
        assert_eq!(rendered.header.name, "John Doe");
        assert_eq!(
            rendered.header.contact.as_deref(),
            Some("john@example.com • +1234567890")
        );
    }

    #[test]
    fn test_empty_projects_section_is_omitted() {
        let mut document = sample_document();
        document.projects = Some(vec![]);
        let rendered = render(&document);
        assert!(!rendered.has_section(SectionKind::Projects));
        assert!(rendered.has_section(SectionKind::Experience));
    }

    #[test]
    fn test_absent_fields_omit_sections() {
        let document = ResumeDocument {
            personal_info: Some(DocumentPersonalInfo {
                name: Some("Ada".to_string()),
                email: None,
                phone: Some("555".to_string()),
            }),
            professional_summary: Some("   ".to_string()),
            ..Default::default()
        };
        let rendered = render(&document);
        assert!(rendered.sections.is_empty());
        assert_eq!(rendered.header.contact.as_deref(), Some("555"));
    }

    #[test]
    fn test_education_detail_combines_university_and_year() {
        let rendered = render(&sample_document());
        let education = &rendered.sections[1];
        assert_eq!(
            education.items[0].detail.as_deref(),
            Some("Example University (2020)")
        );
    }

    #[test]
    fn test_project_technologies_are_italic_aside() {
        let document = ResumeDocument {
            projects: Some(vec![DocumentProject {
                name: Some("NLP Chatbot".to_string()),
                technologies: Some("Python, NLP".to_string()),
                description: None,
            }]),
            ..Default::default()
        };
        let item = &render(&document).sections[0].items[0];
        assert_eq!(
            item.aside,
            Some(Aside {
                text: "Python, NLP".to_string(),
                italic: true
            })
        );
        assert_eq!(item.body, None);
    }

    #[test]
    fn test_experience_bullets_skip_blank_lines() {
        let document = ResumeDocument {
            experience: Some(vec![DocumentExperience {
                title: Some("Dev".to_string()),
                bullets: Some(vec!["Shipped v2".to_string(), " ".to_string()]),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let item = &render(&document).sections[0].items[0];
        assert_eq!(item.bullets, vec!["Shipped v2".to_string()]);
    }

    #[test]
    fn test_skills_joined_with_commas() {
        let rendered = render(&sample_document());
        let skills = rendered.sections.last().unwrap();
        assert_eq!(skills.kind, SectionKind::Skills);
        assert_eq!(skills.paragraph.as_deref(), Some("Python, React, AWS"));
    }
}
