use std::fmt;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Entry shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub university: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub technologies: String,
    pub description: String,
}

/// Shape shared by the entries of a repeatable list.
///
/// `Default` is the blank entry appended by `AppendEntry`. Field access is by
/// wire name so actions can address a field without a per-list enum.
pub trait FormEntry: Clone + Default + PartialEq {
    const FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<&str>;
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;
}

impl FormEntry for EducationEntry {
    const FIELDS: &'static [&'static str] = &["degree", "university", "year"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "degree" => Some(self.degree.as_str()),
            "university" => Some(self.university.as_str()),
            "year" => Some(self.year.as_str()),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "degree" => Some(&mut self.degree),
            "university" => Some(&mut self.university),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }
}

impl FormEntry for ExperienceEntry {
    const FIELDS: &'static [&'static str] = &["title", "company", "duration", "description"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(self.title.as_str()),
            "company" => Some(self.company.as_str()),
            "duration" => Some(self.duration.as_str()),
            "description" => Some(self.description.as_str()),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "company" => Some(&mut self.company),
            "duration" => Some(&mut self.duration),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

impl FormEntry for ProjectEntry {
    const FIELDS: &'static [&'static str] = &["name", "technologies", "description"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(self.name.as_str()),
            "technologies" => Some(self.technologies.as_str()),
            "description" => Some(self.description.as_str()),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "technologies" => Some(&mut self.technologies),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field addressing
// ────────────────────────────────────────────────────────────────────────────

/// The three repeatable lists of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListName {
    Education,
    Experience,
    Projects,
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListName::Education => "education",
            ListName::Experience => "experience",
            ListName::Projects => "projects",
        };
        f.write_str(name)
    }
}

/// Single-valued fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    JobDescription,
    Name,
    Email,
    Phone,
    /// Comma-separated skills, kept verbatim until submit.
    Skills,
}

// ────────────────────────────────────────────────────────────────────────────
// Form state and outbound payload
// ────────────────────────────────────────────────────────────────────────────

/// Everything the resume form holds for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub job_description: String,
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills_input: String,
}

impl FormState {
    /// A fresh form: empty scalars and one blank entry per list.
    pub fn new() -> Self {
        Self {
            job_description: String::new(),
            personal_info: PersonalInfo::default(),
            education: vec![EducationEntry::default()],
            experience: vec![ExperienceEntry::default()],
            projects: vec![ProjectEntry::default()],
            skills_input: String::new(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of the POST to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRequest {
    pub job_description: String,
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Vec<String>,
}
