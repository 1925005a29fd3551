use std::sync::Arc;

use crate::config::Config;
use crate::form::registry::FormRegistry;
use crate::layout::PageConfig;
use crate::pages::Pages;
use crate::resume::store::DocumentStore;
use crate::submission::client::ResumeGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Live form sessions, keyed by form id.
    pub forms: FormRegistry,
    /// Generation backend. Default: HttpResumeGenerator against GENERATION_URL.
    pub generator: Arc<dyn ResumeGenerator>,
    /// Generated resumes, keyed by submission id. Redis when REDIS_URL is set.
    pub documents: Arc<dyn DocumentStore>,
    /// Page geometry for PDF export.
    pub page_config: PageConfig,
    /// Compiled HTML templates.
    pub pages: Pages,
}
