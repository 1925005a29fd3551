// Fixed-scale layout of a rendered resume for PDF export.
// Composition is CPU-bound; callers run it inside tokio::task::spawn_blocking.

pub mod compose;
pub mod font_metrics;
pub mod paginate;

pub use compose::{compose, default_page_config, PageConfig};
