mod config;
mod errors;
mod form;
mod layout;
mod pages;
mod resume;
mod routes;
mod state;
mod submission;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::form::registry::FormRegistry;
use crate::layout::default_page_config;
use crate::pages::Pages;
use crate::resume::store::build_document_store;
use crate::routes::build_router;
use crate::state::AppState;
use crate::submission::client::HttpResumeGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeChef v{}", env!("CARGO_PKG_VERSION"));

    let generator = HttpResumeGenerator::new(config.generation_url.clone())
        .context("failed to build the generation HTTP client")?;
    info!(
        "Generation endpoint: {} (deadline {:?})",
        generator.endpoint(),
        config.generation_timeout
    );

    let documents = build_document_store(config.redis_url.as_deref(), config.result_ttl_secs)?;
    match &config.redis_url {
        Some(_) => info!("Result store: Redis (ttl {}s)", config.result_ttl_secs),
        None => info!("Result store: in-memory (ttl {}s)", config.result_ttl_secs),
    }

    let page_config = default_page_config();
    info!(
        "PDF page: {}x{} mm, {} mm margins",
        page_config.page_width_mm, page_config.page_height_mm, page_config.margin_mm
    );

    let pages = Pages::new().context("failed to compile page templates")?;
    info!("Form sessions expire after {}s idle", config.form_idle_secs);

    let state = AppState {
        config: config.clone(),
        forms: FormRegistry::with_idle_ttl(config.form_idle_secs),
        generator: Arc::new(generator),
        documents,
        page_config,
        pages,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
