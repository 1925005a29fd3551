//! Client for the external resume generation service.
//!
//! One POST per submission, JSON in and JSON out. No retries: a failed call is
//! reported to the user, who can resubmit. The deadline is applied by the
//! submission controller so that it also covers slow response bodies.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::form::models::ResumeRequest;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response body is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),
}

/// The generation backend. `AppState` carries an `Arc<dyn ResumeGenerator>`
/// so tests can swap in a scripted implementation.
#[async_trait]
pub trait ResumeGenerator: Send + Sync {
    /// Sends the request and returns the raw JSON body. Shape validation is
    /// the caller's job.
    async fn generate(&self, request: &ResumeRequest) -> Result<Value, GenerationError>;
}

#[derive(Clone)]
pub struct HttpResumeGenerator {
    client: Client,
    endpoint: String,
}

impl HttpResumeGenerator {
    pub fn new(endpoint: String) -> Result<Self, GenerationError> {
        let client = Client::builder().build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ResumeGenerator for HttpResumeGenerator {
    async fn generate(&self, request: &ResumeRequest) -> Result<Value, GenerationError> {
        debug!(
            "POST {} ({} education, {} experience, {} projects, {} skills)",
            self.endpoint,
            request.education.len(),
            request.experience.len(),
            request.projects.len(),
            request.skills.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Generation service returned {}: {}", status, body);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    use crate::state::test_helpers::john_doe_form;

    /// Serves `app` on an ephemeral port and returns its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_posts_request_json_and_returns_body() {
        let app = Router::new().route(
            "/generate-resume",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "success": true,
                    "personal_info": body["personal_info"].clone(),
                    "skills": body["skills"].clone(),
                }))
            }),
        );
        let base = serve(app).await;

        let generator = HttpResumeGenerator::new(format!("{base}/generate-resume")).unwrap();
        let value = generator
            .generate(&john_doe_form().to_request())
            .await
            .unwrap();

        assert_eq!(value["personal_info"]["name"], "John Doe");
        assert_eq!(value["skills"], json!(["Python", "React", "AWS"]));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let app = Router::new().route(
            "/generate-resume",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        );
        let base = serve(app).await;

        let generator = HttpResumeGenerator::new(format!("{base}/generate-resume")).unwrap();
        let err = generator
            .generate(&john_doe_form().to_request())
            .await
            .unwrap_err();
        match err {
            GenerationError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model crashed");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_rejected() {
        let app = Router::new().route("/generate-resume", post(|| async { "<html>oops</html>" }));
        let base = serve(app).await;

        let generator = HttpResumeGenerator::new(format!("{base}/generate-resume")).unwrap();
        let err = generator
            .generate(&john_doe_form().to_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NotJson(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        // bind then drop to get a port nobody is listening on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let generator = HttpResumeGenerator::new(format!("http://{addr}/generate-resume")).unwrap();
        let err = generator
            .generate(&john_doe_form().to_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Http(_)));
    }
}
