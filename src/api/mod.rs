//! HTTP surface: liveness routes and the multipart `POST /process-email/`.

pub mod error;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::pipeline::{Attachment, EmailProcessor, EmailSubmission};

pub use error::{ApiError, ErrorBody, status_for};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<EmailProcessor>,
}

/// Successful `POST /process-email/` body.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessEmailResponse {
    pub category: String,
    pub suggested_response: String,
}

/// Build the Axum router.
pub fn app_routes(processor: Arc<EmailProcessor>, server: &ServerConfig) -> Router {
    let state = AppState { processor };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/process-email/", post(process_email))
        .route("/process-email", post(process_email))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors_layer(server))
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

// ── Liveness ────────────────────────────────────────────────────────────

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Email classifier API is up"
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "email-classifier"
    }))
}

// ── Processing ──────────────────────────────────────────────────────────

async fn process_email(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessEmailResponse>, ApiError> {
    let submission = read_submission(multipart).await?;
    let result = state.processor.process(submission).await?;

    Ok(Json(ProcessEmailResponse {
        category: result.category.label(state.processor.language()).to_string(),
        suggested_response: result.suggested_response,
    }))
}

/// Collect the `text` (or `email_text`) and `file` form fields.
async fn read_submission(mut multipart: Multipart) -> Result<EmailSubmission, ApiError> {
    let mut submission = EmailSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "text" | "email_text" => {
                let text = field.text().await?;
                if !text.is_empty() {
                    submission.text = Some(text);
                }
            }
            "file" => {
                let filename = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await?;

                // Browsers send an empty, unnamed part when no file was chosen.
                let unnamed = filename.as_deref().is_none_or(str::is_empty);
                if unnamed && bytes.is_empty() {
                    continue;
                }
                submission.file = Some(Attachment {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(submission)
}
