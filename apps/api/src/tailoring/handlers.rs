//! Axum route handlers for the tailoring, validation, render and QA API.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Multipart, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::guard::{validate, validate_with_report, ValidationReport};
use crate::models::ResumeData;
use crate::qa::{score, QaReport};
use crate::render::{render_docx, render_pdf, RenderError};
use crate::state::AppState;
use crate::tailoring::{tailor, TailorOutcome};
use crate::theme::{resolve, resolve_named, Preset, ThemeConfig};

const PDF_CONTENT_TYPE: &str = "application/pdf";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub resume: ResumeData,
    pub job_description: String,
    pub preset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub original: ResumeData,
    pub tailored: ResumeData,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub resume: ResumeData,
    pub preset: Option<String>,
    /// When present, `resume` is truth-locked against it before rendering.
    pub original: Option<ResumeData>,
}

#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub resume: ResumeData,
    pub preset: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn theme_for(preset: Option<&str>, default: Preset) -> ThemeConfig {
    match preset {
        Some(name) => resolve_named(name),
        None => resolve(default),
    }
}

/// Client key for rate limiting: first `X-Forwarded-For` hop, else the peer.
fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Runs CPU-bound rendering off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T, RenderError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RenderError::Task(e.to_string()))
}

/// Truth-locks `resume` against `original` when one was supplied.
fn locked(resume: ResumeData, original: Option<&ResumeData>) -> Result<ResumeData, AppError> {
    match original {
        Some(original) => Ok(validate(&resume, original)?),
        None => Ok(resume),
    }
}

fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
///
/// Multipart upload with a `file` part holding a PDF. Returns its text.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
            upload = Some(bytes);
            break;
        }
    }
    let bytes = upload.ok_or_else(|| AppError::Validation("missing 'file' part".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extract: {e}")))?
        .map_err(|e| AppError::Validation(format!("could not extract text from PDF: {e}")))?;

    info!(bytes = size, chars = text.len(), "extracted upload text");
    Ok(Json(ExtractResponse { text }))
}

/// POST /api/v1/tailor
///
/// Rate limited per client. Analysis, rewrite, guard and QA.
pub async fn handle_tailor(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorOutcome>, AppError> {
    let client = client_key(&headers, peer.map(|ConnectInfo(addr)| addr));
    let decision = state.rate_limiter.check(&client).await?;
    if !decision.allowed {
        return Err(AppError::RateLimited {
            retry_after_secs: state.rate_limiter.window().as_secs().max(1),
        });
    }
    debug!(
        client = %client,
        remaining = decision.remaining,
        limit = decision.limit,
        "rate limit ok"
    );

    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }
    if request.resume.personal_info.name.trim().is_empty() {
        return Err(AppError::Validation("resume has no name".to_string()));
    }

    let theme = theme_for(request.preset.as_deref(), state.config.default_preset);
    let outcome = tailor(
        state.oracle.as_ref(),
        &request.resume,
        &request.job_description,
        &theme,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/validate
///
/// Always 200: the report says whether the tailored resume is acceptable.
pub async fn handle_validate(Json(request): Json<ValidateRequest>) -> Json<ValidationReport> {
    Json(validate_with_report(&request.tailored, &request.original))
}

/// POST /api/v1/render/pdf
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let resume = locked(request.resume, request.original.as_ref())?;
    let theme = theme_for(request.preset.as_deref(), state.config.default_preset);

    let pdf = run_blocking(move || render_pdf(&resume, &theme)).await?;
    for w in &pdf.warnings {
        warn!(kind = w.kind(), "{w}");
    }

    let mut response = attachment(PDF_CONTENT_TYPE, "resume.pdf", pdf.bytes);
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-page-count"),
        HeaderValue::from(pdf.page_count),
    );
    headers.insert(
        HeaderName::from_static("x-layout-warnings"),
        HeaderValue::from(pdf.warnings.len()),
    );
    Ok(response)
}

/// POST /api/v1/render/docx
pub async fn handle_render_docx(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let resume = locked(request.resume, request.original.as_ref())?;
    let theme = theme_for(request.preset.as_deref(), state.config.default_preset);

    let bytes = run_blocking(move || render_docx(&resume, &theme)).await??;
    Ok(attachment(DOCX_CONTENT_TYPE, "resume.docx", bytes))
}

/// POST /api/v1/qa
pub async fn handle_qa(
    State(state): State<AppState>,
    Json(request): Json<QaRequest>,
) -> Json<QaReport> {
    let theme = theme_for(request.preset.as_deref(), state.config.default_preset);
    Json(score(&request.resume, &theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_key_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        let peer: SocketAddr = "192.0.2.7:5000".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer)), "192.0.2.7");
        assert_eq!(client_key(&headers, None), "unknown");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        assert_eq!(client_key(&headers, Some(peer)), "203.0.113.9");
    }

    #[test]
    fn test_theme_for_falls_back() {
        assert_eq!(theme_for(None, Preset::Modern).preset, Preset::Modern);
        assert_eq!(theme_for(Some("classic"), Preset::Modern).preset, Preset::Classic);
        assert_eq!(
            theme_for(Some("neon"), Preset::Modern).preset,
            Preset::Professional
        );
    }
}
