//! Axum route handlers for the Pack API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::FallbackReason;
use crate::generation::pack::{ContentPack, PackRequest, Platform};
use crate::generation::pipeline::{run_bulk, run_single, BulkRow};
use crate::render::pdf::mode_label;
use crate::render::text::is_safe_file_name;
use crate::state::AppState;

const FILES_ROUTE: &str = "/api/v1/packs/files";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PackBody {
    /// Quota identity; defaults to the configured user.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub license_key: Option<String>,
    pub topic: String,
    #[serde(default)]
    pub niche: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub tone: String,
    pub platform: Platform,
}

#[derive(Debug, Deserialize)]
pub struct BulkBody {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub license_key: Option<String>,
    pub topics: Vec<String>,
    #[serde(default)]
    pub niche: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub tone: String,
    pub platform: Platform,
}

#[derive(Debug, Serialize)]
pub struct PackResponse {
    pub file_base: String,
    pub markdown_file: String,
    pub pdf_file: String,
    pub pdf_url: String,
    pub ai_used: bool,
    pub mode: &'static str,
    pub fallback_reason: Option<FallbackReason>,
    pub pack: ContentPack,
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub built: usize,
    pub rows: Vec<BulkRow>,
    pub archive_file: String,
    pub archive_url: String,
    pub archive_entries: usize,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub daily_limit: u32,
    pub ai_mode: bool,
    pub model: Option<String>,
    pub default_user_id: String,
    pub checkout_url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/settings
pub async fn handle_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let ai_mode = state.generator.ai_enabled();
    Json(SettingsResponse {
        daily_limit: state.gate.daily_limit(),
        ai_mode,
        model: ai_mode.then(|| state.config.openai_model.clone()),
        default_user_id: state.config.default_user_id.clone(),
        checkout_url: state.gate.checkout_url().map(str::to_string),
    })
}

/// POST /api/v1/packs
///
/// Builds one pack. The PDF lands in the output directory and can be fetched
/// from `pdf_url`; the Markdown comes back inline.
pub async fn handle_create_pack(
    State(state): State<AppState>,
    Json(body): Json<PackBody>,
) -> Result<Json<PackResponse>, AppError> {
    let identity = resolve_identity(&state, body.user_id.as_deref());
    let limit = state.gate.limit_for(body.license_key.as_deref()).await;
    let request = PackRequest::new(
        body.topic.trim(),
        body.niche,
        body.audience,
        body.tone,
        body.platform,
    );

    let outcome = run_single(&state, &identity, limit, request).await?;
    info!("Pack for {identity} written to {}", outcome.pdf_path.display());
    let pdf_file = outcome.pdf_file();

    Ok(Json(PackResponse {
        markdown_file: outcome.markdown_file(),
        pdf_url: format!("{FILES_ROUTE}/{pdf_file}"),
        pdf_file,
        mode: mode_label(outcome.ai_used),
        ai_used: outcome.ai_used,
        fallback_reason: outcome.fallback_reason,
        file_base: outcome.file_base,
        pack: outcome.pack,
        markdown: outcome.markdown,
    }))
}

/// POST /api/v1/packs/bulk
///
/// Runs every topic through the pipeline in order and zips the results.
pub async fn handle_create_bulk(
    State(state): State<AppState>,
    Json(body): Json<BulkBody>,
) -> Result<Json<BulkResponse>, AppError> {
    let identity = resolve_identity(&state, body.user_id.as_deref());
    let limit = state.gate.limit_for(body.license_key.as_deref()).await;
    let template = PackRequest::new("", body.niche, body.audience, body.tone, body.platform);

    let outcome = run_bulk(&state, &identity, limit, &template, &body.topics).await?;
    info!(
        "Built {} packs for {identity}; archive at {}",
        outcome.built(),
        outcome.archive_path.display()
    );

    Ok(Json(BulkResponse {
        built: outcome.built(),
        archive_url: format!("{FILES_ROUTE}/{}", outcome.archive_name),
        archive_file: outcome.archive_name,
        archive_entries: outcome.archive_entries,
        rows: outcome.rows,
    }))
}

/// GET /api/v1/packs/files/:name
///
/// Serves a written PDF or bulk archive from the output directory.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let content_type = download_content_type(&name)
        .ok_or_else(|| AppError::NotFound(format!("File {name} not found")))?;

    let bytes = match tokio::fs::read(state.config.output_dir.join(&name)).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File {name} not found")));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        bytes,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_identity(state: &AppState, user_id: Option<&str>) -> String {
    match user_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => state.config.default_user_id.clone(),
    }
}

/// MIME type for downloadable names; `None` for anything else.
fn download_content_type(name: &str) -> Option<&'static str> {
    if !is_safe_file_name(name) {
        return None;
    }
    if name.ends_with(".pdf") {
        Some("application/pdf")
    } else if name.ends_with(".zip") {
        Some("application/zip")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_content_type() {
        assert_eq!(download_content_type("a.pdf"), Some("application/pdf"));
        assert_eq!(download_content_type("TrendForge_bulk_tiktok_20250914_080500.zip"), Some("application/zip"));
        assert_eq!(download_content_type("a.md"), None);
        assert_eq!(download_content_type("../a.pdf"), None);
    }

    #[test]
    fn test_pack_body_defaults_optional_fields() {
        let body: PackBody =
            serde_json::from_str(r#"{"topic": "study hacks", "platform": "YouTube"}"#).unwrap();
        assert_eq!(body.platform, Platform::Youtube);
        assert!(body.user_id.is_none());
        assert!(body.niche.is_empty());
    }
}
