//! End-to-end pack pipeline shared by the single and bulk endpoints.
//!
//! Order per topic: quota charge → moderation → generate (AI or offline) →
//! normalize → Markdown + PDF (PDF on a blocking thread) → write and read back.
//! Quota is charged before moderation, so blocked topics still count.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::generator::FallbackReason;
use crate::generation::normalize::normalize_pack;
use crate::generation::pack::{ContentPack, PackRequest};
use crate::render::archive::{build_archive, ArchiveEntry};
use crate::render::markdown::{render_markdown, TIMESTAMP_FORMAT};
use crate::render::pdf::{build_pdf, write_and_reload};
use crate::render::text::file_base;
use crate::render::RenderError;
use crate::state::AppState;

const ARCHIVE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Everything produced for one topic.
#[derive(Debug, Clone)]
pub struct PackOutcome {
    pub pack: ContentPack,
    pub markdown: String,
    pub file_base: String,
    pub pdf_path: PathBuf,
    pub pdf_bytes: Vec<u8>,
    pub ai_used: bool,
    pub fallback_reason: Option<FallbackReason>,
}

impl PackOutcome {
    pub fn markdown_file(&self) -> String {
        format!("{}.md", self.file_base)
    }

    pub fn pdf_file(&self) -> String {
        format!("{}.pdf", self.file_base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkStatus {
    Ok,
    Blocked,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkRow {
    pub topic: String,
    pub status: BulkStatus,
    /// Empty for blocked topics.
    pub pdf_file: String,
    pub markdown_file: String,
    pub ai_used: bool,
}

#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub rows: Vec<BulkRow>,
    pub archive_name: String,
    pub archive_path: PathBuf,
    /// Number of files inside the archive (Markdown + PDF per ok topic).
    pub archive_entries: usize,
}

impl BulkOutcome {
    pub fn built(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.status == BulkStatus::Ok)
            .count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Single
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline for one request charged to `identity`.
pub async fn run_single(
    state: &AppState,
    identity: &str,
    limit: u32,
    request: PackRequest,
) -> Result<PackOutcome, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("Please enter a topic.".to_string()));
    }

    state.gate.charge(identity, limit)?;
    state.gate.screen(&request.topic)?;

    build_outputs(state, request).await
}

/// Generate → normalize → render → write. No gate checks.
async fn build_outputs(state: &AppState, request: PackRequest) -> Result<PackOutcome, AppError> {
    let generation = state.generator.generate(&request).await;
    let ai_used = generation.ai_used();
    let fallback_reason = generation.fallback_reason().cloned();
    let pack = normalize_pack(generation.into_raw());

    let now = Local::now();
    let stamp = now.format(TIMESTAMP_FORMAT).to_string();
    let base = file_base(&state.config.file_prefix, request.platform, &request.topic);
    let pdf_path = state.config.output_dir.join(format!("{base}.pdf"));

    let pdf_task = {
        let request = request.clone();
        let pack = pack.clone();
        let fonts = Arc::clone(&state.fonts);
        let path = pdf_path.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<u8>, RenderError> {
            let bytes = build_pdf(&request, &pack, ai_used, &stamp, &fonts)?;
            write_and_reload(&path, &bytes)
        })
    };
    let markdown = render_markdown(&request, &pack, &now);
    let pdf_bytes = pdf_task.await.map_err(RenderError::from)??;

    info!(
        "Built pack {base} ({} bytes PDF, mode: {})",
        pdf_bytes.len(),
        if ai_used { "ai" } else { "offline" }
    );

    Ok(PackOutcome {
        pack,
        markdown,
        file_base: base,
        pdf_path,
        pdf_bytes,
        ai_used,
        fallback_reason,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Bulk
// ────────────────────────────────────────────────────────────────────────────

/// Trims topics and drops blank ones.
pub fn clean_topics(topics: &[String]) -> Vec<String> {
    topics
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds one pack per topic, in order, then zips every Markdown and PDF.
///
/// Blocked topics become `blocked` rows. Any other error aborts the run;
/// PDFs already written stay on disk and no archive is produced.
pub async fn run_bulk(
    state: &AppState,
    identity: &str,
    limit: u32,
    template: &PackRequest,
    topics: &[String],
) -> Result<BulkOutcome, AppError> {
    let topics = clean_topics(topics);
    if topics.is_empty() {
        return Err(AppError::Validation("No topics provided.".to_string()));
    }

    let total = topics.len();
    let mut rows = Vec::with_capacity(total);
    let mut entries = Vec::new();

    for (index, topic) in topics.into_iter().enumerate() {
        state.gate.charge(identity, limit)?;

        if state.gate.screen(&topic).is_err() {
            warn!("Bulk {}/{}: topic {topic:?} blocked", index + 1, total);
            rows.push(BulkRow {
                topic,
                status: BulkStatus::Blocked,
                pdf_file: String::new(),
                markdown_file: String::new(),
                ai_used: false,
            });
            continue;
        }

        let outcome = build_outputs(state, template.with_topic(topic.as_str())).await?;
        let markdown_file = outcome.markdown_file();
        let pdf_file = outcome.pdf_file();
        push_entry(
            &mut entries,
            ArchiveEntry::new(markdown_file.as_str(), outcome.markdown.into_bytes()),
        );
        push_entry(
            &mut entries,
            ArchiveEntry::new(pdf_file.as_str(), outcome.pdf_bytes),
        );
        rows.push(BulkRow {
            topic,
            status: BulkStatus::Ok,
            pdf_file,
            markdown_file,
            ai_used: outcome.ai_used,
        });
        info!("Bulk {}/{} done", index + 1, total);
    }

    let archive_name = format!(
        "{}_bulk_{}_{}.zip",
        state.config.file_prefix,
        template.platform.as_str(),
        Local::now().format(ARCHIVE_STAMP_FORMAT)
    );
    let archive_path = state.config.output_dir.join(&archive_name);
    let archive_entries = entries.len();

    let path = archive_path.clone();
    tokio::task::spawn_blocking(move || -> Result<Vec<u8>, RenderError> {
        let bytes = build_archive(&entries)?;
        write_and_reload(&path, &bytes)
    })
    .await
    .map_err(RenderError::from)??;

    let outcome = BulkOutcome {
        rows,
        archive_name,
        archive_path,
        archive_entries,
    };
    info!(
        "Bulk run finished: {} of {} topics built",
        outcome.built(),
        total
    );
    Ok(outcome)
}

/// Adds `entry`, replacing an earlier one with the same name so the archive
/// mirrors the output directory, where the later file overwrote the earlier.
fn push_entry(entries: &mut Vec<ArchiveEntry>, entry: ArchiveEntry) {
    match entries.iter_mut().find(|e| e.name == entry.name) {
        Some(existing) => {
            warn!("Bulk: {} produced twice; keeping the latest", entry.name);
            *existing = entry;
        }
        None => entries.push(entry),
    }
}
