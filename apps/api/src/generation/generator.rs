//! Pack generation — AI first, deterministic offline fallback.
//!
//! Flow: credential check → build prompt → (chat completion → JSON scrape),
//!       retried with backoff → RawPack, or offline_generate() with a typed reason.
//!
//! The result is NOT size-checked here. Callers always run `normalize_pack` afterwards.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::offline::offline_generate;
use crate::generation::pack::{PackRequest, RawPack};
use crate::generation::prompts::{
    fill_template, DEFAULT_PROMPT_AUDIENCE, DEFAULT_PROMPT_TONE, PACK_PROMPT_TEMPLATE,
};
use crate::generation::retry::{with_retry, RetryPolicy};
use crate::llm_client::prompts::STRATEGIST_SYSTEM;
use crate::llm_client::{extract_json_object, TextGenerator};

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

/// Why the offline generator produced a pack instead of the AI service.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    #[error("no API credential configured")]
    NoCredential,

    #[error("text-generation request failed: {0}")]
    Request(String),

    #[error("response contained no JSON object")]
    MissingJson,

    #[error("response JSON could not be parsed: {0}")]
    Parse(String),
}

/// Outcome of one generation: either the AI's raw pack, or the offline pack
/// together with the reason the AI path was not used.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Ai(RawPack),
    Offline { pack: RawPack, reason: FallbackReason },
}

impl Generation {
    /// True only when the AI service's output is what the caller gets.
    pub fn ai_used(&self) -> bool {
        matches!(self, Generation::Ai(_))
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Generation::Ai(_) => None,
            Generation::Offline { reason, .. } => Some(reason),
        }
    }

    pub fn into_raw(self) -> RawPack {
        match self {
            Generation::Ai(pack) => pack,
            Generation::Offline { pack, .. } => pack,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Produces raw packs. Holds the optional text-generation backend and the
/// retry policy applied around each AI attempt.
#[derive(Clone)]
pub struct PackGenerator {
    llm: Option<Arc<dyn TextGenerator>>,
    retry: RetryPolicy,
}

impl PackGenerator {
    pub fn new(llm: Option<Arc<dyn TextGenerator>>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    /// A generator with no backend: every pack comes from the offline path.
    #[cfg(test)]
    pub fn offline() -> Self {
        Self::new(None, RetryPolicy::default())
    }

    pub fn ai_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// Generates a raw pack for `request`. Never fails: every AI problem
    /// becomes an offline pack with a `FallbackReason`.
    pub async fn generate(&self, request: &PackRequest) -> Generation {
        let Some(llm) = &self.llm else {
            return Generation::Offline {
                pack: offline_generate(request),
                reason: FallbackReason::NoCredential,
            };
        };

        let prompt = build_pack_prompt(request);
        match with_retry(self.retry, || request_pack(llm.as_ref(), &prompt)).await {
            Ok(pack) => {
                info!(
                    "AI pack for {:?}: {} hooks, {} captions, {} hashtags, {} plan items",
                    request.topic,
                    pack.hooks.len(),
                    pack.captions.len(),
                    pack.hashtags.len(),
                    pack.plan.len()
                );
                Generation::Ai(pack)
            }
            Err(reason) => {
                warn!("AI disabled this run → {reason}");
                Generation::Offline {
                    pack: offline_generate(request),
                    reason,
                }
            }
        }
    }
}

/// One AI attempt: completion, then best-effort JSON scraping.
async fn request_pack(llm: &dyn TextGenerator, prompt: &str) -> Result<RawPack, FallbackReason> {
    let text = llm
        .complete(prompt, STRATEGIST_SYSTEM)
        .await
        .map_err(|e| FallbackReason::Request(e.to_string()))?;

    let json = extract_json_object(&text).ok_or(FallbackReason::MissingJson)?;

    serde_json::from_str(json).map_err(|e| FallbackReason::Parse(e.to_string()))
}

/// Fills the pack prompt template with the request fields.
pub fn build_pack_prompt(request: &PackRequest) -> String {
    let audience = if request.audience.trim().is_empty() {
        DEFAULT_PROMPT_AUDIENCE
    } else {
        request.audience.as_str()
    };
    let tone = if request.tone.trim().is_empty() {
        DEFAULT_PROMPT_TONE
    } else {
        request.tone.as_str()
    };

    fill_template(
        PACK_PROMPT_TEMPLATE,
        &[
            ("topic", request.topic.as_str()),
            ("niche", request.niche.as_str()),
            ("platform", request.platform.as_str()),
            ("audience", audience),
            ("tone", tone),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
