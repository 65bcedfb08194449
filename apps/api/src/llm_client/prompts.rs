// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting persona instruction.

/// System instruction sent with every content-pack request.
pub const STRATEGIST_SYSTEM: &str =
    "You are a concise social media strategist. Avoid filler; be specific.";
