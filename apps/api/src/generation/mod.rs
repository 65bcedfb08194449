// Content-pack generation: request model, AI generator with offline fallback,
// normalization, and the single/bulk pipeline behind the HTTP handlers.
// All chat-completion calls go through llm_client; nothing here talks HTTP directly.

pub mod generator;
pub mod handlers;
pub mod normalize;
pub mod offline;
pub mod pack;
pub mod pipeline;
pub mod prompts;
pub mod retry;
pub mod vocabulary;
