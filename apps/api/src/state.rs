use std::sync::Arc;

use crate::config::Config;
use crate::gate::RequestGate;
use crate::generation::generator::PackGenerator;
use crate::render::FontRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// AI-with-offline-fallback pack generator. Offline-only when no API key is set.
    pub generator: PackGenerator,
    /// Quota store, moderation and license checks. One per process.
    pub gate: Arc<RequestGate>,
    /// PDF fonts resolved at startup.
    pub fonts: Arc<FontRegistry>,
}

impl AppState {
    pub fn new(config: Config, generator: PackGenerator) -> Self {
        let gate = Arc::new(RequestGate::from_config(&config));
        let fonts = Arc::new(FontRegistry::detect(&config));
        Self {
            config,
            generator,
            gate,
            fonts,
        }
    }
}
