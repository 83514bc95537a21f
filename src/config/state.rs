// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::chat::backend::{self, Backend};
use crate::chat::{ChatRelay, PromptProfile};
use crate::error::RelayError;

/// Application state
pub struct AppState {
    pub config: Config,
    pub relay: ChatRelay,
}

impl AppState {
    /// Build state with the backend selected in configuration
    pub fn new(config: Config) -> Result<Self, RelayError> {
        let backend = backend::from_config(&config.backend)?;
        Self::with_backend(config, backend)
    }

    /// Build state around an explicit backend (used to inject fakes)
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Result<Self, RelayError> {
        let profile = PromptProfile::resolve(&config.prompt.profile, config.prompt.file.as_deref())?;
        Ok(Self {
            relay: ChatRelay::new(backend, profile),
            config,
        })
    }
}
