//! Model backends
//!
//! Every local inference mechanism implements [`Backend`]; the relay only
//! ever sees the trait object.

mod ollama;
mod openai;

#[cfg(test)]
pub mod fake;

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use crate::chat::prompt::Prompt;
use crate::config::{BackendConfig, BackendKind};
use crate::error::RelayError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Generate the raw (unsanitized) reply text for `prompt`
    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, RelayError>;
}

/// Build the backend selected in configuration
pub fn from_config(config: &BackendConfig) -> Result<Arc<dyn Backend>, RelayError> {
    let url = config.endpoint();
    reqwest::Url::parse(&url)
        .map_err(|e| RelayError::Config(format!("invalid backend url '{url}': {e}")))?;

    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| RelayError::Config(format!("cannot build HTTP client: {e}")))?;

    Ok(match config.kind {
        BackendKind::Ollama => Arc::new(OllamaBackend::new(client, url, config.model.clone())),
        BackendKind::OpenAi => Arc::new(OpenAiBackend::new(client, url, config.model.clone())),
    })
}

/// Turn a non-success status into a `BackendError` carrying the body text
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RelayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = body.trim();
    Err(RelayError::BackendError(if detail.is_empty() {
        format!("status {status}")
    } else {
        format!("status {status}: {detail}")
    }))
}
