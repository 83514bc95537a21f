//! Chat relay: prompt construction, backend dispatch, reply sanitization

use super::backend::Backend;
use super::profile::PromptProfile;
use super::prompt::Prompt;
use super::sanitize::sanitize_reply;
use super::types::ChatTurn;
use crate::error::RelayError;
use crate::logger;
use std::sync::Arc;

/// Stateless across calls; shared by every connection
pub struct ChatRelay {
    backend: Arc<dyn Backend>,
    profile: PromptProfile,
}

impl ChatRelay {
    pub fn new(backend: Arc<dyn Backend>, profile: PromptProfile) -> Self {
        Self { backend, profile }
    }

    pub fn profile(&self) -> &PromptProfile {
        &self.profile
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Produce the sanitized reply for `turns`
    pub async fn reply(&self, turns: &[ChatTurn]) -> Result<String, RelayError> {
        logger::log_chat_request(turns.len(), &self.profile.name, self.backend.name());

        let prompt = Prompt::new(&self.profile, turns);
        logger::log_chat_prompt(&prompt.flatten());

        let raw = self.backend.generate(&prompt).await.map_err(|e| {
            logger::log_backend_failure(self.backend.name(), &e);
            e
        })?;

        let reply = sanitize_reply(&raw, &self.profile.closing_line);
        logger::log_chat_reply(raw.len(), reply.len());
        Ok(reply)
    }
}
