// Scripted backend for handler and relay tests

use super::Backend;
use crate::chat::prompt::Prompt;
use crate::error::RelayError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued results in order and records every flattened prompt it receives.
/// Once the script is exhausted it answers with `fallback`.
pub struct FakeBackend {
    script: Mutex<VecDeque<Result<String, RelayError>>>,
    fallback: String,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn replying(text: &str) -> Self {
        Self::scripted(Vec::new(), text)
    }

    pub fn scripted(script: Vec<Result<String, RelayError>>, fallback: &str) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: fallback.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, RelayError> {
        self.prompts.lock().unwrap().push(prompt.flatten());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
