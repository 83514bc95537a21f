// Ollama backend
// POSTs the flattened prompt as a single user message to the native /api/chat endpoint

use super::{check_status, Backend};
use crate::chat::prompt::Prompt;
use crate::chat::profile::SamplingParams;
use crate::chat::types::ChatTurn;
use crate::error::RelayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub struct OllamaBackend {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaBackend {
    pub const fn new(client: reqwest::Client, url: String, model: String) -> Self {
        Self { client, url, model }
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn>,
    stream: bool,
    options: OllamaOptions<'a>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions<'a> {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_ctx: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_thread: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_gpu: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_batch: Option<u32>,
    repeat_penalty: f32,
    stop: &'a [String],
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    mirostat: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mirostat_eta: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mirostat_tau: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gpu_layers: Option<i32>,
}

impl<'a> From<&'a SamplingParams> for OllamaOptions<'a> {
    fn from(s: &'a SamplingParams) -> Self {
        Self {
            temperature: s.temperature,
            top_p: s.top_p,
            top_k: s.top_k,
            num_ctx: s.num_ctx,
            num_thread: s.num_thread,
            num_gpu: s.num_gpu,
            num_batch: s.num_batch,
            repeat_penalty: s.repeat_penalty,
            stop: &s.stop,
            num_predict: s.max_tokens,
            mirostat: s.mirostat.as_ref().map(|m| m.mode),
            mirostat_eta: s.mirostat.as_ref().map(|m| m.eta),
            mirostat_tau: s.mirostat.as_ref().map(|m| m.tau),
            gpu_layers: s.gpu_layers,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[async_trait]
impl Backend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, RelayError> {
        let body = OllamaRequest {
            model: &self.model,
            messages: prompt.as_single_user_message(),
            stream: false,
            options: OllamaOptions::from(prompt.sampling),
        };

        let response = self.client.post(&self.url).json(&body).send().await?;
        let response = check_status(response).await?;
        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| RelayError::BackendError(format!("unexpected response envelope: {e}")))?;
        Ok(parsed.message.content)
    }
}
