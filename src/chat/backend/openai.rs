// OpenAI-compatible backend (LM Studio, llama.cpp server, vLLM, ...)
// POSTs the structured message list to a local /v1/chat/completions endpoint

use super::{check_status, Backend};
use crate::chat::prompt::Prompt;
use crate::chat::types::ChatTurn;
use crate::error::RelayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub struct OpenAiBackend {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OpenAiBackend {
    pub const fn new(client: reqwest::Client, url: String, model: String) -> Self {
        Self { client, url, model }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stop: &'a [String],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Backend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, RelayError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: prompt.structured(),
            temperature: prompt.sampling.temperature,
            top_p: prompt.sampling.top_p,
            max_tokens: prompt.sampling.max_tokens,
            stop: &prompt.sampling.stop,
            stream: false,
        };

        let response = self.client.post(&self.url).json(&body).send().await?;
        let response = check_status(response).await?;
        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| RelayError::BackendError(format!("unexpected response envelope: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RelayError::BackendError("response has no choices[0].message.content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::profile::PromptProfile;
    use crate::chat::types::Role;
    use mockito::Matcher;
    use serde_json::json;

    const PATH: &str = "/v1/chat/completions";

    fn backend(server: &mockito::Server) -> OpenAiBackend {
        OpenAiBackend::new(
            reqwest::Client::new(),
            format!("{}{PATH}", server.url()),
            "local-model".to_string(),
        )
    }

    #[tokio::test]
    async fn test_generate_sends_structured_messages() {
        let mut server = mockito::Server::new_async().await;
        let profile = PromptProfile::builtin("attire").unwrap();
        let turns = vec![
            ChatTurn::new(Role::User, "What is a sherwani?"),
            ChatTurn::new(Role::Assistant, "A long coat."),
            ChatTurn::new(Role::User, "Who wears it?"),
        ];

        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJson(json!({
                "model": "local-model",
                "messages": [
                    {"role": "system", "content": profile.system_prompt},
                    {"role": "user", "content": "What is a sherwani?"},
                    {"role": "assistant", "content": "A long coat."},
                    {"role": "user", "content": "Who wears it?"}
                ],
                "max_tokens": 1024,
                "stop": ["</s>"],
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"x","object":"chat.completion","choices":[{"index":0,"message":{"role":"assistant","content":"Grooms, at weddings."},"finish_reason":"stop"}]}"#)
            .create_async()
            .await;

        let reply = backend(&server)
            .generate(&Prompt::new(&profile, &turns))
            .await
            .unwrap();
        assert_eq!(reply, "Grooms, at weddings.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_choices_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let profile = PromptProfile::builtin("culture").unwrap();
        let err = backend(&server)
            .generate(&Prompt::new(&profile, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::BackendError(_)));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(500)
            .create_async()
            .await;

        let profile = PromptProfile::builtin("culture").unwrap();
        let err = backend(&server)
            .generate(&Prompt::new(&profile, &[]))
            .await
            .unwrap_err();
        match err {
            RelayError::BackendError(msg) => assert!(msg.contains("500")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
