// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub routes: RoutesConfig,
    pub backend: BackendConfig,
    pub prompt: PromptConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for a client to send request headers (0 disables).
    /// Never bounds the backend call itself.
    pub header_read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Static document routes
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutesConfig {
    /// Directory every static path is resolved against
    pub root: String,
    /// Document served at `/`
    pub index_file: String,
    /// Fixed path of the chat UI
    pub chatbot_path: String,
    /// Document served at `chatbot_path`
    pub chatbot_file: String,
}

/// Which local inference API the relay talks to
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Native Ollama runtime (`/api/chat`)
    #[serde(rename = "ollama")]
    Ollama,
    /// OpenAI-compatible server (`/v1/chat/completions`)
    #[serde(rename = "openai", alias = "openai_compatible", alias = "lmstudio")]
    OpenAi,
}

impl BackendKind {
    pub const fn default_url(self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434/api/chat",
            Self::OpenAi => "http://localhost:1234/v1/chat/completions",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        })
    }
}

/// Backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub model: String,
    /// Endpoint override; the kind's default URL when unset
    #[serde(default)]
    pub url: Option<String>,
}

impl BackendConfig {
    pub fn endpoint(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| self.kind.default_url().to_string())
    }
}

/// Prompt profile selection
#[derive(Debug, Deserialize, Clone)]
pub struct PromptConfig {
    /// Built-in profile name (`culture`, `attire`)
    pub profile: String,
    /// TOML profile file; takes precedence over `profile`
    #[serde(default)]
    pub file: Option<String>,
}
