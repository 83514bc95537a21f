// Configuration module entry point
// Layered configuration (defaults < config.toml < RELAY_* environment) and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::RelayError;

// Re-export public types
pub use state::AppState;
pub use types::{BackendConfig, BackendKind, Config, HttpConfig, RoutesConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_FILE: &str = "config";

impl Config {
    /// Load configuration from the default `config.toml` (optional)
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension).
    /// Environment variables such as `RELAY_BACKEND__MODEL` override the file.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .set_default("http.server_name", "chat-relay/0.1")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("routes.root", ".")?
            .set_default("routes.index_file", "index.html")?
            .set_default("routes.chatbot_path", "/chatbot.html")?
            .set_default("routes.chatbot_file", "chatbot.html")?
            .set_default("backend.kind", "ollama")?
            .set_default("backend.model", "llama3")?
            .set_default("prompt.profile", "culture")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, RelayError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| RelayError::Config(format!("Invalid address: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/relay-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.backend.kind, BackendKind::Ollama);
        assert_eq!(cfg.backend.model, "llama3");
        assert_eq!(cfg.backend.endpoint(), "http://localhost:11434/api/chat");
        assert_eq!(cfg.prompt.profile, "culture");
        assert!(cfg.prompt.file.is_none());
        assert_eq!(cfg.routes.index_file, "index.html");
        assert_eq!(cfg.routes.chatbot_path, "/chatbot.html");
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8088

[backend]
kind = "openai"
model = "mistral-7b-instruct"

[prompt]
profile = "attire"
"#,
        )
        .unwrap();

        let stem = dir.path().join("relay");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.backend.kind, BackendKind::OpenAi);
        assert_eq!(cfg.backend.endpoint(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(cfg.prompt.profile, "attire");
        // untouched sections keep their defaults
        assert_eq!(cfg.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let mut cfg = Config::load_from("/nonexistent/relay-config").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(cfg.get_socket_addr(), Err(RelayError::Config(_))));
    }
}
