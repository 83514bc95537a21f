//! Chat pipeline
//!
//! Turns in, sanitized reply out. Nothing here knows about HTTP serving;
//! see `handler::chat` for the endpoint.

pub mod backend;
pub mod profile;
pub mod prompt;
pub mod relay;
pub mod sanitize;
pub mod types;

pub use profile::PromptProfile;
pub use relay::ChatRelay;
pub use types::{ChatRequest, ChatResponse, ErrorResponse};
