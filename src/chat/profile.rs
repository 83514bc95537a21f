//! Prompt profiles
//!
//! A profile bundles the system instruction prepended to every request,
//! the closing courtesy line enforced on every reply, and the sampling
//! parameters sent to the backend. Two profiles are built in; others can
//! be loaded from a TOML file.

use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CLOSING_LINE: &str = "Let me know if you need any further assistance.";

/// Adaptive sampling block understood by the Ollama runtime
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Mirostat {
    pub mode: u8,
    pub eta: f32,
    pub tau: f32,
}

/// Fixed sampling parameters of a profile.
///
/// Backends send the subset they understand: the OpenAI-compatible
/// backend only uses `temperature`, `top_p`, `max_tokens` and `stop`.
///
/// In a profile file, missing scalar fields take the `culture` values while
/// missing optional fields stay unset (TOML has no way to write `None`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub num_ctx: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_thread: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_gpu: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_batch: Option<u32>,
    pub repeat_penalty: f32,
    pub stop: Vec<String>,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_layers: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirostat: Option<Mirostat>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_p: 0.4,
            top_k: 30,
            num_ctx: 8192,
            num_thread: Some(8),
            num_gpu: Some(1),
            num_batch: Some(512),
            repeat_penalty: 1.1,
            stop: vec!["</s>".into(), "Human:".into(), "Assistant:".into()],
            max_tokens: 2048,
            gpu_layers: Some(-1),
            mirostat: Some(Mirostat {
                mode: 2,
                eta: 0.1,
                tau: 5.0,
            }),
        }
    }
}

impl SamplingParams {
    /// `culture` values with every optional runtime knob unset
    pub fn without_runtime_options() -> Self {
        Self {
            num_thread: None,
            num_gpu: None,
            num_batch: None,
            gpu_layers: None,
            mirostat: None,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PromptProfile {
    pub name: String,
    pub system_prompt: String,
    #[serde(default = "default_closing_line")]
    pub closing_line: String,
    #[serde(default = "SamplingParams::without_runtime_options")]
    pub sampling: SamplingParams,
}

fn default_closing_line() -> String {
    DEFAULT_CLOSING_LINE.to_string()
}

impl PromptProfile {
    /// Names accepted by [`PromptProfile::builtin`]
    pub const BUILTIN: [&'static str; 2] = ["culture", "attire"];

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "culture" => Some(Self {
                name: "culture".to_string(),
                system_prompt: CULTURE_PROMPT.to_string(),
                closing_line: default_closing_line(),
                sampling: SamplingParams::default(),
            }),
            "attire" => Some(Self {
                name: "attire".to_string(),
                system_prompt: ATTIRE_PROMPT.to_string(),
                closing_line: default_closing_line(),
                sampling: SamplingParams {
                    temperature: 0.7,
                    top_p: 0.9,
                    top_k: 40,
                    num_ctx: 4096,
                    num_thread: None,
                    num_gpu: None,
                    num_batch: None,
                    repeat_penalty: 1.1,
                    stop: vec!["</s>".into()],
                    max_tokens: 1024,
                    gpu_layers: None,
                    mirostat: None,
                },
            }),
            _ => None,
        }
    }

    /// Load a profile from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RelayError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Profile(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, RelayError> {
        let profile: Self = toml::from_str(text).map_err(|e| RelayError::Profile(e.to_string()))?;
        if profile.system_prompt.trim().is_empty() {
            return Err(RelayError::Profile(format!(
                "profile '{}' has an empty system_prompt",
                profile.name
            )));
        }
        Ok(profile)
    }

    /// Resolve the active profile: a profile file wins over a built-in name
    pub fn resolve(name: &str, file: Option<&str>) -> Result<Self, RelayError> {
        if let Some(path) = file {
            return Self::from_file(path);
        }
        Self::builtin(name).ok_or_else(|| {
            RelayError::Profile(format!(
                "unknown profile '{name}' (built-in: {})",
                Self::BUILTIN.join(", ")
            ))
        })
    }
}

const CULTURE_PROMPT: &str = r#"You are a comprehensive expert on Indian culture, traditions, and customs. Answer questions EXACTLY as they are asked, without adding unnecessary context about specific festivals unless explicitly requested.

Guidelines for responses:
1. For "Why" questions:
   - Answer ONLY what is specifically asked
   - Do NOT add context about any festival unless explicitly mentioned in the question
   - Provide complete historical and cultural context
   - Include regional variations if relevant
   - Explain modern significance

2. Response structure:
   [Question Topic]:
   • Historical Background
   • Cultural Significance
   • Regional Variations
   • Modern Context
   • Specific Details
   • Additional Information

3. For specific item/custom questions:
   - Focus ONLY on the item/custom asked about
   - Explain its significance
   - Describe variations
   - Detail modern practices
   - Include relevant facts

4. For attire questions:
   - Explain the specific garment/accessory
   - Detail its cultural significance
   - Describe regional variations
   - Include material and style information
   - Mention modern adaptations

5. Remember:
   - Answer EXACTLY what is asked
   - Don't add festival context unless specifically requested
   - Provide comprehensive information about the specific topic
   - Include historical and cultural significance
   - Be accurate and respectful
   - Use clear, organized formatting
   - End with "Let me know if you need any further assistance."
"#;

const ATTIRE_PROMPT: &str = r#"You are an expert on traditional and contemporary Indian attire. Answer questions about garments, textiles, jewellery and accessories EXACTLY as they are asked.

Guidelines for responses:
1. For garment or accessory questions:
   - Name the garment/accessory and the regions where it is worn
   - Explain its cultural and ceremonial significance
   - Describe materials, weaves and draping or styling techniques
   - Mention modern adaptations and how it is worn today

2. Response structure:
   [Garment or Topic]:
   • Origin and History
   • Regional Variations
   • Materials and Craft
   • Occasions and Significance
   • Modern Styling

3. Remember:
   - Stay focused on attire unless the question asks otherwise
   - Be accurate and respectful of every community and tradition
   - Use clear, organized formatting
   - End with "Let me know if you need any further assistance."
"#;
