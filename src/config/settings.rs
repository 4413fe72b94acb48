// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Process settings
//!
//! Credentials, model and endpoint choices, and file locations. Built once at
//! start-up (from flags, environment and `.env`) and handed to each component
//! at construction time; nothing below this layer reads the environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{CopilotError, CopilotResult};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Serper API base URL
pub const DEFAULT_SERPER_BASE_URL: &str = "https://google.serper.dev";

/// Environment variable holding the required model credential
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable holding the optional search credential
pub const SERPER_API_KEY_VAR: &str = "SERPER_API_KEY";

/// Everything the copilot needs to build a crew
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to agents.yaml
    pub agents_path: PathBuf,
    /// Path to tasks.yaml
    pub tasks_path: PathBuf,
    /// Language model client settings
    pub llm: LlmSettings,
    /// Web search settings
    pub search: SearchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            agents_path: PathBuf::from("config/agents.yaml"),
            tasks_path: PathBuf::from("config/tasks.yaml"),
            llm: LlmSettings::default(),
            search: SearchSettings::default(),
        }
    }
}

/// Language model client settings
#[derive(Clone)]
pub struct LlmSettings {
    /// API key (required before any task runs)
    pub api_key: Option<String>,
    /// Model name, without provider prefix
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Sampling temperature; the model default when unset
    pub temperature: Option<f32>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl LlmSettings {
    /// The API key, or a configuration error naming the missing variable
    pub fn require_api_key(&self) -> CopilotResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CopilotError::missing_credential(GEMINI_API_KEY_VAR))
    }
}

// Keys never reach logs
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Web search settings
#[derive(Clone)]
pub struct SearchSettings {
    /// API key; search is disabled without it
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Results requested per query
    pub num_results: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_SERPER_BASE_URL.to_string(),
            num_results: 5,
            timeout: Duration::from_secs(15),
        }
    }
}

impl fmt::Debug for SearchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSettings")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("base_url", &self.base_url)
            .field("num_results", &self.num_results)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Strip a `provider/` prefix such as `gemini/gemini-2.0-flash`
pub fn normalize_model(model: &str) -> String {
    let model = model.trim();
    match model.split_once('/') {
        Some(("gemini", name)) if !name.is_empty() => name.to_string(),
        _ => model.to_string(),
    }
}

/// Treat blank values as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Mask a secret for display, keeping a short prefix and suffix
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
