// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Error types
//!
//! Every failure the copilot can surface falls into one of two classes:
//! configuration problems (a credential is missing, a setting is unusable)
//! and execution problems (a task, the model, or a tool failed). Front-ends
//! use [`CopilotError::is_configuration`] to tell them apart.

mod recovery;

pub use recovery::RecoverySuggestion;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for copilot operations
pub type CopilotResult<T> = Result<T, CopilotError>;

/// Main error type for ene-copilot
#[derive(Error, Debug, Diagnostic)]
pub enum CopilotError {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Missing credential: {variable} is not set")]
    #[diagnostic(code(ene_copilot::missing_credential))]
    MissingCredential {
        variable: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid credential: {variable} was rejected ({message})")]
    #[diagnostic(code(ene_copilot::invalid_credential))]
    InvalidCredential {
        variable: String,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid setting '{name}': {reason}")]
    #[diagnostic(code(ene_copilot::invalid_setting))]
    InvalidSetting { name: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid pipeline: {reason}")]
    #[diagnostic(code(ene_copilot::invalid_pipeline))]
    InvalidPipeline {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Circular dependency detected")]
    #[diagnostic(
        code(ene_copilot::circular_dependency),
        help("Review the task context lists to remove the cycle")
    )]
    CircularDependency { tasks: Vec<String> },

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    #[diagnostic(
        code(ene_copilot::unknown_dependency),
        help("Check that '{dependency}' is declared in the pipeline")
    )]
    UnknownDependency { task: String, dependency: String },

    #[error("Task '{task}' is assigned to unknown agent '{agent}'")]
    #[diagnostic(code(ene_copilot::unknown_agent))]
    UnknownAgent { task: String, agent: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Execution Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Task '{task}' failed: {message}")]
    #[diagnostic(code(ene_copilot::task_failed))]
    TaskFailed {
        task: String,
        message: String,
        /// Set when the underlying cause is a configuration problem
        configuration: bool,
    },

    #[error("Execution failed: {message}")]
    #[diagnostic(code(ene_copilot::execution_failed))]
    ExecutionFailed {
        message: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Model / Tool Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Language model API error ({status}): {message}")]
    #[diagnostic(code(ene_copilot::llm_api_error))]
    LlmApi { status: u16, message: String },

    #[error("Invalid language model response: {message}")]
    #[diagnostic(code(ene_copilot::llm_invalid_response))]
    LlmInvalidResponse { message: String },

    #[error("Tool '{tool}' failed: {message}")]
    #[diagnostic(code(ene_copilot::tool_failed))]
    ToolFailed { tool: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("HTTP error: {message}")]
    #[diagnostic(code(ene_copilot::http_error))]
    Http { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(ene_copilot::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(ene_copilot::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(ene_copilot::json_error))]
    Json { message: String },
}

impl From<std::io::Error> for CopilotError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for CopilotError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for CopilotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<reqwest::Error> for CopilotError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs stay out of user-facing messages
        Self::Http {
            message: e.without_url().to_string(),
        }
    }
}

impl CopilotError {
    /// Create a missing credential error with a hint on how to provide it
    pub fn missing_credential(variable: &str) -> Self {
        let help = match variable {
            "GEMINI_API_KEY" => Some(
                "Get a key from Google AI Studio (https://aistudio.google.com/app/apikey) \
                 and export GEMINI_API_KEY or add it to .env"
                    .to_string(),
            ),
            "SERPER_API_KEY" => {
                Some("Get a key from https://serper.dev and export SERPER_API_KEY".to_string())
            }
            _ => None,
        };

        Self::MissingCredential {
            variable: variable.to_string(),
            help,
        }
    }

    /// A credential the remote service refused
    pub fn invalid_credential(variable: &str, message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            variable: variable.to_string(),
            message: message.into(),
            help: Some(format!("Check that {} holds a valid, enabled key", variable)),
        }
    }

    /// Wrap any error raised while a task was running. The configuration
    /// class of the cause is kept.
    pub fn task_failed(task: &str, error: &CopilotError) -> Self {
        Self::TaskFailed {
            task: task.to_string(),
            message: error.to_string(),
            configuration: error.is_configuration(),
        }
    }

    /// Whether this error is a configuration problem rather than a runtime failure
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::MissingCredential { .. }
            | Self::InvalidCredential { .. }
            | Self::InvalidSetting { .. } => true,
            Self::TaskFailed { configuration, .. } => *configuration,
            _ => false,
        }
    }

    /// A recovery suggestion for errors that have an obvious fix
    pub fn recovery(&self) -> Option<RecoverySuggestion> {
        match self {
            Self::MissingCredential { variable, .. } | Self::InvalidCredential { variable, .. } => {
                Some(RecoverySuggestion::set_credential(variable))
            }
            Self::CircularDependency { tasks } => {
                Some(RecoverySuggestion::fix_circular_dependency(tasks))
            }
            Self::Yaml { .. } => Some(RecoverySuggestion::fix_yaml_syntax(None, None)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_configuration() {
        let err = CopilotError::missing_credential("GEMINI_API_KEY");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_task_failure_is_not_configuration() {
        let inner = CopilotError::LlmApi {
            status: 503,
            message: "overloaded".into(),
        };
        let err = CopilotError::task_failed("business_plan_task", &inner);

        assert!(!err.is_configuration());
        assert!(err.to_string().contains("business_plan_task"));
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn test_rejected_key_stays_configuration_through_task_failure() {
        let inner = CopilotError::invalid_credential("GEMINI_API_KEY", "API key not valid");
        let err = CopilotError::task_failed("business_plan_task", &inner);

        assert!(err.is_configuration());
        assert!(err.to_string().contains("business_plan_task"));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(err.recovery().is_none());
    }

    #[test]
    fn test_recovery_for_missing_credential() {
        let err = CopilotError::missing_credential("GEMINI_API_KEY");
        let suggestion = err.recovery().unwrap();
        assert!(suggestion.to_string().contains("GEMINI_API_KEY"));
    }
}
