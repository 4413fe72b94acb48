// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Language model client
//!
//! The crew talks to the model through the [`LanguageModel`] trait. One client
//! is created per process and shared, read-only, by every agent.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CopilotResult;

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Text from the user side (task prompts, follow-up instructions)
    User(String),
    /// A function call previously requested by the model
    ToolCall { name: String, args: Value },
    /// The result of running a requested function
    ToolResult { name: String, content: String },
}

/// A function the model may call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: Value,
}

/// A generation request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// System instruction
    pub system: Option<String>,
    /// Conversation so far
    pub messages: Vec<Message>,
    /// Functions offered to the model; empty disables function calling
    pub tools: Vec<ToolSpec>,
    /// Keep the declarations but forbid further calls
    pub force_text: bool,
}

impl ChatRequest {
    /// Start a request with a system instruction and a first user message
    pub fn new(system: Option<String>, prompt: impl Into<String>) -> Self {
        Self {
            system,
            messages: vec![Message::User(prompt.into())],
            tools: Vec::new(),
            force_text: false,
        }
    }
}

/// What the model answered
#[derive(Debug, Clone, PartialEq)]
pub enum ChatResponse {
    /// A final text answer
    Text(String),
    /// A request to run a function
    ToolCall { name: String, args: Value },
}

/// A language model backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Generate the next turn
    async fn generate(&self, request: &ChatRequest) -> CopilotResult<ChatResponse>;
}
