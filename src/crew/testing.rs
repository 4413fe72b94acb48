// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Test doubles for the model and tools

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::errors::{CopilotError, CopilotResult};
use crate::llm::{ChatRequest, ChatResponse, LanguageModel};
use crate::tools::Tool;

/// Answers from a script and records every request.
/// Running out of answers is an API error.
pub struct ScriptedModel {
    script: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<ChatResponse>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn texts(answers: &[&str]) -> Arc<Self> {
        Self::new(
            answers
                .iter()
                .map(|a| ChatResponse::Text(a.to_string()))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ChatRequest) -> CopilotResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CopilotError::LlmApi {
                status: 503,
                message: "script exhausted".into(),
            })
    }
}

/// Fails every request with an error built on demand
pub struct FailingModel {
    error: fn() -> CopilotError,
}

impl FailingModel {
    pub fn new(error: fn() -> CopilotError) -> Arc<Self> {
        Arc::new(Self { error })
    }
}

#[async_trait]
impl LanguageModel for FailingModel {
    fn model(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: &ChatRequest) -> CopilotResult<ChatResponse> {
        Err((self.error)())
    }
}

/// A tool that always returns the same text
pub struct StaticTool {
    name: String,
    output: String,
}

impl StaticTool {
    pub fn new(name: &str, output: &str) -> Arc<dyn Tool> {
        Arc::new(Self {
            name: name.to_string(),
            output: output.to_string(),
        })
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Static test tool"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    async fn call(&self, _args: &Value) -> CopilotResult<String> {
        Ok(self.output.clone())
    }
}
