// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Agent capability tools
//!
//! Tools are optional. A tool that cannot be initialized is simply left out
//! of the crew; it never prevents the agents from forming.

mod serper;

pub use serper::{init_web_search, SerperSearch};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CopilotResult;
use crate::llm::ToolSpec;

/// A capability an agent can invoke through model function calling
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name exposed to the model
    fn name(&self) -> &str;

    /// What the tool does, for the model
    fn description(&self) -> &str;

    /// JSON schema of the arguments
    fn parameters(&self) -> Value;

    /// Run the tool and return text for the model
    async fn call(&self, args: &Value) -> CopilotResult<String>;

    /// Declaration handed to the language model
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}
