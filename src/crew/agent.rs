// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Agents
//!
//! An agent is a role bound to the shared language model and, optionally, to
//! tools it may call while working on a task.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::{AgentConfig, AgentsConfig};
use crate::errors::{CopilotError, CopilotResult};
use crate::llm::{ChatRequest, ChatResponse, LanguageModel, Message};
use crate::pipeline::{TaskPrompt, TaskRunner};
use crate::tools::Tool;

/// Sent when the tool-call budget is spent
const FINAL_ANSWER_NUDGE: &str =
    "You have used all your tool calls. Give your best complete final answer now, without calling any tools.";

/// A configured role
pub struct Agent {
    name: String,
    role: String,
    goal: Option<String>,
    backstory: Option<String>,
    llm: Arc<dyn LanguageModel>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: u32,
}

impl Agent {
    /// Build an agent from its configuration
    pub fn from_config(
        name: &str,
        config: &AgentConfig,
        llm: Arc<dyn LanguageModel>,
        search: Option<Arc<dyn Tool>>,
    ) -> Self {
        let tools = match search {
            Some(tool) if config.use_tools() => vec![tool],
            _ => Vec::new(),
        };

        Self {
            name: name.to_string(),
            role: non_blank(config.role.as_deref()).unwrap_or_else(|| humanize(name)),
            goal: non_blank(config.goal.as_deref()),
            backstory: non_blank(config.backstory.as_deref()),
            llm,
            tools,
            max_iterations: config.max_iterations(),
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Names of the tools this agent can call
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// System instruction describing the agent
    pub fn system_prompt(&self) -> String {
        let mut out = format!("You are {}.", self.role);
        if let Some(ref backstory) = self.backstory {
            out.push(' ');
            out.push_str(backstory);
        }
        if let Some(ref goal) = self.goal {
            out.push_str("\nYour personal goal is: ");
            out.push_str(goal);
        }
        out
    }

    /// Run a requested tool. Failures are reported to the model as text.
    async fn call_tool(&self, name: &str, args: &Value) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            warn!(agent = %self.name, tool = name, "Model requested an unavailable tool");
            return format!(
                "Error: tool '{}' is not available. Available tools: {}",
                name,
                if self.tools.is_empty() {
                    "none".to_string()
                } else {
                    self.tool_names().join(", ")
                }
            );
        };

        match tool.call(args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(agent = %self.name, tool = name, error = %e, "Tool call failed");
                format!("Error: {}", e)
            }
        }
    }
}

#[async_trait]
impl TaskRunner for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, prompt), fields(agent = %self.name, task = %prompt.task))]
    async fn run_task(&self, prompt: &TaskPrompt) -> CopilotResult<String> {
        let mut request = ChatRequest::new(Some(self.system_prompt()), prompt.render());
        request.tools = self.tools.iter().map(|t| t.spec()).collect();

        for iteration in 1..=self.max_iterations {
            match self.llm.generate(&request).await? {
                ChatResponse::Text(text) => return Ok(text),
                ChatResponse::ToolCall { name, args } => {
                    debug!(iteration, tool = %name, "Model requested a tool");
                    let content = self.call_tool(&name, &args).await;
                    request.messages.push(Message::ToolCall {
                        name: name.clone(),
                        args,
                    });
                    request.messages.push(Message::ToolResult { name, content });
                }
            }
        }

        debug!("Tool budget exhausted, asking for a final answer");
        request.force_text = true;
        request
            .messages
            .push(Message::User(FINAL_ANSWER_NUDGE.to_string()));

        match self.llm.generate(&request).await? {
            ChatResponse::Text(text) => Ok(text),
            ChatResponse::ToolCall { name, .. } => Err(CopilotError::LlmInvalidResponse {
                message: format!(
                    "model kept calling '{}' after {} iterations",
                    name, self.max_iterations
                ),
            }),
        }
    }
}

/// The crew's agents, built once and shared by every run
pub struct AgentSet {
    agents: Vec<Arc<Agent>>,
}

impl AgentSet {
    /// Build the named agents. Entries missing from `config` use `defaults`.
    pub fn build(
        names: &[&str],
        config: &AgentsConfig,
        defaults: &AgentsConfig,
        llm: Arc<dyn LanguageModel>,
        search: Option<Arc<dyn Tool>>,
    ) -> Self {
        let agents = names
            .iter()
            .map(|name| {
                let user = config.get(*name).cloned().unwrap_or_default();
                let fallback = defaults.get(*name).cloned().unwrap_or_default();
                let agent = Agent::from_config(
                    name,
                    &user.or(&fallback),
                    Arc::clone(&llm),
                    search.clone(),
                );
                debug!(agent = *name, role = %agent.role, tools = ?agent.tool_names(), "Agent ready");
                Arc::new(agent)
            })
            .collect();

        Self { agents }
    }

    /// Get an agent by name
    pub fn get(&self, name: &str) -> Option<&Arc<Agent>> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Agent>> {
        self.agents.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// `business_strategy_agent` → `Business Strategy Agent`
pub fn humanize(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
