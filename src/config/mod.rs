// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Agent and task configuration
//!
//! Agents and tasks are described in two YAML documents, each a mapping from
//! a fixed name to a field mapping:
//!
//! ```yaml
//! business_strategy_agent:
//!   role: Business Strategy Consultant
//!   goal: Turn a raw startup idea into a fundable business plan
//!   backstory: >
//!     Fifteen years advising early-stage founders...
//! ```
//!
//! Loading never fails. A missing or malformed file degrades to an empty
//! mapping and a warning, and a missing entry means "use the defaults".

pub mod settings;

pub use settings::{LlmSettings, SearchSettings, Settings};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default number of model round-trips an agent may spend on tool calls
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Agent definition from agents.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Role the agent plays (default: the built-in definition, else the agent name humanized)
    #[serde(default)]
    pub role: Option<String>,

    /// What the agent is trying to achieve (default: built-in, else omitted from the prompt)
    #[serde(default)]
    pub goal: Option<String>,

    /// Background that shapes the agent's voice (default: built-in, else omitted)
    #[serde(default)]
    pub backstory: Option<String>,

    /// Tool-call round-trips before a final answer is forced (default: 5)
    #[serde(default)]
    pub max_iterations: Option<u32>,

    /// Whether the agent receives the web search tool when available (default: true)
    #[serde(default)]
    pub use_tools: Option<bool>,
}

impl AgentConfig {
    /// Effective iteration budget
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS).max(1)
    }

    /// Effective tool opt-in
    pub fn use_tools(&self) -> bool {
        self.use_tools.unwrap_or(true)
    }

    /// Fill unset fields from `defaults`
    pub fn or(self, defaults: &AgentConfig) -> AgentConfig {
        AgentConfig {
            role: self.role.or_else(|| defaults.role.clone()),
            goal: self.goal.or_else(|| defaults.goal.clone()),
            backstory: self.backstory.or_else(|| defaults.backstory.clone()),
            max_iterations: self.max_iterations.or(defaults.max_iterations),
            use_tools: self.use_tools.or(defaults.use_tools),
        }
    }
}

/// Task definition from tasks.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Instruction template, may reference `{startup_idea}`, `{target_market}`
    /// and `{team_composition}` (default: the built-in template of the task)
    #[serde(default)]
    pub description: Option<String>,

    /// What a good answer looks like (default: the built-in criteria)
    #[serde(default)]
    pub expected_output: Option<String>,
}

impl TaskConfig {
    /// Fill unset fields from `defaults`
    pub fn or(self, defaults: &TaskConfig) -> TaskConfig {
        TaskConfig {
            description: self.description.or_else(|| defaults.description.clone()),
            expected_output: self
                .expected_output
                .or_else(|| defaults.expected_output.clone()),
        }
    }
}

/// Agent definitions keyed by agent name
pub type AgentsConfig = HashMap<String, AgentConfig>;

/// Task definitions keyed by task name
pub type TasksConfig = HashMap<String, TaskConfig>;

/// Outcome of reading one configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// File parsed; contains this many entries
    Loaded(usize),
    /// File parsed but holds no entries
    Empty,
    /// File does not exist
    Missing,
    /// File exists but could not be read or parsed
    Malformed(String),
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded(n) => write!(f, "{} entr{}", n, if *n == 1 { "y" } else { "ies" }),
            Self::Empty => write!(f, "empty"),
            Self::Missing => write!(f, "not found"),
            Self::Malformed(reason) => write!(f, "malformed: {}", reason),
        }
    }
}

/// Loader for the YAML configuration documents
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a name → definition mapping, substituting an empty mapping on any problem
    pub fn load<T>(path: &Path) -> HashMap<String, T>
    where
        T: DeserializeOwned + Default,
    {
        Self::load_report(path).0
    }

    /// Load a mapping and report how the file was handled
    pub fn load_report<T>(path: &Path) -> (HashMap<String, T>, LoadStatus)
    where
        T: DeserializeOwned + Default,
    {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Configuration file not found, using defaults");
                return (HashMap::new(), LoadStatus::Missing);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read configuration file, using defaults");
                return (HashMap::new(), LoadStatus::Malformed(e.to_string()));
            }
        };

        match Self::parse(&content) {
            Ok(map) if map.is_empty() => (map, LoadStatus::Empty),
            Ok(map) => {
                tracing::debug!(path = %path.display(), entries = map.len(), "Loaded configuration");
                let len = map.len();
                (map, LoadStatus::Loaded(len))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Error parsing YAML file, using defaults");
                (HashMap::new(), LoadStatus::Malformed(e.to_string()))
            }
        }
    }

    /// Parse a mapping document. Null documents and null entries become defaults.
    pub fn parse<T>(content: &str) -> Result<HashMap<String, T>, crate::CopilotError>
    where
        T: DeserializeOwned + Default,
    {
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        let raw: Option<HashMap<String, Option<T>>> = serde_yaml::from_str(content)?;

        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(name, def)| (name, def.unwrap_or_default()))
            .collect())
    }
}
