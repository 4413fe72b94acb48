// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Error recovery suggestions
//!
//! Provides actionable suggestions for recovering from errors.

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Suggest providing a missing credential
    pub fn set_credential(variable: &str) -> Self {
        let (purpose, url) = match variable {
            "GEMINI_API_KEY" => (
                "The Gemini key is required: every agent talks to the model through it",
                "https://aistudio.google.com/app/apikey",
            ),
            "SERPER_API_KEY" => (
                "The Serper key is optional: without it agents run without web search",
                "https://serper.dev",
            ),
            _ => ("This credential is required", ""),
        };

        let mut steps = vec![purpose.to_string()];
        if !url.is_empty() {
            steps.push(format!("Create a key at {}", url));
        }

        Self {
            action: format!("Set {}", variable),
            steps,
            commands: vec![
                "# For the current shell:".into(),
                format!("export {}=...", variable),
                "".into(),
                "# Or persist it for this directory:".into(),
                format!("echo '{}=...' >> .env", variable),
            ],
        }
    }

    /// Suggest fixing a circular dependency
    pub fn fix_circular_dependency(tasks: &[String]) -> Self {
        Self {
            action: "Remove circular dependency".into(),
            steps: vec![
                format!("Detected cycle: {}", tasks.join(" → ")),
                "Review the context list of each task".into(),
                "Ensure tasks form a directed acyclic graph (DAG)".into(),
            ],
            commands: vec![
                "# Visualize the pipeline:".into(),
                "ene-copilot graph --format mermaid".into(),
            ],
        }
    }

    /// Suggest creating the agent and task configuration files
    pub fn create_config() -> Self {
        Self {
            action: "Create agent and task configuration".into(),
            steps: vec![
                "No config/agents.yaml or config/tasks.yaml found".into(),
                "Built-in defaults are used until the files exist".into(),
            ],
            commands: vec!["ene-copilot init".into()],
        }
    }

    /// Suggest fixing invalid YAML
    pub fn fix_yaml_syntax(line: Option<usize>, column: Option<usize>) -> Self {
        let location = match (line, column) {
            (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
            (Some(l), None) => format!(" at line {}", l),
            _ => String::new(),
        };

        Self {
            action: format!("Fix YAML syntax error{}", location),
            steps: vec![
                "Check for common YAML issues:".into(),
                "  • Incorrect indentation (use spaces, not tabs)".into(),
                "  • Missing colons after keys".into(),
                "  • Multi-line text not introduced with '>' or '|'".into(),
            ],
            commands: vec![
                "# See how the copilot reads your files:".into(),
                "ene-copilot check".into(),
            ],
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}
