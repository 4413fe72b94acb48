// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Pipeline definition structures
//!
//! A pipeline is a small DAG of task nodes. Each node names the agent that
//! performs it and the upstream tasks whose outputs it receives as context.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A pipeline of tasks
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Pipeline description
    pub description: Option<String>,

    /// Tasks in declaration order
    pub tasks: Vec<TaskNode>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tasks: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a task
    pub fn with_task(mut self, task: TaskNode) -> Self {
        self.tasks.push(task);
        self
    }

    /// Get a task by name
    pub fn get_task(&self, name: &str) -> Option<&TaskNode> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Get all task names
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }
}

/// A single task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    /// Task name (unique within the pipeline)
    pub name: String,

    /// Instruction template; `{variable}` placeholders are filled from the input
    pub description: String,

    /// Criteria for the final answer, also a template
    pub expected_output: String,

    /// Name of the agent that performs the task
    pub agent: String,

    /// Upstream tasks whose outputs are passed as context, in this order
    pub context: Vec<String>,
}

impl TaskNode {
    /// Create a task assigned to an agent
    pub fn new(name: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            expected_output: String::new(),
            agent: agent.into(),
            context: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    /// Declare upstream dependencies
    pub fn with_context<I, S>(mut self, upstream: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = upstream.into_iter().map(Into::into).collect();
        self
    }
}

/// The three free-text inputs of a copilot run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInput {
    pub startup_idea: String,
    pub target_market: String,
    pub team_composition: String,
}

impl PipelineInput {
    /// Template variables for task interpolation
    pub fn variables(&self) -> HashMap<String, String> {
        HashMap::from([
            ("startup_idea".to_string(), self.startup_idea.clone()),
            ("target_market".to_string(), self.target_market.clone()),
            ("team_composition".to_string(), self.team_composition.clone()),
        ])
    }

    /// A worked example, handy for trying the crew end to end
    pub fn sample() -> Self {
        Self {
            startup_idea: "A mobile app that uses AI to help people meal plan based on their \
                dietary preferences, budget constraints, and local grocery store inventory. \
                The app would generate personalized meal plans, shopping lists, and even \
                suggest recipes based on what's on sale."
                .to_string(),
            target_market: "Primary: Health-conscious millennials and Gen Z (ages 25-40) with \
                disposable income of $50,000+ who are tech-savvy and interested in convenience \
                and health optimization.\nSecondary: Busy professionals and families looking to \
                save time and money on grocery shopping.\nMarket size: ~50 million people in the US."
                .to_string(),
            team_composition: "- CEO/Co-founder: Business background, 5 years experience in food tech\n\
                - CTO/Co-founder: Software engineer, 8 years experience in mobile app development\n\
                - AI/ML Engineer: PhD in Computer Science, specializing in recommendation systems\n\
                - UX/UI Designer: 4 years experience in consumer app design\n\
                - Marketing Manager: 6 years experience in digital marketing for consumer apps"
                .to_string(),
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid placeholder regex"))
}

/// Fill `{name}` placeholders. Unknown placeholders are left as written.
pub fn interpolate(template: &str, variables: &HashMap<String, String>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let pipeline = Pipeline::new("chain")
            .with_task(TaskNode::new("first", "agent_a").with_description("Do {thing}"))
            .with_task(TaskNode::new("second", "agent_b").with_context(["first"]));

        assert_eq!(pipeline.task_names(), vec!["first", "second"]);
        assert_eq!(pipeline.get_task("second").unwrap().context, vec!["first"]);
        assert!(pipeline.get_task("third").is_none());
    }

    #[test]
    fn test_interpolate_known_and_unknown() {
        let input = PipelineInput {
            startup_idea: "AI meal-planning app".into(),
            target_market: "health-conscious 25-40yo".into(),
            team_composition: "CEO, CTO, ML engineer".into(),
        };

        let out = interpolate(
            "Plan for {startup_idea} aimed at {target_market}; ignore {unknown} and {{braces}}",
            &input.variables(),
        );

        assert_eq!(
            out,
            "Plan for AI meal-planning app aimed at health-conscious 25-40yo; ignore {unknown} and {{braces}}"
        );
    }

    #[test]
    fn test_input_requires_all_fields() {
        let missing = serde_json::from_str::<PipelineInput>(
            r#"{"startup_idea": "x", "target_market": "y"}"#,
        );
        assert!(missing.is_err());

        let full = serde_json::from_str::<PipelineInput>(
            r#"{"startup_idea": "x", "target_market": "y", "team_composition": "z"}"#,
        )
        .unwrap();
        assert_eq!(full.team_composition, "z");
    }
}
