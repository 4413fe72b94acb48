// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Pipeline validation
//!
//! Validates a pipeline before execution.

use std::collections::HashSet;

use crate::errors::CopilotError;
use crate::pipeline::{DagBuilder, Pipeline, TaskNode};

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a pipeline against the set of agents that will run it
    pub fn validate(pipeline: &Pipeline, agents: &[&str]) -> ValidationResult {
        let mut result = ValidationResult::new();

        if pipeline.tasks.is_empty() {
            result.add_error("Pipeline has no tasks defined");
        }

        let mut seen_names = HashSet::new();
        for task in &pipeline.tasks {
            if !seen_names.insert(&task.name) {
                result.add_error(&format!("Duplicate task name: '{}'", task.name));
            }
        }

        // Cycles and unknown dependencies
        match DagBuilder::build(pipeline) {
            Ok(_) => {}
            Err(CopilotError::CircularDependency { tasks }) => {
                result.add_error(&format!("Circular dependency: {}", tasks.join(" → ")));
            }
            Err(CopilotError::UnknownDependency { task, dependency }) => {
                result.add_error(&format!(
                    "Task '{}' depends on unknown task '{}'",
                    task, dependency
                ));
            }
            Err(e) => {
                result.add_error(&format!("DAG validation error: {}", e));
            }
        }

        for task in &pipeline.tasks {
            Self::validate_task(task, agents, &mut result);
        }

        result
    }

    /// Validate a single task
    fn validate_task(task: &TaskNode, agents: &[&str], result: &mut ValidationResult) {
        if !agents.contains(&task.agent.as_str()) {
            result.add_error(&format!(
                "Task '{}': assigned to unknown agent '{}'",
                task.name, task.agent
            ));
        }

        if task.description.trim().is_empty() {
            result.add_warning(&format!(
                "Task '{}': description is empty, the agent will only see its context",
                task.name
            ));
        }

        if task.expected_output.trim().is_empty() {
            result.add_warning(&format!(
                "Task '{}': no expected output, answers may be unfocused",
                task.name
            ));
        }

        let mut seen = HashSet::new();
        for upstream in &task.context {
            if !seen.insert(upstream) {
                result.add_warning(&format!(
                    "Task '{}': context lists '{}' more than once",
                    task.name, upstream
                ));
            }
        }
    }
}

/// Result of pipeline validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, agent: &str, context: Vec<&str>) -> TaskNode {
        TaskNode::new(name, agent)
            .with_description("Do the work")
            .with_expected_output("A document")
            .with_context(context)
    }

    #[test]
    fn test_validate_empty_pipeline() {
        let result = PipelineValidator::validate(&Pipeline::new("empty"), &[]);
        assert!(!result.is_valid());
        assert!(result.errors[0].contains("no tasks"));
    }

    #[test]
    fn test_validate_duplicate_names() {
        let pipeline = Pipeline::new("test")
            .with_task(task("dup", "a", vec![]))
            .with_task(task("dup", "a", vec![]));

        let result = PipelineValidator::validate(&pipeline, &["a"]);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("Duplicate")));
    }

    #[test]
    fn test_validate_unknown_agent_and_dependency() {
        let pipeline = Pipeline::new("test").with_task(task("one", "ghost", vec!["zero"]));

        let result = PipelineValidator::validate(&pipeline, &["a"]);
        assert!(result.errors.iter().any(|e| e.contains("unknown agent 'ghost'")));
        assert!(result.errors.iter().any(|e| e.contains("unknown task 'zero'")));
    }

    #[test]
    fn test_validate_cycle() {
        let pipeline = Pipeline::new("test")
            .with_task(task("a", "x", vec!["b"]))
            .with_task(task("b", "x", vec!["a"]));

        let result = PipelineValidator::validate(&pipeline, &["x"]);
        assert!(result.errors.iter().any(|e| e.starts_with("Circular dependency")));
    }

    #[test]
    fn test_validate_warnings() {
        let pipeline = Pipeline::new("test")
            .with_task(task("a", "x", vec![]))
            .with_task(TaskNode::new("b", "x").with_context(["a", "a"]));

        let result = PipelineValidator::validate(&pipeline, &["x"]);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().any(|w| w.contains("description is empty")));
        assert!(result.warnings.iter().any(|w| w.contains("more than once")));
    }
}
