// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Pipeline executor
//!
//! Runs tasks in dependency order, one at a time, threading each finished
//! task's output into the prompts of the tasks that list it as context.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::errors::{CopilotError, CopilotResult};
use crate::pipeline::{interpolate, DagBuilder, Pipeline, TaskNode};

/// Separator between upstream outputs in a context section
pub const CONTEXT_DIVIDER: &str = "\n\n----------\n\n";

/// Something that can perform a task, typically an agent
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Name tasks use to refer to this runner
    fn name(&self) -> &str;

    /// Perform one task and return its output text
    async fn run_task(&self, prompt: &TaskPrompt) -> CopilotResult<String>;
}

/// Output of an upstream task handed to a downstream one
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    pub task: String,
    pub output: String,
}

/// A fully resolved task, ready to hand to a runner
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPrompt {
    /// Task name
    pub task: String,
    /// Interpolated instructions
    pub description: String,
    /// Interpolated answer criteria
    pub expected_output: String,
    /// Upstream outputs, in declared context order
    pub context: Vec<ContextEntry>,
}

impl TaskPrompt {
    /// Resolve a task node against input variables and upstream outputs
    pub fn resolve(
        task: &TaskNode,
        variables: &HashMap<String, String>,
        context: Vec<ContextEntry>,
    ) -> Self {
        Self {
            task: task.name.clone(),
            description: interpolate(&task.description, variables),
            expected_output: interpolate(&task.expected_output, variables),
            context,
        }
    }

    /// Render the prompt text sent to the model
    pub fn render(&self) -> String {
        let mut out = self.description.trim().to_string();

        if !self.expected_output.trim().is_empty() {
            out.push_str("\n\nThis is the expected criteria for your final answer: ");
            out.push_str(self.expected_output.trim());
            out.push_str(
                "\nYou MUST return the actual complete content as the final answer, not a summary.",
            );
        }

        if !self.context.is_empty() {
            let joined = self
                .context
                .iter()
                .map(|c| c.output.trim())
                .collect::<Vec<_>>()
                .join(CONTEXT_DIVIDER);
            out.push_str("\n\nThis is the context you're working with:\n");
            out.push_str(&joined);
        }

        out
    }
}

/// Output of one task
#[derive(Debug, Clone)]
pub struct TaskOutput {
    /// Task name
    pub task: String,
    /// Runner that produced it
    pub agent: String,
    /// Raw output text
    pub raw: String,
    /// Execution time
    pub duration: Duration,
}

/// Result of executing a pipeline
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Task outputs in execution order
    pub outputs: Vec<TaskOutput>,
    /// Output of the last task in dependency order
    pub raw: String,
    /// Total execution time
    pub duration: Duration,
}

impl PipelineResult {
    /// Output of a specific task
    pub fn output(&self, task: &str) -> Option<&TaskOutput> {
        self.outputs.iter().find(|o| o.task == task)
    }
}

/// Pipeline executor
pub struct PipelineExecutor {
    /// Registered runners by name
    runners: HashMap<String, Arc<dyn TaskRunner>>,
}

impl PipelineExecutor {
    /// Create a new pipeline executor
    pub fn new() -> Self {
        Self {
            runners: HashMap::new(),
        }
    }

    /// Register a runner under its own name
    pub fn register_runner(&mut self, runner: Arc<dyn TaskRunner>) {
        self.runners.insert(runner.name().to_string(), runner);
    }

    /// Execute a pipeline. Any task failure aborts the run.
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        variables: &HashMap<String, String>,
    ) -> CopilotResult<PipelineResult> {
        let start = Instant::now();

        let dag = DagBuilder::build(pipeline)?;
        let execution_order = dag.topological_order()?;

        if execution_order.is_empty() {
            return Err(CopilotError::InvalidPipeline {
                reason: format!("pipeline '{}' has no tasks", pipeline.name),
                help: None,
            });
        }

        // Resolve every runner before anything starts
        let mut plan = Vec::with_capacity(execution_order.len());
        for idx in execution_order {
            let task = &pipeline.tasks[idx];
            let runner = self.runners.get(&task.agent).ok_or_else(|| {
                CopilotError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                }
            })?;
            plan.push((task, Arc::clone(runner)));
        }

        info!(pipeline = %pipeline.name, tasks = plan.len(), "Starting pipeline");

        let mut completed: HashMap<String, String> = HashMap::new();
        let mut outputs = Vec::with_capacity(plan.len());

        for (task, runner) in plan {
            let context = Self::collect_context(task, &completed)?;
            let prompt = TaskPrompt::resolve(task, variables, context);

            info!(task = %task.name, agent = %task.agent, "Running task");
            let task_start = Instant::now();

            let raw = runner.run_task(&prompt).await.map_err(|e| {
                error!(task = %task.name, error = %e, "Task failed, aborting pipeline");
                CopilotError::task_failed(&task.name, &e)
            })?;

            let duration = task_start.elapsed();
            info!(task = %task.name, elapsed_ms = duration.as_millis() as u64, "Task completed");

            completed.insert(task.name.clone(), raw.clone());
            outputs.push(TaskOutput {
                task: task.name.clone(),
                agent: task.agent.clone(),
                raw,
                duration,
            });
        }

        let raw = outputs
            .last()
            .map(|o| o.raw.clone())
            .unwrap_or_default();
        let duration = start.elapsed();

        info!(
            pipeline = %pipeline.name,
            elapsed_ms = duration.as_millis() as u64,
            "Pipeline completed"
        );

        Ok(PipelineResult {
            outputs,
            raw,
            duration,
        })
    }

    /// Gather upstream outputs for a task
    fn collect_context(
        task: &TaskNode,
        completed: &HashMap<String, String>,
    ) -> CopilotResult<Vec<ContextEntry>> {
        task.context
            .iter()
            .map(|upstream| {
                let output = completed.get(upstream).ok_or_else(|| CopilotError::ExecutionFailed {
                    message: format!(
                        "Task '{}' depends on '{}' which hasn't been executed",
                        task.name, upstream
                    ),
                    help: None,
                })?;

                Ok(ContextEntry {
                    task: upstream.clone(),
                    output: output.clone(),
                })
            })
            .collect()
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}
