// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! The entrepreneurship crew
//!
//! Three agents work through three tasks in a fixed order:
//!
//! | Task                 | Agent                     | Context                               |
//! |----------------------|---------------------------|---------------------------------------|
//! | `business_plan_task` | `business_strategy_agent` |                                       |
//! | `mvp_plan_task`      | `mvp_development_agent`   | `business_plan_task`                  |
//! | `gtm_strategy_task`  | `gtm_strategy_agent`      | `business_plan_task`, `mvp_plan_task` |
//!
//! The YAML files only supply the wording of agents and tasks. Wiring is fixed
//! here. A crew is built once per process and reused for every run.

mod agent;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{humanize, Agent, AgentSet};

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AgentsConfig, ConfigLoader, Settings, TasksConfig};
use crate::errors::{CopilotError, CopilotResult};
use crate::llm::{GeminiClient, LanguageModel};
use crate::pipeline::{
    Pipeline, PipelineExecutor, PipelineInput, PipelineResult, PipelineValidator, TaskNode,
    TaskRunner,
};
use crate::tools::{init_web_search, Tool};

pub const BUSINESS_STRATEGY_AGENT: &str = "business_strategy_agent";
pub const MVP_DEVELOPMENT_AGENT: &str = "mvp_development_agent";
pub const GTM_STRATEGY_AGENT: &str = "gtm_strategy_agent";

pub const BUSINESS_PLAN_TASK: &str = "business_plan_task";
pub const MVP_PLAN_TASK: &str = "mvp_plan_task";
pub const GTM_STRATEGY_TASK: &str = "gtm_strategy_task";

/// Agents in declaration order
pub const AGENT_NAMES: [&str; 3] = [
    BUSINESS_STRATEGY_AGENT,
    MVP_DEVELOPMENT_AGENT,
    GTM_STRATEGY_AGENT,
];

/// Built-in agents.yaml, also written by `init`
pub const BUNDLED_AGENTS_YAML: &str = include_str!("../../config/agents.yaml");

/// Built-in tasks.yaml, also written by `init`
pub const BUNDLED_TASKS_YAML: &str = include_str!("../../config/tasks.yaml");

/// Built-in agent definitions
pub fn bundled_agents() -> AgentsConfig {
    ConfigLoader::parse(BUNDLED_AGENTS_YAML).unwrap_or_else(|e| {
        warn!(error = %e, "Built-in agent definitions are unreadable");
        AgentsConfig::new()
    })
}

/// Built-in task definitions
pub fn bundled_tasks() -> TasksConfig {
    ConfigLoader::parse(BUNDLED_TASKS_YAML).unwrap_or_else(|e| {
        warn!(error = %e, "Built-in task definitions are unreadable");
        TasksConfig::new()
    })
}

/// Build the fixed three-task pipeline. Fields missing from `tasks` come from
/// the built-in definitions.
pub fn build_pipeline(tasks: &TasksConfig) -> Pipeline {
    let defaults = bundled_tasks();

    let node = |task: &str, agent: &str, context: &[&str]| {
        let config = tasks
            .get(task)
            .cloned()
            .unwrap_or_default()
            .or(&defaults.get(task).cloned().unwrap_or_default());

        TaskNode::new(task, agent)
            .with_description(config.description.unwrap_or_default())
            .with_expected_output(config.expected_output.unwrap_or_default())
            .with_context(context.iter().copied())
    };

    Pipeline::new("entrepreneurship")
        .with_description("Business plan, MVP plan and go-to-market strategy for a startup idea")
        .with_task(node(BUSINESS_PLAN_TASK, BUSINESS_STRATEGY_AGENT, &[]))
        .with_task(node(MVP_PLAN_TASK, MVP_DEVELOPMENT_AGENT, &[BUSINESS_PLAN_TASK]))
        .with_task(node(
            GTM_STRATEGY_TASK,
            GTM_STRATEGY_AGENT,
            &[BUSINESS_PLAN_TASK, MVP_PLAN_TASK],
        ))
}

/// Agents, pipeline and executor, ready to run
pub struct EntrepreneurshipCrew {
    agents: AgentSet,
    pipeline: Pipeline,
    executor: PipelineExecutor,
}

impl EntrepreneurshipCrew {
    /// Assemble the crew around an existing model client and optional search tool
    pub fn new(
        agents: &AgentsConfig,
        tasks: &TasksConfig,
        llm: Arc<dyn LanguageModel>,
        search: Option<Arc<dyn Tool>>,
    ) -> CopilotResult<Self> {
        let has_search = search.is_some();
        let agents = AgentSet::build(&AGENT_NAMES, agents, &bundled_agents(), llm, search);
        let pipeline = build_pipeline(tasks);

        let report = PipelineValidator::validate(&pipeline, &agents.names());
        for warning in &report.warnings {
            warn!("{}", warning);
        }
        if !report.is_valid() {
            return Err(CopilotError::InvalidPipeline {
                reason: report.errors.join("; "),
                help: None,
            });
        }

        let mut executor = PipelineExecutor::new();
        for agent in agents.iter() {
            executor.register_runner(Arc::clone(agent) as Arc<dyn TaskRunner>);
        }

        info!(
            agents = agents.len(),
            tasks = pipeline.tasks.len(),
            web_search = has_search,
            "Crew assembled"
        );

        Ok(Self {
            agents,
            pipeline,
            executor,
        })
    }

    /// Load configuration and build clients from settings.
    ///
    /// Fails with a configuration error when the model API key is missing.
    /// A missing search key only disables web search.
    pub fn from_settings(settings: &Settings) -> CopilotResult<Self> {
        let agents = ConfigLoader::load(&settings.agents_path);
        let tasks = ConfigLoader::load(&settings.tasks_path);

        let llm = GeminiClient::new(&settings.llm)?;
        info!(model = %llm.model(), "Language model client ready");

        let search = init_web_search(&settings.search);

        Self::new(&agents, &tasks, Arc::new(llm), search)
    }

    /// Run all three tasks for one input
    pub async fn kickoff(&self, input: &PipelineInput) -> CopilotResult<PipelineResult> {
        self.executor
            .execute(&self.pipeline, &input.variables())
            .await
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn agents(&self) -> &AgentSet {
        &self.agents
    }
}
