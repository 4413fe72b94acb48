// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for ene-copilot.

pub mod check;
pub mod graph;
pub mod init;
pub mod run;
pub mod serve;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::settings::{
    non_empty, normalize_model, DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL, DEFAULT_SERPER_BASE_URL,
};
use crate::config::{LlmSettings, SearchSettings, Settings};
use crate::errors::{CopilotError, CopilotResult};

/// Entrepreneurship copilot
///
/// Turns a startup idea into a business plan, an MVP plan and a go-to-market
/// strategy using three cooperating AI agents.
#[derive(Parser, Debug)]
#[clap(
    name = "ene-copilot",
    version,
    about = "Multi-agent business planning for startup ideas",
    long_about = None,
    after_help = "Examples:\n\
        ene-copilot init                 Write the default agent and task definitions\n\
        ene-copilot check                Check configuration and credentials\n\
        ene-copilot run --sample         Plan the built-in example startup\n\
        ene-copilot serve                Start the HTTP API on 0.0.0.0:8000\n\n\
        See 'ene-copilot <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[clap(flatten)]
    pub settings: SettingsArgs,
}

/// Settings shared by every command, each with an environment fallback
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Agent definitions file
    #[clap(
        long,
        global = true,
        env = "ENE_AGENTS_CONFIG",
        default_value = "config/agents.yaml",
        value_name = "FILE"
    )]
    pub agents_config: PathBuf,

    /// Task definitions file
    #[clap(
        long,
        global = true,
        env = "ENE_TASKS_CONFIG",
        default_value = "config/tasks.yaml",
        value_name = "FILE"
    )]
    pub tasks_config: PathBuf,

    /// Gemini API key
    #[clap(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Serper API key; web search is disabled without it
    #[clap(long, global = true, env = "SERPER_API_KEY", hide_env_values = true)]
    pub serper_api_key: Option<String>,

    /// Model name (a "gemini/" prefix is accepted)
    #[clap(long, global = true, env = "ENE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature between 0 and 2
    #[clap(long, global = true, env = "ENE_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Gemini API base URL
    #[clap(long, global = true, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL, hide = true)]
    pub gemini_base_url: String,

    /// Serper API base URL
    #[clap(long, global = true, env = "SERPER_BASE_URL", default_value = DEFAULT_SERPER_BASE_URL, hide = true)]
    pub serper_base_url: String,

    /// Search results per query (1-10)
    #[clap(long, global = true, default_value = "5")]
    pub search_results: u32,
}

impl SettingsArgs {
    /// Resolve into the settings handed to components
    pub fn into_settings(self) -> CopilotResult<Settings> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(CopilotError::InvalidSetting {
                    name: "temperature".into(),
                    reason: format!("{} is outside 0.0..=2.0", t),
                });
            }
        }

        let model = normalize_model(&self.model);
        if model.is_empty() {
            return Err(CopilotError::InvalidSetting {
                name: "model".into(),
                reason: "model name is empty".into(),
            });
        }

        Ok(Settings {
            agents_path: self.agents_config,
            tasks_path: self.tasks_config,
            llm: LlmSettings {
                api_key: non_empty(self.gemini_api_key),
                model,
                base_url: self.gemini_base_url,
                temperature: self.temperature,
                ..LlmSettings::default()
            },
            search: SearchSettings {
                api_key: non_empty(self.serper_api_key),
                base_url: self.serper_base_url,
                num_results: self.search_results,
                ..SearchSettings::default()
            },
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[clap(long, env = "ENE_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },

    /// Run the crew once in the terminal
    Run {
        /// The startup idea
        #[clap(long, value_name = "TEXT")]
        startup_idea: Option<String>,

        /// Who the product is for
        #[clap(long, value_name = "TEXT")]
        target_market: Option<String>,

        /// Who is on the team
        #[clap(long, value_name = "TEXT")]
        team_composition: Option<String>,

        /// Fill missing inputs from the built-in example
        #[clap(long)]
        sample: bool,

        /// Write the plan and executive summary files into this directory
        #[clap(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Never prompt; fail when an input or the API key is missing
        #[clap(long)]
        no_input: bool,
    },

    /// Check configuration files and credentials
    Check,

    /// Show the task pipeline as a graph
    Graph {
        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: GraphFormat,
    },

    /// Write the default agent and task definitions
    Init {
        /// Directory for the YAML files
        #[clap(long, default_value = "config", value_name = "DIR")]
        dir: PathBuf,

        /// Overwrite existing files
        #[clap(short, long)]
        force: bool,
    },
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["ene-copilot"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_settings_from_flags() {
        let cli = parse(&[
            "run",
            "--sample",
            "--gemini-api-key",
            "AIzaTestKey",
            "--model",
            "gemini/gemini-1.5-pro",
            "--tasks-config",
            "custom/tasks.yaml",
        ]);

        let settings = cli.settings.into_settings().unwrap();
        assert_eq!(settings.llm.api_key.as_deref(), Some("AIzaTestKey"));
        assert_eq!(settings.llm.model, "gemini-1.5-pro");
        assert_eq!(settings.tasks_path, PathBuf::from("custom/tasks.yaml"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let cli = parse(&["check", "--gemini-api-key", "  "]);
        let settings = cli.settings.into_settings().unwrap();
        assert!(settings.llm.api_key.is_none());
    }

    #[test]
    fn test_temperature_range() {
        let cli = parse(&["check", "--temperature", "3.5"]);
        let err = cli.settings.into_settings().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_graph_format() {
        match parse(&["graph", "--format", "mermaid"]).command {
            Commands::Graph { format } => assert_eq!(format, GraphFormat::Mermaid),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
