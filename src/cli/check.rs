// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Check command - report configuration and credential status

use colored::Colorize;
use miette::Result;

use crate::config::settings::{mask_secret, GEMINI_API_KEY_VAR, SERPER_API_KEY_VAR};
use crate::config::{AgentConfig, ConfigLoader, LoadStatus, Settings, TaskConfig};
use crate::crew::{build_pipeline, AGENT_NAMES};
use crate::errors::RecoverySuggestion;
use crate::pipeline::PipelineValidator;
use crate::utils::{print_error, print_info, print_section, print_success, print_warning};

/// Run the check command
pub async fn run(settings: Settings, verbose: bool) -> Result<()> {
    println!("{}", "Checking configuration...".bold());

    print_section("Definition files");
    let (agents, agents_status) = ConfigLoader::load_report::<AgentConfig>(&settings.agents_path);
    report_file(&settings.agents_path.display().to_string(), &agents_status);
    let (tasks, tasks_status) = ConfigLoader::load_report::<TaskConfig>(&settings.tasks_path);
    report_file(&settings.tasks_path.display().to_string(), &tasks_status);

    if agents_status == LoadStatus::Missing && tasks_status == LoadStatus::Missing {
        println!();
        print!("{}", RecoverySuggestion::create_config());
    } else if matches!(agents_status, LoadStatus::Malformed(_))
        || matches!(tasks_status, LoadStatus::Malformed(_))
    {
        println!();
        print!("{}", RecoverySuggestion::fix_yaml_syntax(None, None));
    }

    for name in agents.keys().filter(|n| !AGENT_NAMES.contains(&n.as_str())) {
        print_warning(&format!("Unused agent definition '{}'", name));
    }

    print_section("Credentials");
    let key_ok = match settings.llm.api_key.as_deref() {
        Some(key) => {
            print_success(&format!("{} {}", GEMINI_API_KEY_VAR, mask_secret(key).dimmed()));
            true
        }
        None => {
            print_error(&format!("{} is not set (required)", GEMINI_API_KEY_VAR));
            false
        }
    };
    match settings.search.api_key.as_deref() {
        Some(key) => print_success(&format!("{} {}", SERPER_API_KEY_VAR, mask_secret(key).dimmed())),
        None => print_warning(&format!(
            "{} is not set, agents will run without web search",
            SERPER_API_KEY_VAR
        )),
    }
    print_info(&format!("Model: {}", settings.llm.model));
    if verbose {
        print_info(&format!("Model API: {}", settings.llm.base_url));
        print_info(&format!("Search API: {}", settings.search.base_url));
    }

    print_section("Pipeline");
    let pipeline = build_pipeline(&tasks);
    let validation = PipelineValidator::validate(&pipeline, &AGENT_NAMES);

    for error in &validation.errors {
        print_error(error);
    }
    for warning in &validation.warnings {
        print_warning(warning);
    }
    if validation.is_valid() {
        print_success(&format!("{} tasks, {} agents", pipeline.tasks.len(), AGENT_NAMES.len()));
    }

    println!();

    if !validation.is_valid() {
        return Err(miette::miette!("Pipeline configuration is invalid"));
    }
    if !key_ok {
        return Err(crate::CopilotError::missing_credential(GEMINI_API_KEY_VAR).into());
    }

    println!("{}", "Ready to run!".green().bold());
    Ok(())
}

fn report_file(path: &str, status: &LoadStatus) {
    match status {
        LoadStatus::Loaded(_) => print_success(&format!("{} ({})", path, status)),
        LoadStatus::Empty => print_warning(&format!("{} is empty, using built-in definitions", path)),
        LoadStatus::Missing | LoadStatus::Malformed(_) => print_warning(&format!(
            "{} {}, using built-in definitions",
            path, status
        )),
    }
}
