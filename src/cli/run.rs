// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Run command - plan one startup in the terminal

use colored::Colorize;
use console::Term;
use miette::Result;
use std::path::PathBuf;

use crate::config::settings::GEMINI_API_KEY_VAR;
use crate::config::Settings;
use crate::crew::EntrepreneurshipCrew;
use crate::errors::{CopilotError, CopilotResult};
use crate::pipeline::PipelineInput;
use crate::report;
use crate::utils::{
    create_spinner, print_header, print_info, print_plan_section, print_section, print_success,
};

/// Inputs gathered from flags
#[derive(Debug, Default)]
pub struct RunInputs {
    pub startup_idea: Option<String>,
    pub target_market: Option<String>,
    pub team_composition: Option<String>,
    pub sample: bool,
}

/// Run the crew once and render the plan
pub async fn run(
    inputs: RunInputs,
    mut settings: Settings,
    output_dir: Option<PathBuf>,
    no_input: bool,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    let interactive = !no_input && term.is_term();

    let input = collect_input(inputs, interactive.then_some(&term))?;

    if settings.llm.api_key.is_none() && interactive {
        settings.llm.api_key = prompt_api_key(&term)?;
    }

    let crew = EntrepreneurshipCrew::from_settings(&settings)?;

    if verbose {
        print_section("Crew");
        for agent in crew.agents().iter() {
            let tools = agent.tool_names();
            let tools = if tools.is_empty() {
                "no tools".to_string()
            } else {
                tools.join(", ")
            };
            print_info(&format!("{} ({})", agent.role(), tools.dimmed()));
        }
        println!();
    }

    let spinner = create_spinner("Agents are working on your plan...");
    let outcome = crew.kickoff(&input).await;
    spinner.finish_and_clear();
    let result = outcome?;

    print_header("Entrepreneurship Copilot - Your Plan");
    for section in report::split_sections(&result.raw) {
        print_plan_section(&section);
    }

    if verbose {
        print_section("Tasks");
        for output in &result.outputs {
            print_info(&format!(
                "{} by {} in {:.1}s",
                output.task,
                output.agent,
                output.duration.as_secs_f64()
            ));
        }
    }

    if let Some(dir) = output_dir {
        let date = chrono::Local::now().date_naive();
        let written = report::write_artifacts(&dir, &input, &result.raw, date)?;
        print_section("Files");
        for path in written {
            print_success(&path.display().to_string());
        }
    }

    println!();
    println!(
        "{}",
        format!("Done in {:.1}s", result.duration.as_secs_f64())
            .green()
            .bold()
    );

    Ok(())
}

/// Merge flags, the example input, and prompts into a complete input
fn collect_input(inputs: RunInputs, term: Option<&Term>) -> CopilotResult<PipelineInput> {
    let sample = inputs.sample.then(PipelineInput::sample);

    let field = |value: Option<String>, fallback: Option<String>, name: &str, label: &str| {
        let value = value.filter(|v| !v.trim().is_empty()).or(fallback);
        match (value, term) {
            (Some(v), _) => Ok(v),
            (None, Some(term)) => prompt_line(term, label, name),
            (None, None) => Err(CopilotError::InvalidSetting {
                name: name.to_string(),
                reason: format!("missing; pass --{} or --sample", name.replace('_', "-")),
            }),
        }
    };

    Ok(PipelineInput {
        startup_idea: field(
            inputs.startup_idea,
            sample.as_ref().map(|s| s.startup_idea.clone()),
            "startup_idea",
            "Startup idea",
        )?,
        target_market: field(
            inputs.target_market,
            sample.as_ref().map(|s| s.target_market.clone()),
            "target_market",
            "Target market",
        )?,
        team_composition: field(
            inputs.team_composition,
            sample.as_ref().map(|s| s.team_composition.clone()),
            "team_composition",
            "Team composition",
        )?,
    })
}

fn prompt_line(term: &Term, label: &str, name: &str) -> CopilotResult<String> {
    term.write_str(&format!("{} {}: ", "?".yellow().bold(), label.bold()))?;
    let line = term.read_line()?;
    let line = line.trim();
    if line.is_empty() {
        return Err(CopilotError::InvalidSetting {
            name: name.to_string(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(line.to_string())
}

/// Ask for the model key for this session only; it is never written anywhere
fn prompt_api_key(term: &Term) -> CopilotResult<Option<String>> {
    term.write_line(&format!(
        "{} {} is not set. Get a key at {}",
        "!".yellow().bold(),
        GEMINI_API_KEY_VAR,
        "https://aistudio.google.com/app/apikey".cyan()
    ))?;
    term.write_str(&format!("{} {}: ", "?".yellow().bold(), "Gemini API key".bold()))?;
    let key = term.read_secure_line()?;
    let key = key.trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}
