// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Init command - write the default definitions to disk

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use crate::crew::{BUNDLED_AGENTS_YAML, BUNDLED_TASKS_YAML};
use crate::utils::{code, print_info, print_success};

const ENV_EXAMPLE: &str = "\
# Required: Gemini API key from https://aistudio.google.com/app/apikey
GEMINI_API_KEY=

# Optional: enables web search for the agents (https://serper.dev)
SERPER_API_KEY=

# Optional overrides
# ENE_MODEL=gemini-2.0-flash
# ENE_BIND=0.0.0.0:8000
# RUST_LOG=ene_copilot=debug
";

/// Run the init command
pub async fn run(dir: PathBuf, force: bool, verbose: bool) -> Result<()> {
    println!("{}", "Initializing ene-copilot configuration...".bold());
    println!();

    let files = [
        (dir.join("agents.yaml"), BUNDLED_AGENTS_YAML),
        (dir.join("tasks.yaml"), BUNDLED_TASKS_YAML),
        (PathBuf::from(".env.example"), ENV_EXAMPLE),
    ];

    if !force {
        if let Some((existing, _)) = files.iter().find(|(path, _)| path.exists()) {
            return Err(miette::miette!(
                help = "Pass --force to overwrite it",
                "{} already exists",
                existing.display()
            ));
        }
    }

    std::fs::create_dir_all(&dir).map_err(|e| {
        miette::miette!("Failed to create directory '{}': {}", dir.display(), e)
    })?;

    for (path, content) in &files {
        write_file(path, content)?;
        print_success(&format!("Created {}", path.display()));
    }

    println!();
    println!("{}", "Configuration initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Copy {} to {} and add your keys", code(".env.example"), code(".env"));
    println!("  2. Edit the agent and task wording in {}", code(&format!("{}/", dir.display())));
    println!("  3. Run {} to try it out", code("ene-copilot run --sample"));
    println!();

    if verbose {
        print_info(&format!(
            "Placeholders available in tasks: {}, {}, {}",
            code("{startup_idea}"),
            code("{target_market}"),
            code("{team_composition}")
        ));
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .map_err(|e| miette::miette!("Failed to write {}: {}", path.display(), e))
}
