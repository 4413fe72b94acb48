// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Graph command - visualize the task pipeline

use miette::Result;

use super::GraphFormat;
use crate::config::{ConfigLoader, Settings, TaskConfig};
use crate::crew::build_pipeline;
use crate::pipeline::DagBuilder;

/// Run the graph command
pub async fn run(settings: Settings, format: GraphFormat, _verbose: bool) -> Result<()> {
    let tasks = ConfigLoader::load::<TaskConfig>(&settings.tasks_path);
    let pipeline = build_pipeline(&tasks);

    let dag = DagBuilder::build(&pipeline)?;

    let output = match format {
        GraphFormat::Text => dag.to_text(&pipeline)?,
        GraphFormat::Dot => dag.to_dot(),
        GraphFormat::Mermaid => dag.to_mermaid(),
    };

    println!("{}", output.trim_end());

    Ok(())
}
