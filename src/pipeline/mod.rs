// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Task pipelines
//!
//! Task definitions, the dependency DAG, validation, and the executor that
//! runs tasks in topological order.

mod dag;
mod definition;
mod executor;
mod validation;

pub use dag::DagBuilder;
pub use definition::*;
pub use executor::{
    ContextEntry, PipelineExecutor, PipelineResult, TaskOutput, TaskPrompt, TaskRunner,
    CONTEXT_DIVIDER,
};
pub use validation::{PipelineValidator, ValidationResult};
