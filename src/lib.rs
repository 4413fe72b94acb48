// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! # ene-copilot - Entrepreneurship Copilot
//!
//! Three AI agents turn a startup idea into a business plan, an MVP plan and a
//! go-to-market strategy. Each task receives the outputs of the tasks it
//! depends on as context.
//!
//! ## Features
//!
//! - **Fixed crew** - business strategy, MVP development and go-to-market agents
//! - **YAML wording** - roles and task prompts live in `config/*.yaml`
//! - **Optional web search** - agents research through Serper when a key is set
//! - **Two front-ends** - an HTTP API and a terminal runner
//!
//! ## Quick Start
//!
//! ```bash
//! # Write the default agent and task definitions
//! ene-copilot init
//!
//! # Check keys and configuration
//! ene-copilot check
//!
//! # Plan the built-in example startup
//! ene-copilot run --sample
//!
//! # Serve POST /run-crew/
//! ene-copilot serve
//! ```

pub mod cli;
pub mod config;
pub mod crew;
pub mod errors;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod tools;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use crew::EntrepreneurshipCrew;
pub use errors::{CopilotError, CopilotResult};
pub use pipeline::{PipelineInput, PipelineResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
