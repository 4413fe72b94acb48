// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Serve command - run the HTTP API

use colored::Colorize;
use miette::Result;
use std::net::SocketAddr;

use crate::config::Settings;
use crate::server::{self, AppState};
use crate::utils::{code, print_info, print_warning};

/// Run the serve command
pub async fn run(settings: Settings, bind: SocketAddr, _verbose: bool) -> Result<()> {
    let state = AppState::from_settings(&settings)?;

    println!("{}", "Entrepreneurship Copilot API".bold());
    print_info(&format!("POST {}", code(&format!("http://{}/run-crew/", bind))));
    print_info(&format!("GET  {}", code(&format!("http://{}/health", bind))));
    if !state.is_ready() {
        print_warning("Crew is not configured; runs will fail until GEMINI_API_KEY is set");
    }
    println!();

    server::serve(bind, state).await?;
    Ok(())
}
