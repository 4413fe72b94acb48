// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! HTTP front-end
//!
//! `POST /run-crew/` runs the crew once for the posted inputs and returns the
//! final task's output. The crew is built once at start-up and shared by all
//! requests.

mod error;

pub use error::ApiError;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::crew::EntrepreneurshipCrew;
use crate::errors::{CopilotError, CopilotResult};
use crate::pipeline::PipelineInput;

/// Shared request state
#[derive(Clone)]
pub struct AppState {
    crew: Arc<Result<EntrepreneurshipCrew, String>>,
}

impl AppState {
    /// State around a ready crew
    pub fn new(crew: EntrepreneurshipCrew) -> Self {
        Self {
            crew: Arc::new(Ok(crew)),
        }
    }

    /// State that answers every run with a configuration error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            crew: Arc::new(Err(reason.into())),
        }
    }

    /// Build the crew from settings. A configuration problem such as a
    /// missing API key leaves the server up but unable to run.
    pub fn from_settings(settings: &Settings) -> CopilotResult<Self> {
        match EntrepreneurshipCrew::from_settings(settings) {
            Ok(crew) => Ok(Self::new(crew)),
            Err(e) if e.is_configuration() => {
                warn!(error = %e, "Crew unavailable, runs will fail until the configuration is fixed");
                Ok(Self::unavailable(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.crew.is_ok()
    }
}

#[derive(Debug, Serialize)]
struct RunCrewResponse {
    result: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    ready: bool,
    version: &'static str,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/run-crew/", post(run_crew))
        .route("/run-crew", post(run_crew))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> CopilotResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, ready = state.is_ready(), "Listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| CopilotError::Http {
            message: e.to_string(),
        })
}

async fn run_crew(
    State(state): State<AppState>,
    payload: Result<Json<PipelineInput>, JsonRejection>,
) -> Result<Json<RunCrewResponse>, ApiError> {
    let Json(input) = payload?;

    let crew = match &*state.crew {
        Ok(crew) => crew,
        Err(reason) => return Err(ApiError::Configuration(reason.clone())),
    };

    let result = crew.kickoff(&input).await.map_err(|e| {
        error!(error = %e, "Crew run failed");
        ApiError::from(e)
    })?;

    Ok(Json(RunCrewResponse { result: result.raw }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ready: state.is_ready(),
        version: crate::VERSION,
    })
}
