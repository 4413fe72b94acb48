// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! HTTP error responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::errors::CopilotError;

/// Errors a request can end in
#[derive(Debug)]
pub enum ApiError {
    /// Body missing, not JSON, or lacking a field
    InvalidInput(String),
    /// The crew could not be built from the current configuration
    Configuration(String),
    /// A run started and failed
    Pipeline(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<CopilotError> for ApiError {
    fn from(err: CopilotError) -> Self {
        if err.is_configuration() {
            Self::Configuration(err.to_string())
        } else {
            Self::Pipeline(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidInput(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody { detail, kind: None },
            ),
            Self::Configuration(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    detail: format!("Error running crew: {}", message),
                    kind: Some("configuration"),
                },
            ),
            Self::Pipeline(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    detail: format!("Error running crew: {}", message),
                    kind: Some("pipeline"),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
