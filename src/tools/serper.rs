// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Web search through the Serper Google Search API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::Tool;
use crate::config::settings::{SearchSettings, SERPER_API_KEY_VAR};
use crate::errors::{CopilotError, CopilotResult};

/// Upper bound on results per query
const MAX_RESULTS: u32 = 10;

/// Google search via serper.dev
pub struct SerperSearch {
    client: Client,
    api_key: String,
    base_url: String,
    num_results: u32,
}

impl SerperSearch {
    /// Create the tool. Fails when the API key is missing or the HTTP client cannot be built.
    pub fn new(settings: &SearchSettings) -> CopilotResult<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CopilotError::missing_credential(SERPER_API_KEY_VAR))?
            .to_string();

        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            num_results: settings.num_results.clamp(1, MAX_RESULTS),
        })
    }
}

/// Initialize web search, degrading to no tool on any failure
pub fn init_web_search(settings: &SearchSettings) -> Option<Arc<dyn Tool>> {
    match SerperSearch::new(settings) {
        Ok(tool) => {
            debug!("Web search tool initialized");
            Some(Arc::new(tool))
        }
        Err(e) => {
            warn!(error = %e, "Could not initialize web search, agents will run without it");
            None
        }
    }
}

#[async_trait]
impl Tool for SerperSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the internet with Google. Returns titles, links and snippets. \
         Use it for current market data, competitors, pricing and trends."
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: &Value) -> CopilotResult<String> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| CopilotError::ToolFailed {
                tool: self.name().to_string(),
                message: "missing 'query' argument".to_string(),
            })?;

        debug!(query, "Running web search");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": self.num_results }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CopilotError::ToolFailed {
                tool: self.name().to_string(),
                message: format!("search API returned HTTP {}", status),
            });
        }

        let results: SerperResponse = response.json().await?;
        Ok(results.to_text(query))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerperResponse {
    #[serde(default)]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SerperResponse {
    fn to_text(&self, query: &str) -> String {
        let mut out = format!("Search results for \"{}\":\n", query);

        if let Some(answer) = self
            .answer_box
            .as_ref()
            .and_then(|b| b.answer.as_ref().or(b.snippet.as_ref()))
        {
            out.push_str(&format!("\nAnswer: {}\n", answer));
        }

        if self.organic.is_empty() {
            out.push_str("\nNo results found.\n");
            return out;
        }

        for (i, result) in self.organic.iter().enumerate() {
            out.push_str(&format!("\n{}. {}\n   {}\n", i + 1, result.title, result.link));
            if !result.snippet.is_empty() {
                out.push_str(&format!("   {}\n", result.snippet));
            }
        }

        out
    }
}
