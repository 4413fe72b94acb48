// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{ChatRequest, ChatResponse, LanguageModel, Message, ToolSpec};
use crate::config::settings::{normalize_model, LlmSettings, GEMINI_API_KEY_VAR};
use crate::errors::{CopilotError, CopilotResult};

/// Longest slice of an unparseable error body kept in error messages
const MAX_ERROR_BODY: usize = 300;

/// Google Gemini client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    /// Create a client. Fails with a configuration error when no API key is set.
    pub fn new(settings: &LlmSettings) -> CopilotResult<Self> {
        let api_key = settings.require_api_key()?.to_string();

        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model: normalize_model(&settings.model),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model, turns = request.messages.len()))]
    async fn generate(&self, request: &ChatRequest) -> CopilotResult<ChatResponse> {
        let body = GeminiRequest::from_chat(request, self.temperature);

        debug!("Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, "Gemini API error response");
            let message = match serde_json::from_str::<GeminiError>(&text) {
                Ok(err) => format!("{}: {}", err.error.status, err.error.message),
                Err(_) => text.chars().take(MAX_ERROR_BODY).collect(),
            };
            return Err(api_error(status.as_u16(), message));
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| CopilotError::LlmInvalidResponse {
                message: e.to_string(),
            })?;

        parsed.into_chat_response()
    }
}

/// Map an error response. Gemini answers a bad key with 400 INVALID_ARGUMENT,
/// so that status counts as a credential problem only when the message names the key.
fn api_error(status: u16, message: String) -> CopilotError {
    let rejected_key = match status {
        401 | 403 => true,
        400 => message.to_lowercase().contains("api key"),
        _ => false,
    };

    if rejected_key {
        CopilotError::invalid_credential(GEMINI_API_KEY_VAR, message)
    } else {
        CopilotError::LlmApi { status, message }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

impl GeminiRequest {
    fn from_chat(request: &ChatRequest, temperature: Option<f32>) -> Self {
        let contents = request.messages.iter().map(GeminiContent::from).collect();

        let system_instruction = request.system.as_ref().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart::Text { text: text.clone() }],
        });

        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![GeminiTool {
                function_declarations: request.tools.iter().map(FunctionDeclaration::from).collect(),
            }]
        };

        let tool_config = (request.force_text && !tools.is_empty()).then(|| ToolConfig {
            function_calling_config: FunctionCallingConfig {
                mode: "NONE".to_string(),
            },
        });

        Self {
            contents,
            system_instruction,
            generation_config: temperature.map(|t| GenerationConfig {
                temperature: Some(t),
            }),
            tools,
            tool_config,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl From<&Message> for GeminiContent {
    fn from(message: &Message) -> Self {
        let (role, part) = match message {
            Message::User(text) => ("user", GeminiPart::Text { text: text.clone() }),
            Message::ToolCall { name, args } => (
                "model",
                GeminiPart::FunctionCall {
                    function_call: FunctionCall {
                        name: name.clone(),
                        args: args.clone(),
                    },
                },
            ),
            Message::ToolResult { name, content } => (
                "user",
                GeminiPart::FunctionResponse {
                    function_response: FunctionResponse {
                        name: name.clone(),
                        response: serde_json::json!({ "content": content }),
                    },
                },
            ),
        };

        Self {
            role: Some(role.to_string()),
            parts: vec![part],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
    Other(Value),
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Serialize)]
struct FunctionCallingConfig {
    mode: String,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolSpec> for FunctionDeclaration {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: spec.parameters.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GeminiResponse {
    fn into_chat_response(self) -> CopilotResult<ChatResponse> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates in response".to_string());
            return Err(CopilotError::LlmInvalidResponse { message: reason });
        };

        let mut text = String::new();
        for part in candidate.content.parts {
            match part {
                GeminiPart::FunctionCall { function_call } => {
                    return Ok(ChatResponse::ToolCall {
                        name: function_call.name,
                        args: function_call.args,
                    });
                }
                GeminiPart::Text { text: t } => text.push_str(&t),
                _ => {}
            }
        }

        if text.trim().is_empty() {
            return Err(CopilotError::LlmInvalidResponse {
                message: format!(
                    "empty response (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(ChatResponse::Text(text))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: GeminiContent,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorded {
        calls: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn settings(base_url: String) -> LlmSettings {
        LlmSettings {
            api_key: Some("test-key".into()),
            model: "gemini/gemini-2.0-flash".into(),
            base_url,
            ..Default::default()
        }
    }

    async fn mock_model(reply: Value) -> (String, Recorded) {
        let recorded = Recorded::default();
        let router = Router::new()
            .route(
                "/models/:call",
                post(
                    |State(rec): State<Recorded>,
                     Path(call): Path<String>,
                     headers: HeaderMap,
                     Json(body): Json<Value>| async move {
                        let key = headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from);
                        rec.calls.lock().unwrap().push((call, key, body));
                        Json(reply)
                    },
                ),
            )
            .with_state(recorded.clone());
        (spawn(router).await, recorded)
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = GeminiClient::new(&LlmSettings::default()).err().unwrap();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_text_generation_wire_format() {
        let (base, recorded) = mock_model(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "founder"}]},
                "finishReason": "STOP"
            }]
        }))
        .await;

        let client = GeminiClient::new(&settings(base)).unwrap();
        let request = ChatRequest::new(Some("You are a consultant.".into()), "Write a plan");
        let response = client.generate(&request).await.unwrap();

        assert_eq!(response, ChatResponse::Text("Hello founder".into()));

        let calls = recorded.calls.lock().unwrap();
        let (call, key, body) = &calls[0];
        assert_eq!(call, "gemini-2.0-flash:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Write a plan");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a consultant.");
        assert!(body.get("tools").is_none());
        assert!(body.get("toolConfig").is_none());
    }

    #[test]
    fn test_force_text_disables_function_calling() {
        let mut request = ChatRequest::new(None, "Wrap up");
        request.tools.push(ToolSpec {
            name: "web_search".into(),
            description: "Search".into(),
            parameters: serde_json::json!({"type": "object"}),
        });
        request.force_text = true;

        let body = serde_json::to_value(GeminiRequest::from_chat(&request, Some(0.2))).unwrap();
        assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "NONE");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_function_call_round_trip() {
        let (base, recorded) = mock_model(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "web_search", "args": {"query": "meal kits"}}}
                ]}
            }]
        }))
        .await;

        let client = GeminiClient::new(&settings(base)).unwrap();
        let request = ChatRequest {
            system: None,
            messages: vec![
                Message::User("Research".into()),
                Message::ToolCall {
                    name: "web_search".into(),
                    args: serde_json::json!({"query": "x"}),
                },
                Message::ToolResult {
                    name: "web_search".into(),
                    content: "results".into(),
                },
            ],
            tools: vec![ToolSpec {
                name: "web_search".into(),
                description: "Search the web".into(),
                parameters: serde_json::json!({"type": "object"}),
            }],
            force_text: false,
        };

        let response = client.generate(&request).await.unwrap();
        assert_eq!(
            response,
            ChatResponse::ToolCall {
                name: "web_search".into(),
                args: serde_json::json!({"query": "meal kits"}),
            }
        );

        let calls = recorded.calls.lock().unwrap();
        let body = &calls[0].2;
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][1]["parts"][0]["functionCall"]["name"], "web_search");
        assert_eq!(
            body["contents"][2]["parts"][0]["functionResponse"]["response"]["content"],
            "results"
        );
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "web_search"
        );
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let router = Router::new().route(
            "/models/:call",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(serde_json::json!({
                        "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
                    })),
                )
            }),
        );
        let base = spawn(router).await;

        let client = GeminiClient::new(&settings(base)).unwrap();
        let err = client
            .generate(&ChatRequest::new(None, "hi"))
            .await
            .unwrap_err();

        match err {
            CopilotError::LlmApi { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("RESOURCE_EXHAUSTED"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_key_is_invalid_credential() {
        let router = Router::new().route(
            "/models/:call",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": {
                            "code": 400,
                            "message": "API key not valid. Please pass a valid API key.",
                            "status": "INVALID_ARGUMENT"
                        }
                    })),
                )
            }),
        );
        let base = spawn(router).await;

        let client = GeminiClient::new(&settings(base)).unwrap();
        let err = client
            .generate(&ChatRequest::new(None, "hi"))
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(matches!(err, CopilotError::InvalidCredential { ref variable, .. } if variable == "GEMINI_API_KEY"));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_error_status_classification() {
        assert!(api_error(403, "PERMISSION_DENIED: denied".into()).is_configuration());
        assert!(api_error(401, "UNAUTHENTICATED".into()).is_configuration());
        assert!(!api_error(400, "INVALID_ARGUMENT: bad schema".into()).is_configuration());
        assert!(!api_error(503, "UNAVAILABLE".into()).is_configuration());
    }

    #[test]
    fn test_blocked_prompt() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        let err = response.into_chat_response().unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
