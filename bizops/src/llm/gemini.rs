//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the Gemini `generateContent` endpoint.
//! One HTTP attempt per call; failures surface to the caller immediately.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::schema::Schema;
use super::{FinishReason, GenerateRequest, GenerateResponse, LlmClient, LlmError, ResponseFormat, Role, TokenUsage};
use crate::config::LlmConfig;

const JSON_MIME_TYPE: &str = "application/json";

/// Gemini REST client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key().map_err(|e| LlmError::Config(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            debug!(%timeout_ms, "from_config: applying request timeout");
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Build the request body for the Gemini API
fn build_request_body(request: &GenerateRequest) -> GeminiRequest<'_> {
    debug!(
        content_count = %request.contents.len(),
        temperature = ?request.temperature,
        "build_request_body: called"
    );
    let contents = request
        .contents
        .iter()
        .map(|msg| GeminiContent {
            role: msg.role,
            parts: vec![GeminiPart { text: &msg.text }],
        })
        .collect();

    let system_instruction = request.system_instruction.as_deref().map(|text| GeminiSystemInstruction {
        parts: vec![GeminiPart { text }],
    });

    let (response_mime_type, response_schema) = match &request.response_format {
        ResponseFormat::Text => {
            debug!("build_request_body: text output");
            (None, None)
        }
        ResponseFormat::Json { schema } => {
            debug!("build_request_body: json output with schema");
            (Some(JSON_MIME_TYPE), Some(schema))
        }
    };

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: request.temperature,
            response_mime_type,
            response_schema,
        },
    }
}

/// Parse the Gemini API response
fn parse_response(api_response: GeminiResponse) -> GenerateResponse {
    debug!(candidate_count = %api_response.candidates.len(), "parse_response: called");
    if let Some(reason) = api_response.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
        warn!(%reason, "parse_response: prompt was blocked");
    }

    let usage = api_response
        .usage_metadata
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count.unwrap_or(0),
            output_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count.unwrap_or(0),
        })
        .unwrap_or_default();

    let Some(candidate) = api_response.candidates.into_iter().next() else {
        debug!("parse_response: no candidates");
        return GenerateResponse {
            text: None,
            finish_reason: FinishReason::Other("NO_CANDIDATES".to_string()),
            usage,
        };
    };

    let finish_reason = candidate
        .finish_reason
        .as_deref()
        .map(FinishReason::from_gemini)
        .unwrap_or_default();

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    let text = if texts.is_empty() {
        debug!("parse_response: candidate has no text parts");
        None
    } else {
        Some(texts.concat())
    };

    GenerateResponse {
        text,
        finish_reason,
        usage,
    }
}

/// Build an `ApiError` from a non-success status and its body
///
/// The reason is the first `details[].reason`, else the envelope `status`.
fn api_error(status: u16, body: &str) -> LlmError {
    match serde_json::from_str::<GeminiErrorEnvelope>(body) {
        Ok(envelope) => {
            let error = envelope.error;
            let reason = error
                .details
                .into_iter()
                .find_map(|d| d.reason)
                .or(error.status);
            LlmError::ApiError {
                status,
                message: error.message,
                reason,
            }
        }
        Err(_) => LlmError::ApiError {
            status,
            message: body.to_string(),
            reason: None,
        },
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        debug!(%self.model, "generate: called");
        let body = build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "generate: network error");
                LlmError::Network(e)
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            debug!("generate: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(LlmError::RateLimited { retry_after });
        }

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "generate: API error");
            return Err(api_error(status, &text));
        }

        let text = response.text().await?;
        let api_response: GeminiResponse = serde_json::from_str(&text)?;
        debug!("generate: success");
        Ok(parse_response(api_response))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Gemini API request types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction<'a>>,
    #[serde(skip_serializing_if = "GenerationConfig::is_empty")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: Role,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Schema>,
}

impl GenerationConfig<'_> {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.response_mime_type.is_none() && self.response_schema.is_none()
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    status: Option<String>,
    #[serde(default)]
    details: Vec<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    reason: Option<String>,
}
