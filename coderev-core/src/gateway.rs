//! Model gateway: the single "prompt in, completion out" call
//!
//! The workflow only ever talks to the [`ModelGateway`] trait. The concrete
//! [`GeminiGateway`] calls Google's generative language REST API; tests
//! substitute scripted gateways.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ProviderConfig;

/// Header carrying the API key; keeps the credential out of request URLs
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors from the model provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key was configured
    #[error("No API key configured. Set GOOGLE_API_KEY or add it to the secrets file")]
    MissingCredential,

    /// The endpoint could not be turned into a request URL
    #[error("Invalid provider endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport-level failure
    #[error("Request to model provider failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Model provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered but the response carried no completion
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// A text completion service
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send one prompt and return the completion text
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Everything the Gemini gateway needs, resolved at process start
#[derive(Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Option<Duration>,
    pub temperature: Option<f32>,
}

impl GatewayConfig {
    /// Combine provider settings with a resolved API key
    pub fn new(provider: &ProviderConfig, api_key: Option<String>) -> Result<Self, ProviderError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::MissingCredential)?;

        Ok(Self {
            api_key,
            model: provider.model.clone(),
            endpoint: provider.endpoint.clone(),
            timeout: provider.timeout,
            temperature: provider.temperature,
        })
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Gateway backed by the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    url: url::Url,
    config: GatewayConfig,
}

impl GeminiGateway {
    /// Create a gateway from an explicit configuration
    pub fn new(config: GatewayConfig) -> Result<Self, ProviderError> {
        let url = Self::request_url(&config)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("coderev/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url,
            config,
        })
    }

    fn request_url(config: &GatewayConfig) -> Result<url::Url, ProviderError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );
        url::Url::parse(&raw).map_err(|e| ProviderError::InvalidEndpoint(e.to_string()))
    }

    /// The model this gateway talks to
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self
                .config
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        };

        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let text = parsed
            .into_text()
            .ok_or_else(|| ProviderError::Malformed("response contained no text".to_string()))?;

        debug!(completion_len = text.len(), "Received completion");
        Ok(text)
    }
}
