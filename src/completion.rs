//! The remote chat-completion boundary.
//!
//! [`ChatBackend`] is the only seam through which the application talks to
//! an external service. [`OpenAiClient`] is the production implementation;
//! tests substitute their own backend.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::CompletionError;
use crate::persona::Prompt;
use crate::providers::{api_error_message, OpenAIChatRequest, OpenAIChatResponse};

pub trait ChatBackend: Send + Sync {
    /// Send one prompt and return the model's text unchanged.
    fn complete(
        &self,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    pub model: String,
    pub temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, CompletionError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        Ok(OpenAiClient {
            client,
            api_key: config.api_key.clone(),
            endpoint: chat_endpoint(&config.base_url),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, prompt: &Prompt) -> OpenAIChatRequest {
        OpenAIChatRequest {
            model: self.model.clone(),
            messages: prompt.messages(),
            stream: false,
            temperature: self.temperature,
        }
    }
}

impl ChatBackend for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingCredential)?;
        let request = self.request_body(prompt);
        debug!(model = %self.model, endpoint = %self.endpoint, "sending chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion service rejected request");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        parse_completion(&body)
    }
}

/// `{base}/chat/completions`, tolerating a trailing slash on the base.
pub fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Extract the first choice's text from a successful response body.
pub fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let parsed: OpenAIChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;
    parsed
        .first_content()
        .ok_or_else(|| CompletionError::Malformed("response contained no message content".into()))
}
