//! Optional architecture advisory.
//!
//! The dependency projection is sent to a chat-completions endpoint and the
//! reply is attached to the result as free text. The call is best effort:
//! it happens at most once per run, is bounded by a timeout, is never
//! retried, and any failure is replaced by [`FALLBACK_ADVISORY`]. Nothing
//! deterministic depends on it.

use std::time::Duration;

use async_trait::async_trait;
use ripple_graph::GraphProjection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AdvisoryConfig;

/// Text used whenever the advisory is unavailable.
pub const FALLBACK_ADVISORY: &str = "Architecture advisory unavailable for this run.";

/// Why an advisory could not be produced.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// The advisory is disabled or missing its endpoint or key
    #[error("advisory not configured: {0}")]
    NotConfigured(String),

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the service
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response did not contain a message
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The prompt could not be built
    #[error("prompt error: {0}")]
    Prompt(String),

    /// No answer within the configured bound
    #[error("advisory timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces architecture notes for a dependency projection.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Summarize the projection as free text.
    async fn summarize(&self, projection: &GraphProjection) -> Result<String, AdvisoryError>;
}

/// Run the advisor once, mapping every failure to [`FALLBACK_ADVISORY`].
pub async fn advise(advisor: &dyn Advisor, projection: &GraphProjection, timeout: Duration) -> String {
    let outcome = match tokio::time::timeout(timeout, advisor.summarize(projection)).await {
        Ok(result) => result,
        Err(_) => Err(AdvisoryError::Timeout(timeout)),
    };

    match outcome {
        Ok(text) => {
            info!(chars = text.len(), "Advisory received");
            text
        }
        Err(AdvisoryError::NotConfigured(reason)) => {
            debug!(%reason, "Advisory skipped");
            FALLBACK_ADVISORY.to_string()
        }
        Err(e) => {
            warn!(error = %e, "Advisory failed, using fallback text");
            FALLBACK_ADVISORY.to_string()
        }
    }
}

/// Advisor used when the advisory is switched off.
#[derive(Debug, Clone)]
pub struct DisabledAdvisor {
    reason: String,
}

impl DisabledAdvisor {
    /// Create a disabled advisor that reports `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for DisabledAdvisor {
    fn default() -> Self {
        Self::new("advisory disabled")
    }
}

#[async_trait]
impl Advisor for DisabledAdvisor {
    async fn summarize(&self, _projection: &GraphProjection) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::NotConfigured(self.reason.clone()))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Advisor backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsAdvisor {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsAdvisor {
    /// Create an advisor for `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Create an advisor from already resolved endpoint and key.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::NotConfigured`] if either value is missing
    /// or blank.
    pub fn from_parts(
        endpoint: Option<String>,
        api_key: Option<String>,
        model: &str,
    ) -> Result<Self, AdvisoryError> {
        let endpoint = endpoint
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AdvisoryError::NotConfigured("endpoint URL not set".to_string()))?;
        let api_key = api_key
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AdvisoryError::NotConfigured("API key not set".to_string()))?;
        Ok(Self::new(endpoint, api_key, model))
    }

    /// Create an advisor from the environment variables named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::NotConfigured`] if the advisory is disabled or
    /// a variable is unset.
    pub fn from_config(config: &AdvisoryConfig) -> Result<Self, AdvisoryError> {
        if !config.enabled {
            return Err(AdvisoryError::NotConfigured(
                "disabled in configuration".to_string(),
            ));
        }
        Self::from_parts(
            std::env::var(&config.api_url_env).ok(),
            std::env::var(&config.api_key_env).ok(),
            &config.model,
        )
        .map_err(|e| match e {
            AdvisoryError::NotConfigured(_) => AdvisoryError::NotConfigured(format!(
                "set {} and {} to enable",
                config.api_url_env, config.api_key_env
            )),
            other => other,
        })
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Advisor for ChatCompletionsAdvisor {
    async fn summarize(&self, projection: &GraphProjection) -> Result<String, AdvisoryError> {
        let prompt = build_prompt(projection)?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "Requesting advisory");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        content_from_response(&body)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions reply.
///
/// # Errors
///
/// Returns [`AdvisoryError::MalformedResponse`] when the body is not JSON or
/// has no message content.
pub fn content_from_response(body: &str) -> Result<String, AdvisoryError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| AdvisoryError::MalformedResponse("no message content".to_string()))
}

/// Prompt asking for an architecture review of the projection.
///
/// # Errors
///
/// Returns [`AdvisoryError::Prompt`] if the projection cannot be serialized.
pub fn build_prompt(projection: &GraphProjection) -> Result<String, AdvisoryError> {
    let graph_json = projection
        .to_json_pretty()
        .map_err(|e| AdvisoryError::Prompt(e.to_string()))?;

    Ok(format!(
        "You are an experienced reviewer of Java Spring architectures.\n\
         Analyze the dependency graph below and point out likely architecture problems.\n\
         The JSON maps each class name to {{\"dependsOn\": [...], \"dependedOnBy\": [...]}}.\n\
         \"dependsOn\" lists the classes it uses; \"dependedOnBy\" lists the classes using it.\n\
         \n\
         Look for:\n\
         1. High coupling: classes with roughly ten or more dependencies or dependents (possible god classes).\n\
         2. Layer violations: controllers should use services and services should use repositories; \
         flag anything else, such as a controller using a repository directly.\n\
         3. Unstable dependencies: core domain classes depending directly on volatile modules such as \
         external API clients.\n\
         \n\
         Answer with a short markdown list. For each finding give the classes involved, \
         the problem and a fix in at most three lines.\n\
         If nothing stands out, answer \"No significant architecture issues found.\"\n\
         \n\
         ```json\n{graph_json}\n```\n"
    ))
}
