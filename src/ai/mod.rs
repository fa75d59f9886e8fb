use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

mod error;

pub use error::AIError;
use crate::config::{ModelConfig, Provider};
use async_trait::async_trait;

const SYSTEM_PROMPT: &str =
    "You are a Git command expert. Respond only with valid Git commands, nothing else.";
const RAW_COMPLETION_STOPS: [&str; 3] = ["Human:", "Assistant:", "\n\n"];
const SEED: u64 = 42;
const ANTHROPIC_VERSION: &str = "2023-06-01";

const INITIAL_RETRY_DELAY: u64 = 500; // milliseconds
const MAX_RETRY_DELAY: u64 = 5000;

/// Sampling knobs passed with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    /// Near zero means near-deterministic output.
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 100,
            temperature: 0.1,
            top_p: 0.9,
        }
    }
}

impl From<&ModelConfig> for GenerationParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

/// Text generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, AIError>;
}

#[derive(Debug)]
struct RetryConfig {
    max_retries: u32,
    initial_delay: u64,
    max_delay: u64,
}

impl RetryConfig {
    fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            initial_delay: INITIAL_RETRY_DELAY,
            max_delay: MAX_RETRY_DELAY,
        }
    }

    fn should_retry(&self, error: &AIError) -> bool {
        matches!(error, AIError::RateLimit(_) | AIError::Network(_))
    }

    fn get_delay(&self, attempt: u32) -> Duration {
        let delay = self.initial_delay.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(delay.min(self.max_delay))
    }
}

async fn with_retries<T, F, Fut>(config: &RetryConfig, f: F) -> Result<T, AIError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, AIError>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if config.should_retry(&e) && attempt + 1 < config.max_retries => {
                let delay = config.get_delay(attempt);
                warn!(error = %e, ?delay, "model request failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

/// HTTP client for a local llama.cpp server or a hosted provider.
pub struct HttpGenerator {
    client: reqwest::Client,
    provider: Provider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl HttpGenerator {
    pub fn from_config(config: &ModelConfig) -> Result<Self, AIError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AIError::Configuration(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            provider: config.provider,
            endpoint: config.endpoint().trim_end_matches('/').to_string(),
            model: config.model_name(),
            api_key: config.api_key.clone(),
            retry: RetryConfig::new(config.max_retries),
        })
    }

    async fn generate_once(&self, prompt: &str, params: &GenerationParams) -> Result<String, AIError> {
        match self.provider {
            Provider::LlamaCpp => match self.chat_completion(prompt, params).await {
                Ok(text) => Ok(text),
                Err(AIError::Authentication(msg)) => Err(AIError::Authentication(msg)),
                Err(chat_error) => {
                    debug!(error = %chat_error, "chat completion failed, trying raw completion");
                    self.raw_completion(prompt, params)
                        .await
                        .map_err(|e| e.context(&format!("chat completion failed ({chat_error}); raw completion")))
                }
            },
            Provider::OpenAi => self.chat_completion(prompt, params).await,
            Provider::Anthropic => self.anthropic_message(prompt, params).await,
        }
    }

    fn headers(&self) -> Result<HeaderMap, AIError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let Some(key) = self.api_key.as_deref() else {
            return Ok(headers);
        };
        let invalid = |e: reqwest::header::InvalidHeaderValue| {
            AIError::Configuration(format!("Invalid API key: {}", e))
        };
        match self.provider {
            Provider::Anthropic => {
                headers.insert("x-api-key", HeaderValue::from_str(key).map_err(invalid)?);
                headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
            }
            Provider::LlamaCpp | Provider::OpenAi => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?,
                );
            }
        }
        Ok(headers)
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<String, AIError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%url, "sending model request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => (),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AIError::RateLimit("Rate limit exceeded".to_string()));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AIError::Authentication("Invalid API key".to_string()));
            }
            status => {
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Could not read error response".to_string());
                return Err(AIError::Api(format!(
                    "Unexpected status code: {} - Response: {}",
                    status, error_body
                )));
            }
        }

        response
            .text()
            .await
            .map_err(|e| AIError::Network(format!("Failed to read response body: {}", e)))
    }

    async fn chat_completion(&self, prompt: &str, params: &GenerationParams) -> Result<String, AIError> {
        let body = self
            .post(
                "/v1/chat/completions",
                json!({
                    "model": &self.model,
                    "messages": [
                        { "role": "system", "content": SYSTEM_PROMPT },
                        { "role": "user", "content": prompt }
                    ],
                    "max_tokens": params.max_tokens,
                    "temperature": params.temperature,
                    "top_p": params.top_p,
                    "seed": SEED,
                    "stream": false
                }),
            )
            .await?;

        let response: ChatResponse = serde_json::from_str(&body)?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::Parse(format!("No choices in response: {}", body)))?;
        Ok(choice.message.content.trim().to_string())
    }

    async fn raw_completion(&self, prompt: &str, params: &GenerationParams) -> Result<String, AIError> {
        let body = self
            .post(
                "/completion",
                json!({
                    "prompt": prompt,
                    "n_predict": params.max_tokens,
                    "temperature": params.temperature,
                    "top_p": params.top_p,
                    "seed": SEED,
                    "stop": RAW_COMPLETION_STOPS,
                    "stream": false
                }),
            )
            .await?;

        let response: CompletionResponse = serde_json::from_str(&body)?;
        Ok(response.content.trim().to_string())
    }

    async fn anthropic_message(&self, prompt: &str, params: &GenerationParams) -> Result<String, AIError> {
        let body = self
            .post(
                "/v1/messages",
                json!({
                    "model": &self.model,
                    "max_tokens": params.max_tokens,
                    "temperature": params.temperature,
                    "top_p": params.top_p,
                    "system": SYSTEM_PROMPT,
                    "messages": [{ "role": "user", "content": prompt }]
                }),
            )
            .await?;

        let response: AnthropicResponse = serde_json::from_str(&body)?;
        let text: String = response
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect();
        if text.trim().is_empty() {
            return Err(AIError::Parse(format!("Empty response from Anthropic: {}", body)));
        }
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, AIError> {
        let text = with_retries(&self.retry, || self.generate_once(prompt, params)).await?;
        debug!(chars = text.len(), "model responded");
        Ok(text)
    }
}
