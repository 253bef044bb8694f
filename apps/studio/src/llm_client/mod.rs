/// Local model client: the single point of entry for all language-model calls.
///
/// ARCHITECTURAL RULE: the augmenter only ever sees the `TextGenerator` trait.
/// `LocalModelClient` is the production implementation; it talks to a model
/// runtime on this machine (Ollama-compatible `/api/generate`), never to a remote service.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod prompts;

const GENERATE_PATH: &str = "/api/generate";
const MAX_RETRIES: u32 = 3;
/// How long the runtime keeps weights resident after the last call.
const KEEP_ALIVE: &str = "30m";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Runtime error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model returned empty content")]
    EmptyContent,
}

/// Fixed decoding parameters for one kind of generation call.
///
/// `min_tokens` and `no_repeat_ngram_size` have no runtime equivalent; they are
/// carried for the record and enforced after the fact by output validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub min_tokens: u32,
    pub max_tokens: u32,
    pub no_repeat_ngram_size: Option<u32>,
}

/// A pretrained text generator. Implementations must be safe to share, but callers
/// serialise `generate` calls; a single model instance is never driven in parallel.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Brings the model into memory. Slow (seconds to minutes). Called at most once.
    async fn load(&self) -> Result<(), ModelError>;

    /// Runs one prompt to completion and returns the decoded text.
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        params: &DecodingParams,
    ) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    stream: bool,
    keep_alive: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<RuntimeOptions>,
}

#[derive(Debug, Serialize)]
struct RuntimeOptions {
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
    num_predict: u32,
}

impl From<&DecodingParams> for RuntimeOptions {
    fn from(params: &DecodingParams) -> Self {
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            repeat_penalty: params.repetition_penalty,
            num_predict: params.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RuntimeError {
    error: String,
}

/// HTTP client for a locally running model runtime.
#[derive(Clone)]
pub struct LocalModelClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl LocalModelClient {
    /// No request timeout is configured: loads and long generations may take minutes,
    /// and callers that need a deadline wrap the call themselves.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}{}", self.endpoint, GENERATE_PATH)
    }

    /// One request/response exchange, no retries.
    async fn send_once(&self, body: &GenerateRequest<'_>) -> Result<GenerateResponse, ModelError> {
        let response = self.client.post(self.url()).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<RuntimeError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    /// Sends a generation request, retrying transport failures and 5xx responses
    /// with exponential backoff.
    async fn call(&self, body: &GenerateRequest<'_>) -> Result<GenerateResponse, ModelError> {
        let mut last_error: Option<ModelError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Model call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.send_once(body).await {
                Ok(response) => return Ok(response),
                Err(ModelError::Api { status, message }) if status >= 500 => {
                    warn!("Model runtime returned {status}: {message}");
                    last_error = Some(ModelError::Api { status, message });
                }
                Err(ModelError::Http(e)) => last_error = Some(ModelError::Http(e)),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(ModelError::EmptyContent))
    }
}

#[async_trait]
impl TextGenerator for LocalModelClient {
    async fn load(&self) -> Result<(), ModelError> {
        info!("Loading model {} from {}", self.model, self.endpoint);
        // An empty prompt makes the runtime load the weights and return immediately.
        let body = GenerateRequest {
            model: &self.model,
            prompt: "",
            system: "",
            stream: false,
            keep_alive: KEEP_ALIVE,
            options: None,
        };
        self.send_once(&body).await?;
        Ok(())
    }

    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        params: &DecodingParams,
    ) -> Result<String, ModelError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            keep_alive: KEEP_ALIVE,
            options: Some(RuntimeOptions::from(params)),
        };

        let response = self.call(&body).await?;

        debug!(
            "Model call finished: done={}, prompt_tokens={:?}, output_tokens={:?}",
            response.done, response.prompt_eval_count, response.eval_count
        );

        let text = response.response.trim();
        if text.is_empty() {
            return Err(ModelError::EmptyContent);
        }
        Ok(text.to_string())
    }
}
