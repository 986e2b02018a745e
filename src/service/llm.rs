//! Generative text service client
//!
//! The engine treats the model as an untrusted text source: one prompt in,
//! raw text out. Structure is enforced downstream by the parser, never
//! assumed here.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

/// Environment variable for the assessment model
const ENV_ELIGIBILITY_MODEL: &str = "ELIGIBILITY_MODEL";

/// Default model for eligibility assessment
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// One completion request: prompt plus bounded sampling parameters
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u64,
    pub temperature: f64,
}

/// Raw completion text plus accounting metadata
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub text: String,
    pub model: String,
    pub prompt_chars: usize,
    pub elapsed_ms: u128,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generative service call failed: {0}")]
    Upstream(String),
}

/// Seam between the pipeline and the external generative service
///
/// The pipeline never calls the provider directly; tests substitute stub
/// implementations here.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest)
        -> Result<GenerationOutcome, GenerationError>;
}

/// OpenAI-backed client
#[derive(Clone)]
pub struct OpenAiGenerativeClient {
    client: openai::Client,
    model: String,
}

impl OpenAiGenerativeClient {
    /// Create a new client with the provided API key
    ///
    /// Optionally uses the ELIGIBILITY_MODEL env var, then the configured
    /// model, then the provider default.
    pub fn new(api_key: &str, configured_model: Option<&str>) -> Result<Self, String> {
        let client = openai::Client::new(api_key);

        let model = std::env::var(ENV_ELIGIBILITY_MODEL)
            .ok()
            .or_else(|| configured_model.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        tracing::info!(model = %model, "Generative client initialized");

        Ok(Self { client, model })
    }
}

#[async_trait]
impl GenerativeClient for OpenAiGenerativeClient {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(&request.system)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build();

        let prompt_chars = request.prompt.len();
        let start = std::time::Instant::now();

        let text = agent
            .prompt(request.prompt.as_str())
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let elapsed_ms = start.elapsed().as_millis();

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt_chars,
            response_chars = text.len(),
            elapsed_ms = elapsed_ms,
            "Generative service call completed"
        );

        Ok(GenerationOutcome {
            text,
            model: self.model.clone(),
            prompt_chars,
            elapsed_ms,
        })
    }
}
