//! Shared OpenAI-compatible completion transport.

use crate::convert::{self, ChatCompletionResponse};
use crate::provider::ProviderConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use wikitruth_core::{
    CompletionRequest, CompletionResponse, CompletionTransport, ModelCandidate, TransportError,
    WikiTruthError,
};
use wikitruth_telemetry::debug;

/// Per-call timeout applied to every provider request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Routes each completion call to the provider named by the candidate.
///
/// # Example
///
/// ```rust,ignore
/// use wikitruth_model::{OpenAICompatibleTransport, ProviderConfig};
///
/// let transport = OpenAICompatibleTransport::new()?
///     .with_provider(ProviderConfig::openrouter(std::env::var("OPENROUTER_API_KEY")?));
/// ```
pub struct OpenAICompatibleTransport {
    client: Client,
    providers: HashMap<String, ProviderConfig>,
}

impl OpenAICompatibleTransport {
    /// Create a transport with the default per-call timeout.
    pub fn new() -> Result<Self, WikiTruthError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, WikiTruthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WikiTruthError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, providers: HashMap::new() })
    }

    /// Transport with every provider configured in the environment.
    pub fn from_env() -> Result<Self, WikiTruthError> {
        let transport = Self::new()?;
        Ok(ProviderConfig::from_env()
            .into_iter()
            .fold(transport, |transport, provider| transport.with_provider(provider)))
    }

    #[must_use]
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.providers.insert(provider.id.clone(), provider);
        self
    }

    pub fn has_provider(&self, provider_id: &str) -> bool {
        self.providers.contains_key(provider_id)
    }
}

#[async_trait]
impl CompletionTransport for OpenAICompatibleTransport {
    async fn complete(
        &self,
        candidate: &ModelCandidate,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, TransportError> {
        let provider = self
            .providers
            .get(&candidate.provider_id)
            .ok_or_else(|| TransportError::UnknownProvider(candidate.provider_id.clone()))?;

        let body = convert::build_request(&candidate.model_id, request);

        let mut builder = self
            .client
            .post(provider.completions_url())
            .bearer_auth(&provider.api_key)
            .json(&body);
        for (name, value) in &provider.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Http { status: status.as_u16(), body });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Decode(e.to_string())
            }
        })?;

        debug!(
            provider.id = %candidate.provider_id,
            model.name = %candidate.model_id,
            choices = parsed.choices.len(),
            "completion response received"
        );

        Ok(convert::from_response(parsed))
    }
}
