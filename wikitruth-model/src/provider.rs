//! Provider endpoints and credentials.

use serde::{Deserialize, Serialize};

/// Default OpenRouter API base URL.
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default xAI (Grok) API base URL.
pub const XAI_API_BASE: &str = "https://api.x.ai/v1";

pub const PROVIDER_OPENROUTER: &str = "openrouter";
pub const PROVIDER_XAI: &str = "xai";

/// Application name reported to OpenRouter.
pub const APP_TITLE: &str = "WikiTruth";

const DEFAULT_SITE_URL: &str = "http://localhost:5000";

/// Configuration for one OpenAI-compatible provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Id candidates refer to (`ModelCandidate::provider_id`).
    pub id: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), api_key: api_key.into(), base_url: base_url.into(), headers: vec![] }
    }

    /// OpenRouter, identified with the default referer and app title.
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new(PROVIDER_OPENROUTER, api_key, OPENROUTER_API_BASE)
            .with_site_url(DEFAULT_SITE_URL)
            .with_header("X-Title", APP_TITLE)
    }

    /// xAI's Grok API.
    pub fn xai(api_key: impl Into<String>) -> Self {
        Self::new(PROVIDER_XAI, api_key, XAI_API_BASE)
    }

    /// Set a custom API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Set the referer OpenRouter attributes traffic to.
    pub fn with_site_url(self, site_url: impl Into<String>) -> Self {
        self.with_header("HTTP-Referer", site_url)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Providers whose API keys are present in the environment.
    ///
    /// Reads `OPENROUTER_API_KEY`, `GROK_API_KEY` and `YOUR_SITE_URL`. A
    /// provider without a key is left out; candidates naming it then fail as
    /// unknown providers and the chain moves on.
    pub fn from_env() -> Vec<Self> {
        let mut providers = Vec::new();

        if let Some(key) = non_empty_env("OPENROUTER_API_KEY") {
            let mut openrouter = Self::openrouter(key);
            if let Some(site_url) = non_empty_env("YOUR_SITE_URL") {
                openrouter = openrouter.with_site_url(site_url);
            }
            providers.push(openrouter);
        }

        if let Some(key) = non_empty_env("GROK_API_KEY") {
            providers.push(Self::xai(key));
        }

        providers
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|value| value.trim().to_string()).filter(|v| !v.is_empty())
}
