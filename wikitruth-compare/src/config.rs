//! Pipeline configuration.

use crate::budget::DEFAULT_TOTAL_BUDGET_CHARS;
use crate::pacing::FetchPacing;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wikitruth_core::{CandidateList, ComparisonConfig, GenerationParams, ModelTier, Result, WikiTruthError};
use wikitruth_model::presets;

pub const DEFAULT_MIN_LANGUAGES: usize = 2;
pub const DEFAULT_MAX_LANGUAGES: usize = 5;
pub const DEFAULT_CHAT_HISTORY_WINDOW: usize = 5;
pub const DEFAULT_CHAT_PARAMS: GenerationParams = GenerationParams::new(0.7, 500);

/// Tunables for comparison and chat.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// total_budget_chars = 20000
///
/// [fetch_pacing]
/// max_requests = 2
/// window_ms = 500
///
/// [[premium_chain]]
/// provider_id = "xai"
/// model_id = "grok-3"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub total_budget_chars: usize,
    pub min_languages: usize,
    pub max_languages: usize,
    /// Free-tier comparison parameters.
    pub free_params: GenerationParams,
    /// Replaces `free_params.temperature` in funny mode.
    pub funny_temperature: f32,
    pub premium_params: GenerationParams,
    pub chat_params: GenerationParams,
    pub chat_history_window: usize,
    pub fetch_pacing: FetchPacing,
    pub free_chain: CandidateList,
    pub premium_chain: CandidateList,
    /// Tried before `free_chain` for chat replies.
    pub chat_primary: CandidateList,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            total_budget_chars: DEFAULT_TOTAL_BUDGET_CHARS,
            min_languages: DEFAULT_MIN_LANGUAGES,
            max_languages: DEFAULT_MAX_LANGUAGES,
            free_params: GenerationParams::new(0.3, 2000),
            funny_temperature: 0.8,
            premium_params: GenerationParams::new(0.7, 8192),
            chat_params: DEFAULT_CHAT_PARAMS,
            chat_history_window: DEFAULT_CHAT_HISTORY_WINDOW,
            fetch_pacing: FetchPacing::default(),
            free_chain: presets::free_chain(),
            premium_chain: presets::premium_chain(),
            chat_primary: presets::chat_primary(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| WikiTruthError::Config(format!("Failed to parse pipeline config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WikiTruthError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_languages < DEFAULT_MIN_LANGUAGES
            || self.min_languages > self.max_languages
            || self.max_languages > DEFAULT_MAX_LANGUAGES
        {
            return Err(WikiTruthError::Config(format!(
                "language bounds must satisfy {DEFAULT_MIN_LANGUAGES} <= min <= max <= \
                 {DEFAULT_MAX_LANGUAGES} (got {}..={})",
                self.min_languages, self.max_languages
            )));
        }
        if self.total_budget_chars == 0 {
            return Err(WikiTruthError::Config("total_budget_chars must be positive".to_string()));
        }
        if self.chat_history_window == 0 {
            return Err(WikiTruthError::Config("chat_history_window must be positive".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_total_budget_chars(mut self, total_budget_chars: usize) -> Self {
        self.total_budget_chars = total_budget_chars;
        self
    }

    #[must_use]
    pub fn with_fetch_pacing(mut self, fetch_pacing: FetchPacing) -> Self {
        self.fetch_pacing = fetch_pacing;
        self
    }

    #[must_use]
    pub fn with_free_chain(mut self, free_chain: CandidateList) -> Self {
        self.free_chain = free_chain;
        self
    }

    #[must_use]
    pub fn with_premium_chain(mut self, premium_chain: CandidateList) -> Self {
        self.premium_chain = premium_chain;
        self
    }

    #[must_use]
    pub fn with_chat_primary(mut self, chat_primary: CandidateList) -> Self {
        self.chat_primary = chat_primary;
        self
    }

    /// Candidate list and parameters for a comparison with `config`.
    pub fn generation_plan(&self, config: &ComparisonConfig) -> (&CandidateList, GenerationParams) {
        match config.ai_model {
            ModelTier::Premium => (&self.premium_chain, self.premium_params),
            ModelTier::Free if config.is_funny_mode() => (
                &self.free_chain,
                GenerationParams { temperature: self.funny_temperature, ..self.free_params },
            ),
            ModelTier::Free => (&self.free_chain, self.free_params),
        }
    }
}
