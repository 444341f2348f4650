use crate::{Result, WikiTruthError, types::ChatMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One (provider, model) pair the fallback executor may try.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCandidate {
    pub provider_id: String,
    pub model_id: String,
    #[serde(default)]
    pub priority: u32,
}

impl ModelCandidate {
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self { provider_id: provider_id.into(), model_id: model_id.into(), priority: 0 }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider_id, self.model_id)
    }
}

/// Ordered, non-empty list of candidates. List order is the trial order;
/// `priority` is informational and never used to re-rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ModelCandidate>", into = "Vec<ModelCandidate>")]
pub struct CandidateList(Vec<ModelCandidate>);

impl CandidateList {
    pub fn new(candidates: Vec<ModelCandidate>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(WikiTruthError::Config(
                "candidate list must contain at least one model".to_string(),
            ));
        }
        Ok(Self(candidates))
    }

    /// Build a list of models served by one provider, prioritised by position.
    pub fn chain<I, S>(provider_id: &str, models: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = models
            .into_iter()
            .zip(0u32..)
            .map(|(model, priority)| ModelCandidate::new(provider_id, model).with_priority(priority))
            .collect();
        Self::new(candidates)
    }

    pub fn single(candidate: ModelCandidate) -> Self {
        Self(vec![candidate])
    }

    /// Append a candidate to try after the existing ones.
    pub fn with_fallback(mut self, candidate: ModelCandidate) -> Self {
        self.0.push(candidate);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelCandidate> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ModelCandidate] {
        &self.0
    }
}

impl TryFrom<Vec<ModelCandidate>> for CandidateList {
    type Error = WikiTruthError;

    fn try_from(candidates: Vec<ModelCandidate>) -> Result<Self> {
        Self::new(candidates)
    }
}

impl From<CandidateList> for Vec<ModelCandidate> {
    fn from(list: CandidateList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a ModelCandidate;
    type IntoIter = std::slice::Iter<'a, ModelCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self { temperature, max_tokens }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, params: GenerationParams) -> Self {
        Self { messages, params }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), model: None }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Non-blank content, if any.
    pub fn non_empty_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|text| !text.trim().is_empty())
    }
}

/// Failure of a single completion call against one candidate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("no provider configured with id '{0}'")]
    UnknownProvider(String),
}

/// Completion-call transport: one request against one candidate.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(
        &self,
        candidate: &ModelCandidate,
        request: &CompletionRequest,
    ) -> std::result::Result<CompletionResponse, TransportError>;
}

/// Classification of a candidate failure, used for diagnostics and user messaging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RateLimited,
    ContentTooLarge,
    Unauthorized,
    UpstreamStatus,
    EmptyContent,
    Timeout,
    Transport,
    UnknownProvider,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::ContentTooLarge => "content_too_large",
            Self::Unauthorized => "unauthorized",
            Self::UpstreamStatus => "upstream_status",
            Self::EmptyContent => "empty_content",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
            Self::UnknownProvider => "unknown_provider",
        }
    }

    // Higher wins when picking the kind to report to the user.
    fn severity(self) -> u8 {
        match self {
            Self::ContentTooLarge => 7,
            Self::Unauthorized => 6,
            Self::RateLimited => 5,
            Self::Timeout => 4,
            Self::UpstreamStatus => 3,
            Self::EmptyContent => 2,
            Self::Transport => 1,
            Self::UnknownProvider => 0,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFailure {
    pub provider_id: String,
    pub model_id: String,
    pub kind: FailureKind,
    pub detail: String,
}

impl CandidateFailure {
    pub fn new(
        provider_id: impl Into<String>,
        model_id: impl Into<String>,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
            kind,
            detail: detail.into(),
        }
    }

    pub fn for_candidate(
        candidate: &ModelCandidate,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(&candidate.provider_id, &candidate.model_id, kind, detail)
    }
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}): {}", self.provider_id, self.model_id, self.kind, self.detail)
    }
}

/// Every candidate failed. Failures are kept in attempt order.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("all {} model candidates failed; last failure: {}", .failures.len(), last_failure(.failures))]
pub struct AllCandidatesExhausted {
    pub failures: Vec<CandidateFailure>,
}

fn last_failure(failures: &[CandidateFailure]) -> String {
    failures.last().map(ToString::to_string).unwrap_or_else(|| "none recorded".to_string())
}

impl AllCandidatesExhausted {
    pub fn new(failures: Vec<CandidateFailure>) -> Self {
        Self { failures }
    }

    pub fn attempts(&self) -> usize {
        self.failures.len()
    }

    /// Merge the failures of a later fallback tier into this one.
    pub fn extend(&mut self, other: AllCandidatesExhausted) {
        self.failures.extend(other.failures);
    }

    pub fn dominant_kind(&self) -> FailureKind {
        self.failures
            .iter()
            .map(|failure| failure.kind)
            .max_by_key(|kind| kind.severity())
            .unwrap_or(FailureKind::Transport)
    }

    pub fn user_message(&self) -> &'static str {
        match self.dominant_kind() {
            FailureKind::ContentTooLarge => {
                "Articles are too large for analysis. Please try with fewer languages or shorter articles."
            }
            FailureKind::Unauthorized => "Authentication error with AI service.",
            FailureKind::RateLimited => {
                "Service temporarily overloaded. Please try again in a moment."
            }
            _ => "Failed to generate article comparison. Please try again later.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_list_rejects_empty() {
        let err = CandidateList::new(vec![]).unwrap_err();
        assert!(matches!(err, WikiTruthError::Config(_)));
    }

    #[test]
    fn test_chain_keeps_order_and_assigns_priorities() {
        let list = CandidateList::chain("openrouter", ["a", "b", "c"]).unwrap();
        let models: Vec<_> = list.iter().map(|c| c.model_id.as_str()).collect();
        assert_eq!(models, vec!["a", "b", "c"]);
        let priorities: Vec<_> = list.iter().map(|c| c.priority).collect();
        assert_eq!(priorities, vec![0, 1, 2]);
    }

    #[test]
    fn test_candidate_list_deserialize_rejects_empty() {
        let result: std::result::Result<CandidateList, _> = serde_json::from_str("[]");
        assert!(result.is_err());

        let list: CandidateList = serde_json::from_str(
            r#"[{"provider_id": "xai", "model_id": "grok-3-fast"}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].priority, 0);
    }

    #[test]
    fn test_non_empty_content_ignores_whitespace() {
        assert_eq!(CompletionResponse::text("  \n").non_empty_content(), None);
        assert_eq!(CompletionResponse::empty().non_empty_content(), None);
        assert_eq!(CompletionResponse::text("ok").non_empty_content(), Some("ok"));
    }

    #[test]
    fn test_dominant_kind_prefers_content_too_large() {
        let exhausted = AllCandidatesExhausted::new(vec![
            CandidateFailure::new("p", "a", FailureKind::RateLimited, "429"),
            CandidateFailure::new("p", "b", FailureKind::ContentTooLarge, "429 tokens"),
            CandidateFailure::new("p", "c", FailureKind::EmptyContent, "no content"),
        ]);
        assert_eq!(exhausted.dominant_kind(), FailureKind::ContentTooLarge);
        assert!(exhausted.user_message().contains("fewer languages"));
    }

    #[test]
    fn test_exhausted_display_names_last_failure() {
        let exhausted = AllCandidatesExhausted::new(vec![
            CandidateFailure::new("openrouter", "a", FailureKind::Timeout, "timed out"),
            CandidateFailure::new("openrouter", "b", FailureKind::EmptyContent, "no content"),
        ]);
        let message = exhausted.to_string();
        assert!(message.starts_with("all 2 model candidates failed"));
        assert!(message.contains("openrouter/b (empty_content)"));
    }
}
