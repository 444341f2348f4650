//! Ordered multi-model fallback execution.

use crate::failure::classify_transport_error;
use std::sync::Arc;
use wikitruth_core::{
    AllCandidatesExhausted, CandidateFailure, CandidateList, ChatMessage, CompletionRequest,
    CompletionTransport, FailureKind, GenerationParams, Result, WikiTruthError,
};
use wikitruth_telemetry::{Instrument, candidate_attempt_span, info, warn};

/// Ordered candidate lists tried one after another, e.g. a primary model
/// followed by the free chain. Each tier uses the same per-candidate rules.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackTiers(Vec<CandidateList>);

impl FallbackTiers {
    pub fn new(first: CandidateList) -> Self {
        Self(vec![first])
    }

    #[must_use]
    pub fn then(mut self, next: CandidateList) -> Self {
        self.0.push(next);
        self
    }

    pub fn tiers(&self) -> &[CandidateList] {
        &self.0
    }

    /// Total number of candidates across all tiers.
    pub fn candidate_count(&self) -> usize {
        self.0.iter().map(CandidateList::len).sum()
    }
}

/// Tries candidates strictly in list order, one attempt each, and returns the
/// first non-empty completion.
///
/// There is no backoff within a candidate and no memory across calls: every
/// call starts again from the first candidate.
#[derive(Clone)]
pub struct FallbackExecutor {
    transport: Arc<dyn CompletionTransport>,
}

impl FallbackExecutor {
    pub fn new(transport: Arc<dyn CompletionTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute(
        &self,
        messages: &[ChatMessage],
        candidates: &CandidateList,
        params: GenerationParams,
    ) -> std::result::Result<String, AllCandidatesExhausted> {
        let request = CompletionRequest::new(messages.to_vec(), params);
        let mut failures = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let attempt = index + 1;
            let span = candidate_attempt_span(&candidate.provider_id, &candidate.model_id, attempt);

            let failure = match self.transport.complete(candidate, &request).instrument(span).await {
                Ok(response) => match response.non_empty_content() {
                    Some(_) => {
                        info!(
                            provider.id = %candidate.provider_id,
                            model.name = %candidate.model_id,
                            attempt,
                            "Completion succeeded"
                        );
                        return Ok(response.content.unwrap_or_default());
                    }
                    None => CandidateFailure::for_candidate(
                        candidate,
                        FailureKind::EmptyContent,
                        "response contained no content",
                    ),
                },
                Err(error) => CandidateFailure::for_candidate(
                    candidate,
                    classify_transport_error(&error),
                    error.to_string(),
                ),
            };

            warn!(
                provider.id = %candidate.provider_id,
                model.name = %candidate.model_id,
                attempt,
                remaining = candidates.len() - attempt,
                kind = %failure.kind,
                detail = %failure.detail,
                "Model candidate failed"
            );
            failures.push(failure);
        }

        Err(AllCandidatesExhausted::new(failures))
    }

    /// Run each tier in order; the error lists failures from every tier.
    pub async fn execute_tiered(
        &self,
        messages: &[ChatMessage],
        tiers: &FallbackTiers,
        params: GenerationParams,
    ) -> std::result::Result<String, AllCandidatesExhausted> {
        let mut exhausted = AllCandidatesExhausted::new(Vec::new());

        for (index, tier) in tiers.tiers().iter().enumerate() {
            match self.execute(messages, tier, params).await {
                Ok(text) => return Ok(text),
                Err(tier_failures) => {
                    if index + 1 < tiers.tiers().len() {
                        warn!(tier = index + 1, "Fallback tier exhausted; moving to next tier");
                    }
                    exhausted.extend(tier_failures);
                }
            }
        }

        Err(exhausted)
    }

    /// Same as [`execute`](Self::execute), with exhaustion mapped into the crate error.
    pub async fn generate(
        &self,
        messages: &[ChatMessage],
        candidates: &CandidateList,
        params: GenerationParams,
    ) -> Result<String> {
        self.execute(messages, candidates, params).await.map_err(WikiTruthError::from)
    }
}
