use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use wikitruth_core::{
    CompletionRequest, CompletionResponse, CompletionTransport, ModelCandidate, TransportError,
};

/// Scripted result of a completion call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    Reply(String),
    Empty,
    Status { status: u16, body: String },
    Timeout,
    Network(String),
}

impl MockOutcome {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status { status, body: body.into() }
    }

    fn into_result(self) -> Result<CompletionResponse, TransportError> {
        match self {
            Self::Reply(text) => Ok(CompletionResponse::text(text)),
            Self::Empty => Ok(CompletionResponse::empty()),
            Self::Status { status, body } => Err(TransportError::Http { status, body }),
            Self::Timeout => Err(TransportError::Timeout("mock timeout".to_string())),
            Self::Network(message) => Err(TransportError::Network(message)),
        }
    }
}

/// Transport whose outcomes are scripted per model id. Every call is logged in order.
pub struct MockTransport {
    outcomes: HashMap<String, MockOutcome>,
    default_outcome: MockOutcome,
    calls: Mutex<Vec<(ModelCandidate, CompletionRequest)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            default_outcome: MockOutcome::Network("no scripted outcome".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outcome(mut self, model_id: impl Into<String>, outcome: MockOutcome) -> Self {
        self.outcomes.insert(model_id.into(), outcome);
        self
    }

    /// Outcome for models without a scripted one.
    pub fn with_default(mut self, outcome: MockOutcome) -> Self {
        self.default_outcome = outcome;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<ModelCandidate> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(candidate, _)| candidate.clone()).collect())
            .unwrap_or_default()
    }

    pub fn called_models(&self) -> Vec<String> {
        self.calls().into_iter().map(|candidate| candidate.model_id).collect()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(_, request)| request.clone()).collect())
            .unwrap_or_default()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionTransport for MockTransport {
    async fn complete(
        &self,
        candidate: &ModelCandidate,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((candidate.clone(), request.clone()));
        }

        self.outcomes
            .get(&candidate.model_id)
            .cloned()
            .unwrap_or_else(|| self.default_outcome.clone())
            .into_result()
    }
}
