//! Chat Follow-up Executor: conversational questions about a finished comparison.

use crate::config::{DEFAULT_CHAT_HISTORY_WINDOW, DEFAULT_CHAT_PARAMS, PipelineConfig};
use wikitruth_core::{
    CandidateList, ChatMessage, ChatRole, ChatTurn, ComparisonResult, GenerationParams, Result,
    WikiTruthError,
};
use wikitruth_model::{FallbackExecutor, FallbackTiers};
use wikitruth_telemetry::{Instrument, chat_reply_span, info};

/// Turns of one viewing session. All turns are kept; only the most recent
/// `window` are sent with a follow-up question.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
    window: usize,
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_HISTORY_WINDOW)
    }
}

impl ChatHistory {
    pub fn new(window: usize) -> Self {
        Self { turns: Vec::new(), window }
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatTurn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatTurn::assistant(content));
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The last `window` turns, oldest first.
    pub fn recent(&self) -> &[ChatTurn] {
        let start = self.turns.len().saturating_sub(self.window);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// System message grounding the conversation in the prior comparison.
pub fn chat_system_prompt(article_title: &str, languages: &[String], comparison_text: &str) -> String {
    format!(
        "You are a helpful assistant discussing a Wikipedia comparison analysis. \
         The user has received a comparison of \"{article_title}\" across languages: {}.\n\n\
         Here is the comparison analysis they received:\n{comparison_text}\n\n\
         The user is now asking about this analysis. Please provide helpful, conversational \
         responses based on the comparison findings. Be friendly and informative.",
        languages.join(", ")
    )
}

/// System prompt, then up to `window` most recent user and assistant turns,
/// then the new question.
pub fn chat_messages(
    comparison_text: &str,
    article_title: &str,
    languages: &[String],
    history: &[ChatTurn],
    new_message: &str,
    window: usize,
) -> Vec<ChatMessage> {
    let conversation: Vec<&ChatTurn> =
        history.iter().filter(|turn| turn.role != ChatRole::System).collect();
    let start = conversation.len().saturating_sub(window);
    let recent = &conversation[start..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(ChatMessage::system(chat_system_prompt(article_title, languages, comparison_text)));
    messages.extend(recent.iter().map(|turn| turn.to_message()));
    messages.push(ChatMessage::user(new_message));
    messages
}

/// Answers follow-up questions: the primary candidates first, then the free chain.
#[derive(Clone)]
pub struct ChatResponder {
    executor: FallbackExecutor,
    tiers: FallbackTiers,
    params: GenerationParams,
    history_window: usize,
}

impl ChatResponder {
    pub fn new(executor: FallbackExecutor, primary: CandidateList, fallback: CandidateList) -> Self {
        Self {
            executor,
            tiers: FallbackTiers::new(primary).then(fallback),
            params: DEFAULT_CHAT_PARAMS,
            history_window: DEFAULT_CHAT_HISTORY_WINDOW,
        }
    }

    pub fn from_config(executor: FallbackExecutor, config: &PipelineConfig) -> Self {
        Self::new(executor, config.chat_primary.clone(), config.free_chain.clone())
            .with_params(config.chat_params)
            .with_history_window(config.chat_history_window)
    }

    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn tiers(&self) -> &FallbackTiers {
        &self.tiers
    }

    /// Reply to `new_message` about a prior comparison. The reply is trimmed.
    pub async fn reply(
        &self,
        comparison_text: &str,
        article_title: &str,
        languages: &[String],
        history: &[ChatTurn],
        new_message: &str,
    ) -> Result<String> {
        let new_message = new_message.trim();
        if new_message.is_empty() {
            return Err(WikiTruthError::InvalidRequest("message is required".to_string()));
        }
        if comparison_text.trim().is_empty() {
            return Err(WikiTruthError::InvalidRequest(
                "comparison context is required".to_string(),
            ));
        }

        let messages = chat_messages(
            comparison_text,
            article_title,
            languages,
            history,
            new_message,
            self.history_window,
        );

        async {
            let reply = self.executor.execute_tiered(&messages, &self.tiers, self.params).await?;
            info!(history_turns = messages.len() - 2, reply_chars = reply.len(), "Chat reply generated");
            Ok::<_, WikiTruthError>(reply.trim().to_string())
        }
        .instrument(chat_reply_span(article_title))
        .await
    }

    /// Reply about a stored comparison.
    pub async fn chat_reply(
        &self,
        prior: &ComparisonResult,
        history: &ChatHistory,
        new_message: &str,
    ) -> Result<String> {
        self.reply(
            &prior.comparison_result_text,
            &prior.article_title,
            &prior.selected_languages,
            history.turns(),
            new_message,
        )
        .await
    }

    /// Reply and append both the question and the answer to `history`.
    /// On failure the history is left unchanged.
    pub async fn converse(
        &self,
        prior: &ComparisonResult,
        history: &mut ChatHistory,
        new_message: &str,
    ) -> Result<String> {
        let reply = self.chat_reply(prior, history, new_message).await?;
        history.push_user(new_message.trim());
        history.push_assistant(reply.clone());
        Ok(reply)
    }
}
