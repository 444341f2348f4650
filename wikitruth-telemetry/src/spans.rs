//! Span helpers for the comparison pipeline
//!
//! Pre-configured spans for instrumenting comparisons, candidate attempts,
//! article fetches and chat replies.

use tracing::Span;

/// Create a span covering one comparison request
///
/// # Example
/// ```
/// use wikitruth_telemetry::comparison_span;
/// let span = comparison_span("Napoleon", &["en".to_string(), "fr".to_string()]);
/// let _enter = span.enter();
/// ```
pub fn comparison_span(article_title: &str, languages: &[String]) -> Span {
    tracing::info_span!(
        "comparison",
        article.title = article_title,
        languages = %languages.join(","),
        stage = tracing::field::Empty,
    )
}

/// Create a span for one completion attempt against a candidate
///
/// # Arguments
/// * `provider_id` - Provider serving the model
/// * `model_id` - Model being called
/// * `attempt` - 1-based position in the fallback chain
pub fn candidate_attempt_span(provider_id: &str, model_id: &str, attempt: usize) -> Span {
    tracing::info_span!(
        "model.attempt",
        provider.id = provider_id,
        model.name = model_id,
        attempt = attempt,
        otel.kind = "client"
    )
}

/// Create a span for fetching one language edition of an article
pub fn article_fetch_span(language: &str, title: &str) -> Span {
    tracing::debug_span!("article.fetch", article.language = language, article.title = title)
}

/// Create a span for a follow-up chat reply
pub fn chat_reply_span(article_title: &str) -> Span {
    tracing::info_span!("chat.reply", article.title = article_title)
}

/// Record the current pipeline stage on the enclosing comparison span
pub fn record_stage(stage: &str) {
    Span::current().record("stage", stage);
}
