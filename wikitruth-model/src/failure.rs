//! Classification of candidate failures.
//!
//! Kinds feed diagnostics and user-facing messages. They never change which
//! candidate is tried next.

use wikitruth_core::{FailureKind, TransportError};

#[must_use]
pub fn is_rate_limit_status(status_code: u16) -> bool {
    status_code == 429
}

#[must_use]
pub fn is_auth_status(status_code: u16) -> bool {
    matches!(status_code, 401 | 403)
}

/// True when an error body says the prompt did not fit the model.
#[must_use]
pub fn mentions_size_limit(body: &str) -> bool {
    let normalized = body.to_ascii_lowercase();
    normalized.contains("context_length_exceeded")
        || normalized.contains("context length")
        || normalized.contains("maximum context")
        || normalized.contains("too many tokens")
        || normalized.contains("request too large")
        || normalized.contains("payload too large")
        || (normalized.contains("rate_limit") && normalized.contains("\"tokens\""))
}

#[must_use]
pub fn classify_status(status_code: u16, body: &str) -> FailureKind {
    if status_code == 413 || (matches!(status_code, 400 | 429) && mentions_size_limit(body)) {
        return FailureKind::ContentTooLarge;
    }
    if is_rate_limit_status(status_code) {
        return FailureKind::RateLimited;
    }
    if is_auth_status(status_code) {
        return FailureKind::Unauthorized;
    }
    if matches!(status_code, 408 | 504) {
        return FailureKind::Timeout;
    }
    FailureKind::UpstreamStatus
}

#[must_use]
pub fn classify_transport_error(error: &TransportError) -> FailureKind {
    match error {
        TransportError::Http { status, body } => classify_status(*status, body),
        TransportError::Timeout(_) => FailureKind::Timeout,
        TransportError::Network(_) | TransportError::Decode(_) => FailureKind::Transport,
        TransportError::UnknownProvider(_) => FailureKind::UnknownProvider,
    }
}
