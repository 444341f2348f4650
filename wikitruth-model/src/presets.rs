//! Default candidate chains.

use crate::provider::{PROVIDER_OPENROUTER, PROVIDER_XAI};
use wikitruth_core::{CandidateList, ModelCandidate};

/// Free OpenRouter models, in order of preference.
pub const FREE_MODELS: [&str; 4] = [
    "google/gemini-2.0-flash-exp:free",
    "qwen/qwen-2.5-7b-instruct:free",
    "microsoft/phi-3.5-mini-instruct:free",
    "mistralai/mistral-7b-instruct:free",
];

/// Paid model used for premium comparisons.
pub const PREMIUM_MODEL: &str = "grok-3-fast";

/// Model tried first for follow-up chat.
pub const CHAT_PRIMARY_MODEL: &str = "grok-4-latest";

/// The free fallback chain, shared by comparison and chat.
pub fn free_chain() -> CandidateList {
    let [first, rest @ ..] = FREE_MODELS;
    rest.iter().zip(1u32..).fold(
        CandidateList::single(ModelCandidate::new(PROVIDER_OPENROUTER, first)),
        |list, (model, priority)| {
            list.with_fallback(ModelCandidate::new(PROVIDER_OPENROUTER, *model).with_priority(priority))
        },
    )
}

/// A single paid model with no fallback.
pub fn premium_chain() -> CandidateList {
    CandidateList::single(ModelCandidate::new(PROVIDER_XAI, PREMIUM_MODEL))
}

pub fn chat_primary() -> CandidateList {
    CandidateList::single(ModelCandidate::new(PROVIDER_XAI, CHAT_PRIMARY_MODEL))
}
