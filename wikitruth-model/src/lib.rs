//! # wikitruth-model
//!
//! Completion transports and the ordered multi-model fallback executor.
//!
//! ## Overview
//!
//! - [`FallbackExecutor`] - tries an ordered [`CandidateList`](wikitruth_core::CandidateList)
//!   one candidate at a time until one returns non-empty content
//! - [`FallbackTiers`] - primary list first, then further lists (used by chat)
//! - [`OpenAICompatibleTransport`] - HTTP transport for OpenRouter, xAI and
//!   any other OpenAI-compatible endpoint
//! - [`MockTransport`] - scripted transport for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wikitruth_core::{ChatMessage, GenerationParams};
//! use wikitruth_model::{FallbackExecutor, OpenAICompatibleTransport, presets};
//!
//! # async fn run() -> wikitruth_core::Result<()> {
//! let executor = FallbackExecutor::new(Arc::new(OpenAICompatibleTransport::from_env()?));
//! let messages = vec![ChatMessage::user("Hello")];
//! let reply = executor
//!     .generate(&messages, &presets::free_chain(), GenerationParams::new(0.7, 500))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod failure;
pub mod fallback;
pub mod mock;
pub mod openai_compatible;
pub mod presets;
pub mod provider;

pub use fallback::{FallbackExecutor, FallbackTiers};
pub use mock::{MockOutcome, MockTransport};
pub use openai_compatible::{DEFAULT_REQUEST_TIMEOUT, OpenAICompatibleTransport};
pub use provider::{
    OPENROUTER_API_BASE, PROVIDER_OPENROUTER, PROVIDER_XAI, ProviderConfig, XAI_API_BASE,
};
