//! # wikitruth-compare
//!
//! The cross-language comparison pipeline.
//!
//! ## Overview
//!
//! A comparison request flows through
//! [`ComparisonOrchestrator::compare_articles`]:
//!
//! 1. validate the language count (2 to 5 by default) before any I/O
//! 2. check the caller's usage quota, if a quota collaborator is configured
//! 3. fetch each language edition sequentially under a [`FetchPacing`] policy,
//!    skipping languages that fail
//! 4. [`budget`](budget::budget) the article text to a fair per-language share
//! 5. [`compose`](prompt::compose) the system and user prompts
//! 6. run the free or premium candidate chain through the fallback executor
//! 7. persist the [`ComparisonResult`](wikitruth_core::ComparisonResult)
//!
//! Follow-up questions go through [`ChatResponder`], which tries the chat
//! primary model before the free chain.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wikitruth_compare::{ComparisonOrchestrator, PipelineConfig};
//! use wikitruth_core::{ComparisonConfig, ComparisonRequest, LanguageTitle};
//! use wikitruth_model::{FallbackExecutor, OpenAICompatibleTransport};
//! use wikitruth_wiki::WikipediaClient;
//!
//! let executor = FallbackExecutor::new(Arc::new(OpenAICompatibleTransport::from_env()?));
//! let orchestrator = ComparisonOrchestrator::new(Arc::new(WikipediaClient::new()?), executor)
//!     .with_config(PipelineConfig::from_toml_file("wikitruth.toml")?)?;
//!
//! let request = ComparisonRequest::new(
//!     "Napoleon",
//!     vec![LanguageTitle::new("en", "Napoleon"), LanguageTitle::new("fr", "Napoléon Ier")],
//!     ComparisonConfig::new("en"),
//! );
//! let result = orchestrator.compare_articles(&request).await?;
//! ```

pub mod budget;
pub mod chat;
pub mod config;
pub mod orchestrator;
pub mod pacing;
pub mod prompt;

pub use budget::{DEFAULT_TOTAL_BUDGET_CHARS, TRUNCATION_MARKER, budget};
pub use chat::{ChatHistory, ChatResponder, chat_messages, chat_system_prompt};
pub use config::PipelineConfig;
pub use orchestrator::{ComparisonOrchestrator, ComparisonStage};
pub use pacing::{FetchPacing, Pacer};
pub use prompt::{ComposedPrompt, FormalityPolicy, ModeProfile, compose, describe_language};
