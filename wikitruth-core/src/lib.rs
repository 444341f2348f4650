//! # wikitruth-core
//!
//! Core types, error taxonomy and collaborator traits for WikiTruth.
//!
//! ## Overview
//!
//! WikiTruth compares how one Wikipedia topic is presented across 2 to 5
//! language editions by asking a large language model for an analysis. This
//! crate holds everything the pipeline crates share:
//!
//! - [`ArticleContent`] / [`BudgetedContent`] - article text before and after budgeting
//! - [`ComparisonConfig`] - analysis mode, output format, formality and focus
//! - [`ModelCandidate`] / [`CandidateList`] - the ordered fallback chain
//! - [`CompletionTransport`] - one completion call against one candidate
//! - [`ArticleFetcher`], [`UsageQuota`], [`ComparisonStore`] - external collaborators
//! - [`WikiTruthError`] / [`Result`] - unified error handling
//!
//! ## Wire values
//!
//! | field | values |
//! |-------|--------|
//! | `analysisMode` | `academic`, `biography`, `funny` |
//! | `outputFormat` | `bullet-points`, `narrative` |
//! | `formality` | `academic`, `formal`, `casual` |
//! | `aiModel` | `free`, `premium` |

pub mod comparison;
pub mod error;
pub mod model;
pub mod service;
pub mod types;

pub use comparison::{
    AnalysisMode, ArticleSummary, ComparisonConfig, ComparisonRequest, ComparisonResult,
    Formality, LanguageTitle, ModelTier, OutputFormat,
};
pub use error::{Result, WikiTruthError};
pub use model::{
    AllCandidatesExhausted, CandidateFailure, CandidateList, CompletionRequest,
    CompletionResponse, CompletionTransport, FailureKind, GenerationParams, ModelCandidate,
    TransportError,
};
pub use service::{ArticleFetcher, ComparisonStore, QuotaStatus, UsageQuota};
pub use types::{ArticleContent, BudgetedContent, ChatMessage, ChatRole, ChatTurn};
