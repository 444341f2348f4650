//! # wikitruth-store
//!
//! In-memory implementations of the storage and usage-quota collaborators.
//!
//! - [`InMemoryComparisonStore`] - finished comparisons, newest first
//! - [`InMemoryUsageQuota`] - free generation limit per caller, with optional
//!   time-limited premium access

pub mod inmemory;

pub use inmemory::{DEFAULT_FREE_GENERATION_LIMIT, InMemoryComparisonStore, InMemoryUsageQuota};
