//! Interfaces of the collaborators the comparison pipeline calls into.

use crate::{
    Result,
    comparison::ComparisonResult,
    types::ArticleContent,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Article-content fetch service.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Fetch the plain text of `title` from the `language` edition.
    async fn fetch(&self, title: &str, language: &str) -> Result<ArticleContent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub allowed: bool,
    pub used: u32,
    pub limit: u32,
    #[serde(default)]
    pub is_premium: bool,
}

impl QuotaStatus {
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

/// Per-caller usage quota.
#[async_trait]
pub trait UsageQuota: Send + Sync {
    async fn can_generate(&self, caller_id: &str) -> Result<QuotaStatus>;

    /// Count one successful generation; returns the new usage count.
    async fn record_generation(&self, caller_id: &str) -> Result<u32>;
}

/// Durable home of finished comparisons.
#[async_trait]
pub trait ComparisonStore: Send + Sync {
    async fn save(&self, result: &ComparisonResult) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<ComparisonResult>>;
    async fn list_recent(&self, limit: usize) -> Result<Vec<ComparisonResult>>;
    /// Returns whether a comparison with `id` existed.
    async fn delete(&self, id: &str) -> Result<bool>;
}
