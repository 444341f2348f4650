use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use wikitruth_core::{
    ComparisonResult, ComparisonStore, QuotaStatus, Result, UsageQuota, WikiTruthError,
};
use wikitruth_telemetry::debug;

/// Free comparisons per caller before an upgrade is required.
pub const DEFAULT_FREE_GENERATION_LIMIT: u32 = 1;

fn poisoned(what: &str) -> WikiTruthError {
    WikiTruthError::Storage(format!("{what} lock poisoned"))
}

/// Comparison store backed by a map. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryComparisonStore {
    comparisons: Arc<RwLock<HashMap<String, ComparisonResult>>>,
}

impl InMemoryComparisonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.comparisons.read().map(|map| map.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ComparisonStore for InMemoryComparisonStore {
    async fn save(&self, result: &ComparisonResult) -> Result<()> {
        let mut comparisons = self.comparisons.write().map_err(|_| poisoned("comparison"))?;
        comparisons.insert(result.id.clone(), result.clone());
        debug!(comparison.id = %result.id, stored = comparisons.len(), "Saved comparison");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ComparisonResult>> {
        let comparisons = self.comparisons.read().map_err(|_| poisoned("comparison"))?;
        Ok(comparisons.get(id).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<ComparisonResult>> {
        let comparisons = self.comparisons.read().map_err(|_| poisoned("comparison"))?;
        let mut results: Vec<_> = comparisons.values().cloned().collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        results.truncate(limit);
        Ok(results)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut comparisons = self.comparisons.write().map_err(|_| poisoned("comparison"))?;
        Ok(comparisons.remove(id).is_some())
    }
}

#[derive(Debug, Clone, Default)]
struct CallerUsage {
    generations_used: u32,
    premium: bool,
    premium_expires_at: Option<DateTime<Utc>>,
}

impl CallerUsage {
    fn has_active_premium(&self, now: DateTime<Utc>) -> bool {
        self.premium && self.premium_expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Per-caller generation counter. Premium callers are never limited.
#[derive(Clone)]
pub struct InMemoryUsageQuota {
    free_limit: u32,
    callers: Arc<RwLock<HashMap<String, CallerUsage>>>,
}

impl Default for InMemoryUsageQuota {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_GENERATION_LIMIT)
    }
}

impl InMemoryUsageQuota {
    pub fn new(free_limit: u32) -> Self {
        Self { free_limit, callers: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub fn free_limit(&self) -> u32 {
        self.free_limit
    }

    /// Grant premium access, optionally until `expires_at`.
    pub fn grant_premium(&self, caller_id: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        let mut callers = self.callers.write().map_err(|_| poisoned("quota"))?;
        let usage = callers.entry(caller_id.to_string()).or_default();
        usage.premium = true;
        usage.premium_expires_at = expires_at;
        Ok(())
    }

    pub fn revoke_premium(&self, caller_id: &str) -> Result<()> {
        let mut callers = self.callers.write().map_err(|_| poisoned("quota"))?;
        if let Some(usage) = callers.get_mut(caller_id) {
            usage.premium = false;
            usage.premium_expires_at = None;
        }
        Ok(())
    }

    fn status_at(&self, caller_id: &str, now: DateTime<Utc>) -> Result<QuotaStatus> {
        let callers = self.callers.read().map_err(|_| poisoned("quota"))?;
        let usage = callers.get(caller_id).cloned().unwrap_or_default();
        let is_premium = usage.has_active_premium(now);
        Ok(QuotaStatus {
            allowed: is_premium || usage.generations_used < self.free_limit,
            used: usage.generations_used,
            limit: self.free_limit,
            is_premium,
        })
    }
}

#[async_trait]
impl UsageQuota for InMemoryUsageQuota {
    async fn can_generate(&self, caller_id: &str) -> Result<QuotaStatus> {
        self.status_at(caller_id, Utc::now())
    }

    async fn record_generation(&self, caller_id: &str) -> Result<u32> {
        let mut callers = self.callers.write().map_err(|_| poisoned("quota"))?;
        let usage = callers.entry(caller_id.to_string()).or_default();
        usage.generations_used = usage.generations_used.saturating_add(1);
        Ok(usage.generations_used)
    }
}
