//! Comparison Orchestrator: the entry point for one comparison request.

use crate::budget::budget;
use crate::config::PipelineConfig;
use crate::prompt::compose;
use chrono::Utc;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use wikitruth_core::{
    ArticleContent, ArticleFetcher, ArticleSummary, ComparisonRequest, ComparisonResult,
    ComparisonStore, ModelTier, Result, UsageQuota, WikiTruthError,
};
use wikitruth_model::FallbackExecutor;
use wikitruth_telemetry::{
    Instrument, article_fetch_span, comparison_span, debug, error, info, record_stage, warn,
};

/// Pipeline state of one comparison request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonStage {
    Validating,
    FetchingArticles,
    Budgeting,
    Composing,
    Generating,
    Persisting,
    Done,
    Failed,
}

impl ComparisonStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::FetchingArticles => "fetching_articles",
            Self::Budgeting => "budgeting",
            Self::Composing => "composing",
            Self::Generating => "generating",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ComparisonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives fetch, budget, compose, generate and persist for one request.
///
/// Stateless between requests; the store and quota collaborators are the
/// only shared state and handle their own synchronisation.
#[derive(Clone)]
pub struct ComparisonOrchestrator {
    fetcher: Arc<dyn ArticleFetcher>,
    executor: FallbackExecutor,
    store: Option<Arc<dyn ComparisonStore>>,
    quota: Option<Arc<dyn UsageQuota>>,
    config: PipelineConfig,
}

impl ComparisonOrchestrator {
    pub fn new(fetcher: Arc<dyn ArticleFetcher>, executor: FallbackExecutor) -> Self {
        Self { fetcher, executor, store: None, quota: None, config: PipelineConfig::default() }
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ComparisonStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_quota(mut self, quota: Arc<dyn UsageQuota>) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Replace the pipeline configuration. Fails if `config` does not
    /// validate.
    pub fn with_config(mut self, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Compare the article across the requested language editions.
    pub async fn compare_articles(&self, request: &ComparisonRequest) -> Result<ComparisonResult> {
        let languages: Vec<String> =
            request.language_titles.iter().map(|entry| entry.language.clone()).collect();
        let span = comparison_span(&request.article_title, &languages);

        async {
            let mut stage = ComparisonStage::Validating;
            let outcome = self.run(request, None, &mut stage).await;
            self.finish(stage, outcome)
        }
        .instrument(span)
        .await
    }

    /// Same as [`compare_articles`](Self::compare_articles) with article text
    /// supplied by the caller instead of fetched. Articles for languages that
    /// were not requested are ignored.
    pub async fn compare_prefetched(
        &self,
        request: &ComparisonRequest,
        articles: Vec<ArticleContent>,
    ) -> Result<ComparisonResult> {
        let languages: Vec<String> =
            request.language_titles.iter().map(|entry| entry.language.clone()).collect();
        let span = comparison_span(&request.article_title, &languages);

        async {
            let mut stage = ComparisonStage::Validating;
            let outcome = self.run(request, Some(articles), &mut stage).await;
            self.finish(stage, outcome)
        }
        .instrument(span)
        .await
    }

    fn finish(
        &self,
        stage: ComparisonStage,
        outcome: Result<ComparisonResult>,
    ) -> Result<ComparisonResult> {
        match &outcome {
            Ok(result) => {
                record_stage(ComparisonStage::Done.as_str());
                info!(comparison.id = %result.id, "Comparison complete");
            }
            Err(err) => {
                record_stage(ComparisonStage::Failed.as_str());
                error!(failed_stage = %stage, error = %err, "Comparison failed");
            }
        }
        outcome
    }

    fn enter(stage_slot: &mut ComparisonStage, stage: ComparisonStage) {
        *stage_slot = stage;
        record_stage(stage.as_str());
        debug!(stage = %stage, "Comparison stage");
    }

    async fn run(
        &self,
        request: &ComparisonRequest,
        prefetched: Option<Vec<ArticleContent>>,
        stage: &mut ComparisonStage,
    ) -> Result<ComparisonResult> {
        Self::enter(stage, ComparisonStage::Validating);
        self.validate(request)?;
        self.check_quota(request).await?;

        Self::enter(stage, ComparisonStage::FetchingArticles);
        let articles = match prefetched {
            Some(articles) => select_requested(request, articles),
            None => self.fetch_articles(request).await,
        };
        if articles.len() < self.config.min_languages {
            return Err(WikiTruthError::InsufficientLanguages {
                fetched: articles.len(),
                required: self.config.min_languages,
            });
        }

        Self::enter(stage, ComparisonStage::Budgeting);
        let budgeted = budget(&articles, self.config.total_budget_chars);
        for (article, budgeted) in articles.iter().zip(&budgeted) {
            info!(
                language = %article.language,
                original_chars = article.original_length,
                budgeted_chars = budgeted.text.chars().count(),
                truncated = budgeted.truncated,
                "Budgeted article"
            );
        }

        Self::enter(stage, ComparisonStage::Composing);
        let prompt = compose(&budgeted, &request.config);
        info!(prompt_chars = prompt.char_count(), articles = budgeted.len(), "Composed prompt");

        Self::enter(stage, ComparisonStage::Generating);
        let (candidates, params) = self.config.generation_plan(&request.config);
        let text = self.executor.execute(&prompt.into_messages(), candidates, params).await?;

        Self::enter(stage, ComparisonStage::Persisting);
        let result = ComparisonResult {
            id: uuid::Uuid::new_v4().to_string(),
            article_title: request.article_title.clone(),
            selected_languages: articles.iter().map(|a| a.language.clone()).collect(),
            output_language: request.config.output_language.clone(),
            comparison_result_text: text,
            is_funny_mode: request.config.is_funny_mode(),
            is_premium: request.config.ai_model == ModelTier::Premium,
            created_at: Utc::now(),
            articles: articles
                .iter()
                .map(|a| ArticleSummary {
                    language: a.language.clone(),
                    title: a.title.clone(),
                    content_length: a.original_length,
                })
                .collect(),
        };

        if let Some(store) = &self.store {
            store.save(&result).await?;
        }
        self.record_generation(request).await;

        Ok(result)
    }

    fn validate(&self, request: &ComparisonRequest) -> Result<()> {
        let count = request.language_titles.len();
        let (min, max) = (self.config.min_languages, self.config.max_languages);
        if count < min || count > max {
            return Err(WikiTruthError::InvalidLanguageCount { count, min, max });
        }

        if request.article_title.trim().is_empty() {
            return Err(WikiTruthError::InvalidRequest("article title is required".to_string()));
        }
        if request.config.output_language.trim().is_empty() {
            return Err(WikiTruthError::InvalidRequest("output language is required".to_string()));
        }

        let mut seen = HashSet::with_capacity(count);
        for entry in &request.language_titles {
            if entry.language.trim().is_empty() {
                return Err(WikiTruthError::InvalidRequest("language code is required".to_string()));
            }
            if !seen.insert(entry.language.as_str()) {
                return Err(WikiTruthError::InvalidRequest(format!(
                    "language '{}' selected more than once",
                    entry.language
                )));
            }
        }
        Ok(())
    }

    async fn check_quota(&self, request: &ComparisonRequest) -> Result<()> {
        let (Some(quota), Some(caller_id)) = (&self.quota, &request.caller_id) else {
            return Ok(());
        };

        let status = quota.can_generate(caller_id).await?;
        if !status.allowed {
            warn!(caller.id = %caller_id, used = status.used, limit = status.limit, "Generation limit reached");
            return Err(WikiTruthError::GenerationLimitExceeded {
                used: status.used,
                limit: status.limit,
            });
        }
        Ok(())
    }

    async fn fetch_articles(&self, request: &ComparisonRequest) -> Vec<ArticleContent> {
        let mut pacer = self.config.fetch_pacing.pacer();
        let mut articles = Vec::with_capacity(request.language_titles.len());

        for entry in &request.language_titles {
            let title = if entry.title.trim().is_empty() {
                request.article_title.as_str()
            } else {
                entry.title.as_str()
            };

            pacer.ready().await;
            let span = article_fetch_span(&entry.language, title);
            match self.fetcher.fetch(title, &entry.language).instrument(span).await {
                Ok(article) => articles.push(article),
                Err(err) => {
                    warn!(language = %entry.language, title, error = %err, "Article fetch failed; skipping language");
                }
            }
        }

        info!(
            requested = request.language_titles.len(),
            fetched = articles.len(),
            "Fetched articles"
        );
        articles
    }

    async fn record_generation(&self, request: &ComparisonRequest) {
        let (Some(quota), Some(caller_id)) = (&self.quota, &request.caller_id) else {
            return;
        };
        match quota.record_generation(caller_id).await {
            Ok(used) => debug!(caller.id = %caller_id, used, "Recorded generation"),
            Err(err) => {
                warn!(caller.id = %caller_id, error = %err, "Failed to record generation");
            }
        }
    }
}

// Keep caller-supplied articles in request order, one per requested language.
fn select_requested(request: &ComparisonRequest, articles: Vec<ArticleContent>) -> Vec<ArticleContent> {
    let mut remaining = articles;
    request
        .language_titles
        .iter()
        .filter_map(|entry| {
            let index = remaining.iter().position(|a| a.language == entry.language)?;
            Some(remaining.swap_remove(index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikitruth_core::{ComparisonConfig, LanguageTitle};

    fn request(languages: &[&str]) -> ComparisonRequest {
        ComparisonRequest::new(
            "Napoleon",
            languages.iter().map(|l| LanguageTitle::new(*l, "Napoleon")).collect(),
            ComparisonConfig::new("en"),
        )
    }

    #[test]
    fn test_select_requested_follows_request_order() {
        let articles = vec![
            ArticleContent::new("fr", "Napoléon", "fr text"),
            ArticleContent::new("xx", "Other", "ignored"),
            ArticleContent::new("en", "Napoleon", "en text"),
        ];
        let selected = select_requested(&request(&["en", "fr", "de"]), articles);
        let languages: Vec<_> = selected.iter().map(|a| a.language.as_str()).collect();
        assert_eq!(languages, vec!["en", "fr"]);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(ComparisonStage::FetchingArticles.to_string(), "fetching_articles");
        assert_eq!(ComparisonStage::Failed.as_str(), "failed");
    }
}
