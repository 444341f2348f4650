use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wikitruth_compare::{ComparisonOrchestrator, FetchPacing, PipelineConfig, TRUNCATION_MARKER};
use wikitruth_core::{
    AnalysisMode, ArticleContent, ArticleFetcher, CandidateList, ChatRole, ComparisonConfig,
    ComparisonRequest, ComparisonStore, FailureKind, LanguageTitle, ModelCandidate, ModelTier,
    Result, UsageQuota, WikiTruthError,
};
use wikitruth_model::{FallbackExecutor, MockOutcome, MockTransport};
use wikitruth_store::{InMemoryComparisonStore, InMemoryUsageQuota};

/// Fetcher returning canned text per language and failing for the rest.
#[derive(Default)]
struct ScriptedFetcher {
    articles: HashMap<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedFetcher {
    fn with_article(mut self, language: &str, text: impl Into<String>) -> Self {
        self.articles.insert(language.to_string(), text.into());
        self
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleFetcher for ScriptedFetcher {
    async fn fetch(&self, title: &str, language: &str) -> Result<ArticleContent> {
        self.calls.lock().unwrap().push((language.to_string(), title.to_string()));
        match self.articles.get(language) {
            Some(text) => Ok(ArticleContent::new(language, title, text.clone())),
            None => Err(WikiTruthError::Fetch(format!("no {language} article"))),
        }
    }
}

fn request(languages: &[&str]) -> ComparisonRequest {
    ComparisonRequest::new(
        "Napoleon",
        languages.iter().map(|l| LanguageTitle::new(*l, format!("Napoleon ({l})"))).collect(),
        ComparisonConfig::new("en"),
    )
}

fn test_config() -> PipelineConfig {
    PipelineConfig::default()
        .with_fetch_pacing(FetchPacing::unlimited())
        .with_free_chain(CandidateList::chain("openrouter", ["free-1", "free-2"]).unwrap())
        .with_premium_chain(CandidateList::single(ModelCandidate::new("xai", "premium")))
}

fn orchestrator(
    fetcher: Arc<ScriptedFetcher>,
    transport: Arc<MockTransport>,
) -> ComparisonOrchestrator {
    ComparisonOrchestrator::new(fetcher, FallbackExecutor::new(transport))
        .with_config(test_config())
        .unwrap()
}

#[tokio::test]
async fn test_language_bounds_checked_before_any_fetch() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let transport = Arc::new(MockTransport::new());
    let orchestrator = orchestrator(fetcher.clone(), transport.clone());

    for languages in [&["en"][..], &["en", "fr", "de", "es", "it", "ja"][..]] {
        let err = orchestrator.compare_articles(&request(languages)).await.unwrap_err();
        assert!(matches!(
            err,
            WikiTruthError::InvalidLanguageCount { min: 2, max: 5, .. }
        ));
    }

    assert!(fetcher.calls().is_empty());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_config_widening_language_bounds_is_rejected() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let executor = FallbackExecutor::new(Arc::new(MockTransport::new()));
    let mut config = test_config();
    config.max_languages = 8;

    let err = ComparisonOrchestrator::new(fetcher, executor).with_config(config).err();

    assert!(matches!(err, Some(WikiTruthError::Config(_))));
}

#[tokio::test]
async fn test_duplicate_languages_are_rejected() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let orchestrator = orchestrator(fetcher.clone(), Arc::new(MockTransport::new()));

    let err = orchestrator.compare_articles(&request(&["en", "en"])).await.unwrap_err();

    assert!(matches!(err, WikiTruthError::InvalidRequest(_)));
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_single_surviving_language_is_insufficient() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_article("en", "English article"));
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("unused")));
    let orchestrator = orchestrator(fetcher.clone(), transport.clone());

    let err = orchestrator.compare_articles(&request(&["en", "fr"])).await.unwrap_err();

    assert!(matches!(err, WikiTruthError::InsufficientLanguages { fetched: 1, required: 2 }));
    assert_eq!(fetcher.calls().len(), 2);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_partial_fetch_failure_still_compares() {
    let fetcher = Arc::new(
        ScriptedFetcher::default()
            .with_article("en", "English article")
            .with_article("de", "Deutscher Artikel"),
    );
    let transport = Arc::new(MockTransport::new().with_outcome("free-1", MockOutcome::reply("analysis")));
    let store = Arc::new(InMemoryComparisonStore::new());
    let orchestrator = orchestrator(fetcher.clone(), transport.clone()).with_store(store.clone());

    let result = orchestrator.compare_articles(&request(&["en", "fr", "de"])).await.unwrap();

    let fetched: Vec<_> = fetcher.calls().into_iter().map(|(language, _)| language).collect();
    assert_eq!(fetched, vec!["en", "fr", "de"]);
    assert_eq!(result.selected_languages, vec!["en", "de"]);
    assert_eq!(result.articles.len(), 2);
    assert_eq!(result.articles[1].title, "Napoleon (de)");
    assert_eq!(result.comparison_result_text, "analysis");

    let stored = store.get(&result.id).await.unwrap().unwrap();
    assert_eq!(stored, result);
}

#[tokio::test]
async fn test_prompt_carries_budgeted_articles_in_request_order() {
    let long = "x".repeat(40_000);
    let fetcher = Arc::new(
        ScriptedFetcher::default().with_article("fr", long.clone()).with_article("en", long),
    );
    let transport = Arc::new(MockTransport::new().with_outcome("free-1", MockOutcome::reply("ok")));
    let orchestrator = orchestrator(fetcher, transport.clone());

    orchestrator.compare_articles(&request(&["fr", "en"])).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let messages = &requests[0].messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::System);

    let user = &messages[1].content;
    assert_eq!(user.matches(TRUNCATION_MARKER.trim()).count(), 2);
    let fr = user.find("=== WIKIPEDIA ARTICLE (FR) ===").unwrap();
    let en = user.find("=== WIKIPEDIA ARTICLE (EN) ===").unwrap();
    assert!(fr < en);
    assert_eq!(requests[0].params.temperature, 0.3);
    assert_eq!(requests[0].params.max_tokens, 2000);
}

#[tokio::test]
async fn test_free_chain_falls_back_in_order() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_article("en", "a").with_article("fr", "b"));
    let transport = Arc::new(
        MockTransport::new()
            .with_outcome("free-1", MockOutcome::status(429, "rate limit exceeded"))
            .with_outcome("free-2", MockOutcome::reply("second model")),
    );
    let orchestrator = orchestrator(fetcher, transport.clone());

    let result = orchestrator.compare_articles(&request(&["en", "fr"])).await.unwrap();

    assert_eq!(result.comparison_result_text, "second model");
    assert_eq!(transport.called_models(), vec!["free-1", "free-2"]);
}

#[tokio::test]
async fn test_exhaustion_is_wrapped_and_nothing_is_persisted() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_article("en", "a").with_article("fr", "b"));
    let transport = Arc::new(
        MockTransport::new()
            .with_outcome("free-1", MockOutcome::status(429, "rate limit"))
            .with_outcome("free-2", MockOutcome::Empty),
    );
    let store = Arc::new(InMemoryComparisonStore::new());
    let quota = Arc::new(InMemoryUsageQuota::default());
    let orchestrator = orchestrator(fetcher, transport.clone())
        .with_store(store.clone())
        .with_quota(quota.clone());

    let err = orchestrator
        .compare_articles(&request(&["en", "fr"]).with_caller("visitor"))
        .await
        .unwrap_err();

    let WikiTruthError::UpstreamGenerationFailed(exhausted) = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(exhausted.attempts(), 2);
    assert_eq!(err.upstream_failure_kind(), Some(FailureKind::RateLimited));
    assert!(store.is_empty());
    assert_eq!(quota.can_generate("visitor").await.unwrap().used, 0);
}

#[tokio::test]
async fn test_premium_tier_uses_single_premium_model() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_article("en", "a").with_article("fr", "b"));
    let transport = Arc::new(MockTransport::new().with_outcome("premium", MockOutcome::status(500, "down")));
    let orchestrator = orchestrator(fetcher, transport.clone());

    let mut request = request(&["en", "fr"]);
    request.config = request.config.with_ai_model(ModelTier::Premium);
    let err = orchestrator.compare_articles(&request).await.unwrap_err();

    assert!(matches!(err, WikiTruthError::UpstreamGenerationFailed(_)));
    assert_eq!(transport.called_models(), vec!["premium"]);
    assert_eq!(transport.requests()[0].params.max_tokens, 8192);
}

#[tokio::test]
async fn test_quota_exhaustion_blocks_before_fetching() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_article("en", "a").with_article("fr", "b"));
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("ok")));
    let quota = Arc::new(InMemoryUsageQuota::new(1));
    quota.record_generation("visitor").await.unwrap();
    let orchestrator = orchestrator(fetcher.clone(), transport.clone()).with_quota(quota);

    let err = orchestrator
        .compare_articles(&request(&["en", "fr"]).with_caller("visitor"))
        .await
        .unwrap_err();

    assert!(matches!(err, WikiTruthError::GenerationLimitExceeded { used: 1, limit: 1 }));
    assert!(err.is_upgrade_required());
    assert!(fetcher.calls().is_empty());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_successful_generation_is_recorded() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_article("en", "a").with_article("fr", "b"));
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("ok")));
    let quota = Arc::new(InMemoryUsageQuota::new(1));
    let orchestrator = orchestrator(fetcher, transport).with_quota(quota.clone());

    let mut request = request(&["en", "fr"]).with_caller("visitor");
    request.config = ComparisonConfig::from_funny_flag("en", true);
    let result = orchestrator.compare_articles(&request).await.unwrap();

    assert!(result.is_funny_mode);
    assert!(!result.is_premium);
    let status = quota.can_generate("visitor").await.unwrap();
    assert_eq!(status.used, 1);
    assert!(!status.allowed);
}

#[tokio::test]
async fn test_prefetched_articles_skip_the_fetcher() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("ok")));
    let orchestrator = orchestrator(fetcher.clone(), transport);

    let articles = vec![
        ArticleContent::new("fr", "Napoléon", "texte"),
        ArticleContent::new("en", "Napoleon", "text"),
    ];
    let result = orchestrator.compare_prefetched(&request(&["en", "fr"]), articles).await.unwrap();

    assert!(fetcher.calls().is_empty());
    assert_eq!(result.selected_languages, vec!["en", "fr"]);
    assert_eq!(result.articles[0].content_length, 4);
}

#[tokio::test]
async fn test_funny_mode_uses_funny_temperature() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_article("en", "a").with_article("fr", "b"));
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("ok")));
    let orchestrator = orchestrator(fetcher, transport.clone());

    let mut request = request(&["en", "fr"]);
    request.config = request.config.with_analysis_mode(AnalysisMode::Funny);
    orchestrator.compare_articles(&request).await.unwrap();

    assert_eq!(transport.requests()[0].params.temperature, 0.8);
}

#[tokio::test(start_paused = true)]
async fn test_fetches_are_paced() {
    let fetcher = Arc::new(
        ScriptedFetcher::default()
            .with_article("en", "a")
            .with_article("fr", "b")
            .with_article("de", "c"),
    );
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("ok")));
    let orchestrator = ComparisonOrchestrator::new(fetcher, FallbackExecutor::new(transport))
        .with_config(test_config().with_fetch_pacing(FetchPacing::new(1, Duration::from_secs(1))))
        .unwrap();

    let start = tokio::time::Instant::now();
    orchestrator.compare_articles(&request(&["en", "fr", "de"])).await.unwrap();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(3));
}
