use chrono::Utc;
use std::sync::Arc;
use wikitruth_compare::{ChatHistory, ChatResponder, PipelineConfig};
use wikitruth_core::{
    CandidateList, ChatMessage, ChatRole, ComparisonResult, ModelCandidate, WikiTruthError,
};
use wikitruth_model::{FallbackExecutor, MockOutcome, MockTransport};

fn prior() -> ComparisonResult {
    ComparisonResult {
        id: "cmp-1".to_string(),
        article_title: "Napoleon".to_string(),
        selected_languages: vec!["en".to_string(), "fr".to_string()],
        output_language: "en".to_string(),
        comparison_result_text: "The French article is longer.".to_string(),
        is_funny_mode: false,
        is_premium: false,
        created_at: Utc::now(),
        articles: vec![],
    }
}

fn responder(transport: Arc<MockTransport>) -> ChatResponder {
    let config = PipelineConfig::default()
        .with_chat_primary(CandidateList::single(ModelCandidate::new("xai", "primary")))
        .with_free_chain(CandidateList::chain("openrouter", ["free-1", "free-2"]).unwrap());
    ChatResponder::from_config(FallbackExecutor::new(transport), &config)
}

#[tokio::test]
async fn test_primary_model_answers_first() {
    let transport = Arc::new(
        MockTransport::new()
            .with_outcome("primary", MockOutcome::reply("  Because of Waterloo.  \n"))
            .with_outcome("free-1", MockOutcome::reply("unused")),
    );

    let reply = responder(transport.clone())
        .chat_reply(&prior(), &ChatHistory::default(), "Why?")
        .await
        .unwrap();

    assert_eq!(reply, "Because of Waterloo.");
    assert_eq!(transport.called_models(), vec!["primary"]);

    let request = &transport.requests()[0];
    assert_eq!(request.params.temperature, 0.7);
    assert_eq!(request.params.max_tokens, 500);
    assert!(request.messages[0].content.contains("The French article is longer."));
    assert_eq!(request.messages.last(), Some(&ChatMessage::user("Why?")));
}

#[tokio::test]
async fn test_primary_failure_falls_back_to_free_chain() {
    let transport = Arc::new(
        MockTransport::new()
            .with_outcome("primary", MockOutcome::status(401, "bad key"))
            .with_outcome("free-1", MockOutcome::Timeout)
            .with_outcome("free-2", MockOutcome::reply("From the free chain")),
    );

    let reply = responder(transport.clone())
        .chat_reply(&prior(), &ChatHistory::default(), "Tell me more")
        .await
        .unwrap();

    assert_eq!(reply, "From the free chain");
    assert_eq!(transport.called_models(), vec!["primary", "free-1", "free-2"]);
}

#[tokio::test]
async fn test_all_tiers_exhausted() {
    let transport = Arc::new(MockTransport::new());

    let err = responder(transport.clone())
        .chat_reply(&prior(), &ChatHistory::default(), "Hello?")
        .await
        .unwrap_err();

    let WikiTruthError::UpstreamGenerationFailed(exhausted) = err else {
        panic!("expected upstream failure");
    };
    assert_eq!(exhausted.attempts(), 3);
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn test_only_last_five_turns_are_sent() {
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("ok")));
    let mut history = ChatHistory::default();
    for index in 0..6 {
        history.push_user(format!("question {index}"));
        history.push_assistant(format!("answer {index}"));
    }

    responder(transport.clone()).chat_reply(&prior(), &history, "next").await.unwrap();

    let messages = &transport.requests()[0].messages;
    assert_eq!(messages.len(), 1 + 5 + 1);
    assert_eq!(messages[1], ChatMessage::assistant("answer 3"));
    assert!(messages[1..].iter().all(|m| m.role != ChatRole::System));
}

#[tokio::test]
async fn test_converse_appends_both_turns() {
    let transport = Arc::new(MockTransport::new().with_default(MockOutcome::reply("answer")));
    let responder = responder(transport);
    let mut history = ChatHistory::default();

    responder.converse(&prior(), &mut history, " first ").await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history.turns()[0].content, "first");
    assert_eq!(history.turns()[1].role, ChatRole::Assistant);
}

#[tokio::test]
async fn test_empty_message_is_rejected_without_calls() {
    let transport = Arc::new(MockTransport::new());
    let responder = responder(transport.clone());
    let mut history = ChatHistory::default();

    let err = responder.converse(&prior(), &mut history, "   ").await.unwrap_err();

    assert!(matches!(err, WikiTruthError::InvalidRequest(_)));
    assert_eq!(transport.call_count(), 0);
    assert!(history.is_empty());
}
