//! Integration tests for conversation titling
//!
//! Runs the orchestrator against a mocked Ollama server, the in-process
//! title cache, and a real SQLite conversation store.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::create_temp_storage;
use titler::cache::{CacheKeys, MemoryCache};
use titler::config::{OllamaConfig, ProviderConfig, TitleConfig};
use titler::providers::{create_title_client, TitleClient};
use titler::storage::RequestContext;
use titler::title::{
    fetch_generated_title, TitleOrchestrator, TitleOutcome, TitleRequest, TitleSource,
    SAVE_CONTEXT,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ollama_client(server: &MockServer) -> TitleClient {
    let config = ProviderConfig {
        provider_type: "ollama".to_string(),
        ollama: OllamaConfig {
            host: server.uri(),
            model: "llama3.2:latest".to_string(),
        },
        options: Default::default(),
    };
    create_title_client(&config).expect("failed to create ollama client")
}

fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "message": {"role": "assistant", "content": content},
        "done": true,
        "prompt_eval_count": 42,
        "eval_count": 6
    })
}

#[tokio::test]
async fn test_generated_title_reaches_cache_and_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("\"Weekend in Lisbon\"")))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, _tmp) = create_temp_storage();
    let cache = Arc::new(MemoryCache::new(CacheKeys::GenTitle));
    let orchestrator =
        TitleOrchestrator::new(TitleConfig::default(), cache.clone(), Arc::new(storage.clone()));

    let outcome = orchestrator
        .add_title(
            &RequestContext::new("alice"),
            TitleRequest::new(
                "convo-1",
                Some("help me plan a weekend in Lisbon".into()),
                ollama_client(&server),
            ),
        )
        .await;

    assert_eq!(
        outcome,
        TitleOutcome::Persisted {
            title: "Weekend in Lisbon".to_string(),
            source: TitleSource::Generated,
        }
    );

    let stored = storage
        .load_conversation("convo-1")
        .expect("load failed")
        .expect("conversation missing");
    assert_eq!(stored.title, "Weekend in Lisbon");
    assert_eq!(stored.user_id, "alice");
    assert_eq!(stored.context.as_deref(), Some(SAVE_CONTEXT));

    let cached = fetch_generated_title(cache.as_ref(), "alice", "convo-1")
        .await
        .expect("cache read failed");
    assert_eq!(cached.as_deref(), Some("Weekend in Lisbon"));
}

#[tokio::test]
async fn test_slow_provider_times_out_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply("Too Late"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let (storage, _tmp) = create_temp_storage();
    let cache = Arc::new(MemoryCache::new(CacheKeys::GenTitle));
    let config = TitleConfig {
        timeout_ms: 200,
        ..TitleConfig::default()
    };
    let orchestrator = TitleOrchestrator::new(config, cache.clone(), Arc::new(storage.clone()));

    let outcome = tokio::time::timeout(
        Duration::from_secs(3),
        orchestrator.add_title(
            &RequestContext::new("alice"),
            TitleRequest::new(
                "convo-2",
                Some("  what   is a monad  ".into()),
                ollama_client(&server),
            ),
        ),
    )
    .await
    .expect("orchestrator did not honor its deadline");

    assert_eq!(
        outcome,
        TitleOutcome::Persisted {
            title: "what is a monad".to_string(),
            source: TitleSource::Fallback,
        }
    );
    let stored = storage.load_conversation("convo-2").unwrap().unwrap();
    assert_eq!(stored.title, "what is a monad");
}

#[tokio::test]
async fn test_provider_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let (storage, _tmp) = create_temp_storage();
    let cache = Arc::new(MemoryCache::new(CacheKeys::GenTitle));
    let orchestrator =
        TitleOrchestrator::new(TitleConfig::default(), cache, Arc::new(storage.clone()));

    let outcome = orchestrator
        .add_title(
            &RequestContext::new("bob"),
            TitleRequest::new("convo-3", None, ollama_client(&server)),
        )
        .await;

    assert_eq!(
        outcome,
        TitleOutcome::Persisted {
            title: "New Chat".to_string(),
            source: TitleSource::Fallback,
        }
    );
}

#[tokio::test]
async fn test_plain_client_never_calls_provider() {
    let (storage, _tmp) = create_temp_storage();
    let cache = Arc::new(MemoryCache::new(CacheKeys::GenTitle));
    let orchestrator =
        TitleOrchestrator::new(TitleConfig::default(), cache, Arc::new(storage.clone()));

    let text = "b".repeat(45);
    let outcome = orchestrator
        .add_title(
            &RequestContext::new("carol"),
            TitleRequest::new("convo-4", Some(text), TitleClient::plain()),
        )
        .await;

    let expected = format!("{}...", "b".repeat(37));
    assert_eq!(
        outcome,
        TitleOutcome::Persisted {
            title: expected.clone(),
            source: TitleSource::Fallback,
        }
    );
    assert_eq!(storage.load_conversation("convo-4").unwrap().unwrap().title, expected);
}

#[tokio::test]
async fn test_foreign_conversation_is_contained() {
    let (storage, _tmp) = create_temp_storage();
    storage
        .save_title("owner", "convo-5", "Original", SAVE_CONTEXT)
        .expect("seed failed");

    let cache = Arc::new(MemoryCache::new(CacheKeys::GenTitle));
    let orchestrator =
        TitleOrchestrator::new(TitleConfig::default(), cache, Arc::new(storage.clone()));

    let outcome = orchestrator
        .add_title(
            &RequestContext::new("intruder"),
            TitleRequest::new("convo-5", Some("hijack".into()), TitleClient::plain()),
        )
        .await;

    assert_eq!(outcome, TitleOutcome::Failed);
    let stored = storage.load_conversation("convo-5").unwrap().unwrap();
    assert_eq!(stored.title, "Original");
    assert_eq!(stored.user_id, "owner");
}
