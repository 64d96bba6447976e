use harmony::message::Role;
use harmony::routes::create_router;
use harmony::services::completion::CompletionClient;
use harmony::services::relay::RELAY_SYSTEM_PROMPT;
use harmony::services::relay_client::RelayClient;
use harmony::session::{CLIENT_SYSTEM_PROMPT, Phase, Session, SessionError};
use harmony::state::AppState;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn conversation_ready() -> Session {
    let mut session = Session::new();
    session.set_names("Alice", "Bob");
    session.start_with_rng(&mut StdRng::seed_from_u64(42)).unwrap();
    session.select_topic(0).unwrap();
    session
}

#[tokio::test]
async fn test_submit_sends_full_history_and_appends_reply() {
    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "role": "assistant",
            "content": "What does a good evening look like for you?"
        })))
        .expect(2)
        .mount(&relay)
        .await;

    let client = RelayClient::new(relay.uri());
    let mut session = conversation_ready();

    let reply = session.submit(&client, "We never have time together").await.unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "What does a good evening look like for you?");

    session.submit(&client, "Quiet dinners").await.unwrap();
    assert_eq!(session.messages().len(), 5);
    assert!(!session.is_loading());

    let requests = relay.received_requests().await.unwrap();
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let sent = second["messages"].as_array().unwrap();

    assert_eq!(sent.len(), 5);
    assert_eq!(sent[0], json!({ "role": "system", "content": CLIENT_SYSTEM_PROMPT }));
    assert_eq!(sent[1]["role"], "system");
    assert_eq!(sent[2], json!({ "role": "user", "content": "We never have time together" }));
    assert_eq!(sent[3]["role"], "assistant");
    assert_eq!(sent[4], json!({ "role": "user", "content": "Quiet dinners" }));
    // Display timestamps stay local.
    assert!(sent.iter().all(|m| m.get("timestamp").is_none()));
}

#[tokio::test]
async fn test_relay_failure_keeps_user_message() {
    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&relay)
        .await;

    let client = RelayClient::new(relay.uri());
    let mut session = conversation_ready();

    let err = session.submit(&client, "hello?").await.unwrap_err();
    assert!(matches!(err, SessionError::Relay(_)));
    assert!(!session.is_loading());
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[1].content, "hello?");
    assert_eq!(session.phase(), Phase::Conversation);
}

#[tokio::test]
async fn test_download_writes_dated_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    assert!(matches!(
        session.download(dir.path()).await,
        Err(SessionError::EmptySession)
    ));

    session.set_names("Alice", "Bob");
    session.start().unwrap();
    session.select_topic(3).unwrap();
    session.begin_submit("one").unwrap();
    session.finish_submit(Ok("two".into())).unwrap();

    let path = session.download(dir.path()).await.unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("counseling-session-"));
    assert!(name.ends_with(".txt"));
    assert_eq!(name.len(), "counseling-session-YYYY-MM-DD.txt".len());

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), session.messages().len());
    for (line, message) in lines.iter().zip(session.messages()) {
        let expected = format!(
            "{} - {}: {}",
            message.timestamp.as_deref().unwrap(),
            message.role,
            message.content
        );
        assert_eq!(*line, expected);
    }
}

#[tokio::test]
async fn test_session_through_live_relay() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "I hear you." } }]
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let state = Arc::new(AppState::new(CompletionClient::with_base_url(provider.uri(), "t")));
    let app = create_router().with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = RelayClient::new(format!("http://{addr}"));
    let mut session = conversation_ready();
    let reply = session.submit(&client, "It's been a hard week").await.unwrap();
    assert_eq!(reply.content, "I hear you.");

    let requests = provider.received_requests().await.unwrap();
    let upstream: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let sent = upstream["messages"].as_array().unwrap();
    assert_eq!(sent[0]["content"], RELAY_SYSTEM_PROMPT);
    assert_eq!(sent[1]["content"], CLIENT_SYSTEM_PROMPT);
    assert_eq!(sent.len(), 4);
}
