// tests/completion_client_test.rs
// Completion client and analyzer against a local stand-in for the provider

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use mediscan::CompletionError;
use mediscan::llm::result::{AI_FAILED_ANALYSIS, LENGTH_LIMIT_ANALYSIS};
use mediscan::llm::{
    Analyzer, ChatCompletion, ChatMessage, ClientConfig, CompletionClient, CompletionRequest, ImageKind, TextKind,
};

const PATH: &str = "/openai/deployments/test/chat/completions";

#[derive(Clone, Debug)]
struct Captured {
    headers: HeaderMap,
    query: Option<String>,
    body: Value,
}

#[derive(Clone)]
enum Reply {
    Json(Value),
    Status(StatusCode, &'static str),
    PlainText(&'static str),
}

#[derive(Clone)]
struct Provider {
    reply: Reply,
    seen: Arc<Mutex<Vec<Captured>>>,
}

async fn chat_completions(
    State(provider): State<Provider>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    provider.seen.lock().unwrap().push(Captured { headers, query, body });
    match provider.reply {
        Reply::Json(value) => Json(value).into_response(),
        Reply::Status(status, text) => (status, text).into_response(),
        Reply::PlainText(text) => (StatusCode::OK, text).into_response(),
    }
}

/// Serve `reply` on an ephemeral port; returns the endpoint URL and the request log
async fn spawn_provider(reply: Reply) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route(PATH, post(chat_completions))
        .with_state(Provider { reply, seen: seen.clone() });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}{}?api-version=2024-08-01-preview", addr, PATH), seen)
}

fn client_for(endpoint: &str) -> CompletionClient {
    CompletionClient::new(ClientConfig::new("test-key", endpoint, Some(Duration::from_secs(5)))).unwrap()
}

fn envelope(content: &str, finish_reason: &str) -> Value {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": finish_reason,
            "content_filter_results": {}
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30},
        "model": "gpt-4o"
    })
}

#[tokio::test]
async fn test_request_carries_headers_and_body() {
    let reply = envelope("{}", "stop");
    let (endpoint, seen) = spawn_provider(Reply::Json(reply.clone())).await;
    let client = client_for(&endpoint);

    let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hello")];
    let raw = client.complete(&messages, 321).await.unwrap();
    assert_eq!(raw, reply, "envelope should come back untouched");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1, "exactly one request per call");
    let captured = &seen[0];

    assert_eq!(captured.headers["api-key"], "test-key");
    assert_eq!(captured.headers["cache-control"], "no-cache");
    assert_eq!(captured.headers["content-type"], "application/json");
    assert_eq!(captured.query.as_deref(), Some("api-version=2024-08-01-preview"));
    assert_eq!(
        captured.body,
        json!({
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hello"}
            ],
            "max_tokens": 321
        })
    );
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let (endpoint, seen) = spawn_provider(Reply::Status(StatusCode::TOO_MANY_REQUESTS, "rate limited")).await;
    let client = client_for(&endpoint);

    let err = client.complete(&[ChatMessage::user("hi")], 10).await.unwrap_err();
    match err {
        CompletionError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert_eq!(seen.lock().unwrap().len(), 1, "no retry on failure");
}

#[tokio::test]
async fn test_non_json_body_is_error() {
    let (endpoint, _) = spawn_provider(Reply::PlainText("<html>gateway</html>")).await;
    let client = client_for(&endpoint);

    let err = client.complete(&[ChatMessage::user("hi")], 10).await.unwrap_err();
    assert!(matches!(err, CompletionError::InvalidBody(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}{}", addr, PATH));
    let err = client.complete(&[ChatMessage::user("hi")], 10).await.unwrap_err();
    assert!(matches!(err, CompletionError::Http(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_image_analysis_end_to_end() {
    let content = "```json\n{\"short_summary\":\"Small mole\",\"analysis\":\"Symmetric, even colour\",\"confidence\":0.82,\"scan_details\":\"4mm\",\"insights\":\"Monitor monthly\"}\n```";
    let (endpoint, seen) = spawn_provider(Reply::Json(envelope(content, "stop"))).await;
    let analyzer = Analyzer::new(client_for(&endpoint));

    let request = CompletionRequest::image(
        ImageKind::Skin,
        "https://cdn.example.com/mole.jpg",
        Some("noticed it last month".to_string()),
        1000,
    )
    .unwrap();
    let result = analyzer.analyze(&request).await.unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["short_summary"], "Small mole");
    assert_eq!(value["analysis"], "Symmetric, even colour");
    assert_eq!(value["confidence"], json!(0.82));
    assert_eq!(value["scan_details"], "4mm");
    assert_eq!(value["insights"], "Monitor monthly");
    assert_eq!(value["finish_reason"], "stop");
    assert_eq!(value["model"], "gpt-4o");
    assert_eq!(value["usage"]["total_tokens"], 30);

    let seen = seen.lock().unwrap();
    let user = &seen[0].body["messages"][1];
    assert_eq!(user["content"][1]["image_url"]["url"], "https://cdn.example.com/mole.jpg");
    assert!(user["content"][0]["text"].as_str().unwrap().contains("Additional user context:\nnoticed it last month"));
    assert_eq!(seen[0].body["max_tokens"], 1000);
}

#[tokio::test]
async fn test_truncated_answer_reports_length_limit() {
    let (endpoint, _) = spawn_provider(Reply::Json(envelope("{\"analysis\": \"Blood pressure of 150/95 is", "length"))).await;
    let analyzer = Analyzer::new(client_for(&endpoint));

    let request = CompletionRequest::text(TextKind::Vitals, "BP 150/95", 50).unwrap();
    let result = analyzer.analyze(&request).await.unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["analysis"], LENGTH_LIMIT_ANALYSIS);
    assert!(value.get("short_summary").is_none());
}

#[tokio::test]
async fn test_provider_failure_falls_back() {
    let (endpoint, _) = spawn_provider(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR, "boom")).await;
    let analyzer = Analyzer::new(client_for(&endpoint));

    let request = CompletionRequest::text(TextKind::Symptom, "chest tightness", 800).unwrap();
    let result = analyzer.analyze_or_fallback(&request).await;

    let analysis = result.as_analysis().unwrap();
    assert_eq!(analysis.analysis, AI_FAILED_ANALYSIS);
    assert_eq!(analysis.insights, "");
    assert_eq!(analysis.confidence, None);
}
