use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chat::{ChatCompletionsProvider, ProviderError};
use http_body_util::BodyExt;
use request::{ChatCompletionsRequest, Message};
use response::{ChatCompletionsResponse, ExtractError};
use serde_json::{Value, json};
use server::{AppState, config::Settings, error::INVALID_REQUEST_FORMAT, get_app};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

enum Outcome {
    Reply(ChatCompletionsResponse),
    Fail(fn() -> ProviderError),
}

/// Records every request it receives and answers with a canned outcome.
struct FakeProvider {
    calls: Mutex<Vec<ChatCompletionsRequest>>,
    outcome: Outcome,
}

impl FakeProvider {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome,
        })
    }

    fn calls(&self) -> Vec<ChatCompletionsRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionsProvider for FakeProvider {
    async fn chat_completions(
        &self,
        request: ChatCompletionsRequest,
    ) -> Result<ChatCompletionsResponse, ProviderError> {
        self.calls.lock().unwrap().push(request);
        match &self.outcome {
            Outcome::Reply(response) => Ok(response.clone()),
            Outcome::Fail(make_error) => Err(make_error()),
        }
    }
}

fn settings() -> Settings {
    Settings::from_vars([
        ("GROQ_API_KEY", "gsk_test"),
        ("GROQ_MODEL_ID", "llama3-70b-8192"),
        ("MAX_TOKENS", "512"),
        ("TEMPERATURE", "0.7"),
        ("TOP_P", "0.9"),
    ])
    .unwrap()
}

fn build_app(provider: Arc<FakeProvider>) -> axum::Router {
    get_app(Arc::new(AppState {
        settings: settings(),
        provider,
    }))
}

fn hello_reply() -> Outcome {
    Outcome::Reply(
        ChatCompletionsResponse::builder()
            .content("Hello!")
            .completion_time(0.42)
            .build(),
    )
}

async fn post_chat(app: axum::Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn relays_conversation_and_returns_message_with_completion_time() {
    let provider = FakeProvider::new(hello_reply());
    let app = build_app(provider.clone());

    let body = json!({
        "messages": [
            {"role": "system", "content": "You are friendly."},
            {"role": "user", "content": "Hi"}
        ]
    });
    let (status, json) = post_chat(app, serde_json::to_vec(&body).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"message": "Hello!", "completion_time": 0.42}));

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(
        call.messages,
        vec![Message::system("You are friendly."), Message::user("Hi")]
    );
    assert_eq!(call.model, "llama3-70b-8192");
    assert_eq!(call.max_tokens, 512);
    assert_eq!(call.temperature, 0.7);
    assert_eq!(call.top_p, 0.9);
    assert_eq!(call.stop, None);
    assert!(!call.stream);
}

#[tokio::test]
async fn completion_time_is_omitted_when_upstream_has_no_usage() {
    let provider = FakeProvider::new(Outcome::Reply(
        ChatCompletionsResponse::builder().content("Hey").build(),
    ));
    let app = build_app(provider);

    let (status, json) = post_chat(
        app,
        r#"{"messages": [{"role": "user", "content": "Hi"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"message": "Hey"}));
}

#[tokio::test]
async fn empty_object_is_rejected_without_upstream_call() {
    let provider = FakeProvider::new(hello_reply());
    let app = build_app(provider.clone());

    let (status, json) = post_chat(app, "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": "Invalid request format"}));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_rejected_without_upstream_call() {
    for body in [
        "",
        "not json",
        "{\"messages\": ",
        "null",
        "[]",
        r#"{"prompt": "Hi"}"#,
        r#"{"messages": []}"#,
        r#"{"messages": [{"role": "user", "content": 42}]}"#,
        r#"{"messages": [{"role": "wizard", "content": "Hi"}]}"#,
    ] {
        let provider = FakeProvider::new(hello_reply());
        let app = build_app(provider.clone());

        let (status, json) = post_chat(app, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(json["error"], INVALID_REQUEST_FORMAT, "body: {body:?}");
        assert!(provider.calls().is_empty(), "body: {body:?}");
    }
}

#[tokio::test]
async fn oversize_body_is_rejected_as_json_without_upstream_call() {
    let provider = FakeProvider::new(hello_reply());
    let app = build_app(provider.clone());

    let content = "a".repeat(3 * 1024 * 1024);
    let body = json!({"messages": [{"role": "user", "content": content}]});
    let (status, json) = post_chat(app, serde_json::to_vec(&body).unwrap()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": "Invalid request format"}));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn upstream_failure_returns_500_with_exact_message() {
    let provider = FakeProvider::new(Outcome::Fail(|| ProviderError::Status {
        status: StatusCode::TOO_MANY_REQUESTS,
        message: "Rate limit reached for model `llama3-70b-8192`".to_string(),
    }));
    let app = build_app(provider.clone());

    let (status, json) = post_chat(
        app,
        r#"{"messages": [{"role": "user", "content": "Hi"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({"error": "Error code: 429 - Rate limit reached for model `llama3-70b-8192`"})
    );
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn reply_without_choices_returns_500() {
    let provider = FakeProvider::new(Outcome::Reply(ChatCompletionsResponse::default()));
    let app = build_app(provider.clone());

    let (status, json) = post_chat(
        app,
        r#"{"messages": [{"role": "user", "content": "Hi"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], ExtractError::NoChoices.to_string());
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn index_serves_chat_page() {
    let app = build_app(FakeProvider::new(hello_reply()));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"), "got: {content_type}");

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(html.contains("/api/chat"));
    assert!(html.contains("localStorage"));
    assert!(html.contains("clear-history"));
}

#[tokio::test]
async fn get_on_chat_endpoint_is_not_allowed() {
    let provider = FakeProvider::new(hello_reply());
    let app = build_app(provider.clone());

    let request = Request::builder()
        .uri("/api/chat")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(provider.calls().is_empty());
}
