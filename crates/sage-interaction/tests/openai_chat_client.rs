use std::time::Duration;

use sage_core::chat::{ChatBackend, ChatError, ChatMessage, ChatRequest};
use sage_core::consultation::{ConsultationResult, ErrorKind};
use sage_core::persona::{PersonaCatalog, PersonaKey};
use sage_interaction::{ConsultationService, OpenAIChatClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAIChatClient {
    OpenAIChatClient::new(&format!("{}/v1", server.uri()), Duration::from_secs(5)).unwrap()
}

fn sample_request() -> ChatRequest {
    ChatRequest {
        model: "gpt-4o-mini".into(),
        messages: vec![ChatMessage::system("Be brief."), ChatMessage::user("Hi")],
        temperature: 0.6,
        max_tokens: 1500,
    }
}

fn completion(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }
        ]
    })
}

#[tokio::test]
async fn sends_bearer_token_and_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "Be brief." },
                { "role": "user", "content": "Hi" }
            ],
            "temperature": 0.6,
            "max_tokens": 1500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hello!")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .complete("sk-test", sample_request())
        .await
        .unwrap();

    assert_eq!(text, "Hello!");
}

#[tokio::test]
async fn unauthorized_maps_to_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("sk-bad", sample_request())
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::Authentication("Incorrect API key provided".into()));
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("sk-test", sample_request())
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::RateLimited("Rate limit reached".into()));
}

#[tokio::test]
async fn server_error_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("sk-test", sample_request())
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::Other("internal failure".into()));
}

#[tokio::test]
async fn unparseable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("sk-test", sample_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::MalformedResponse(_)));
}

#[tokio::test]
async fn empty_choices_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("sk-test", sample_request())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ChatError::MalformedResponse("OpenAI API returned no content in the response".into())
    );
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        OpenAIChatClient::new(&format!("{}/v1", server.uri()), Duration::from_millis(200)).unwrap();
    let err = client
        .complete("sk-test", sample_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Bind then drop a server so the port is very likely closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let client = OpenAIChatClient::new(&format!("{uri}/v1"), Duration::from_secs(5)).unwrap();
    let err = client
        .complete("sk-test", sample_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn service_over_http_returns_answer_and_classifies_failures() {
    let server = MockServer::start().await;
    let instruction = PersonaCatalog::builtin()
        .lookup(PersonaKey::D)
        .unwrap()
        .instruction
        .clone();

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-good"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": "Is this budget sound?" }
            ],
            "temperature": 0.6,
            "max_tokens": 1500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Mostly, yes.")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sk-revoked"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Key revoked" }
        })))
        .mount(&server)
        .await;

    let service = ConsultationService::new(client_for(&server));

    let answer = service
        .consult("D", "Is this budget sound?", Some("sk-good"))
        .await;
    assert_eq!(answer, ConsultationResult::success("Mostly, yes."));

    let rejected = service
        .consult("D", "Is this budget sound?", Some("sk-revoked"))
        .await;
    assert_eq!(
        rejected,
        ConsultationResult::failure(ErrorKind::UpstreamError, "Key revoked")
    );
}
