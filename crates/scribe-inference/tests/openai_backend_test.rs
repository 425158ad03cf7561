//! OpenAI backend and model-backed service against a mock HTTP server.

#![cfg(feature = "openai")]

use scribe_core::{AiService, BrainstormRequest, Error, GenerationBackend, GenerationRequest};
use scribe_inference::openai::{OpenAIBackend, OpenAIConfig};
use scribe_inference::{ModelAiService, PromptStyle};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> OpenAIBackend {
    let config = OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        gen_model: "gpt-4o".to_string(),
        timeout_seconds: 10,
    };
    OpenAIBackend::new(config).expect("Failed to create backend")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

fn voltaire_request() -> BrainstormRequest {
    BrainstormRequest {
        document_context: "The Age of Enlightenment".to_string(),
        document_goal: "Research paper on the enlightenment".to_string(),
        note_content: "Voltaire and religious tolerance".to_string(),
    }
}

#[tokio::test]
async fn test_generate_sends_auth_and_sampling_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "temperature": 0.3,
            "max_tokens": 50
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("voltaire tolerance")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let request = GenerationRequest::system("make a query")
        .with_temperature(0.3)
        .with_max_tokens(50);

    let text = backend.generate(&request).await.unwrap();
    assert_eq!(text, "voltaire tolerance");
}

#[tokio::test]
async fn test_json_mode_sets_response_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"results\": []}")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let text = backend
        .generate(&GenerationRequest::system("json please").json())
        .await
        .unwrap();
    assert_eq!(text, "{\"results\": []}");
}

#[tokio::test]
async fn test_auth_failure_maps_to_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .generate(&GenerationRequest::system("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    assert!(err.to_string().contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .generate(&GenerationRequest::system("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
    assert!(err.to_string().contains("Unknown error"));
}

#[tokio::test]
async fn test_json_mode_rejection_is_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"response_format": {"type": "json_object"}})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "'response_format' of type 'json_object' is not supported with this model.",
                "type": "invalid_request_error",
                "code": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = ModelAiService::new(backend_for(&server)).with_prompt_style(PromptStyle::Structured);
    let err = service
        .brainstorm(&BrainstormRequest {
            document_context: "Essay draft".to_string(),
            document_goal: "Research paper on the enlightenment".to_string(),
            note_content: "Voltaire".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    assert!(err.to_string().contains("SCRIBE_PROMPT_STYLE=free_text"));
}

#[tokio::test]
async fn test_brainstorm_flow_end_to_end() {
    let server = MockServer::start().await;

    let answer = "**Integration Suggestions:**\n- Open the section on religion with it\n\n**Expansion Ideas:**\n- The Calas affair\n\n**Relevant Links:**\n- [MIT OCW](https://ocw.mit.edu)\n\n**Alternative Perspectives:**\n- His antisemitism complicates the picture";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"temperature": 0.7, "max_tokens": 800})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(answer)))
        .expect(1)
        .mount(&server)
        .await;

    let service = ModelAiService::new(backend_for(&server));
    let response = service.brainstorm(&voltaire_request()).await.unwrap();

    assert_eq!(
        response.bullet_points,
        vec![
            "Integration: Open the section on religion with it",
            "Expand: The Calas affair",
            "Source: MIT OCW (https://ocw.mit.edu)",
            "Alternative: His antisemitism complicates the picture",
        ]
    );
}

#[tokio::test]
async fn test_structured_brainstorm_flow() {
    let server = MockServer::start().await;

    let answer = json!({
        "results": [
            {"label": "Expansion Ideas", "description": "Letters on the English"},
            {"label": "Relevance", "description": "Shows the Enlightenment's anticlerical turn"}
        ]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"response_format": {"type": "json_object"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&answer)))
        .expect(1)
        .mount(&server)
        .await;

    let service =
        ModelAiService::new(backend_for(&server)).with_prompt_style(PromptStyle::Structured);
    let response = service.brainstorm(&voltaire_request()).await.unwrap();

    assert_eq!(
        response.bullet_points,
        vec![
            "Expand: Letters on the English",
            "Relevance: Shows the Enlightenment's anticlerical turn",
        ]
    );
}

#[tokio::test]
async fn test_null_content_is_empty_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": null}, "finish_reason": "stop"}]
        })))
        .mount(&server)
        .await;

    let service = ModelAiService::new(backend_for(&server));
    let err = service.brainstorm(&voltaire_request()).await.unwrap_err();
    assert!(err.to_string().contains("Empty response from AI service"));
}

#[tokio::test]
async fn test_web_search_flow_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"max_tokens": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Voltaire Treatise on Tolerance 1763")))
        .expect(1)
        .mount(&server)
        .await;

    let results = json!({
        "results": [
            {"title": "Treatise on Tolerance", "url": "https://www.gutenberg.org/ebooks/35060", "description": "Full text."},
            {"title": "Voltaire", "url": "https://plato.stanford.edu/entries/voltaire/", "description": "Encyclopedia entry."}
        ]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"max_tokens": 600})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&results)))
        .expect(1)
        .mount(&server)
        .await;

    let service = ModelAiService::new(backend_for(&server));
    let response = service.web_search(&voltaire_request()).await.unwrap();

    assert_eq!(response.web_results.len(), 2);
    assert_eq!(response.web_results[0].title, "Treatise on Tolerance");
    assert_eq!(
        response.web_results[1].url,
        "https://plato.stanford.edu/entries/voltaire/"
    );
}
