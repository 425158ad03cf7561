//! HTTP AI service client against a mock brainstorm/search service.

use scribe_core::{AiService, BrainstormRequest, Error};
use scribe_inference::{HttpAiService, SampleFallbackAiService};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(note: &str) -> BrainstormRequest {
    BrainstormRequest {
        document_context: "The Age of Enlightenment".to_string(),
        document_goal: "Research paper on the enlightenment".to_string(),
        note_content: note.to_string(),
    }
}

#[tokio::test]
async fn test_brainstorm_posts_camel_case_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/brainstorm"))
        .and(body_json(json!({
            "documentContext": "The Age of Enlightenment",
            "documentGoal": "Research paper on the enlightenment",
            "noteContent": "Newton"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bulletPoints": ["Expand: Principia Mathematica"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpAiService::new(server.uri(), 10).unwrap();
    let response = service.brainstorm(&request("Newton")).await.unwrap();
    assert_eq!(response.bullet_points, vec!["Expand: Principia Mathematica"]);
}

#[tokio::test]
async fn test_search_returns_web_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webResults": [
                {"title": "Royal Society", "url": "https://royalsociety.org", "description": "History."}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpAiService::new(server.uri(), 10).unwrap();
    let response = service.web_search(&request("Newton")).await.unwrap();
    assert_eq!(response.web_results.len(), 1);
    assert_eq!(response.web_results[0].url, "https://royalsociety.org");
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/brainstorm"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Note content is required"})),
        )
        .mount(&server)
        .await;

    let service = HttpAiService::new(server.uri(), 10).unwrap();
    let err = service.brainstorm(&request("")).await.unwrap_err();
    assert!(matches!(err, Error::Request(_)));
    assert!(err.to_string().contains("400"));
    assert!(err.to_string().contains("Note content is required"));
}

#[tokio::test]
async fn test_error_field_in_success_body_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Failed to generate search results"})),
        )
        .mount(&server)
        .await;

    let service = HttpAiService::new(server.uri(), 10).unwrap();
    let err = service.web_search(&request("Newton")).await.unwrap_err();
    assert!(matches!(err, Error::Inference(ref m) if m == "Failed to generate search results"));
}

#[tokio::test]
async fn test_sample_fallback_covers_service_outage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let inner = Arc::new(HttpAiService::new(server.uri(), 10).unwrap());
    let service = SampleFallbackAiService::new(inner);

    let ideas = service
        .brainstorm(&request("The French Revolution"))
        .await
        .unwrap();
    assert_eq!(
        ideas.bullet_points[0],
        "Analyze Montesquieu's theory of separation of powers"
    );

    let results = service.web_search(&request("anything")).await.unwrap();
    assert_eq!(results.web_results.len(), 3);
    assert!(results.web_results[0].url.contains("plato.stanford.edu"));
}
