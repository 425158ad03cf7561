//! Controller driving the model-backed AI service end to end.
//!
//! Uses the mock generation backend so the prompts, the response parser and
//! the controller run together without a network.

use std::sync::Arc;

use scribe_composer::{ComposerController, MemoryStore, NoteStore, StaticDocument};
use scribe_core::defaults::BRAINSTORM_ERROR_BULLETS;
use scribe_inference::mock::MockGenerationBackend;
use scribe_inference::{ModelAiService, PromptStyle};

const VOLTAIRE_ANSWER: &str = r#"Here are some ideas for your note:

**Expansion Ideas:**
- Trace the Calas affair and the Treatise on Tolerance (1763)
- Compare the Philosophical Letters with his later pamphlets

**Alternative Perspectives:**
1. Some historians read his tolerance as selective, given his remarks on Judaism
"#;

const RESULTS_JSON: &str = r#"{"results": [
  {"title": "Treatise on Tolerance", "url": "https://example.org/treatise", "description": "Voltaire's 1763 essay"},
  {"title": "The Calas Affair", "url": "https://example.org/calas", "description": "Background on the case"}
]}"#;

fn composer(backend: MockGenerationBackend, style: PromptStyle) -> ComposerController {
    let ai = ModelAiService::new(backend).with_prompt_style(style);
    let store = Arc::new(NoteStore::new(Arc::new(MemoryStore::new())));
    ComposerController::new(store, Arc::new(ai), Arc::new(StaticDocument::default()))
}

#[tokio::test]
async fn test_free_text_answer_becomes_labeled_bullets() {
    let backend = MockGenerationBackend::new().with_fixed_response(VOLTAIRE_ANSWER);
    let composer = composer(backend, PromptStyle::FreeText);
    let note = composer
        .add_note("Voltaire and religious tolerance")
        .await
        .unwrap();

    let bullets = composer.analyze(&note.id).await.unwrap();

    assert_eq!(
        bullets,
        vec![
            "Expand: Trace the Calas affair and the Treatise on Tolerance (1763)",
            "Expand: Compare the Philosophical Letters with his later pamphlets",
            "Alternative: Some historians read his tolerance as selective, given his remarks on Judaism",
        ]
    );
}

#[tokio::test]
async fn test_structured_answer_becomes_labeled_bullets() {
    let backend = MockGenerationBackend::new().with_json_response(
        r#"{"results": [
            {"label": "Alternative Perspectives", "description": "Rousseau disputed his optimism"},
            {"label": "Relevance", "description": "Anchors the chapter on tolerance"},
            {"label": "Mystery", "description": "dropped"}
        ]}"#,
    );
    let composer = composer(backend, PromptStyle::Structured);
    let note = composer.add_note("Voltaire").await.unwrap();

    let bullets = composer.analyze(&note.id).await.unwrap();
    assert_eq!(
        bullets,
        vec![
            "Alternative: Rousseau disputed his optimism",
            "Relevance: Anchors the chapter on tolerance",
        ]
    );
}

#[tokio::test]
async fn test_search_runs_query_then_results() {
    let backend = MockGenerationBackend::new()
        .with_response_mapping("concise search query", "\"Voltaire tolerance Calas\"")
        .with_json_response(RESULTS_JSON);
    let composer = composer(backend, PromptStyle::FreeText);
    let note = composer.add_note("Voltaire and the Calas case").await.unwrap();

    let results = composer.search(&note.id).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Treatise on Tolerance");
    assert_eq!(results[1].url, "https://example.org/calas");

    let stored = composer.note(&note.id).unwrap();
    assert_eq!(stored.web_results, Some(results));
    assert!(!stored.is_searching);
}

#[tokio::test]
async fn test_backend_failure_falls_back_to_canned_bullets() {
    let backend = MockGenerationBackend::new().with_failure();
    let composer = composer(backend, PromptStyle::FreeText);
    let note = composer.add_note("Voltaire").await.unwrap();

    let bullets = composer.analyze(&note.id).await.unwrap();
    assert_eq!(bullets, BRAINSTORM_ERROR_BULLETS.to_vec());
    assert!(!composer.note(&note.id).unwrap().is_analyzing);
}

#[tokio::test]
async fn test_blank_model_answer_is_a_failure() {
    let backend = MockGenerationBackend::new().with_fixed_response("   ");
    let composer = composer(backend, PromptStyle::FreeText);
    let note = composer.add_note("Voltaire").await.unwrap();

    let bullets = composer.analyze(&note.id).await.unwrap();
    assert_eq!(bullets, BRAINSTORM_ERROR_BULLETS.to_vec());
}
