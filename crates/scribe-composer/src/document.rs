//! The document the notes support, as seen by the composer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use tracing::{info, warn};

use scribe_core::defaults::{DOCUMENT_CONTEXT, DOCUMENT_GOAL, DOCUMENT_GOAL_KEY};
use scribe_core::{
    ComposerEvent, DocumentContextProvider, Error, EventBus, KeyValueStore, Result,
};

/// Document context backed by in-memory editor text and a persisted goal.
///
/// The goal lives under `"document-goal"` as a JSON string. A missing,
/// unparsable or blank goal reads as the default goal.
pub struct PersistedDocument {
    store: Arc<dyn KeyValueStore>,
    text: RwLock<String>,
    events: Option<EventBus>,
}

impl PersistedDocument {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            text: RwLock::new(String::new()),
            events: None,
        }
    }

    /// Seed the editor text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = RwLock::new(text.into());
        self
    }

    /// Announce goal changes on `events`.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Replace the editor text.
    pub async fn set_text(&self, text: impl Into<String>) {
        *self.text.write().await = text.into();
    }

    /// Persist a new goal. Blank goals are rejected.
    pub async fn set_goal(&self, goal: &str) -> Result<String> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(Error::InvalidInput(
                "Document goal cannot be empty".to_string(),
            ));
        }

        self.store
            .set(DOCUMENT_GOAL_KEY, JsonValue::String(goal.to_string()))
            .await?;
        info!(subsystem = "composer", component = "document", goal, "Document goal updated");

        if let Some(ref events) = self.events {
            events.emit(ComposerEvent::GoalUpdated {
                goal: goal.to_string(),
            });
        }
        Ok(goal.to_string())
    }

    /// The persisted goal, if one has been set and is readable.
    pub async fn stored_goal(&self) -> Option<String> {
        let value = match self.store.get(DOCUMENT_GOAL_KEY).await {
            Ok(value) => value?,
            Err(e) => {
                warn!(store_key = DOCUMENT_GOAL_KEY, error = %e, "Failed to read document goal");
                return None;
            }
        };

        match value {
            JsonValue::String(goal) if !goal.trim().is_empty() => Some(goal),
            other => {
                warn!(
                    store_key = DOCUMENT_GOAL_KEY,
                    value = %other,
                    "Ignoring unparsable document goal"
                );
                None
            }
        }
    }
}

#[async_trait]
impl DocumentContextProvider for PersistedDocument {
    async fn document_context(&self) -> String {
        let text = self.text.read().await;
        if text.trim().is_empty() {
            DOCUMENT_CONTEXT.to_string()
        } else {
            text.clone()
        }
    }

    async fn document_goal(&self) -> String {
        self.stored_goal()
            .await
            .unwrap_or_else(|| DOCUMENT_GOAL.to_string())
    }
}

/// Fixed document context, for tests and scripted runs.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    pub context: String,
    pub goal: String,
}

impl StaticDocument {
    pub fn new(context: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            goal: goal.into(),
        }
    }
}

impl Default for StaticDocument {
    fn default() -> Self {
        Self::new(DOCUMENT_CONTEXT, DOCUMENT_GOAL)
    }
}

#[async_trait]
impl DocumentContextProvider for StaticDocument {
    async fn document_context(&self) -> String {
        self.context.clone()
    }

    async fn document_goal(&self) -> String {
        self.goal.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults_when_nothing_is_set() {
        let doc = PersistedDocument::new(Arc::new(MemoryStore::new()));
        assert_eq!(doc.document_goal().await, "Research paper on the enlightenment");
        assert_eq!(doc.document_context().await, DOCUMENT_CONTEXT);
    }

    #[tokio::test]
    async fn test_set_goal_persists_json_string() {
        let store = Arc::new(MemoryStore::new());
        let doc = PersistedDocument::new(store.clone());

        let goal = doc.set_goal("  Essay on Hume's scepticism ").await.unwrap();
        assert_eq!(goal, "Essay on Hume's scepticism");
        assert_eq!(doc.document_goal().await, "Essay on Hume's scepticism");
        assert_eq!(
            store.get(DOCUMENT_GOAL_KEY).await.unwrap(),
            Some(json!("Essay on Hume's scepticism"))
        );
    }

    #[tokio::test]
    async fn test_blank_goal_is_rejected() {
        let doc = PersistedDocument::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            doc.set_goal("   ").await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_unparsable_goal_falls_back() {
        let store = Arc::new(MemoryStore::new().with_value(DOCUMENT_GOAL_KEY, json!({"goal": 1})));
        let doc = PersistedDocument::new(store);
        assert_eq!(doc.document_goal().await, DOCUMENT_GOAL);
    }

    #[tokio::test]
    async fn test_text_overrides_default_context() {
        let doc = PersistedDocument::new(Arc::new(MemoryStore::new()))
            .with_text("Draft on the salons of Paris");
        assert_eq!(doc.document_context().await, "Draft on the salons of Paris");

        doc.set_text("").await;
        assert_eq!(doc.document_context().await, DOCUMENT_CONTEXT);
    }

    #[tokio::test]
    async fn test_goal_change_is_announced() {
        let events = EventBus::new(8);
        let mut rx = events.subscribe();
        let doc = PersistedDocument::new(Arc::new(MemoryStore::new())).with_event_bus(events);

        doc.set_goal("New goal").await.unwrap();
        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event_type, "document.goal_updated");
    }
}
