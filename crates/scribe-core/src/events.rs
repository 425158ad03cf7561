//! Composer event types, envelope schema, and event bus.
//!
//! The controller publishes every note mutation and AI-call transition to a
//! single broadcast channel. Observers (a UI binding, the CLI, telemetry)
//! subscribe independently; the note snapshots themselves are observed
//! through the store's watch channel, these events say *what* changed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::NoteId;

// ============================================================================
// Event Envelope
// ============================================================================

/// Versioned envelope around a [`ComposerEvent`].
///
/// `event_type` uses dot-namespaced names (e.g. `"note.added"`,
/// `"analysis.completed"`).
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique event identifier (UUIDv7 for temporal ordering).
    pub event_id: Uuid,
    /// Namespaced event type.
    pub event_type: String,
    /// When the event occurred (UTC).
    pub occurred_at: DateTime<Utc>,
    /// Note this event relates to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<NoteId>,
    /// Payload schema version.
    pub payload_version: u32,
    /// Domain-specific event data.
    pub payload: ComposerEvent,
}

impl EventEnvelope {
    pub fn new(event: ComposerEvent) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event.namespaced_event_type().to_string(),
            occurred_at: Utc::now(),
            note_id: event.note_id().cloned(),
            payload_version: 1,
            payload: event,
        }
    }
}

// ============================================================================
// Composer Event (domain payloads)
// ============================================================================

/// Events emitted by the composer controller.
///
/// Serialized as JSON with a `type` tag field, e.g.
/// `{"type":"AnalysisCompleted","note_id":"note-…","success":true,"bullet_count":2}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ComposerEvent {
    /// A note was appended to the collection.
    NoteAdded { note_id: NoteId },
    /// Content, draft, editing state or a result field changed.
    NoteUpdated { note_id: NoteId },
    /// A note was removed.
    NoteDeleted { note_id: NoteId },
    /// A brainstorm call was issued for a note.
    AnalysisStarted { note_id: NoteId },
    /// A brainstorm call settled (or was short-circuited).
    AnalysisCompleted {
        note_id: NoteId,
        success: bool,
        bullet_count: usize,
    },
    /// A web search call was issued for a note.
    SearchStarted { note_id: NoteId },
    /// A web search call settled (or was short-circuited).
    SearchCompleted {
        note_id: NoteId,
        success: bool,
        result_count: usize,
    },
    /// The document goal was changed.
    GoalUpdated { goal: String },
}

impl ComposerEvent {
    /// Dot-namespaced event type used in the envelope.
    pub fn namespaced_event_type(&self) -> &'static str {
        match self {
            ComposerEvent::NoteAdded { .. } => "note.added",
            ComposerEvent::NoteUpdated { .. } => "note.updated",
            ComposerEvent::NoteDeleted { .. } => "note.deleted",
            ComposerEvent::AnalysisStarted { .. } => "analysis.started",
            ComposerEvent::AnalysisCompleted { .. } => "analysis.completed",
            ComposerEvent::SearchStarted { .. } => "search.started",
            ComposerEvent::SearchCompleted { .. } => "search.completed",
            ComposerEvent::GoalUpdated { .. } => "document.goal_updated",
        }
    }

    /// Note the event concerns, if any.
    pub fn note_id(&self) -> Option<&NoteId> {
        match self {
            ComposerEvent::NoteAdded { note_id }
            | ComposerEvent::NoteUpdated { note_id }
            | ComposerEvent::NoteDeleted { note_id }
            | ComposerEvent::AnalysisStarted { note_id }
            | ComposerEvent::AnalysisCompleted { note_id, .. }
            | ComposerEvent::SearchStarted { note_id }
            | ComposerEvent::SearchCompleted { note_id, .. } => Some(note_id),
            ComposerEvent::GoalUpdated { .. } => None,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast bus for composer events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers.
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub fn emit(&self, event: ComposerEvent) {
        let envelope = EventEnvelope::new(event);
        let subscriber_count = self.tx.receiver_count();
        tracing::debug!(
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscriber_count,
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to receive enveloped events. Each subscriber gets its own independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}

// ============================================================================
// Tests
// ============================================================================
