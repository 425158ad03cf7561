//! Data model for the notes composer and the AI boundary contracts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// NOTE IDENTITY
// =============================================================================

/// Opaque, never-reused note identifier.
///
/// Generated ids look like `note-0190c2d4a8e77c1e9a0f3b2d1c4e5f60`; ids loaded
/// from storage are kept verbatim whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generate a fresh id backed by a time-ordered UUIDv7.
    pub fn generate() -> Self {
        Self(format!("note-{}", Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for NoteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// Observable lifecycle state of a note.
///
/// `Analyzing` and `Searching` are independent of each other and of
/// `Editing`; a note may report several states at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Idle,
    Editing,
    Analyzing,
    Searching,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Idle => "idle",
            NoteStatus::Editing => "editing",
            NoteStatus::Analyzing => "analyzing",
            NoteStatus::Searching => "searching",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A research note held by the composer.
///
/// The serialized shape matches the `composer-notes` storage format, so the
/// pending flags keep their historical names (`isLoadingAI`,
/// `isSearchingWeb`). The draft is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_editing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brainstorm_bullets: Option<Vec<String>>,
    #[serde(rename = "isLoadingAI", default, skip_serializing_if = "is_false")]
    pub is_analyzing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_results: Option<Vec<WebSearchResult>>,
    #[serde(rename = "isSearchingWeb", default, skip_serializing_if = "is_false")]
    pub is_searching: bool,
    /// Scratch buffer while editing; distinct from `content` until saved.
    #[serde(skip)]
    pub draft: Option<String>,
}

impl Note {
    /// Create an idle note with committed content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: NoteId::generate(),
            content: content.into(),
            is_editing: false,
            brainstorm_bullets: None,
            is_analyzing: false,
            web_results: None,
            is_searching: false,
            draft: None,
        }
    }

    /// Create an empty note that opens directly in editing state.
    pub fn blank() -> Self {
        let mut note = Self::new(String::new());
        note.is_editing = true;
        note.draft = Some(String::new());
        note
    }

    /// Active states, `[Idle]` when no flag is set.
    pub fn statuses(&self) -> Vec<NoteStatus> {
        let mut statuses = Vec::with_capacity(3);
        if self.is_editing {
            statuses.push(NoteStatus::Editing);
        }
        if self.is_analyzing {
            statuses.push(NoteStatus::Analyzing);
        }
        if self.is_searching {
            statuses.push(NoteStatus::Searching);
        }
        if statuses.is_empty() {
            statuses.push(NoteStatus::Idle);
        }
        statuses
    }

    pub fn has_status(&self, status: NoteStatus) -> bool {
        self.statuses().contains(&status)
    }

    /// Text an AI operation should work on: the draft while editing,
    /// otherwise the committed content.
    pub fn working_content(&self) -> &str {
        if self.is_editing {
            self.draft.as_deref().unwrap_or("")
        } else {
            &self.content
        }
    }

    /// Enter editing state with the draft seeded from committed content.
    pub fn start_edit(&mut self) {
        self.draft = Some(self.content.clone());
        self.is_editing = true;
    }

    /// Commit the draft into `content` and leave editing state.
    pub fn commit_draft(&mut self) {
        self.content = self.draft.take().unwrap_or_default();
        self.is_editing = false;
    }

    /// Leave editing state without touching `content`.
    pub fn discard_draft(&mut self) {
        self.draft = None;
        self.is_editing = false;
    }

    /// Normalize a note read back from storage.
    ///
    /// Pending flags cannot outlive the process that set them, and a note
    /// persisted mid-edit gets its draft re-seeded from committed content.
    pub fn restore_after_load(&mut self) {
        self.is_analyzing = false;
        self.is_searching = false;
        if self.is_editing && self.draft.is_none() {
            self.draft = Some(self.content.clone());
        }
    }
}

// =============================================================================
// BULLET LABELS
// =============================================================================

/// Label prefixed onto every brainstorm bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletLabel {
    Integration,
    Expand,
    Source,
    Alternative,
    Relevance,
}

impl BulletLabel {
    pub const ALL: [BulletLabel; 5] = [
        BulletLabel::Integration,
        BulletLabel::Expand,
        BulletLabel::Source,
        BulletLabel::Alternative,
        BulletLabel::Relevance,
    ];

    /// Prefix written in front of the bullet text, colon included.
    pub fn prefix(&self) -> &'static str {
        match self {
            BulletLabel::Integration => "Integration:",
            BulletLabel::Expand => "Expand:",
            BulletLabel::Source => "Source:",
            BulletLabel::Alternative => "Alternative:",
            BulletLabel::Relevance => "Relevance:",
        }
    }

    /// Render `text` as a labeled bullet.
    pub fn label(&self, text: &str) -> String {
        format!("{} {}", self.prefix(), text)
    }

    /// Split a labeled bullet into its label and trimmed body.
    ///
    /// Returns `None` for bullets without a known prefix (canned messages).
    pub fn classify(bullet: &str) -> Option<(BulletLabel, &str)> {
        Self::ALL.iter().find_map(|label| {
            bullet
                .strip_prefix(label.prefix())
                .map(|rest| (*label, rest.trim()))
        })
    }
}

impl fmt::Display for BulletLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches(':'))
    }
}

// =============================================================================
// AI BOUNDARY CONTRACTS
// =============================================================================

/// Input to both brainstorm and web-search calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainstormRequest {
    pub document_context: String,
    pub document_goal: String,
    pub note_content: String,
}

/// Web search takes exactly the brainstorm request shape.
pub type WebSearchRequest = BrainstormRequest;

/// Successful brainstorm result: pre-labeled bullet strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainstormResponse {
    pub bullet_points: Vec<String>,
}

impl BrainstormResponse {
    pub fn is_empty(&self) -> bool {
        self.bullet_points.is_empty()
    }
}

/// One simulated web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
}

impl WebSearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

/// Successful web search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchResponse {
    pub web_results: Vec<WebSearchResult>,
}

/// Failure body returned by the brainstorm and search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
