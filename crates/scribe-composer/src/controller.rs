//! Composer controller: note lifecycle and AI-assisted operations.
//!
//! The controller owns no state of its own. Notes live in the
//! [`NoteStore`], AI calls go through an injected [`AiService`] and the
//! document context through a [`DocumentContextProvider`]. It is cheap to
//! clone, so analyze and search for the same note can run as independent
//! futures or tasks.
//!
//! AI failures never escape: they are logged and turned into canned
//! results written to the same field a success would have filled, and the
//! pending flag is cleared on every path.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn, Span};

use scribe_core::defaults::{
    BRAINSTORM_ERROR_BULLETS, EMPTY_NOTE_BULLETS, EMPTY_NOTE_RESULT_DESCRIPTION,
    EMPTY_NOTE_RESULT_TITLE, PLACEHOLDER_URL, SEARCH_ERROR_RESULT_DESCRIPTION,
    SEARCH_ERROR_RESULT_TITLE,
};
use scribe_core::{
    logging, AiService, BrainstormRequest, ComposerEvent, DocumentContextProvider, Error,
    EventBus, Note, NoteId, Result, WebSearchResult,
};

use crate::store::{NoteStore, NotesSnapshot};

/// Bullets stored when analyze is asked about an empty note.
pub fn empty_note_bullets() -> Vec<String> {
    EMPTY_NOTE_BULLETS.iter().map(|s| s.to_string()).collect()
}

/// Bullets stored when the brainstorm call fails.
pub fn brainstorm_error_bullets() -> Vec<String> {
    BRAINSTORM_ERROR_BULLETS.iter().map(|s| s.to_string()).collect()
}

/// Result stored when search is asked about an empty note.
pub fn empty_note_results() -> Vec<WebSearchResult> {
    vec![WebSearchResult::new(
        EMPTY_NOTE_RESULT_TITLE,
        PLACEHOLDER_URL,
        EMPTY_NOTE_RESULT_DESCRIPTION,
    )]
}

/// Result stored when the search call fails.
pub fn search_error_results() -> Vec<WebSearchResult> {
    vec![WebSearchResult::new(
        SEARCH_ERROR_RESULT_TITLE,
        PLACEHOLDER_URL,
        SEARCH_ERROR_RESULT_DESCRIPTION,
    )]
}

/// Drives the note collection.
#[derive(Clone)]
pub struct ComposerController {
    store: Arc<NoteStore>,
    ai: Arc<dyn AiService>,
    document: Arc<dyn DocumentContextProvider>,
    events: EventBus,
}

impl ComposerController {
    pub fn new(
        store: Arc<NoteStore>,
        ai: Arc<dyn AiService>,
        document: Arc<dyn DocumentContextProvider>,
    ) -> Self {
        Self {
            store,
            ai,
            document,
            events: EventBus::default(),
        }
    }

    /// Publish composer events on an existing bus.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn notes(&self) -> NotesSnapshot {
        self.store.snapshot()
    }

    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.store.get(id)
    }

    fn require_note(&self, id: &NoteId) -> Result<Note> {
        self.store
            .get(id)
            .ok_or_else(|| Error::NoteNotFound(id.clone()))
    }

    async fn build_request(&self, note_content: String) -> BrainstormRequest {
        BrainstormRequest {
            document_context: self.document.document_context().await,
            document_goal: self.document.document_goal().await,
            note_content,
        }
    }

    // =========================================================================
    // Note lifecycle
    // =========================================================================

    /// Append a new idle note. Content is trimmed and must not be empty.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "add_note"))]
    pub async fn add_note(&self, content: &str) -> Result<Note> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::InvalidInput("Note content cannot be empty".to_string()));
        }

        let note = Note::new(content);
        self.store.insert(note.clone()).await;
        info!(note_id = %note.id, "Note added");
        self.events.emit(ComposerEvent::NoteAdded {
            note_id: note.id.clone(),
        });
        Ok(note)
    }

    /// Append an empty note that opens in editing state.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "add_blank_note"))]
    pub async fn add_blank_note(&self) -> Note {
        let note = Note::blank();
        self.store.insert(note.clone()).await;
        info!(note_id = %note.id, "Blank note added");
        self.events.emit(ComposerEvent::NoteAdded {
            note_id: note.id.clone(),
        });
        note
    }

    /// Enter editing state with the draft seeded from committed content.
    ///
    /// A note already being edited keeps its current draft.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "start_edit", note_id = %id))]
    pub async fn start_edit(&self, id: &NoteId) -> Result<()> {
        if self.require_note(id)?.is_editing {
            debug!("Note already in editing state");
            return Ok(());
        }

        self.store
            .try_update(id, |note| {
                note.start_edit();
                Ok(())
            })
            .await?;
        self.events.emit(ComposerEvent::NoteUpdated {
            note_id: id.clone(),
        });
        Ok(())
    }

    /// Replace the draft of a note in editing state.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "update_draft", note_id = %id))]
    pub async fn update_draft(&self, id: &NoteId, text: &str) -> Result<()> {
        self.store
            .try_update(id, |note| {
                if !note.is_editing {
                    return Err(Error::InvalidInput(format!(
                        "Note {} is not being edited",
                        note.id
                    )));
                }
                note.draft = Some(text.to_string());
                Ok(())
            })
            .await?;
        self.events.emit(ComposerEvent::NoteUpdated {
            note_id: id.clone(),
        });
        Ok(())
    }

    /// Commit the draft into content and leave editing state.
    ///
    /// Saving a note that is not being edited changes nothing.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "save_edit", note_id = %id))]
    pub async fn save_edit(&self, id: &NoteId) -> Result<()> {
        let note = self.require_note(id)?;
        if !note.is_editing {
            debug!("Save requested for a note that is not being edited");
            return Ok(());
        }

        self.store
            .try_update(id, |note| {
                note.commit_draft();
                Ok(())
            })
            .await?;
        info!("Note saved");
        self.events.emit(ComposerEvent::NoteUpdated {
            note_id: id.clone(),
        });
        Ok(())
    }

    /// Discard the draft and leave editing state; content is untouched.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "cancel_edit", note_id = %id))]
    pub async fn cancel_edit(&self, id: &NoteId) -> Result<()> {
        self.store
            .try_update(id, |note| {
                note.discard_draft();
                Ok(())
            })
            .await?;
        self.events.emit(ComposerEvent::NoteUpdated {
            note_id: id.clone(),
        });
        Ok(())
    }

    /// Remove a note and its draft. Returns `false` for unknown ids.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "delete_note", note_id = %id))]
    pub async fn delete_note(&self, id: &NoteId) -> bool {
        let removed = self.store.remove(id).await;
        if removed {
            info!("Note deleted");
            self.events.emit(ComposerEvent::NoteDeleted {
                note_id: id.clone(),
            });
        }
        removed
    }

    /// Drop the brainstorm bullets of a note, if any.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "clear_brainstorm", note_id = %id))]
    pub async fn clear_brainstorm(&self, id: &NoteId) -> Result<()> {
        self.store
            .try_update(id, |note| {
                note.brainstorm_bullets = None;
                Ok(())
            })
            .await?;
        self.events.emit(ComposerEvent::NoteUpdated {
            note_id: id.clone(),
        });
        Ok(())
    }

    /// Drop the web results of a note, if any.
    #[instrument(skip_all, fields(subsystem = "composer", component = "controller", op = "clear_web_results", note_id = %id))]
    pub async fn clear_web_results(&self, id: &NoteId) -> Result<()> {
        self.store
            .try_update(id, |note| {
                note.web_results = None;
                Ok(())
            })
            .await?;
        self.events.emit(ComposerEvent::NoteUpdated {
            note_id: id.clone(),
        });
        Ok(())
    }

    // =========================================================================
    // AI operations
    // =========================================================================

    /// Brainstorm ideas for a note and store them as its bullets.
    ///
    /// Works on the draft while editing. Empty notes get the instructional
    /// bullets without an AI call. Returns the bullets written; if the note
    /// was deleted while the call was pending they are discarded.
    #[instrument(
        skip_all,
        fields(
            subsystem = "composer",
            component = "controller",
            op = "analyze",
            note_id = %id,
            success = tracing::field::Empty,
            result_count = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    )]
    pub async fn analyze(&self, id: &NoteId) -> Result<Vec<String>> {
        let note = self.require_note(id)?;
        let content = note.working_content().to_string();

        if content.trim().is_empty() {
            let bullets = empty_note_bullets();
            let stored = bullets.clone();
            self.store
                .update(id, move |note| {
                    note.brainstorm_bullets = Some(stored);
                    note.is_analyzing = false;
                })
                .await;
            debug!("Note is empty, skipping brainstorm call");
            self.events.emit(ComposerEvent::AnalysisCompleted {
                note_id: id.clone(),
                success: false,
                bullet_count: bullets.len(),
            });
            return Ok(bullets);
        }

        let start = Instant::now();
        self.store.update(id, |note| note.is_analyzing = true).await;
        self.events.emit(ComposerEvent::AnalysisStarted {
            note_id: id.clone(),
        });

        let request = self.build_request(content).await;
        let (bullets, success) = match self.ai.brainstorm(&request).await {
            Ok(response) => (response.bullet_points, true),
            Err(e) => {
                warn!(error = %e, "Error analyzing with AI");
                (brainstorm_error_bullets(), false)
            }
        };

        let stored = bullets.clone();
        let written = self
            .store
            .update(id, move |note| {
                note.brainstorm_bullets = Some(stored);
                note.is_analyzing = false;
            })
            .await;
        if !written {
            debug!("Note deleted while analysis was pending, discarding result");
        }

        let span = Span::current();
        span.record(logging::SUCCESS, success);
        span.record(logging::RESULT_COUNT, bullets.len());
        span.record(logging::DURATION_MS, start.elapsed().as_millis() as u64);
        info!("Analysis completed");

        self.events.emit(ComposerEvent::AnalysisCompleted {
            note_id: id.clone(),
            success,
            bullet_count: bullets.len(),
        });
        Ok(bullets)
    }

    /// Search for sources about a note and store them as its web results.
    ///
    /// Mirrors [`ComposerController::analyze`] on the web-results field.
    #[instrument(
        skip_all,
        fields(
            subsystem = "composer",
            component = "controller",
            op = "search",
            note_id = %id,
            success = tracing::field::Empty,
            result_count = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    )]
    pub async fn search(&self, id: &NoteId) -> Result<Vec<WebSearchResult>> {
        let note = self.require_note(id)?;
        let content = note.working_content().to_string();

        if content.trim().is_empty() {
            let results = empty_note_results();
            let stored = results.clone();
            self.store
                .update(id, move |note| {
                    note.web_results = Some(stored);
                    note.is_searching = false;
                })
                .await;
            debug!("Note is empty, skipping search call");
            self.events.emit(ComposerEvent::SearchCompleted {
                note_id: id.clone(),
                success: false,
                result_count: results.len(),
            });
            return Ok(results);
        }

        let start = Instant::now();
        self.store.update(id, |note| note.is_searching = true).await;
        self.events.emit(ComposerEvent::SearchStarted {
            note_id: id.clone(),
        });

        let request = self.build_request(content).await;
        let (results, success) = match self.ai.web_search(&request).await {
            Ok(response) => (response.web_results, true),
            Err(e) => {
                warn!(error = %e, "Error searching web");
                (search_error_results(), false)
            }
        };

        let stored = results.clone();
        let written = self
            .store
            .update(id, move |note| {
                note.web_results = Some(stored);
                note.is_searching = false;
            })
            .await;
        if !written {
            debug!("Note deleted while search was pending, discarding result");
        }

        let span = Span::current();
        span.record(logging::SUCCESS, success);
        span.record(logging::RESULT_COUNT, results.len());
        span.record(logging::DURATION_MS, start.elapsed().as_millis() as u64);
        info!("Search completed");

        self.events.emit(ComposerEvent::SearchCompleted {
            note_id: id.clone(),
            success,
            result_count: results.len(),
        });
        Ok(results)
    }

    /// Create a note from unsaved input with both AI results attached.
    ///
    /// Brainstorm and search run concurrently; the note is added only once
    /// both have settled, each carrying its result or its canned failure.
    #[instrument(
        skip_all,
        fields(
            subsystem = "composer",
            component = "controller",
            op = "analyze_and_search_combined",
            duration_ms = tracing::field::Empty,
        )
    )]
    pub async fn analyze_and_search_combined(&self, content: &str) -> Result<Note> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::InvalidInput("Note content cannot be empty".to_string()));
        }

        let start = Instant::now();
        let mut note = Note::new(content);
        let request = self.build_request(content.to_string()).await;

        let (brainstorm, search) =
            tokio::join!(self.ai.brainstorm(&request), self.ai.web_search(&request));

        let analysis_ok = brainstorm.is_ok();
        note.brainstorm_bullets = Some(match brainstorm {
            Ok(response) => response.bullet_points,
            Err(e) => {
                warn!(note_id = %note.id, error = %e, "Error analyzing with AI");
                brainstorm_error_bullets()
            }
        });

        let search_ok = search.is_ok();
        note.web_results = Some(match search {
            Ok(response) => response.web_results,
            Err(e) => {
                warn!(note_id = %note.id, error = %e, "Error searching web");
                search_error_results()
            }
        });

        self.store.insert(note.clone()).await;
        Span::current().record(logging::DURATION_MS, start.elapsed().as_millis() as u64);
        info!(note_id = %note.id, analysis_ok, search_ok, "Combined note added");

        self.events.emit(ComposerEvent::NoteAdded {
            note_id: note.id.clone(),
        });
        self.events.emit(ComposerEvent::AnalysisCompleted {
            note_id: note.id.clone(),
            success: analysis_ok,
            bullet_count: note.brainstorm_bullets.as_ref().map_or(0, Vec::len),
        });
        self.events.emit(ComposerEvent::SearchCompleted {
            note_id: note.id.clone(),
            success: search_ok,
            result_count: note.web_results.as_ref().map_or(0, Vec::len),
        });
        Ok(note)
    }
}
