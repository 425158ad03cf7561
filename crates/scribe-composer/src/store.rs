//! The note collection: an explicitly owned, observable, persisted store.
//!
//! State is an `Arc<Vec<Note>>` held in a [`tokio::sync::watch`] channel.
//! Every mutation replaces the whole collection copy-on-write, so readers
//! holding an older snapshot are never affected and concurrent writers race
//! only on last-write-wins for the fields they touch.
//!
//! After each mutation the collection is written to the injected
//! [`KeyValueStore`] under `"composer-notes"`. Persistence failures are
//! logged and otherwise ignored; the in-memory state stays authoritative.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use scribe_core::defaults::NOTES_KEY;
use scribe_core::{Error, KeyValueStore, Note, NoteId, Result};

/// Snapshot of the ordered note collection.
pub type NotesSnapshot = Arc<Vec<Note>>;

/// Observable note collection backed by a key-value store.
pub struct NoteStore {
    notes: watch::Sender<NotesSnapshot>,
    persistence: Arc<dyn KeyValueStore>,
    // Keeps writes in mutation order; each write takes the latest snapshot.
    persist_lock: Mutex<()>,
}

impl NoteStore {
    /// Create an empty store. Call [`NoteStore::load`] to restore a session.
    pub fn new(persistence: Arc<dyn KeyValueStore>) -> Self {
        let (notes, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            notes,
            persistence,
            persist_lock: Mutex::new(()),
        }
    }

    /// Restore the collection persisted by an earlier session.
    ///
    /// Pending flags are cleared and drafts of notes saved mid-edit are
    /// re-seeded. Returns the number of notes loaded.
    pub async fn load(&self) -> Result<usize> {
        let Some(value) = self.persistence.get(NOTES_KEY).await? else {
            debug!(store_key = NOTES_KEY, "No persisted notes");
            return Ok(0);
        };

        let mut notes: Vec<Note> = serde_json::from_value(value)
            .map_err(|e| Error::Persistence(format!("Malformed {}: {}", NOTES_KEY, e)))?;
        notes.iter_mut().for_each(Note::restore_after_load);

        let count = notes.len();
        self.notes.send_replace(Arc::new(notes));
        info!(
            subsystem = "persistence",
            store_key = NOTES_KEY,
            result_count = count,
            "Loaded notes"
        );
        Ok(count)
    }

    /// Current collection.
    pub fn snapshot(&self) -> NotesSnapshot {
        self.notes.borrow().clone()
    }

    /// Observe every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<NotesSnapshot> {
        self.notes.subscribe()
    }

    pub fn get(&self, id: &NoteId) -> Option<Note> {
        self.notes.borrow().iter().find(|n| &n.id == id).cloned()
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.borrow().iter().any(|n| &n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a note at the end of the collection.
    pub async fn insert(&self, note: Note) {
        self.notes.send_modify(|notes| Arc::make_mut(notes).push(note));
        self.persist().await;
    }

    /// Remove a note. Returns `false` when the id is absent.
    pub async fn remove(&self, id: &NoteId) -> bool {
        let removed = self.notes.send_if_modified(|notes| {
            match notes.iter().position(|n| &n.id == id) {
                Some(idx) => {
                    Arc::make_mut(notes).remove(idx);
                    true
                }
                None => false,
            }
        });
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Apply `f` to a note. Returns `false` (and does nothing) when the id
    /// is absent, which is how late results for deleted notes are dropped.
    pub async fn update(&self, id: &NoteId, f: impl FnOnce(&mut Note)) -> bool {
        self.try_update(id, |note| {
            f(note);
            Ok(())
        })
        .await
        .is_ok()
    }

    /// Apply a fallible edit to a note.
    ///
    /// Fails with [`Error::NoteNotFound`] for absent ids. When `f` fails the
    /// collection is left unchanged, so `f` must check before mutating.
    pub async fn try_update<T>(
        &self,
        id: &NoteId,
        f: impl FnOnce(&mut Note) -> Result<T>,
    ) -> Result<T> {
        let mut outcome = None;
        self.notes.send_if_modified(|notes| {
            let Some(idx) = notes.iter().position(|n| &n.id == id) else {
                return false;
            };
            let result = f(&mut Arc::make_mut(notes)[idx]);
            let modified = result.is_ok();
            outcome = Some(result);
            modified
        });

        match outcome {
            None => Err(Error::NoteNotFound(id.clone())),
            Some(Ok(value)) => {
                self.persist().await;
                Ok(value)
            }
            Some(Err(e)) => Err(e),
        }
    }

    /// Replace the whole collection.
    pub async fn replace_all(&self, notes: Vec<Note>) {
        self.notes.send_replace(Arc::new(notes));
        self.persist().await;
    }

    async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.snapshot();

        let value = match serde_json::to_value(&*snapshot) {
            Ok(value) => value,
            Err(e) => {
                warn!(subsystem = "persistence", error = %e, "Failed to serialize notes");
                return;
            }
        };

        if let Err(e) = self.persistence.set(NOTES_KEY, value).await {
            warn!(
                subsystem = "persistence",
                store_key = NOTES_KEY,
                error = %e,
                "Failed to persist notes"
            );
        }
    }
}
