//! # scribe-composer
//!
//! The notes composer: an observable, persisted note collection and the
//! controller that edits notes and asks the AI boundary about them.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use scribe_composer::{ComposerController, JsonFileStore, NoteStore, PersistedDocument};
//! use scribe_inference::InferenceConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let persistence = Arc::new(JsonFileStore::new("scribe-data.json"));
//!     let store = Arc::new(NoteStore::new(persistence.clone()));
//!     store.load().await?;
//!
//!     let ai = InferenceConfig::from_env()?.build_service()?;
//!     let document = Arc::new(PersistedDocument::new(persistence));
//!     let composer = ComposerController::new(store, ai, document);
//!
//!     let note = composer.add_note("Voltaire and tolerance").await?;
//!     let bullets = composer.analyze(&note.id).await?;
//!     println!("{:#?}", bullets);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod document;
pub mod persistence;
pub mod store;

pub use config::{ComposerConfig, ComposerConfigError};
pub use controller::ComposerController;
pub use document::{PersistedDocument, StaticDocument};
pub use persistence::{JsonFileStore, MemoryStore};
pub use store::{NoteStore, NotesSnapshot};
