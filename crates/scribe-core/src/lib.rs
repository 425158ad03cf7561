//! # scribe-core
//!
//! Core types, traits, and abstractions for the scribe notes composer.
//!
//! This crate provides the note data model, the request/response contracts
//! exchanged with the AI boundary, and the trait definitions that the
//! inference and composer crates implement.

pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{ComposerEvent, EventBus, EventEnvelope};
pub use models::*;
pub use traits::*;
