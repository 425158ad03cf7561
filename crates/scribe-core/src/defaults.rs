//! Centralized default constants for scribe.
//!
//! **This module is the single source of truth** for shared default values:
//! persistence keys, canned user-facing messages and model call settings.
//! Crates reference these constants instead of defining their own literals.

// =============================================================================
// PERSISTENCE KEYS
// =============================================================================

/// Key holding the serialized note collection.
pub const NOTES_KEY: &str = "composer-notes";

/// Key holding the document goal (a JSON string).
pub const DOCUMENT_GOAL_KEY: &str = "document-goal";

// =============================================================================
// DOCUMENT CONTEXT
// =============================================================================

/// Goal used when none has been set or the stored value is unreadable.
pub const DOCUMENT_GOAL: &str = "Research paper on the enlightenment";

/// Context used when the editor has no text yet.
pub const DOCUMENT_CONTEXT: &str = "The Age of Enlightenment, also known as the Age of Reason, was an intellectual and philosophical movement that dominated the world of ideas in Europe during the 17th and 18th centuries.";

// =============================================================================
// CANNED RESULTS
// =============================================================================

/// Bullets shown when analyze is requested on an empty note.
pub const EMPTY_NOTE_BULLETS: [&str; 2] = [
    "Please add some content to your note first.",
    "The AI needs something to work with!",
];

/// Bullets shown when the brainstorm call fails.
pub const BRAINSTORM_ERROR_BULLETS: [&str; 3] = [
    "Sorry, there was an error generating ideas.",
    "Please try again in a moment.",
    "If the problem persists, check your API key configuration.",
];

/// Placeholder URL used by canned web results.
pub const PLACEHOLDER_URL: &str = "#";

/// Title of the canned web result for an empty note.
pub const EMPTY_NOTE_RESULT_TITLE: &str = "Note is empty";

/// Description of the canned web result for an empty note.
pub const EMPTY_NOTE_RESULT_DESCRIPTION: &str =
    "Please add some content to your note before searching for relevant sources.";

/// Title of the canned web result for a failed search.
pub const SEARCH_ERROR_RESULT_TITLE: &str = "Error occurred";

/// Description of the canned web result for a failed search.
pub const SEARCH_ERROR_RESULT_DESCRIPTION: &str =
    "Sorry, there was an error searching the web. Please try again in a moment.";

// =============================================================================
// MODEL CALLS
// =============================================================================

/// Default generation model.
pub const GEN_MODEL: &str = "gpt-4o";

/// Sampling temperature for brainstorming.
pub const BRAINSTORM_TEMPERATURE: f32 = 0.7;

/// Token ceiling for brainstorming.
pub const BRAINSTORM_MAX_TOKENS: u32 = 800;

/// Sampling temperature for search query generation.
pub const SEARCH_QUERY_TEMPERATURE: f32 = 0.3;

/// Token ceiling for search query generation.
pub const SEARCH_QUERY_MAX_TOKENS: u32 = 50;

/// Sampling temperature for simulated web results.
pub const WEB_RESULTS_TEMPERATURE: f32 = 0.7;

/// Token ceiling for simulated web results.
pub const WEB_RESULTS_MAX_TOKENS: u32 = 600;

/// Maximum words requested for a generated search query.
pub const SEARCH_QUERY_MAX_WORDS: usize = 10;

// =============================================================================
// EVENTS
// =============================================================================

/// Default broadcast capacity for the composer event bus.
///
/// Recommended: 256 for interactive use, 32 for tests.
pub const EVENT_BUS_CAPACITY: usize = 256;
