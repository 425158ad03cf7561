//! Structured logging field names shared by every scribe crate.
//!
//! Keeping one vocabulary lets log queries filter the composer, the
//! inference backends and the CLI by the same keys.
//!
//! ## Field vocabulary
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | "composer", "inference", "persistence" |
//! | `component` | "controller", "document", "model_service", "http_service", "config" |
//! | `op` | "analyze", "search", "brainstorm", "web_search", ... |
//! | `note_id` | Note being operated on |
//! | `store_key` | Persistence key read or written |
//! | `model` | Model name used for inference |
//! | `output_shape` | Parsed model output ("free_text", "structured_json") |
//! | `error` | Error message when an operation fails |
//!
//! Identity fields are declared as literals in `#[instrument]` attributes,
//! which only accept identifiers. The fields below are declared
//! `tracing::field::Empty` and filled in later with `Span::record`, so they
//! are referenced through these constants.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, canned fallback applied |
//! | INFO  | Lifecycle events, note created/deleted, analysis completed |
//! | DEBUG | Decision points, prompt sizes, parser section switches |
//! | TRACE | Per-line parser decisions |

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of bullets or web results produced.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Every field recorded after span creation.
pub const RECORDED_FIELDS: [&str; 4] = [DURATION_MS, RESULT_COUNT, PROMPT_LEN, SUCCESS];
