//! Best-effort parsing of model output into labeled bullets.
//!
//! Models answer either in free text (markdown-ish sections with bullet
//! lines) or in a JSON object, sometimes switching between the two for the
//! same prompt. [`ParsedModelOutput::sniff`] picks the shape: a JSON parse
//! is attempted first and line scanning is the fallback.
//!
//! Nothing in this module returns an error. A malformed line, entry or
//! document is skipped, so partial output degrades to fewer bullets.
//!
//! # Examples
//!
//! ```
//! use scribe_inference::parser::parse_model_output;
//!
//! let raw = "**Expansion Ideas:**\n- Compare with Locke\n\n**Alternative Perspectives:**\n1. Voltaire was no democrat";
//! let response = parse_model_output(raw);
//! assert_eq!(
//!     response.bullet_points,
//!     vec!["Expand: Compare with Locke", "Alternative: Voltaire was no democrat"]
//! );
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, trace, warn};

use scribe_core::{BrainstormResponse, BulletLabel, WebSearchResult};

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-•]|\d+\.)").expect("valid bullet regex"));
// `N.` is only stripped when followed by whitespace, so `1.5 million` stays intact.
static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-•]\s*|\d+\.\s+)").expect("valid bullet prefix regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("valid link regex"));
static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("valid fence regex"));

// =============================================================================
// Free-text sections
// =============================================================================

/// Section a free-text bullet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Integration,
    Expansion,
    Links,
    Alternatives,
}

const SECTION_HEADERS: [(&str, Section); 4] = [
    ("Integration Suggestions:", Section::Integration),
    ("Expansion Ideas:", Section::Expansion),
    ("Relevant Links:", Section::Links),
    ("Alternative Perspectives:", Section::Alternatives),
];

/// Returns the section a header line opens, if the line is a header.
///
/// Emphasis markers are ignored so `**Expansion Ideas**:` counts too.
fn header_section(line: &str) -> Option<Section> {
    let plain: String = line.chars().filter(|c| *c != '*').collect();
    SECTION_HEADERS
        .iter()
        .find(|(header, _)| plain.contains(header))
        .map(|(_, section)| *section)
}

/// An entry of the "Relevant Links" section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEntry {
    Text(String),
    Link { title: String, url: String },
}

impl SourceEntry {
    fn to_bullet(&self) -> String {
        match self {
            SourceEntry::Text(text) => BulletLabel::Source.label(text),
            SourceEntry::Link { title, url } => {
                BulletLabel::Source.label(&format!("{} ({})", title, url))
            }
        }
    }
}

/// Bullets collected per section from a free-text response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeTextSections {
    pub integration: Vec<String>,
    pub expansion: Vec<String>,
    pub sources: Vec<SourceEntry>,
    pub alternatives: Vec<String>,
}

impl FreeTextSections {
    pub fn len(&self) -> usize {
        self.integration.len() + self.expansion.len() + self.sources.len() + self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into labeled bullets: integration, expansion, sources, alternatives.
    pub fn into_bullets(self) -> Vec<String> {
        let mut bullets = Vec::with_capacity(self.len());
        bullets.extend(
            self.integration
                .iter()
                .map(|item| BulletLabel::Integration.label(item)),
        );
        bullets.extend(
            self.expansion
                .iter()
                .map(|item| BulletLabel::Expand.label(item)),
        );
        bullets.extend(self.sources.iter().map(SourceEntry::to_bullet));
        bullets.extend(
            self.alternatives
                .iter()
                .map(|item| BulletLabel::Alternative.label(item)),
        );
        bullets
    }
}

/// Scan free-text model output line by line.
///
/// A line containing a known header switches the active section and is
/// discarded. Lines starting with `-`, `•` or `N.` inside a section are
/// bullets: the marker is stripped (`N.` only when whitespace follows) and
/// the rest kept unless nothing remains. Everything else is dropped.
pub fn parse_free_text(raw: &str) -> FreeTextSections {
    let mut sections = FreeTextSections::default();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        let trimmed = line.trim();

        if let Some(section) = header_section(trimmed) {
            trace!(?section, "parser section switch");
            current = Some(section);
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        let Some(section) = current else {
            trace!(line = trimmed, "dropping line before any header");
            continue;
        };

        if !BULLET_RE.is_match(trimmed) {
            trace!(line = trimmed, "dropping non-bullet line");
            continue;
        }

        let cleaned = BULLET_PREFIX_RE.replace(trimmed, "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }

        match section {
            Section::Integration => sections.integration.push(cleaned.to_string()),
            Section::Expansion => sections.expansion.push(cleaned.to_string()),
            Section::Alternatives => sections.alternatives.push(cleaned.to_string()),
            Section::Links => {
                let entry = match MARKDOWN_LINK_RE.captures(trimmed) {
                    Some(caps) => SourceEntry::Link {
                        title: caps[1].trim().to_string(),
                        url: caps[2].trim().to_string(),
                    },
                    None => SourceEntry::Text(cleaned.to_string()),
                };
                sections.sources.push(entry);
            }
        }
    }

    sections
}

// =============================================================================
// Structured JSON
// =============================================================================

/// One entry of a structured brainstorm response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledIdea {
    pub label: BulletLabel,
    pub description: String,
}

impl LabeledIdea {
    fn to_bullet(&self) -> String {
        self.label.label(&self.description)
    }
}

#[derive(Debug, Deserialize)]
struct RawIdea {
    label: String,
    description: String,
}

fn structured_label(label: &str) -> Option<BulletLabel> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("Expansion Ideas") {
        Some(BulletLabel::Expand)
    } else if label.eq_ignore_ascii_case("Alternative Perspectives") {
        Some(BulletLabel::Alternative)
    } else if label.eq_ignore_ascii_case("Relevance") {
        Some(BulletLabel::Relevance)
    } else {
        None
    }
}

/// Remove a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE_RE.captures(text) {
        Some(caps) => caps.get(1).map_or(text, |m| m.as_str()),
        None => text,
    }
}

/// Entries of the `results` array, or an empty list when it is missing or
/// not an array.
fn results_array(document: &JsonValue) -> &[JsonValue] {
    document
        .get("results")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Parse `{ "results": [{ "label", "description" }] }`.
///
/// Returns `None` when `text` is not a JSON object at all.
fn structured_ideas(text: &str) -> Option<Vec<LabeledIdea>> {
    let document: JsonValue = serde_json::from_str(text).ok()?;
    if !document.is_object() {
        return None;
    }

    let ideas = results_array(&document)
        .iter()
        .filter_map(|entry| match serde_json::from_value::<RawIdea>(entry.clone()) {
            Ok(raw) => match structured_label(&raw.label) {
                Some(label) => Some(LabeledIdea {
                    label,
                    description: raw.description.trim().to_string(),
                }),
                None => {
                    trace!(label = %raw.label, "dropping unrecognized label");
                    None
                }
            },
            Err(e) => {
                trace!(error = %e, "skipping malformed structured entry");
                None
            }
        })
        .collect();

    Some(ideas)
}

/// Parse a structured brainstorm response.
///
/// A JSON parse failure yields an empty bullet list.
pub fn parse_structured_brainstorm(raw: &str) -> BrainstormResponse {
    match structured_ideas(strip_code_fence(raw.trim())) {
        Some(ideas) => BrainstormResponse {
            bullet_points: ideas.iter().map(LabeledIdea::to_bullet).collect(),
        },
        None => {
            warn!(
                response_len = raw.len(),
                "Structured brainstorm response is not a JSON object"
            );
            BrainstormResponse::default()
        }
    }
}

// =============================================================================
// Shape selection
// =============================================================================

/// Model output after shape detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedModelOutput {
    FreeText(FreeTextSections),
    StructuredJson(Vec<LabeledIdea>),
}

impl ParsedModelOutput {
    /// Pick the output shape: JSON first, line scanning as the fallback.
    pub fn sniff(raw: &str) -> Self {
        let candidate = strip_code_fence(raw.trim());
        if candidate.starts_with('{') {
            if let Some(ideas) = structured_ideas(candidate) {
                return ParsedModelOutput::StructuredJson(ideas);
            }
            debug!("Output starts like JSON but does not parse, scanning lines instead");
        }
        ParsedModelOutput::FreeText(parse_free_text(raw))
    }

    /// Short name of the detected shape, for logging.
    pub fn shape(&self) -> &'static str {
        match self {
            ParsedModelOutput::FreeText(_) => "free_text",
            ParsedModelOutput::StructuredJson(_) => "structured_json",
        }
    }

    pub fn into_bullets(self) -> Vec<String> {
        match self {
            ParsedModelOutput::FreeText(sections) => sections.into_bullets(),
            ParsedModelOutput::StructuredJson(ideas) => {
                ideas.iter().map(LabeledIdea::to_bullet).collect()
            }
        }
    }
}

/// Parse any brainstorm output shape into a response.
pub fn parse_model_output(raw: &str) -> BrainstormResponse {
    let parsed = ParsedModelOutput::sniff(raw);
    let shape = parsed.shape();
    let bullet_points = parsed.into_bullets();
    debug!(
        output_shape = shape,
        result_count = bullet_points.len(),
        "Parsed brainstorm output"
    );
    BrainstormResponse { bullet_points }
}

// =============================================================================
// Web results
// =============================================================================

/// Parse `{ "results": [{ "title", "url", "description" }] }`.
///
/// Missing or malformed `results` yields an empty list; malformed entries
/// are skipped.
pub fn parse_web_results(raw: &str) -> Vec<WebSearchResult> {
    let document: JsonValue = match serde_json::from_str(strip_code_fence(raw.trim())) {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "Error parsing search results");
            return Vec::new();
        }
    };

    results_array(&document)
        .iter()
        .filter_map(|entry| serde_json::from_value::<WebSearchResult>(entry.clone()).ok())
        .collect()
}
