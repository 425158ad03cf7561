//! Sample-data fallback around another [`AiService`].
//!
//! When the wrapped service fails, brainstorming answers with a topical
//! sample bullet set picked from keywords in the note, and web search with
//! three fixed references. Useful for demos and offline work; the composer
//! only sees this when it is enabled in configuration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use scribe_core::{
    AiService, BrainstormRequest, BrainstormResponse, Result, WebSearchRequest,
    WebSearchResponse, WebSearchResult,
};

const DEFAULT_BULLETS: [&str; 6] = [
    "Consider relating this to key enlightenment thinkers like Kant, Locke, or Rousseau",
    "Explore how this connects to the scientific revolution of the 17th century",
    "Examine the impact on political structures and governance models",
    "Compare and contrast with earlier philosophical traditions",
    "Incorporate primary sources that demonstrate these ideas in practice",
    "Analyze how this influenced art and culture during the period",
];

const VOLTAIRE_BULLETS: [&str; 6] = [
    "Examine Voltaire's criticism of religious intolerance in 'Treatise on Tolerance'",
    "Explore his impact on the separation of church and state",
    "Consider his relationship with European monarchs, especially Frederick the Great",
    "Analyze how his ideas on freedom of speech influenced later thinkers",
    "Look at his contributions to Enlightenment philosophy",
    "Investigate his role in popularizing Newton's scientific ideas in France",
];

const SCIENCE_BULLETS: [&str; 6] = [
    "Research the impact of the Royal Society on scientific progress",
    "Explore how Bacon's scientific method influenced enlightenment thinking",
    "Examine Newton's contribution to physics and mathematics",
    "Consider how scientific progress challenged religious authority",
    "Investigate the role of scientific academies across Europe",
    "Look at how scientific discoveries influenced enlightenment philosophy",
];

const POLITICS_BULLETS: [&str; 6] = [
    "Analyze Montesquieu's theory of separation of powers",
    "Examine how Enlightenment ideas influenced the American and French Revolutions",
    "Consider Locke's theories of natural rights and their political impact",
    "Look at Rousseau's ideas about the social contract",
    "Explore how enlightenment concepts shaped modern democracy",
    "Investigate how different countries implemented enlightenment political ideas",
];

const EMPTY_BULLETS: [&str; 6] = [
    "Start by defining the scope of your research paper",
    "Consider which enlightenment thinkers you want to focus on",
    "Think about the timeline you want to cover in your paper",
    "Determine if you want to focus on philosophical, political, or cultural aspects",
    "Research some primary sources you could incorporate",
    "Consider the long-term impact of the Enlightenment on modern society",
];

const SCIENCE_KEYWORDS: [&str; 3] = ["science", "newton", "experiment"];
const POLITICS_KEYWORDS: [&str; 3] = ["politic", "government", "revolution"];

/// Topic of a sample bullet set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleTopic {
    Empty,
    Voltaire,
    Science,
    Politics,
    General,
}

impl SampleTopic {
    /// Pick the topic for a note; the first matching rule wins.
    pub fn for_note(note_content: &str) -> Self {
        if note_content.trim().is_empty() {
            return SampleTopic::Empty;
        }
        let lower = note_content.to_lowercase();
        if lower.contains("voltaire") {
            SampleTopic::Voltaire
        } else if SCIENCE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            SampleTopic::Science
        } else if POLITICS_KEYWORDS.iter().any(|k| lower.contains(k)) {
            SampleTopic::Politics
        } else {
            SampleTopic::General
        }
    }

    pub fn bullets(&self) -> Vec<String> {
        let set: &[&str] = match self {
            SampleTopic::Empty => &EMPTY_BULLETS,
            SampleTopic::Voltaire => &VOLTAIRE_BULLETS,
            SampleTopic::Science => &SCIENCE_BULLETS,
            SampleTopic::Politics => &POLITICS_BULLETS,
            SampleTopic::General => &DEFAULT_BULLETS,
        };
        set.iter().map(|s| s.to_string()).collect()
    }
}

/// The three fixed sample references.
pub fn sample_web_results() -> Vec<WebSearchResult> {
    vec![
        WebSearchResult::new(
            "The Stanford Encyclopedia of Philosophy: The Enlightenment",
            "https://plato.stanford.edu/entries/enlightenment/",
            "A comprehensive academic resource on the Enlightenment period. Includes detailed analysis of major thinkers and their contributions to philosophy, science, and political thought.",
        ),
        WebSearchResult::new(
            "Enlightenment and Revolution - History.com",
            "https://www.history.com/topics/enlightenment-and-revolution",
            "An overview of how Enlightenment ideas influenced revolutions across Europe and the Americas. Explores the connection between philosophical concepts and practical political changes.",
        ),
        WebSearchResult::new(
            "The Age of Enlightenment: A History of European Thought - Oxford University Press",
            "https://global.oup.com/academic/product/the-age-of-enlightenment-9780198735830",
            "This scholarly work examines the intellectual, social, and political developments during the Enlightenment era. It analyzes how new ideas about reason, science, and human rights transformed European society.",
        ),
    ]
}

/// Wraps an [`AiService`] and substitutes sample data for its failures.
#[derive(Clone)]
pub struct SampleFallbackAiService {
    inner: Arc<dyn AiService>,
}

impl SampleFallbackAiService {
    pub fn new(inner: Arc<dyn AiService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AiService for SampleFallbackAiService {
    async fn brainstorm(&self, request: &BrainstormRequest) -> Result<BrainstormResponse> {
        match self.inner.brainstorm(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                let topic = SampleTopic::for_note(&request.note_content);
                warn!(
                    subsystem = "inference",
                    component = "sample_fallback",
                    error = %e,
                    topic = ?topic,
                    "Brainstorm failed, falling back to sample data"
                );
                Ok(BrainstormResponse {
                    bullet_points: topic.bullets(),
                })
            }
        }
    }

    async fn web_search(&self, request: &WebSearchRequest) -> Result<WebSearchResponse> {
        match self.inner.web_search(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "sample_fallback",
                    error = %e,
                    "Web search failed, falling back to sample data"
                );
                Ok(WebSearchResponse {
                    web_results: sample_web_results(),
                })
            }
        }
    }
}
