//! Prompt builders for the brainstorm and web-search flows.
//!
//! All builders are pure: they embed their inputs verbatim and never
//! validate them. Callers short-circuit empty notes before getting here.

use scribe_core::defaults::SEARCH_QUERY_MAX_WORDS;

/// Section headers the free-text brainstorm prompt asks for.
pub const EXPANSION_IDEAS_HEADER: &str = "Expansion Ideas:";
pub const ALTERNATIVE_PERSPECTIVES_HEADER: &str = "Alternative Perspectives:";

/// Builds the free-text brainstorm prompt.
///
/// The model is asked for two labeled bullet sections, which
/// [`crate::parser::parse_free_text`] reads back.
pub fn build_brainstorm_prompt(
    document_context: &str,
    document_goal: &str,
    note_content: &str,
) -> String {
    format!(
        r#"
You are an AI writing assistant that helps users integrate research notes into their document.

### Context:
The user is working on a document with the goal: "{document_goal}"
The current document content is: "{document_context}"
The user has added a note they want to incorporate: "{note_content}"

Analyze the note in relation to the document and provide:

1. **Expansion Ideas**: ways to develop the note further with supporting details.
2. **Alternative Perspectives**: challenges to the note or contrasting viewpoints.

Write a few thought-provoking bullet points for each section, one per line, starting with "- ".

### Structured response:
- **{EXPANSION_IDEAS_HEADER}**
- **{ALTERNATIVE_PERSPECTIVES_HEADER}**
"#
    )
}

/// Builds the structured (JSON) brainstorm prompt.
///
/// The model is asked for `{"results": [{"label", "description"}]}` with
/// labels from a closed set, read back by
/// [`crate::parser::parse_structured_brainstorm`].
pub fn build_structured_brainstorm_prompt(
    document_context: &str,
    document_goal: &str,
    note_content: &str,
) -> String {
    format!(
        r#"You are an AI writing assistant that helps users integrate research notes into their document.

Document goal: "{document_goal}"
Document content: "{document_context}"
Note to incorporate: "{note_content}"

Respond with a single JSON object of this exact shape:
{{"results": [{{"label": "<label>", "description": "<one idea>"}}]}}

Use only these labels:
- "Expansion Ideas": ways to develop the note further with supporting details
- "Alternative Perspectives": challenges or contrasting viewpoints
- "Relevance": how the note serves the document goal

Give two or three entries per label. Do not add any text outside the JSON object."#
    )
}

/// Builds the prompt that condenses a note into a short search query.
pub fn build_search_query_prompt(
    document_context: &str,
    document_goal: &str,
    note_content: &str,
) -> String {
    format!(
        r#"You are an AI assistant that helps generate effective search queries.
Based on the following information, create a concise search query (max {SEARCH_QUERY_MAX_WORDS} words) that would help find relevant academic or informational sources.

Document Goal: "{document_goal}"
Document Context: "{document_context}"
User's Note: "{note_content}"

Return ONLY the search query text."#
    )
}

/// Builds the prompt that simulates web results for a search query.
pub fn build_web_results_prompt(search_query: &str, document_context: &str) -> String {
    format!(
        r#"You are an AI assistant that generates mock search results. The user is searching for: "{search_query}" in the context of: "{document_context}".

Create 3 highly relevant search results that would help research this topic. Each result must include:
1. title (specific, with names, dates and institutions where appropriate)
2. url (a plausible, properly formatted URL on a real domain such as a university or journal, e.g. https://www.example.com/path)
3. description (2-3 sentences summarizing what the reader would find)

Respond with a JSON object: {{"results": [{{"title": "...", "url": "...", "description": "..."}}]}}"#
    )
}
