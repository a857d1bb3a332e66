// Prompt fragments for the AI assistant.

/// Maximum number of characters of resume text forwarded for analysis.
/// Longer text is cut silently.
pub const ANALYZE_TEXT_LIMIT: usize = 500;

pub const ANALYZE_PROMPT_PREFIX: &str =
    "Analyze this resume text and provide improvement suggestions: ";

/// Builds the analysis prompt from the first `ANALYZE_TEXT_LIMIT` characters of `text`.
pub fn analyze_prompt(text: &str) -> String {
    let truncated: String = text.chars().take(ANALYZE_TEXT_LIMIT).collect();
    format!("{ANALYZE_PROMPT_PREFIX}{truncated}")
}
