//! Prompt templates sent to the generation service.

use jotter_core::{Category, SummaryLength};

/// Summary prompt; the requested sentence count follows `length`.
pub fn summary_prompt(text: &str, length: SummaryLength) -> String {
    format!(
        "Summarize this in {} sentences:\n\n{text}",
        length.sentence_range()
    )
}

/// Bullet-list key point prompt.
pub fn key_points_prompt(text: &str) -> String {
    format!("Extract 3-5 key points from this text, format as a bullet list:\n\n{text}")
}

/// Single-word sentiment prompt.
pub fn sentiment_prompt(text: &str) -> String {
    format!(
        "Analyze the sentiment of this text. Reply with only one word (positive, neutral, or negative):\n\n{text}"
    )
}

/// Category suggestion prompt listing the closed category set.
pub fn categories_prompt(text: &str) -> String {
    let options = Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Suggest 2-3 relevant categories for this text from the following options: {options}. Format as a comma-separated list:\n\n{text}"
    )
}
