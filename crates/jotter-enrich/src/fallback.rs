//! Local fallbacks and output normalisation.
//!
//! Every function here is pure. The fallbacks run when the generation service
//! is unavailable or answers with something unusable; the normalisers run on
//! every result, whichever path produced it.

use once_cell::sync::Lazy;
use regex::Regex;

use jotter_core::{defaults, Category, Sentiment, SummaryLength};

const POSITIVE_WORDS: &[&str] = &["good", "great", "excellent", "amazing", "wonderful", "happy"];
const NEGATIVE_WORDS: &[&str] = &["bad", "poor", "terrible", "awful", "sad", "angry"];

const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Work,
        &["meeting", "project", "deadline", "client", "report"],
    ),
    (
        Category::Personal,
        &["family", "home", "health", "hobby", "friend"],
    ),
    (
        Category::Ideas,
        &["idea", "concept", "innovation", "creative", "solution"],
    ),
    (
        Category::Tasks,
        &["todo", "task", "action", "complete", "finish"],
    ),
];

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-*]\s*").expect("valid regex"));

// =============================================================================
// FALLBACKS
// =============================================================================

/// First N words of `text` (N from `length`), with `...` appended if truncated.
pub fn fallback_summary(text: &str, length: SummaryLength) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let cap = length.word_cap().min(words.len());
    let mut summary = words[..cap].join(" ");
    if words.len() > cap {
        summary.push_str("...");
    }
    summary
}

/// First three non-empty sentences, one per line.
pub fn fallback_key_points(text: &str) -> String {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(defaults::KEY_POINT_SENTENCES)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Count whole-word hits against fixed positive and negative lists.
///
/// The larger count wins; a tie is neutral.
pub fn fallback_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let (mut positive, mut negative) = (0usize, 0usize);
    for word in lower.split_whitespace() {
        if POSITIVE_WORDS.contains(&word) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(&word) {
            negative += 1;
        }
    }

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Every category with a keyword occurring anywhere in `text`, else `Other`.
pub fn fallback_categories(text: &str) -> Vec<Category> {
    let lower = text.to_lowercase();
    let hits: Vec<Category> = CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .collect();

    if hits.is_empty() {
        vec![Category::Other]
    } else {
        hits
    }
}

// =============================================================================
// NORMALISERS
// =============================================================================

/// Split into lines, strip one leading bullet marker, drop blank lines.
pub fn normalize_key_points(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| BULLET_PREFIX.replace(line, "").trim().to_string())
        .filter(|point| !point.is_empty())
        .collect()
}

/// Parse a comma-separated list, keeping only exact category labels.
///
/// Unknown labels are dropped; duplicates keep their first position.
pub fn filter_categories(raw: &str) -> Vec<Category> {
    let mut categories = Vec::new();
    for category in raw.split(',').filter_map(|label| label.trim().parse::<Category>().ok()) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

/// Accept a generated sentiment label, tolerating trailing punctuation.
pub fn parse_sentiment(raw: &str) -> Option<Sentiment> {
    Sentiment::parse_label(raw.trim().trim_end_matches(|c: char| !c.is_alphabetic()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Summary
    // =========================================================================

    #[test]
    fn test_fallback_summary_truncates_with_ellipsis() {
        let text = "one two three four five six seven eight nine ten eleven";
        assert_eq!(
            fallback_summary(text, SummaryLength::Short),
            "one two three four five six seven eight nine ten..."
        );
    }

    #[test]
    fn test_fallback_summary_short_text_unchanged() {
        assert_eq!(
            fallback_summary("just three words", SummaryLength::Medium),
            "just three words"
        );
    }

    #[test]
    fn test_fallback_summary_exact_cap_has_no_ellipsis() {
        let text = (1..=10).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        assert_eq!(fallback_summary(&text, SummaryLength::Short), text);
    }

    #[test]
    fn test_fallback_summary_collapses_whitespace() {
        assert_eq!(
            fallback_summary("  a\n\nb\tc ", SummaryLength::Long),
            "a b c"
        );
    }

    // =========================================================================
    // Key points
    // =========================================================================

    #[test]
    fn test_fallback_key_points_first_three_sentences() {
        let text = "First point. Second one! Third? Fourth is dropped.";
        assert_eq!(
            fallback_key_points(text),
            "First point\nSecond one\nThird"
        );
    }

    #[test]
    fn test_fallback_key_points_skips_empty_fragments() {
        assert_eq!(fallback_key_points("...Hello!!  . World"), "Hello\nWorld");
    }

    #[test]
    fn test_normalize_key_points_strips_bullets() {
        let raw = "• First\n- Second\n* Third\n\n   \n-Fourth\nPlain";
        assert_eq!(
            normalize_key_points(raw),
            vec!["First", "Second", "Third", "Fourth", "Plain"]
        );
    }

    #[test]
    fn test_normalize_key_points_strips_only_one_marker() {
        assert_eq!(normalize_key_points("- - nested"), vec!["- nested"]);
    }

    // =========================================================================
    // Sentiment
    // =========================================================================

    #[test]
    fn test_fallback_sentiment() {
        assert_eq!(fallback_sentiment("What a great day"), Sentiment::Positive);
        assert_eq!(fallback_sentiment("This is bad and sad"), Sentiment::Negative);
        assert_eq!(fallback_sentiment("good but bad"), Sentiment::Neutral);
        assert_eq!(fallback_sentiment("nothing notable"), Sentiment::Neutral);
    }

    #[test]
    fn test_fallback_sentiment_matches_whole_words_only() {
        // "goodness" and "great," are not exact list words
        assert_eq!(fallback_sentiment("goodness great,"), Sentiment::Neutral);
        assert_eq!(fallback_sentiment("HAPPY"), Sentiment::Positive);
    }

    #[test]
    fn test_parse_sentiment() {
        assert_eq!(parse_sentiment("Positive"), Some(Sentiment::Positive));
        assert_eq!(parse_sentiment("  negative.\n"), Some(Sentiment::Negative));
        assert_eq!(parse_sentiment("neutral!"), Some(Sentiment::Neutral));
        assert_eq!(parse_sentiment("mixed"), None);
        assert_eq!(parse_sentiment("The sentiment is positive"), None);
        assert_eq!(parse_sentiment(""), None);
    }

    // =========================================================================
    // Categories
    // =========================================================================

    #[test]
    fn test_fallback_categories_keyword_hits() {
        assert_eq!(
            fallback_categories("Project meeting with the client"),
            vec![Category::Work]
        );
        assert_eq!(
            fallback_categories("Creative idea for a family TODO"),
            vec![Category::Personal, Category::Ideas, Category::Tasks]
        );
    }

    #[test]
    fn test_fallback_categories_substring_match() {
        // "homework" contains "home"
        assert_eq!(fallback_categories("homework"), vec![Category::Personal]);
    }

    #[test]
    fn test_fallback_categories_defaults_to_other() {
        assert_eq!(fallback_categories("random words"), vec![Category::Other]);
    }

    #[test]
    fn test_filter_categories() {
        assert_eq!(
            filter_categories("Work, Ideas, Finance"),
            vec![Category::Work, Category::Ideas]
        );
        assert_eq!(filter_categories("work, IDEAS"), Vec::<Category>::new());
        assert_eq!(
            filter_categories(" Tasks ,Tasks, Other"),
            vec![Category::Tasks, Category::Other]
        );
        assert!(filter_categories("").is_empty());
    }
}
