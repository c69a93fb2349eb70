//! Core data models for jotter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A stored note, as returned by the storage collaborator.
///
/// The engine only reads notes; `id` is unique and never changes after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Note {
    /// Text sent to the embedding model for this note.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Lower-cased text searched by the keyword fallback.
    pub fn keyword_haystack(&self) -> String {
        format!("{} {} {}", self.title, self.content, self.category).to_lowercase()
    }
}

/// Fixed, closed set of note categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Work,
    Personal,
    Ideas,
    Tasks,
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Ideas,
        Category::Tasks,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Ideas => "Ideas",
            Self::Tasks => "Tasks",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Exact, case-sensitive label match.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

// =============================================================================
// ENRICHMENT TYPES
// =============================================================================

/// Target length of a generated summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    /// Word cap applied by the local summary fallback.
    pub fn word_cap(&self) -> usize {
        match self {
            Self::Short => defaults::SUMMARY_WORDS_SHORT,
            Self::Medium => defaults::SUMMARY_WORDS_MEDIUM,
            Self::Long => defaults::SUMMARY_WORDS_LONG,
        }
    }

    /// Sentence range requested from the generation service.
    pub fn sentence_range(&self) -> &'static str {
        match self {
            Self::Short => "1-2",
            Self::Medium => "2-3",
            Self::Long => "3-4",
        }
    }
}

impl std::fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Medium => write!(f, "medium"),
            Self::Long => write!(f, "long"),
        }
    }
}

impl std::str::FromStr for SummaryLength {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            _ => Err(format!("Invalid summary length: {}", s)),
        }
    }
}

/// Sentiment classification of a note body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Parse a label after lower-casing and trimming it.
    ///
    /// Returns `None` for anything outside the three known labels.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// All derived annotations for one note body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteAnnotations {
    pub summary: String,
    pub key_points: Vec<String>,
    pub sentiment: Sentiment,
    pub categories: Vec<Category>,
}

// =============================================================================
// SEARCH TYPES
// =============================================================================

/// An absolute point in time parsed out of free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateReference {
    /// Resolved instant; notes created at or after it match.
    pub at: DateTime<Utc>,
    /// The fragment of the input that produced `at`.
    pub matched: String,
}

/// A note paired with its similarity to the query.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityPair<'a> {
    pub note: &'a Note,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_note() -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            title: "Meeting Notes".to_string(),
            content: "Discussed project timeline".to_string(),
            category: Category::Work,
            created_at: now,
            updated_at: now,
            user_id: Uuid::new_v4(),
            summary: None,
        }
    }

    #[test]
    fn test_category_round_trip_labels() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn test_category_from_str_is_case_sensitive() {
        assert!(Category::from_str("work").is_err());
        assert!(Category::from_str("Finance").is_err());
        assert!(Category::from_str(" Work").is_err());
    }

    #[test]
    fn test_category_serde_uses_labels() {
        let json = serde_json::to_string(&Category::Ideas).unwrap();
        assert_eq!(json, "\"Ideas\"");
        let parsed: Category = serde_json::from_str("\"Tasks\"").unwrap();
        assert_eq!(parsed, Category::Tasks);
    }

    #[test]
    fn test_summary_length_word_caps() {
        assert_eq!(SummaryLength::Short.word_cap(), 10);
        assert_eq!(SummaryLength::Medium.word_cap(), 20);
        assert_eq!(SummaryLength::Long.word_cap(), 30);
    }

    #[test]
    fn test_summary_length_parse() {
        assert_eq!(SummaryLength::from_str("SHORT").unwrap(), SummaryLength::Short);
        assert_eq!(SummaryLength::from_str(" long ").unwrap(), SummaryLength::Long);
        assert!(SummaryLength::from_str("tiny").is_err());
        assert_eq!(SummaryLength::default(), SummaryLength::Medium);
    }

    #[test]
    fn test_sentiment_parse_label_normalizes() {
        assert_eq!(Sentiment::parse_label(" Positive\n"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse_label("NEGATIVE"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse_label("neutral"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::parse_label("mixed"), None);
        assert_eq!(Sentiment::parse_label("The sentiment is positive."), None);
    }

    #[test]
    fn test_note_embedding_text() {
        let note = sample_note();
        assert_eq!(note.embedding_text(), "Meeting Notes Discussed project timeline");
    }

    #[test]
    fn test_note_keyword_haystack_includes_category() {
        let note = sample_note();
        assert_eq!(
            note.keyword_haystack(),
            "meeting notes discussed project timeline work"
        );
    }

    #[test]
    fn test_note_deserializes_without_summary() {
        let json = r#"{
            "id": "6a2f41a3-c54c-fce8-32d2-0324e1c32e22",
            "title": "Shopping List",
            "content": "Buy groceries",
            "category": "Personal",
            "created_at": "2024-03-11T15:00:00Z",
            "updated_at": "2024-03-11T15:00:00Z",
            "user_id": "00000000-0000-0000-0000-000000000001"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.category, Category::Personal);
        assert!(note.summary.is_none());
    }
}
