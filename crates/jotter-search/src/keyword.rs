//! Conjunctive keyword filter used when the generation service is unavailable.

use jotter_core::Note;

/// Lower-cased, whitespace-separated query terms. Empty terms are dropped.
pub fn query_terms(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Whether `note` contains every term in its title, content or category.
pub fn matches_all(note: &Note, terms: &[String]) -> bool {
    let haystack = note.keyword_haystack();
    terms.iter().all(|term| haystack.contains(term.as_str()))
}

/// Keep the notes that contain all query terms, in their original order.
pub fn keyword_filter(query: &str, notes: &[Note]) -> Vec<Note> {
    let terms = query_terms(query);
    notes
        .iter()
        .filter(|note| matches_all(note, &terms))
        .cloned()
        .collect()
}
