//! Vector similarity ranking.
//!
//! Scores each note embedding against the query embedding with cosine
//! similarity and orders notes by descending score. Exact ties keep their
//! input order.

use tracing::trace;

use jotter_core::{Note, RankError, SimilarityPair};

/// Calculate cosine similarity between two vectors of equal length.
///
/// A zero-magnitude vector scores 0.0. Callers must check lengths first;
/// see [`score_candidates`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Score every candidate against the query, in input order.
///
/// Fails on the first candidate whose vector length differs from the query's.
pub fn score_candidates<'a, V>(
    query: &[f32],
    candidates: &'a [(&'a Note, V)],
) -> Result<Vec<SimilarityPair<'a>>, RankError>
where
    V: AsRef<[f32]>,
{
    candidates
        .iter()
        .enumerate()
        .map(|(index, (note, vector))| {
            let vector = vector.as_ref();
            if vector.len() != query.len() {
                return Err(RankError::DimensionMismatch {
                    expected: query.len(),
                    actual: vector.len(),
                    index,
                });
            }
            let score = cosine_similarity(query, vector);
            trace!(note_id = %note.id, score, "Similarity score");
            Ok(SimilarityPair { note, score })
        })
        .collect()
}

/// Order candidates by descending cosine similarity to `query`.
///
/// Returns every candidate; nothing is thresholded or truncated.
pub fn rank<'a, V>(query: &[f32], candidates: &'a [(&'a Note, V)]) -> Result<Vec<&'a Note>, RankError>
where
    V: AsRef<[f32]>,
{
    let mut scored = score_candidates(query, candidates)?;
    // sort_by is stable, so equal scores keep candidate order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scored.into_iter().map(|pair| pair.note).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jotter_core::Category;
    use uuid::Uuid;

    fn note(title: &str) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            category: Category::Other,
            created_at: now,
            updated_at: now,
            user_id: Uuid::nil(),
            summary: None,
        }
    }

    fn titles(notes: &[&Note]) -> Vec<String> {
        notes.iter().map(|n| n.title.clone()).collect()
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let v = vec![0.5, 0.5, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let a = note("A");
        let b = note("B");
        let candidates = vec![(&b, vec![0.0, 1.0]), (&a, vec![1.0, 0.0])];
        let ranked = rank(&[1.0, 0.0], &candidates).unwrap();
        assert_eq!(titles(&ranked), vec!["A", "B"]);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let first = note("first");
        let second = note("second");
        let third = note("third");
        let candidates = vec![
            (&first, vec![0.0, 1.0]),
            (&second, vec![0.0, 2.0]),
            (&third, vec![1.0, 0.0]),
        ];
        let ranked = rank(&[0.0, 1.0], &candidates).unwrap();
        assert_eq!(titles(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_returns_every_candidate() {
        let notes: Vec<Note> = (0..5).map(|i| note(&i.to_string())).collect();
        let candidates: Vec<(&Note, Vec<f32>)> = notes
            .iter()
            .enumerate()
            .map(|(i, n)| (n, vec![i as f32, 1.0]))
            .collect();
        let ranked = rank(&[1.0, 0.0], &candidates).unwrap();
        assert_eq!(titles(&ranked), vec!["4", "3", "2", "1", "0"]);
    }

    #[test]
    fn test_rank_dimension_mismatch() {
        let a = note("A");
        let b = note("B");
        let candidates = vec![(&a, vec![1.0, 0.0]), (&b, vec![1.0, 0.0, 0.0])];
        let err = rank(&[1.0, 0.0], &candidates).unwrap_err();
        assert_eq!(
            err,
            RankError::DimensionMismatch {
                expected: 2,
                actual: 3,
                index: 1
            }
        );
    }

    #[test]
    fn test_score_candidates_preserves_input_order() {
        let a = note("A");
        let b = note("B");
        let candidates = vec![(&a, vec![0.0, 1.0]), (&b, vec![1.0, 0.0])];
        let scored = score_candidates(&[1.0, 0.0], &candidates).unwrap();
        assert_eq!(scored[0].note.title, "A");
        assert_eq!(scored[0].score, 0.0);
        assert!((scored[1].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_empty() {
        let candidates: Vec<(&Note, Vec<f32>)> = Vec::new();
        assert!(rank(&[1.0], &candidates).unwrap().is_empty());
    }
}
