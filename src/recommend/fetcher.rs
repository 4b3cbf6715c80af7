//! Candidate materialization.
//!
//! Turns the positions returned by the vector index into sanitized
//! `Assessment` candidates, preserving retrieval order. A position outside
//! the catalog means the offline artifacts are out of sync, which is an
//! invariant violation, not a data-quality problem.

use crate::catalog::{Assessment, CatalogStore};
use crate::error::{RecommendError, RecommendResult};
use crate::vector::Score;

/// Maps retrieved positions to catalog candidates in input order.
pub fn fetch_candidates(
    catalog: &CatalogStore,
    hits: &[(usize, Score)],
) -> RecommendResult<Vec<Assessment>> {
    let mut candidates = Vec::with_capacity(hits.len());
    for (pos, _score) in hits {
        let record = catalog
            .get(*pos)
            .ok_or_else(|| RecommendError::CorpusMisaligned {
                reason: format!(
                    "vector index returned position {pos} but the catalog has {} rows",
                    catalog.len()
                ),
            })?;
        candidates.push(Assessment::from_record(record));
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;

    fn store() -> CatalogStore {
        CatalogStore::from_records(vec![
            CatalogRecord {
                name: Some("A".to_string()),
                url: Some("https://example.com/a".to_string()),
                description: Some("first".to_string()),
                test_type: Some("Knowledge & Skills".to_string()),
                duration: Some("30 minutes".to_string()),
                remote_support: Some("Yes".to_string()),
                adaptive_support: Some("No".to_string()),
            },
            CatalogRecord {
                name: Some("B".to_string()),
                url: Some("https://example.com/b".to_string()),
                description: None,
                test_type: Some("Personality & Behavior".to_string()),
                duration: None,
                remote_support: None,
                adaptive_support: None,
            },
        ])
    }

    fn hit(pos: usize) -> (usize, Score) {
        (pos, Score::new(0.5).unwrap())
    }

    #[test]
    fn test_fetch_preserves_input_order() {
        let candidates = fetch_candidates(&store(), &[hit(1), hit(0)]).unwrap();
        assert_eq!(candidates[0].name, "B");
        assert_eq!(candidates[1].name, "A");
    }

    #[test]
    fn test_fetch_sanitizes_fields() {
        let candidates = fetch_candidates(&store(), &[hit(1)]).unwrap();
        assert_eq!(candidates[0].description, "");
        assert_eq!(candidates[0].duration_minutes, 0);
    }

    #[test]
    fn test_out_of_range_position_is_invariant_violation() {
        let err = fetch_candidates(&store(), &[hit(0), hit(7)]).unwrap_err();
        assert!(matches!(err, RecommendError::CorpusMisaligned { .. }));
    }
}
