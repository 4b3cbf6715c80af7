//! Test-type balancing.
//!
//! Similarity retrieval clusters results around one semantic theme: a
//! technical query returns a page of knowledge tests. The balancer re-ranks
//! under fixed category quotas so the result mixes test types even when the
//! embedding space does not separate them.
//!
//! Known behavior, kept as the source system behaves: unused quota in the
//! knowledge or personality bucket is not redistributed to the other one.
//! Leftover slots are only filled from the "other" bucket through the single
//! shared backfill count, so a result can come back shorter than `top_k`
//! when the knowledge bucket runs dry.

use crate::catalog::Assessment;

/// Share of the result reserved for knowledge-type tests.
const KNOWLEDGE_SHARE: f64 = 0.6;

/// Share of the result reserved for personality-type tests.
const PERSONALITY_SHARE: f64 = 0.4;

/// Re-ranks similarity-ordered candidates under the category quotas.
///
/// Bucket assignment is a case-insensitive substring match on the test
/// type, with "knowledge" taking priority over "personality"; everything
/// else lands in the backfill bucket. Order within each bucket is the
/// input (similarity) order.
#[must_use]
pub fn balance_by_test_type(candidates: Vec<Assessment>, top_k: usize) -> Vec<Assessment> {
    let mut knowledge = Vec::new();
    let mut personality = Vec::new();
    let mut other = Vec::new();

    for candidate in candidates {
        let test_type = candidate.test_type.to_lowercase();
        if test_type.contains("knowledge") {
            knowledge.push(candidate);
        } else if test_type.contains("personality") {
            personality.push(candidate);
        } else {
            other.push(candidate);
        }
    }

    let knowledge_quota = (top_k as f64 * KNOWLEDGE_SHARE) as usize;
    let personality_quota = (top_k as f64 * PERSONALITY_SHARE) as usize;

    let mut result: Vec<Assessment> = Vec::with_capacity(top_k);
    result.extend(knowledge.into_iter().take(knowledge_quota));
    result.extend(personality.into_iter().take(personality_quota));

    let remaining = top_k.saturating_sub(result.len());
    if remaining > 0 {
        result.extend(other.into_iter().take(remaining));
    }

    result.truncate(top_k);
    result
}
