//! The query-to-recommendation pipeline.
//!
//! `Recommender` is the immutable service context: catalog, vector index,
//! and text encoder, assembled once at startup and shared by reference
//! across concurrent requests. A request is a single synchronous pass:
//! validate, clamp, expand, encode, retrieve, materialize, balance.

pub mod balancer;
pub mod fetcher;

pub use balancer::balance_by_test_type;
pub use fetcher::fetch_candidates;

use crate::catalog::{Assessment, CatalogStore};
use crate::embedding::TextEncoder;
use crate::error::{RecommendError, RecommendResult};
use crate::expand::expand_query;
use crate::vector::VectorIndex;

/// How many candidates to retrieve before balancing. Larger than any
/// allowed `top_k` so each category bucket has raw material.
pub const OVERSAMPLE: usize = 30;

/// Largest `top_k` a caller can request; higher values are clamped down.
pub const MAX_TOP_K: usize = 10;

/// The assembled recommendation service.
pub struct Recommender {
    catalog: CatalogStore,
    index: VectorIndex,
    encoder: Box<dyn TextEncoder>,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("catalog_rows", &self.catalog.len())
            .field("index_rows", &self.index.len())
            .field("encoder", &"<TextEncoder>")
            .finish()
    }
}

impl Recommender {
    /// Assembles the service context, verifying once that the catalog and
    /// the vector index describe the same corpus. The check runs here, at
    /// startup, and never again per request.
    pub fn new(
        catalog: CatalogStore,
        index: VectorIndex,
        encoder: Box<dyn TextEncoder>,
    ) -> RecommendResult<Self> {
        if catalog.len() != index.len() {
            return Err(RecommendError::CorpusMisaligned {
                reason: format!(
                    "catalog has {} rows, vector index has {}",
                    catalog.len(),
                    index.len()
                ),
            });
        }

        if encoder.dimension() != index.dimension() {
            return Err(RecommendError::CorpusMisaligned {
                reason: format!(
                    "encoder produces {}-dimensional vectors, index stores {}-dimensional",
                    encoder.dimension().get(),
                    index.dimension().get()
                ),
            });
        }

        Ok(Self {
            catalog,
            index,
            encoder,
        })
    }

    /// Recommends up to `top_k` assessments for a free-text query.
    ///
    /// `top_k` is clamped to `[1, 10]` before use. An empty or
    /// whitespace-only query is a validation error. The result is ordered,
    /// contains no duplicates, and is deterministic for a given query and
    /// corpus.
    pub fn recommend(&self, query: &str, top_k: i64) -> RecommendResult<Vec<Assessment>> {
        if query.trim().is_empty() {
            return Err(RecommendError::EmptyQuery);
        }

        let top_k = top_k.clamp(1, MAX_TOP_K as i64) as usize;

        let expanded = expand_query(query);
        tracing::debug!(query, expanded, top_k, "processing recommendation request");

        let query_vector = self
            .encoder
            .encode(&expanded)
            .map_err(|e| RecommendError::Embedding(e.to_string()))?;

        let hits = self.index.search(&query_vector, OVERSAMPLE)?;
        let candidates = fetch_candidates(&self.catalog, &hits)?;
        let results = balance_by_test_type(candidates, top_k);

        tracing::debug!(returned = results.len(), "recommendation computed");
        Ok(results)
    }

    /// Number of catalog entries served.
    #[must_use]
    pub fn catalog_size(&self) -> usize {
        self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;
    use crate::embedding::normalize;
    use crate::vector::{VectorDimension, VectorError, VectorFileWriter};

    /// Deterministic encoder: hashes keywords onto fixed axes so tests can
    /// steer retrieval without a model download.
    struct StubEncoder;

    impl TextEncoder for StubEncoder {
        fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, VectorError> {
            Ok(texts.iter().map(|t| stub_vector(t)).collect())
        }

        fn dimension(&self) -> VectorDimension {
            VectorDimension::new(4).unwrap()
        }
    }

    fn stub_vector(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let mut v = vec![0.0f32; 4];
        if lowered.contains("java") || lowered.contains("knowledge") {
            v[0] += 1.0;
        }
        if lowered.contains("team") || lowered.contains("personality") {
            v[1] += 1.0;
        }
        if lowered.contains("numerical") {
            v[2] += 1.0;
        }
        if v.iter().all(|&x| x == 0.0) {
            v[3] = 1.0;
        }
        normalize(&mut v);
        v
    }

    fn record(name: &str, test_type: &str) -> CatalogRecord {
        CatalogRecord {
            name: Some(name.to_string()),
            url: Some(format!("https://example.com/{name}")),
            description: Some(format!("{name} assessment")),
            test_type: Some(test_type.to_string()),
            duration: Some("30 minutes".to_string()),
            remote_support: Some("Yes".to_string()),
            adaptive_support: Some("No".to_string()),
        }
    }

    fn build_recommender(records: Vec<CatalogRecord>) -> (tempfile::TempDir, Recommender) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.vec");
        let encoder = StubEncoder;

        let mut writer =
            VectorFileWriter::create(&path, VectorDimension::new(4).unwrap()).unwrap();
        for r in &records {
            let text = format!(
                "{} {}",
                r.name.as_deref().unwrap_or(""),
                r.test_type.as_deref().unwrap_or("")
            );
            writer.append(&stub_vector(&text)).unwrap();
        }
        writer.finish().unwrap();

        let index = VectorIndex::open(&path).unwrap();
        let catalog = CatalogStore::from_records(records);
        let recommender = Recommender::new(catalog, index, Box::new(encoder)).unwrap();
        (dir, recommender)
    }

    fn sample_records() -> Vec<CatalogRecord> {
        let mut records = Vec::new();
        for i in 0..8 {
            records.push(record(&format!("java-{i}"), "Knowledge & Skills"));
        }
        for i in 0..8 {
            records.push(record(&format!("team-{i}"), "Personality & Behavior"));
        }
        for i in 0..8 {
            records.push(record(&format!("numerical-{i}"), "Ability & Aptitude"));
        }
        records
    }

    #[test]
    fn test_empty_query_is_rejected() {
        let (_dir, recommender) = build_recommender(sample_records());
        assert!(matches!(
            recommender.recommend("   ", 10),
            Err(RecommendError::EmptyQuery)
        ));
    }

    #[test]
    fn test_top_k_is_clamped() {
        let (_dir, recommender) = build_recommender(sample_records());

        let capped = recommender.recommend("java developer team", 500).unwrap();
        assert!(capped.len() <= 10);

        let floored = recommender.recommend("numerical reasoning", -5).unwrap();
        assert_eq!(floored.len(), 1);
    }

    #[test]
    fn test_result_respects_quotas() {
        let (_dir, recommender) = build_recommender(sample_records());
        let results = recommender
            .recommend("Senior Java backend developer needing strong stakeholder collaboration", 10)
            .unwrap();

        let knowledge = results
            .iter()
            .filter(|a| a.test_type.to_lowercase().contains("knowledge"))
            .count();
        let personality = results
            .iter()
            .filter(|a| a.test_type.to_lowercase().contains("personality"))
            .count();
        assert!(knowledge <= 6);
        assert!(personality <= 4);
        assert!(results.len() <= 10);
    }

    #[test]
    fn test_no_duplicate_results() {
        let (_dir, recommender) = build_recommender(sample_records());
        let results = recommender.recommend("java developer", 10).unwrap();
        let mut names: Vec<&str> = results.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), results.len());
    }

    #[test]
    fn test_determinism() {
        let (_dir, recommender) = build_recommender(sample_records());
        let a = recommender.recommend("java developer team lead", 10).unwrap();
        let b = recommender.recommend("java developer team lead", 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_row_count_mismatch_is_rejected_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.vec");
        let mut writer =
            VectorFileWriter::create(&path, VectorDimension::new(4).unwrap()).unwrap();
        writer.append(&[1.0, 0.0, 0.0, 0.0]).unwrap();
        writer.finish().unwrap();

        let index = VectorIndex::open(&path).unwrap();
        let catalog = CatalogStore::from_records(sample_records());

        let err = Recommender::new(catalog, index, Box::new(StubEncoder)).unwrap_err();
        assert!(matches!(err, RecommendError::CorpusMisaligned { .. }));
    }
}
