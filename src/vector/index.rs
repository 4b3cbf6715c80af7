//! Exact nearest-neighbor search over the memory-mapped embedding file.
//!
//! The corpus is small (hundreds of catalog entries), so search is a full
//! scan with inner-product scoring. All stored vectors and query vectors
//! are unit-normalized, which makes inner product equal to cosine
//! similarity.

use std::path::Path;

use crate::vector::storage::MmapVectorStorage;
use crate::vector::types::{Score, VectorDimension, VectorError};

/// Read-only similarity index over the catalog embeddings.
///
/// Entry `i` corresponds to catalog row `i`; the index never re-checks
/// that alignment per request, it is verified once at service startup.
#[derive(Debug)]
pub struct VectorIndex {
    storage: MmapVectorStorage,
}

impl VectorIndex {
    /// Opens the prebuilt vector file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VectorError> {
        let storage = MmapVectorStorage::open(path)?;
        Ok(Self { storage })
    }

    /// Number of indexed vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.row_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.row_count() == 0
    }

    /// Dimension of the indexed vectors.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.storage.dimension()
    }

    /// Returns the `n` highest-scoring positions for `query`, in descending
    /// score order with ties broken by ascending position.
    ///
    /// Requesting more results than the corpus holds returns every entry.
    pub fn search(&self, query: &[f32], n: usize) -> Result<Vec<(usize, Score)>, VectorError> {
        self.storage.dimension().validate_vector(query)?;

        let mut scored = Vec::with_capacity(self.storage.row_count());
        for pos in 0..self.storage.row_count() {
            let row = self
                .storage
                .row(pos)
                .ok_or_else(|| VectorError::InvalidFormat(format!("row {pos} unreadable")))?;
            scored.push((pos, Score::new(inner_product(query, row))?));
        }

        // Stable sort over the ordinal scan keeps ascending-position order
        // for equal scores.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(n);
        Ok(scored)
    }
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
