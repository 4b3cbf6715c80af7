//! Immutable, ordinal-indexed catalog table.
//!
//! Loaded once at startup from the cleaned catalog CSV and never mutated.
//! Row `i` here is the same logical entity as row `i` of the vector file;
//! the `Recommender` verifies that alignment at construction.

use std::path::Path;

use crate::catalog::record::CatalogRecord;
use crate::error::{RecommendError, RecommendResult};

/// Read-only table of catalog records indexed by ordinal position.
#[derive(Debug)]
pub struct CatalogStore {
    records: Vec<CatalogRecord>,
}

impl CatalogStore {
    /// Loads the catalog from a CSV file with the fixed column headers
    /// produced by the upstream cleaning step.
    pub fn load(path: impl AsRef<Path>) -> RecommendResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| RecommendError::CatalogLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: CatalogRecord = row.map_err(|e| RecommendError::CatalogLoad {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
            records.push(record);
        }

        tracing::info!(rows = records.len(), path = %path.display(), "catalog loaded");
        Ok(Self { records })
    }

    /// Builds a store directly from records. Used by tests and the
    /// offline index builder.
    #[must_use]
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// Returns the record at ordinal position `pos`.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&CatalogRecord> {
        self.records.get(pos)
    }

    /// Number of catalog rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.iter()
    }
}
