//! Offline index build.
//!
//! Reads the cleaned catalog, derives one embedding text per row, encodes
//! the texts in batches, and writes the vector file in catalog row order.
//! Writing in row order is what establishes the ordinal alignment between
//! the two artifacts; the service verifies the row counts once at startup
//! and trusts the alignment afterwards.

use std::path::Path;

use crate::catalog::{CatalogRecord, CatalogStore};
use crate::embedding::TextEncoder;
use crate::error::{RecommendError, RecommendResult};
use crate::vector::VectorFileWriter;

/// Builds the vector file for a catalog.
pub struct IndexBuilder<'a> {
    encoder: &'a dyn TextEncoder,
    batch_size: usize,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(encoder: &'a dyn TextEncoder, batch_size: usize) -> Self {
        Self {
            encoder,
            batch_size: batch_size.max(1),
        }
    }

    /// Embeds every catalog row and writes the vector file at `output`.
    /// Returns the number of rows written.
    pub fn build(&self, catalog: &CatalogStore, output: impl AsRef<Path>) -> RecommendResult<usize> {
        let texts: Vec<String> = catalog.iter().map(embedding_text).collect();
        tracing::info!(rows = texts.len(), "embedding catalog rows");

        let mut writer = VectorFileWriter::create(output.as_ref(), self.encoder.dimension())?;

        for (batch_idx, batch) in texts.chunks(self.batch_size).enumerate() {
            let vectors = self
                .encoder
                .encode_batch(batch)
                .map_err(|e| RecommendError::Embedding(e.to_string()))?;

            if vectors.len() != batch.len() {
                return Err(RecommendError::Embedding(format!(
                    "encoder returned {} vectors for a batch of {}",
                    vectors.len(),
                    batch.len()
                )));
            }

            for vector in &vectors {
                writer.append(vector)?;
            }
            tracing::debug!(batch = batch_idx, size = batch.len(), "batch embedded");
        }

        let written = writer.finish()?;
        tracing::info!(rows = written, path = %output.as_ref().display(), "index built");
        Ok(written)
    }
}

/// Derives the text that represents a catalog row in embedding space:
/// name, description, and labeled test type and duration, joined by ". "
/// with empty parts skipped.
#[must_use]
pub fn embedding_text(record: &CatalogRecord) -> String {
    let name = record.name.as_deref().unwrap_or("");
    let description = record.description.as_deref().unwrap_or("");
    let test_type = record.test_type.as_deref().unwrap_or("");
    let duration = record.duration.as_deref().unwrap_or("");

    let mut parts: Vec<String> = Vec::with_capacity(4);
    if !name.is_empty() {
        parts.push(name.to_string());
    }
    if !description.is_empty() {
        parts.push(description.to_string());
    }
    if !test_type.is_empty() {
        parts.push(format!("Test type: {test_type}"));
    }
    if !duration.is_empty() {
        parts.push(format!("Duration: {duration}"));
    }
    parts.join(". ")
}
