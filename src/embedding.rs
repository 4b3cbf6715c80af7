//! Text encoding for queries and catalog rows.
//!
//! Provides the trait the pipeline depends on and a fastembed-backed
//! implementation. The encoder is the dominant latency cost of a request
//! and is treated as a black-box synchronous call; everything downstream
//! of it is cheap arithmetic.

use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::vector::{VectorDimension, VectorError};

/// Maps text to a fixed-dimension unit-normalized vector.
///
/// Implementations must be thread-safe; the service shares one encoder
/// across concurrent requests.
pub trait TextEncoder: Send + Sync {
    /// Encode a batch of texts, one vector per input, in input order.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, VectorError>;

    /// Encode a single text.
    fn encode(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        let mut vectors = self.encode_batch(std::slice::from_ref(&text.to_string()))?;
        vectors.pop().ok_or_else(|| {
            VectorError::InvalidFormat("encoder returned no vector for input".to_string())
        })
    }

    /// Dimension of produced vectors.
    fn dimension(&self) -> VectorDimension;
}

/// FastEmbed implementation using the all-MiniLM-L12-v2 sentence encoder,
/// the model the catalog embeddings are built with (384 dimensions).
pub struct FastEmbedEncoder {
    model: Mutex<TextEmbedding>,
    dimension: VectorDimension,
}

impl std::fmt::Debug for FastEmbedEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedEncoder")
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl FastEmbedEncoder {
    /// Create an encoder for the named model.
    ///
    /// Recognized names: `all-minilm-l12-v2` (default), `all-minilm-l6-v2`.
    ///
    /// # Errors
    /// Returns an error if the model name is unknown or the model fails to
    /// initialize or download.
    pub fn new(model_name: &str, cache_dir: Option<PathBuf>) -> Result<Self, VectorError> {
        let model = match model_name {
            "all-minilm-l12-v2" => EmbeddingModel::AllMiniLML12V2,
            "all-minilm-l6-v2" => EmbeddingModel::AllMiniLML6V2,
            other => {
                return Err(VectorError::InvalidFormat(format!(
                    "unknown embedding model '{other}', expected all-minilm-l12-v2 or all-minilm-l6-v2"
                )));
            }
        };

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options).map_err(|e| {
            VectorError::InvalidFormat(format!(
                "Failed to initialize embedding model: {e}. Ensure you have internet connection for first-time model download"
            ))
        })?;

        Ok(Self {
            model: Mutex::new(model),
            dimension: VectorDimension::dimension_384(),
        })
    }
}

impl TextEncoder for FastEmbedEncoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, VectorError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .model
            .lock()
            .map_err(|_| {
                VectorError::InvalidFormat(
                    "failed to acquire embedding model lock, model may be poisoned".to_string(),
                )
            })?
            .embed(texts.to_vec(), None)
            .map_err(|e| {
                VectorError::InvalidFormat(format!("failed to generate embeddings: {e}"))
            })?;

        let mut normalized = Vec::with_capacity(embeddings.len());
        for mut vector in embeddings {
            self.dimension.validate_vector(&vector)?;
            normalize(&mut vector);
            normalized.push(vector);
        }
        Ok(normalized)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

/// Scales `vector` to unit length. Inner-product scoring in the index is
/// only cosine-equivalent for unit vectors, so the encoder owns this
/// invariant rather than trusting model defaults.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}
