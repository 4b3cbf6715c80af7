//! recsift: assessment recommendations for free-text hiring queries.
//!
//! The pipeline combines semantic vector retrieval with a test-type
//! balancing heuristic: expand the query with category hints, encode it,
//! retrieve an oversampled candidate set from the prebuilt vector index,
//! materialize catalog records, and re-rank under fixed category quotas.

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod expand;
pub mod indexing;
pub mod recommend;
pub mod server;
pub mod vector;

// Explicit exports for better API clarity
pub use catalog::{Assessment, CatalogRecord, CatalogStore};
pub use config::Settings;
pub use embedding::{FastEmbedEncoder, TextEncoder};
pub use error::{RecommendError, RecommendResult};
pub use expand::expand_query;
pub use indexing::IndexBuilder;
pub use recommend::{MAX_TOP_K, OVERSAMPLE, Recommender};
pub use vector::{VectorDimension, VectorIndex};
