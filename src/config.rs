//! Configuration module for the recommendation service.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`recsift.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `RECSIFT_` and use double
//! underscores to separate nested levels:
//! - `RECSIFT_SERVER__BIND=0.0.0.0:8080` sets `server.bind`
//! - `RECSIFT_EMBEDDING__MODEL=all-minilm-l6-v2` sets `embedding.model`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RecommendError, RecommendResult};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Path to the cleaned catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Path to the prebuilt vector file
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Embedding settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmbeddingConfig {
    /// Sentence encoder model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Optional cache directory for downloaded model files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Batch size for offline index builds
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            index_path: default_index_path(),
            embedding: EmbeddingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            cache_dir: None,
            batch_size: default_batch_size(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Settings {
    /// Loads settings: defaults, then `recsift.toml` in the working
    /// directory, then `RECSIFT_` environment variables.
    pub fn load() -> RecommendResult<Self> {
        Self::load_from("recsift.toml")
    }

    /// Loads settings with an explicit TOML path. The file is optional;
    /// defaults and environment variables apply either way.
    pub fn load_from(config_path: impl Into<PathBuf>) -> RecommendResult<Self> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path.into()))
            .merge(Env::prefixed("RECSIFT_").split("__"))
            .extract()
            .map_err(|e| RecommendError::Config {
                reason: e.to_string(),
            })
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/processed/catalog_clean.csv")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("data/index/catalog.vec")
}

fn default_embedding_model() -> String {
    "all-minilm-l12-v2".to_string()
}

fn default_batch_size() -> usize {
    32
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
