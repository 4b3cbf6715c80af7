//! Catalog data: raw CSV rows, typed candidates, and the ordinal store.

pub mod record;
pub mod store;

pub use record::{Assessment, CatalogRecord, parse_duration_minutes};
pub use store::CatalogStore;
