//! Vector retrieval: typed wrappers, the memory-mapped embedding file,
//! and exact inner-product search over it.

pub mod index;
pub mod storage;
pub mod types;

pub use index::VectorIndex;
pub use storage::{MmapVectorStorage, VectorFileWriter};
pub use types::{Score, VECTOR_DIMENSION_384, VectorDimension, VectorError};
