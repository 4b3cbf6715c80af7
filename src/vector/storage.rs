//! Memory-mapped storage for the prebuilt embedding file.
//!
//! The vector file is written once by the offline index build and is
//! read-only for the lifetime of the service. Rows are positional: the
//! vector at row `i` belongs to the catalog record at row `i`. That ordinal
//! alignment is the file format's contract, so rows carry no per-vector id.
//!
//! # Storage Format
//!
//! - Header (16 bytes): magic, version, dimension, row count
//! - Rows: contiguous f32 arrays in little-endian format
//!
//! Access is memory-mapped, so startup cost is one header validation and
//! row reads are served from the OS page cache.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};

use crate::vector::types::{VectorDimension, VectorError};

/// Current storage format version.
const STORAGE_VERSION: u32 = 1;

/// Size of the storage header in bytes.
const HEADER_SIZE: usize = 16;

/// Magic bytes to identify recsift vector files.
const MAGIC_BYTES: &[u8; 4] = b"RVEC";

/// Number of bytes per f32 value.
const BYTES_PER_F32: usize = 4;

/// Read-only memory-mapped view of the embedding file.
pub struct MmapVectorStorage {
    mmap: Mmap,
    dimension: VectorDimension,
    row_count: usize,
}

impl std::fmt::Debug for MmapVectorStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmapVectorStorage")
            .field("dimension", &self.dimension)
            .field("row_count", &self.row_count)
            .finish()
    }
}

impl MmapVectorStorage {
    /// Opens an existing vector file, validating magic, version, and that
    /// the file length matches the header's dimension and row count.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VectorError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            VectorError::Storage(std::io::Error::new(
                e.kind(),
                format!("cannot open vector file {}: {e}", path.display()),
            ))
        })?;
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let (version, dimension, row_count) = Self::read_header(&mmap)?;

        if version != STORAGE_VERSION {
            return Err(VectorError::VersionMismatch {
                expected: STORAGE_VERSION,
                actual: version,
            });
        }

        let expected_len = HEADER_SIZE + row_count * dimension.get() * BYTES_PER_F32;
        if mmap.len() != expected_len {
            return Err(VectorError::InvalidFormat(format!(
                "file is {} bytes but header declares {} rows of dimension {} ({} bytes)",
                mmap.len(),
                row_count,
                dimension.get(),
                expected_len
            )));
        }

        Ok(Self {
            mmap,
            dimension,
            row_count,
        })
    }

    /// Returns the vector stored at `row`, or `None` if out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.row_count {
            return None;
        }

        let dim = self.dimension.get();
        let offset = HEADER_SIZE + row * dim * BYTES_PER_F32;
        let bytes = &self.mmap[offset..offset + dim * BYTES_PER_F32];

        // Row offsets are multiples of 4 from a page-aligned mapping, and
        // the file stores native-endian-compatible little-endian f32s.
        let (prefix, floats, suffix) = unsafe { bytes.align_to::<f32>() };
        debug_assert!(prefix.is_empty() && suffix.is_empty());
        Some(floats)
    }

    /// Number of rows stored.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Dimension of every row.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn read_header(mmap: &Mmap) -> Result<(u32, VectorDimension, usize), VectorError> {
        if mmap.len() < HEADER_SIZE {
            return Err(VectorError::InvalidFormat(
                "file too small to contain header".to_string(),
            ));
        }

        if &mmap[0..4] != MAGIC_BYTES {
            return Err(VectorError::InvalidFormat(
                "missing RVEC magic bytes".to_string(),
            ));
        }

        let version = u32::from_le_bytes([mmap[4], mmap[5], mmap[6], mmap[7]]);
        let dim = u32::from_le_bytes([mmap[8], mmap[9], mmap[10], mmap[11]]) as usize;
        let row_count = u32::from_le_bytes([mmap[12], mmap[13], mmap[14], mmap[15]]) as usize;

        let dimension = VectorDimension::new(dim)?;
        Ok((version, dimension, row_count))
    }
}

/// Streaming writer for the embedding file, used only by the offline
/// index build. Rows must be appended in catalog order; that is what
/// establishes the ordinal alignment the reader assumes.
pub struct VectorFileWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    dimension: VectorDimension,
    rows_written: usize,
}

impl VectorFileWriter {
    /// Creates the file and writes a header with a zero row count.
    /// The count is fixed up by `finish()`.
    pub fn create(
        path: impl AsRef<Path>,
        dimension: VectorDimension,
    ) -> Result<Self, VectorError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC_BYTES)?;
        writer.write_all(&STORAGE_VERSION.to_le_bytes())?;
        writer.write_all(&(dimension.get() as u32).to_le_bytes())?;
        writer.write_all(&0u32.to_le_bytes())?;

        Ok(Self {
            path,
            writer,
            dimension,
            rows_written: 0,
        })
    }

    /// Appends one vector as the next row.
    pub fn append(&mut self, vector: &[f32]) -> Result<(), VectorError> {
        self.dimension.validate_vector(vector)?;

        for &value in vector {
            self.writer.write_all(&value.to_le_bytes())?;
        }
        self.rows_written += 1;
        Ok(())
    }

    /// Flushes buffered rows and patches the header with the final count.
    pub fn finish(mut self) -> Result<usize, VectorError> {
        use std::io::Seek;

        self.writer.flush()?;
        let mut file = self.writer.into_inner().map_err(|e| {
            VectorError::Storage(std::io::Error::other(format!(
                "failed to flush vector file: {e}"
            )))
        })?;

        file.seek(std::io::SeekFrom::Start(12))?;
        file.write_all(&(self.rows_written as u32).to_le_bytes())?;
        file.flush()?;

        tracing::debug!(
            rows = self.rows_written,
            path = %self.path.display(),
            "vector file written"
        );
        Ok(self.rows_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &std::path::Path, rows: &[Vec<f32>], dim: usize) -> PathBuf {
        let path = dir.join("catalog.vec");
        let mut writer =
            VectorFileWriter::create(&path, VectorDimension::new(dim).unwrap()).unwrap();
        for row in rows {
            writer.append(row).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), rows.len());
        path
    }

    #[test]
    fn test_write_then_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
        let path = write_file(dir.path(), &rows, 3);

        let storage = MmapVectorStorage::open(&path).unwrap();
        assert_eq!(storage.row_count(), 2);
        assert_eq!(storage.dimension().get(), 3);
        assert_eq!(storage.row(0).unwrap(), &[1.0, 0.0, 0.0]);
        assert_eq!(storage.row(1).unwrap(), &[0.0, 1.0, 0.0]);
        assert!(storage.row(2).is_none());
    }

    #[test]
    fn test_open_rejects_wrong_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.vec");
        std::fs::write(&path, b"NOPE\x01\x00\x00\x00\x03\x00\x00\x00\x00\x00\x00\x00").unwrap();

        let err = MmapVectorStorage::open(&path).unwrap_err();
        assert!(matches!(err, VectorError::InvalidFormat(_)));
    }

    #[test]
    fn test_open_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![vec![1.0f32, 0.0, 0.0]];
        let path = write_file(dir.path(), &rows, 3);

        // Drop the last 4 bytes so the length no longer matches the header
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 4]).unwrap();

        let err = MmapVectorStorage::open(&path).unwrap_err();
        assert!(matches!(err, VectorError::InvalidFormat(_)));
    }

    #[test]
    fn test_append_rejects_wrong_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.vec");
        let mut writer =
            VectorFileWriter::create(&path, VectorDimension::new(3).unwrap()).unwrap();
        assert!(writer.append(&[1.0, 2.0]).is_err());
    }
}
