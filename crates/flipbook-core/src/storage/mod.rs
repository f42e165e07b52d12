//! Raster storage: frame pixels addressed by frame id.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;
use tiny_skia::Pixmap;

use crate::frames::FrameId;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Raster not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for raster storage backends.
///
/// Ids are opaque; backends decide how to map them to keys or files.
pub trait RasterStorage: Send + Sync {
    /// Save a raster, replacing any previous one.
    fn save(&self, id: &FrameId, raster: &Pixmap) -> StorageResult<()>;

    /// Load a raster. `None` when nothing is stored under `id`.
    fn load(&self, id: &FrameId) -> StorageResult<Option<Pixmap>>;

    /// Delete a raster. Deleting a missing raster is not an error.
    fn delete(&self, id: &FrameId) -> StorageResult<()>;

    /// List all stored ids.
    fn list(&self) -> StorageResult<Vec<FrameId>>;

    /// Check if a raster exists.
    fn exists(&self, id: &FrameId) -> StorageResult<bool>;

    /// Copy the raster stored under `from` to `to`. Returns whether there
    /// was anything to copy.
    fn copy(&self, from: &FrameId, to: &FrameId) -> StorageResult<bool> {
        match self.load(from)? {
            Some(raster) => {
                self.save(to, &raster)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete every stored raster.
    fn clear(&self) -> StorageResult<()> {
        for id in self.list()? {
            self.delete(&id)?;
        }
        Ok(())
    }
}
