//! File-based storage implementation.

use super::{RasterStorage, StorageError, StorageResult};
use crate::frames::FrameId;
use std::fs;
use std::path::{Path, PathBuf};
use tiny_skia::Pixmap;

/// File-based raster storage.
///
/// Stores one PNG file per frame in a specified directory.
pub struct FileStorage {
    /// Base directory for raster storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/flipbook/frames/`
    /// On Windows: `%LOCALAPPDATA%\flipbook\frames\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("flipbook").join("frames"))
    }

    /// Get the file path for a frame id.
    fn raster_path(&self, id: &FrameId) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = id
            .as_str()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.png", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl RasterStorage for FileStorage {
    fn save(&self, id: &FrameId, raster: &Pixmap) -> StorageResult<()> {
        let path = self.raster_path(id);
        let png = raster.encode_png().map_err(|e| {
            StorageError::Serialization(format!("Failed to encode {}: {}", id, e))
        })?;
        fs::write(&path, png)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn load(&self, id: &FrameId) -> StorageResult<Option<Pixmap>> {
        let path = self.raster_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Pixmap::decode_png(&bytes).map(Some).map_err(|e| {
            StorageError::Serialization(format!("Failed to decode {}: {}", path.display(), e))
        })
    }

    fn delete(&self, id: &FrameId) -> StorageResult<()> {
        let path = self.raster_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<FrameId>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Only include .png files
            if path.extension().is_some_and(|e| e == "png") {
                if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(FrameId::from(name));
                }
            }
        }
        Ok(ids)
    }

    fn exists(&self, id: &FrameId) -> StorageResult<bool> {
        Ok(self.raster_path(id).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn raster() -> Pixmap {
        let mut raster = Pixmap::new(6, 5).unwrap();
        raster.fill(tiny_skia::Color::from_rgba8(25, 118, 219, 255));
        raster
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let id = FrameId::from("frame-1");

        storage.save(&id, &raster()).unwrap();
        let loaded = storage.load(&id).unwrap().unwrap();

        assert_eq!((loaded.width(), loaded.height()), (6, 5));
        assert_eq!(loaded.data(), raster().data());
    }

    #[test]
    fn test_file_storage_missing_is_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        assert!(storage.load(&FrameId::from("nonexistent")).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("bad.png"), b"not a png").unwrap();

        let result = storage.load(&FrameId::from("bad"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.save(&FrameId::from("f1"), &raster()).unwrap();
        storage.save(&FrameId::from("f2"), &raster()).unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&FrameId::from("f1")));
        assert!(list.contains(&FrameId::from("f2")));
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let id = FrameId::from("test");

        storage.save(&id, &raster()).unwrap();
        assert!(storage.exists(&id).unwrap());

        storage.delete(&id).unwrap();
        assert!(!storage.exists(&id).unwrap());
        storage.delete(&id).unwrap();
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let id = FrameId::from("test/frame:with*special");

        storage.save(&id, &raster()).unwrap();
        assert!(storage.load(&id).unwrap().is_some());
        assert!(dir.path().join("test_frame_with_special.png").exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(nested.clone()).unwrap();

        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }
}
