//! In-memory storage implementation.

use super::{RasterStorage, StorageError, StorageResult};
use crate::frames::FrameId;
use std::collections::HashMap;
use std::sync::RwLock;
use tiny_skia::Pixmap;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    rasters: RwLock<HashMap<FrameId, Pixmap>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl RasterStorage for MemoryStorage {
    fn save(&self, id: &FrameId, raster: &Pixmap) -> StorageResult<()> {
        let mut rasters = self.rasters.write().map_err(lock_error)?;
        rasters.insert(id.clone(), raster.clone());
        Ok(())
    }

    fn load(&self, id: &FrameId) -> StorageResult<Option<Pixmap>> {
        let rasters = self.rasters.read().map_err(lock_error)?;
        Ok(rasters.get(id).cloned())
    }

    fn delete(&self, id: &FrameId) -> StorageResult<()> {
        let mut rasters = self.rasters.write().map_err(lock_error)?;
        rasters.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<FrameId>> {
        let rasters = self.rasters.read().map_err(lock_error)?;
        Ok(rasters.keys().cloned().collect())
    }

    fn exists(&self, id: &FrameId) -> StorageResult<bool> {
        let rasters = self.rasters.read().map_err(lock_error)?;
        Ok(rasters.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_raster() -> Pixmap {
        let mut raster = Pixmap::new(4, 4).unwrap();
        raster.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        raster
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let id = FrameId::from("frame");
        storage.save(&id, &red_raster()).unwrap();

        let loaded = storage.load(&id).unwrap().unwrap();
        assert_eq!(loaded.data(), red_raster().data());
        assert!(storage.exists(&id).unwrap());
    }

    #[test]
    fn test_missing_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.load(&FrameId::from("nonexistent")).unwrap().is_none());
    }

    #[test]
    fn test_delete_and_clear() {
        let storage = MemoryStorage::new();
        storage.save(&FrameId::from("a"), &red_raster()).unwrap();
        storage.save(&FrameId::from("b"), &red_raster()).unwrap();

        storage.delete(&FrameId::from("a")).unwrap();
        storage.delete(&FrameId::from("a")).unwrap();
        assert_eq!(storage.list().unwrap(), vec![FrameId::from("b")]);

        storage.clear().unwrap();
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_copy() {
        let storage = MemoryStorage::new();
        let a = FrameId::from("a");
        let b = FrameId::from("b");
        assert!(!storage.copy(&a, &b).unwrap());

        storage.save(&a, &red_raster()).unwrap();
        assert!(storage.copy(&a, &b).unwrap());
        assert!(storage.exists(&b).unwrap());
    }
}
