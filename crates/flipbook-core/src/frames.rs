//! Frame identifiers and the ordered frame sequence.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque frame identifier. Storage addresses rasters by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(String);

impl FrameId {
    /// A fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for FrameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for FrameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One animation still. Its pixels live in raster storage under `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
}

impl Frame {
    pub fn new() -> Self {
        Self { id: FrameId::new() }
    }

    pub fn with_id(id: impl Into<FrameId>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of an ordered frame list.
pub trait FrameSource {
    fn frame_count(&self) -> usize;

    fn frame_at(&self, index: usize) -> Option<&Frame>;
}

/// Ordered frames plus the index of the frame being edited.
///
/// `current` is `None` only while the sequence is empty.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    current: Option<usize>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Frame> {
        self.current.and_then(|i| self.frames.get(i))
    }

    pub fn position(&self, id: &FrameId) -> Option<usize> {
        self.frames.iter().position(|f| &f.id == id)
    }

    /// Insert a frame at `index` (clamped to the end).
    ///
    /// The current frame stays current; its index shifts if needed. Into an
    /// empty sequence the new frame becomes current. Returns the index used.
    pub fn insert(&mut self, index: usize, frame: Frame) -> usize {
        let index = index.min(self.frames.len());
        self.frames.insert(index, frame);
        self.current = match self.current {
            Some(current) if index <= current => Some(current + 1),
            Some(current) => Some(current),
            None => Some(index),
        };
        index
    }

    /// Insert right after the current frame and make it current.
    pub fn insert_after_current(&mut self, frame: Frame) -> usize {
        let index = self.current.map_or(0, |i| i + 1);
        let index = self.insert(index, frame);
        self.current = Some(index);
        index
    }

    /// Remove the frame at `index`.
    ///
    /// If the current frame is removed the index stays put, stepping back
    /// only when it fell off the end.
    pub fn remove(&mut self, index: usize) -> Option<Frame> {
        if index >= self.frames.len() {
            return None;
        }
        let frame = self.frames.remove(index);
        self.current = match self.current {
            _ if self.frames.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) => Some(current.min(self.frames.len() - 1)),
            None => None,
        };
        Some(frame)
    }

    /// Make `index` current. Returns `false` if it is out of range.
    pub fn set_current_index(&mut self, index: usize) -> bool {
        if index >= self.frames.len() {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Remove every frame.
    pub fn clear(&mut self) -> Vec<Frame> {
        self.current = None;
        std::mem::take(&mut self.frames)
    }
}

impl FrameSource for FrameSequence {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_at(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }
}
