//! Flipbook Core Library
//!
//! Drawing engine for a frame-based animator: geometry kernel, layers,
//! undoable commands, canvas compositing, per-frame history, the frame
//! sequence and its playback scheduler.

pub mod canvas;
pub mod command;
pub mod config;
pub mod editor;
pub mod frames;
pub mod generator;
pub mod geometry;
pub mod history;
pub mod layer;
pub mod playback;
pub mod random;
pub mod render;
pub mod storage;
pub mod style;
pub mod tools;

pub use canvas::{CanvasSurface, SurfaceHandle, SurfaceRegistry};
pub use command::{Command, CommandError, CommandResult, ShapeCommand, StrokeCommand};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, EditorError, EditorResult, PlaybackFrame};
pub use frames::{Frame, FrameId, FrameSequence, FrameSource};
pub use generator::{CancelToken, GeneratedFrame, GenerationHandle, GenerationRequest};
pub use history::History;
pub use layer::{Layer, LayerId};
pub use playback::{PlaybackScheduler, PlaybackState};
pub use render::{Blend, RenderTarget, blank_raster};
pub use storage::{FileStorage, MemoryStorage, RasterStorage, StorageError, StorageResult};
pub use style::{ColorRgba, LineCap, Style};
pub use tools::{Instrument, ToolManager};

/// Raster type used for frames and canvases.
pub use tiny_skia::Pixmap;
