//! The editor: owner of the frame sequence and everything drawn on it.
//!
//! [`Editor`] ties the pieces together on one thread. Pointer input goes
//! through the [`ToolManager`] into per-frame [`History`]; frame changes
//! save the current canvas to storage and load the next one; playback and
//! background generation are polled from the caller's event loop.

use std::collections::VecDeque;
use std::time::Instant;

use kurbo::Point;
use thiserror::Error;
use tiny_skia::Pixmap;

use crate::canvas::{CanvasSurface, SurfaceHandle, SurfaceRegistry};
use crate::command::Command;
use crate::config::{ConfigError, EditorConfig};
use crate::frames::{Frame, FrameSequence, FrameSource};
use crate::generator::{GeneratedFrame, GenerationHandle, GenerationRequest};
use crate::history::History;
use crate::playback::PlaybackScheduler;
use crate::random::generate_seed;
use crate::render::{RenderTarget, blank_raster};
use crate::storage::{RasterStorage, StorageError};
use crate::style::ColorRgba;
use crate::tools::{Instrument, ToolManager};

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },
    #[error("Frame index {index} out of range ({count} frames)")]
    InvalidFrameIndex { index: usize, count: usize },
    #[error("Canvas surface is no longer bound")]
    CanvasReleased,
    #[error("Frame generation already running")]
    GenerationInProgress,
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// A frame to display during playback.
#[derive(Debug)]
pub struct PlaybackFrame {
    pub index: usize,
    pub frame: Frame,
    /// `None` when storage has no raster for the frame yet.
    pub raster: Option<Pixmap>,
}

/// Frame-based drawing editor over a raster storage backend.
pub struct Editor<S: RasterStorage> {
    config: EditorConfig,
    storage: S,
    frames: FrameSequence,
    surfaces: SurfaceRegistry,
    canvas: SurfaceHandle,
    history: History,
    tools: ToolManager,
    playback: PlaybackScheduler,
    generation: Option<GenerationHandle>,
    /// Frames received from the worker but not yet stored.
    generated: VecDeque<GeneratedFrame>,
    palette: Vec<ColorRgba>,
    draw_color: ColorRgba,
    pencil_width: f64,
    eraser_width: f64,
    erasing: bool,
    brush_mode: bool,
}

impl<S: RasterStorage> Editor<S> {
    /// Create an editor holding one blank frame.
    pub fn new(config: EditorConfig, storage: S) -> EditorResult<Self> {
        config.validate()?;
        let (width, height) = (config.canvas_width, config.canvas_height);
        let surface = CanvasSurface::blank(width, height)
            .ok_or(EditorError::InvalidCanvasSize { width, height })?;

        let mut surfaces = SurfaceRegistry::new();
        let canvas = surfaces.insert(surface);
        let tools = ToolManager::new(canvas, &config);
        let mut frames = FrameSequence::new();
        frames.insert_after_current(Frame::new());

        Ok(Self {
            playback: PlaybackScheduler::new(config.initial_interval()),
            palette: config.palette.clone(),
            draw_color: config.draw_color,
            pencil_width: config.clamp_width(config.pencil_width),
            eraser_width: config.clamp_width(config.eraser_width),
            config,
            storage,
            frames,
            surfaces,
            canvas,
            history: History::new(),
            tools,
            generation: None,
            generated: VecDeque::new(),
            erasing: false,
            brush_mode: false,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn canvas(&self) -> Option<&CanvasSurface> {
        self.surfaces.get(self.canvas)
    }

    pub fn palette(&self) -> &[ColorRgba] {
        &self.palette
    }

    pub fn draw_color(&self) -> ColorRgba {
        self.draw_color
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    pub fn is_brush_mode(&self) -> bool {
        self.brush_mode
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_running()
    }

    /// Width of the instrument in use.
    pub fn width(&self) -> f64 {
        if self.erasing {
            self.eraser_width
        } else {
            self.pencil_width
        }
    }

    // --- Input ---

    pub fn pointer_down(&mut self, point: Point) {
        if self.is_playing() {
            return;
        }
        let finished = self.tools.pointer_down(point, &mut self.surfaces);
        self.record(finished);
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.is_playing() {
            return;
        }
        let finished = self.tools.pointer_move(point, &mut self.surfaces);
        self.record(finished);
    }

    pub fn pointer_up(&mut self) {
        if self.is_playing() {
            return;
        }
        let finished = self.tools.pointer_up(&mut self.surfaces);
        self.record(finished);
    }

    pub fn pointer_cancel(&mut self) {
        let finished = self.tools.pointer_cancel(&mut self.surfaces);
        self.record(finished);
    }

    fn record(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.history.record(command);
        }
    }

    // --- Tools ---

    /// Freehand drawing with the draw colour: pencil, or brush in brush mode.
    pub fn select_pencil(&mut self) {
        self.erasing = false;
        let instrument = if self.brush_mode {
            Instrument::Brush
        } else {
            Instrument::Pencil
        };
        self.apply_tool(instrument, self.draw_color, self.pencil_width);
    }

    /// Pencil with a transparent colour and the eraser width.
    pub fn select_eraser(&mut self) {
        self.erasing = true;
        self.apply_tool(Instrument::Pencil, ColorRgba::TRANSPARENT, self.eraser_width);
    }

    /// Drag out shapes with the draw colour. Freehand instruments fall back
    /// to [`select_pencil`](Self::select_pencil).
    pub fn select_shape(&mut self, instrument: Instrument) {
        if !instrument.is_shape() {
            self.select_pencil();
            return;
        }
        self.erasing = false;
        self.apply_tool(instrument, self.draw_color, self.pencil_width);
    }

    /// Toggle between pencil and brush for freehand drawing.
    pub fn set_brush_mode(&mut self, enabled: bool) {
        self.brush_mode = enabled;
        let freehand = matches!(
            self.tools.instrument(),
            Instrument::Pencil | Instrument::Brush
        );
        if freehand && !self.erasing {
            self.select_pencil();
        }
    }

    /// Make `color` the draw colour and push it onto the recent palette,
    /// dropping the oldest entry.
    pub fn pick_color(&mut self, color: ColorRgba) {
        if !self.palette.is_empty() {
            self.palette.remove(0);
        }
        self.palette.push(color);
        self.draw_color = color;
        if !self.erasing {
            let finished = self.tools.set_color(color.into());
            self.record(finished);
        }
    }

    /// Set the width of the instrument in use, clamped to the allowed range.
    pub fn set_width(&mut self, width: f64) {
        let width = self.config.clamp_width(width);
        if self.erasing {
            self.eraser_width = width;
        } else {
            self.pencil_width = width;
        }
        let finished = self.tools.set_width(width);
        self.record(finished);
    }

    fn apply_tool(&mut self, instrument: Instrument, color: ColorRgba, width: f64) {
        let finished = self.tools.set_instrument(instrument, &mut self.surfaces);
        self.record(finished);
        self.tools.set_color(color.into());
        self.tools.set_width(width);
    }

    // --- History ---

    /// Undo the last action. A stroke still being drawn counts as done.
    pub fn undo(&mut self) -> bool {
        let finished = self.tools.finish_stroke();
        self.record(finished);
        self.history.undo(&mut self.surfaces)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.surfaces)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.tools.is_drawing()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Frames ---

    /// `"current / total"`, 1-based.
    pub fn frame_label(&self) -> String {
        let current = self.frames.current_index().map_or(0, |i| i + 1);
        format!("{} / {}", current, self.frames.len())
    }

    /// Persist the canvas (base raster plus committed layers).
    pub fn save_current_frame(&mut self) -> EditorResult<()> {
        let Some(frame) = self.frames.current() else {
            return Ok(());
        };
        let canvas = self
            .surfaces
            .get(self.canvas)
            .ok_or(EditorError::CanvasReleased)?;
        self.storage.save(&frame.id, &canvas.snapshot())?;
        log::debug!("Saved frame {}", frame.id);
        Ok(())
    }

    /// Insert a blank frame after the current one and switch to it.
    pub fn add_frame(&mut self) -> EditorResult<()> {
        self.save_current_frame()?;
        let index = self.frames.insert_after_current(Frame::new());
        log::info!("Added frame at {}", index);
        self.activate_current_frame()
    }

    /// Insert a copy of the current frame after it and switch to the copy.
    pub fn duplicate_frame(&mut self) -> EditorResult<()> {
        self.save_current_frame()?;
        let Some(source) = self.frames.current().map(|f| f.id.clone()) else {
            return self.add_frame();
        };
        let copy = Frame::new();
        self.storage.copy(&source, &copy.id)?;
        let index = self.frames.insert_after_current(copy);
        log::info!("Duplicated frame {} to index {}", source, index);
        self.activate_current_frame()
    }

    /// Delete the current frame. The sequence is never left empty.
    pub fn remove_current_frame(&mut self) -> EditorResult<()> {
        let Some(index) = self.frames.current_index() else {
            return Ok(());
        };
        if let Some(frame) = self.frames.remove(index) {
            self.storage.delete(&frame.id)?;
            log::info!("Removed frame {} at {}", frame.id, index);
        }
        if self.frames.is_empty() {
            self.frames.insert_after_current(Frame::new());
        }
        self.activate_current_frame()
    }

    /// Delete every frame and start over with one blank frame.
    pub fn remove_all_frames(&mut self) -> EditorResult<()> {
        for frame in self.frames.clear() {
            self.storage.delete(&frame.id)?;
        }
        self.frames.insert_after_current(Frame::new());
        log::info!("Removed all frames");
        self.activate_current_frame()
    }

    /// Switch to the frame at `index`. Returns whether the frame changed.
    pub fn go_to_frame(&mut self, index: usize) -> EditorResult<bool> {
        let count = self.frames.len();
        if index >= count {
            return Err(EditorError::InvalidFrameIndex { index, count });
        }
        if self.frames.current_index() == Some(index) {
            return Ok(false);
        }
        self.save_current_frame()?;
        self.frames.set_current_index(index);
        self.activate_current_frame()?;
        Ok(true)
    }

    /// Step forward one frame. `false` at the last frame.
    pub fn next_frame(&mut self) -> EditorResult<bool> {
        match self.frames.current_index() {
            Some(i) if i + 1 < self.frames.len() => self.go_to_frame(i + 1),
            _ => Ok(false),
        }
    }

    /// Step back one frame. `false` at the first frame.
    pub fn previous_frame(&mut self) -> EditorResult<bool> {
        match self.frames.current_index() {
            Some(i) if i > 0 => self.go_to_frame(i - 1),
            _ => Ok(false),
        }
    }

    /// Raster of the frame before the current one, for onion skinning.
    pub fn previous_frame_raster(&self) -> EditorResult<Option<Pixmap>> {
        let Some(index) = self.frames.current_index().and_then(|i| i.checked_sub(1)) else {
            return Ok(None);
        };
        match self.frames.frame_at(index) {
            Some(frame) => Ok(self.storage.load(&frame.id)?),
            None => Ok(None),
        }
    }

    /// Reset per-frame state and load the current frame's raster.
    fn activate_current_frame(&mut self) -> EditorResult<()> {
        let finished = self.tools.finish_stroke();
        self.record(finished);
        self.tools.reset_gesture(&mut self.surfaces);
        self.history.clear();

        let raster = match self.frames.current() {
            Some(frame) => self.storage.load(&frame.id)?,
            None => None,
        };
        let canvas = self
            .surfaces
            .get_mut(self.canvas)
            .ok_or(EditorError::CanvasReleased)?;
        let raster = match raster {
            Some(raster) => raster,
            None => blank_raster(canvas.width(), canvas.height()).ok_or(
                EditorError::InvalidCanvasSize {
                    width: canvas.width(),
                    height: canvas.height(),
                },
            )?,
        };
        canvas.clear_layers();
        canvas.set_base_raster(raster);
        log::debug!("Now editing {}", self.frame_label());
        Ok(())
    }

    // --- Playback ---

    /// Save the current frame and start playback from the first frame.
    pub fn play(&mut self, now: Instant) -> EditorResult<Option<PlaybackFrame>> {
        self.pointer_cancel();
        self.tools.reset_gesture(&mut self.surfaces);
        self.save_current_frame()?;
        let index = self.playback.start(&self.frames, now);
        self.playback_frame(index)
    }

    pub fn pause(&mut self) {
        self.playback.stop();
    }

    /// Apply a speed slider value. While playing the timer restarts.
    pub fn set_playback_speed(
        &mut self,
        speed: f64,
        now: Instant,
    ) -> EditorResult<Option<PlaybackFrame>> {
        let interval = self.config.interval_for_speed(speed)?;
        let index = self.playback.set_interval(interval, &self.frames, now);
        self.playback_frame(index)
    }

    /// The frame to show if a playback tick is due at `now`.
    pub fn poll_playback(&mut self, now: Instant) -> EditorResult<Option<PlaybackFrame>> {
        let index = self.playback.poll(&self.frames, now);
        self.playback_frame(index)
    }

    pub fn playback(&self) -> &PlaybackScheduler {
        &self.playback
    }

    fn playback_frame(&self, index: Option<usize>) -> EditorResult<Option<PlaybackFrame>> {
        let Some(index) = index else {
            return Ok(None);
        };
        let Some(frame) = self.frames.frame_at(index) else {
            return Ok(None);
        };
        let raster = self.storage.load(&frame.id)?;
        Ok(Some(PlaybackFrame {
            index,
            frame: frame.clone(),
            raster,
        }))
    }

    // --- Generation ---

    /// Start generating `count` random shape frames in the background.
    pub fn generate_random_frames(&mut self, count: usize) -> EditorResult<()> {
        if self.is_generating() {
            return Err(EditorError::GenerationInProgress);
        }
        self.save_current_frame()?;
        let request = GenerationRequest {
            count,
            width: self.config.canvas_width,
            height: self.config.canvas_height,
            color: self.draw_color.into(),
            stroke_width: self.pencil_width,
            seed: generate_seed(),
        };
        log::info!("Generating {} frames", count);
        self.generation = Some(GenerationHandle::spawn(request));
        Ok(())
    }

    /// Whether the worker is running or received frames are still waiting
    /// to be stored.
    pub fn is_generating(&self) -> bool {
        self.generation.is_some() || !self.generated.is_empty()
    }

    /// Take in every frame the worker has finished so far. Returns how many
    /// were added.
    ///
    /// On a storage error the frames not yet added stay queued and the next
    /// call retries them.
    pub fn poll_generation(&mut self) -> EditorResult<usize> {
        if let Some(handle) = self.generation.take() {
            let finished = handle.is_finished();
            while let Some(generated) = handle.try_next() {
                self.generated.push_back(generated);
            }
            if finished {
                log::info!("Frame generation finished");
            } else {
                self.generation = Some(handle);
            }
        }
        self.accept_generated()
    }

    /// Block until generation ends and take in every frame.
    pub fn wait_for_generation(&mut self) -> EditorResult<usize> {
        if let Some(handle) = self.generation.take() {
            self.generated.extend(handle.wait());
        }
        self.accept_generated()
    }

    /// Ask the running job to stop after the frame in progress.
    pub fn cancel_generation(&self) {
        if let Some(handle) = &self.generation {
            handle.cancel();
        }
    }

    /// Store queued frames and insert each after the current one, keeping
    /// whatever was drawn on the current frame meanwhile.
    fn accept_generated(&mut self) -> EditorResult<usize> {
        if self.generated.is_empty() {
            return Ok(0);
        }
        self.save_current_frame()?;

        let mut added = 0;
        while let Some(generated) = self.generated.pop_front() {
            if let Err(e) = self.storage.save(&generated.frame.id, &generated.raster) {
                self.generated.push_front(generated);
                return Err(e.into());
            }
            self.frames.insert_after_current(generated.frame);
            self.activate_current_frame()?;
            added += 1;
        }
        Ok(added)
    }

    // --- Rendering ---

    /// Composite the canvas, preview included, into `target`.
    pub fn composite<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        if let Some(canvas) = self.surfaces.get(self.canvas) {
            canvas.composite(target);
        }
    }

    /// Return and reset the canvas redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        self.surfaces
            .get_mut(self.canvas)
            .is_some_and(|canvas| canvas.take_redraw_request())
    }
}
