//! Undoable drawing commands.
//!
//! A command knows how to build its layer, install it on a canvas surface
//! and take it back off again. Commands reach their surface through a
//! [`SurfaceHandle`]; when the surface has been released they fail with
//! [`CommandError::NoCanvasBound`] and change nothing.

use kurbo::Point;
use peniko::Color;
use thiserror::Error;

use crate::canvas::{SurfaceHandle, SurfaceRegistry};
use crate::geometry::{Segment, smoothed_segment_path, smoothed_stroke_path};
use crate::layer::{Layer, LayerId};
use crate::style::Style;
use crate::tools::Instrument;

/// Command errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Canvas surface is no longer bound")]
    NoCanvasBound,
    #[error("Layer {0} not found on canvas")]
    LayerNotFound(LayerId),
    #[error("Segment does not continue the stroke")]
    DiscontinuousSegment,
}

/// Result type for command operations.
pub type CommandResult = Result<(), CommandError>;

/// A freehand stroke: one pointer drag recorded as continuous segments.
#[derive(Debug, Clone)]
pub struct StrokeCommand {
    id: LayerId,
    surface: SurfaceHandle,
    color: Color,
    width: f64,
    segments: Vec<Segment>,
}

impl StrokeCommand {
    /// Create a stroke from its first segment.
    pub fn new(
        id: LayerId,
        surface: SurfaceHandle,
        color: Color,
        width: f64,
        first: Segment,
    ) -> Self {
        Self {
            id,
            surface,
            color,
            width,
            segments: vec![first],
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// End point of the most recent segment.
    pub fn last_point(&self) -> Point {
        // `segments` is never empty: `new` seeds it and nothing removes.
        self.segments.last().map_or(Point::ZERO, |s| s.end)
    }

    pub fn style(&self) -> Style {
        Style::new(self.color, self.width)
    }

    /// Layer holding the full smoothed outline.
    pub fn layer(&self) -> Layer {
        Layer::stroke(self.id, smoothed_stroke_path(&self.segments), self.style())
    }

    /// Install the layer into the committed set.
    pub fn execute(&self, surfaces: &mut SurfaceRegistry) -> CommandResult {
        let canvas = surfaces
            .get_mut(self.surface)
            .ok_or(CommandError::NoCanvasBound)?;
        canvas.commit(self.layer());
        canvas.request_redraw();
        Ok(())
    }

    /// Remove the layer from the committed set.
    pub fn cancel(&self, surfaces: &mut SurfaceRegistry) -> CommandResult {
        let canvas = surfaces
            .get_mut(self.surface)
            .ok_or(CommandError::NoCanvasBound)?;
        if !canvas.remove(self.id) {
            return Err(CommandError::LayerNotFound(self.id));
        }
        canvas.request_redraw();
        Ok(())
    }

    /// Append `start -> end` and extend the live layer with its sub-path.
    ///
    /// Nothing is mutated on error.
    pub fn extend(
        &mut self,
        start: Point,
        end: Point,
        surfaces: &mut SurfaceRegistry,
    ) -> CommandResult {
        let Some(&previous) = self.segments.last() else {
            return Err(CommandError::DiscontinuousSegment);
        };
        if !previous.is_continued_by(start) {
            return Err(CommandError::DiscontinuousSegment);
        }
        let canvas = surfaces
            .get_mut(self.surface)
            .ok_or(CommandError::NoCanvasBound)?;
        let layer = canvas
            .layer_mut(self.id)
            .ok_or(CommandError::LayerNotFound(self.id))?;

        let segment = Segment::new(start, end);
        // Only the previous pair feeds the new sub-path.
        let sub_path = smoothed_segment_path(&[previous, segment], 1);
        layer.extend_stroke(&sub_path);
        self.segments.push(segment);
        canvas.request_redraw();

        log::debug!(
            "Stroke {} extended to {} segments",
            self.id,
            self.segments.len()
        );
        Ok(())
    }

    /// Like [`extend`](Self::extend), reporting only whether it happened.
    pub fn try_extend(
        &mut self,
        start: Point,
        end: Point,
        surfaces: &mut SurfaceRegistry,
    ) -> bool {
        match self.extend(start, end, surfaces) {
            Ok(()) => true,
            Err(CommandError::DiscontinuousSegment) => false,
            Err(e) => {
                log::warn!("Stroke {} not extended: {}", self.id, e);
                false
            }
        }
    }
}

/// A parametric shape dragged from `p0` to `p1`.
///
/// Preview commands install into the canvas preview slot and are never
/// recorded in history.
#[derive(Debug, Clone)]
pub struct ShapeCommand {
    id: LayerId,
    surface: SurfaceHandle,
    color: Color,
    width: f64,
    p0: Point,
    p1: Point,
    instrument: Instrument,
    is_preview: bool,
}

impl ShapeCommand {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LayerId,
        surface: SurfaceHandle,
        color: Color,
        width: f64,
        p0: Point,
        p1: Point,
        instrument: Instrument,
        is_preview: bool,
    ) -> Self {
        Self {
            id,
            surface,
            color,
            width,
            p0,
            p1,
            instrument,
            is_preview,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.p0, self.p1)
    }

    pub fn is_preview(&self) -> bool {
        self.is_preview
    }

    pub fn style(&self) -> Style {
        Style::new(self.color, self.width)
    }

    pub fn layer(&self) -> Layer {
        Layer::shape(self.id, self.instrument, self.p0, self.p1, self.style())
    }

    /// Install the layer, into the preview slot for previews.
    pub fn execute(&self, surfaces: &mut SurfaceRegistry) -> CommandResult {
        let canvas = surfaces
            .get_mut(self.surface)
            .ok_or(CommandError::NoCanvasBound)?;
        if self.is_preview {
            canvas.set_preview(self.layer());
        } else {
            canvas.commit(self.layer());
        }
        canvas.request_redraw();
        Ok(())
    }

    /// Take the layer back off the canvas.
    pub fn cancel(&self, surfaces: &mut SurfaceRegistry) -> CommandResult {
        let canvas = surfaces
            .get_mut(self.surface)
            .ok_or(CommandError::NoCanvasBound)?;
        let removed = if self.is_preview {
            canvas.clear_preview()
        } else {
            canvas.remove(self.id)
        };
        if !removed {
            return Err(CommandError::LayerNotFound(self.id));
        }
        canvas.request_redraw();
        Ok(())
    }
}

/// The unit of undo and redo.
#[derive(Debug, Clone)]
pub enum Command {
    Stroke(StrokeCommand),
    Shape(ShapeCommand),
}

impl Command {
    pub fn id(&self) -> LayerId {
        match self {
            Command::Stroke(c) => c.id(),
            Command::Shape(c) => c.id(),
        }
    }

    pub fn is_preview(&self) -> bool {
        match self {
            Command::Stroke(_) => false,
            Command::Shape(c) => c.is_preview(),
        }
    }

    pub fn execute(&self, surfaces: &mut SurfaceRegistry) -> CommandResult {
        match self {
            Command::Stroke(c) => c.execute(surfaces),
            Command::Shape(c) => c.execute(surfaces),
        }
    }

    pub fn cancel(&self, surfaces: &mut SurfaceRegistry) -> CommandResult {
        match self {
            Command::Stroke(c) => c.cancel(surfaces),
            Command::Shape(c) => c.cancel(surfaces),
        }
    }

    pub fn layer(&self) -> Layer {
        match self {
            Command::Stroke(c) => c.layer(),
            Command::Shape(c) => c.layer(),
        }
    }
}

impl From<StrokeCommand> for Command {
    fn from(command: StrokeCommand) -> Self {
        Command::Stroke(command)
    }
}

impl From<ShapeCommand> for Command {
    fn from(command: ShapeCommand) -> Self {
        Command::Shape(command)
    }
}
