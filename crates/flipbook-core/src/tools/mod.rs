//! Instruments and pointer gesture handling.
//!
//! [`ToolManager`] turns pointer events into commands for the instrument in
//! use. Commands that finish a user action are handed back to the caller to
//! be recorded in history; previews and brush stamps never are.

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::canvas::{SurfaceHandle, SurfaceRegistry};
use crate::command::{Command, ShapeCommand, StrokeCommand};
use crate::config::EditorConfig;
use crate::geometry::{Segment, heart_stamp_path};
use crate::layer::LayerId;
use crate::random::{SplitMix64, generate_seed};
use crate::style::Style;

/// Available instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    #[default]
    Pencil,
    Brush,
    Line,
    Arrow,
    Circle,
    Triangle,
    Square,
}

impl Instrument {
    /// Instruments that drag out a parametric shape.
    pub const SHAPES: [Instrument; 5] = [
        Instrument::Line,
        Instrument::Arrow,
        Instrument::Circle,
        Instrument::Triangle,
        Instrument::Square,
    ];

    pub fn is_shape(self) -> bool {
        !matches!(self, Instrument::Pencil | Instrument::Brush)
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Pencil => "pencil",
            Instrument::Brush => "brush",
            Instrument::Line => "line",
            Instrument::Arrow => "arrow",
            Instrument::Circle => "circle",
            Instrument::Triangle => "triangle",
            Instrument::Square => "square",
        }
    }
}

/// A shape drag in progress.
#[derive(Debug, Clone, Copy)]
struct ShapeDrag {
    start: Point,
    end: Option<Point>,
}

#[derive(Debug, Clone)]
struct BrushState {
    spacing: f64,
    stamp_size: f64,
    last_stamp: Option<Point>,
    rng: SplitMix64,
}

/// Current instrument, style and gesture state for one canvas.
#[derive(Debug, Clone)]
pub struct ToolManager {
    surface: SurfaceHandle,
    instrument: Instrument,
    color: Color,
    width: f64,
    next_id: LayerId,
    last_point: Option<Point>,
    /// The one stroke still eligible for extension.
    active_stroke: Option<StrokeCommand>,
    shape_drag: Option<ShapeDrag>,
    brush: BrushState,
}

impl ToolManager {
    pub fn new(surface: SurfaceHandle, config: &EditorConfig) -> Self {
        Self {
            surface,
            instrument: Instrument::Pencil,
            color: config.draw_color.into(),
            width: config.pencil_width,
            next_id: 0,
            last_point: None,
            active_stroke: None,
            shape_drag: None,
            brush: BrushState {
                spacing: config.brush_spacing,
                stamp_size: config.stamp_size,
                last_stamp: None,
                rng: SplitMix64::new(generate_seed()),
            },
        }
    }

    /// Use a fixed seed for stamp rotation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.brush.rng = SplitMix64::new(seed);
        self
    }

    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Id the next command will get.
    pub fn next_id(&self) -> LayerId {
        self.next_id
    }

    /// Whether a stroke or shape drag is in progress.
    pub fn is_drawing(&self) -> bool {
        self.active_stroke.is_some() || self.shape_drag.is_some()
    }

    /// Switch instrument. Ends the active stroke and drops any shape drag.
    pub fn set_instrument(
        &mut self,
        instrument: Instrument,
        surfaces: &mut SurfaceRegistry,
    ) -> Option<Command> {
        let finished = self.finish_stroke();
        self.drop_shape_drag(surfaces);
        self.instrument = instrument;
        log::debug!("Instrument set to {}", instrument.name());
        finished
    }

    /// Change the draw colour. Ends the active stroke.
    pub fn set_color(&mut self, color: Color) -> Option<Command> {
        self.color = color;
        self.finish_stroke()
    }

    /// Change the stroke width. Ends the active stroke.
    pub fn set_width(&mut self, width: f64) -> Option<Command> {
        self.width = width;
        self.finish_stroke()
    }

    pub fn pointer_down(&mut self, point: Point, surfaces: &mut SurfaceRegistry) -> Option<Command> {
        self.last_point = Some(point);
        match self.instrument {
            Instrument::Pencil => self.add_segment(point, point, surfaces),
            Instrument::Brush => {
                self.brush.last_stamp = None;
                None
            }
            _ => {
                self.drop_shape_drag(surfaces);
                self.shape_drag = Some(ShapeDrag {
                    start: point,
                    end: None,
                });
                None
            }
        }
    }

    pub fn pointer_move(&mut self, point: Point, surfaces: &mut SurfaceRegistry) -> Option<Command> {
        let last = self.last_point.replace(point).unwrap_or(point);
        match self.instrument {
            Instrument::Pencil => self.add_segment(last, point, surfaces),
            Instrument::Brush => {
                let due = self
                    .brush
                    .last_stamp
                    .is_none_or(|stamp| stamp.distance(point) > self.brush.spacing);
                if due {
                    self.stamp(point, surfaces);
                }
                None
            }
            instrument => {
                let drag = self.shape_drag.as_mut()?;
                drag.end = Some(point);
                let start = drag.start;
                let preview = self.shape_command(instrument, start, point, true);
                if let Err(e) = preview.execute(surfaces) {
                    log::warn!("Preview {} not shown: {}", preview.id(), e);
                }
                None
            }
        }
    }

    pub fn pointer_up(&mut self, surfaces: &mut SurfaceRegistry) -> Option<Command> {
        self.last_point = None;
        match self.instrument {
            Instrument::Pencil => self.finish_stroke(),
            Instrument::Brush => None,
            instrument => {
                let drag = self.shape_drag.take()?;
                let command = drag.end.map(|end| {
                    let command = self.shape_command(instrument, drag.start, end, false);
                    if let Err(e) = command.execute(surfaces) {
                        log::warn!("Shape {} not committed: {}", command.id(), e);
                    }
                    Command::from(command)
                });
                self.clear_preview(surfaces);
                command
            }
        }
    }

    /// Abort the gesture. Shapes drop their preview; a stroke already on the
    /// canvas is kept.
    pub fn pointer_cancel(&mut self, surfaces: &mut SurfaceRegistry) -> Option<Command> {
        self.last_point = None;
        self.drop_shape_drag(surfaces);
        self.finish_stroke()
    }

    /// End the active stroke, returning it for recording.
    pub fn finish_stroke(&mut self) -> Option<Command> {
        self.active_stroke.take().map(Command::from)
    }

    /// Forget any gesture in progress without recording it.
    pub fn reset_gesture(&mut self, surfaces: &mut SurfaceRegistry) {
        self.active_stroke = None;
        self.last_point = None;
        self.brush.last_stamp = None;
        self.drop_shape_drag(surfaces);
    }

    fn allocate_id(&mut self) -> LayerId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Extend the active stroke, or start a new one when the segment is
    /// discontinuous. A stroke that gets replaced is returned.
    fn add_segment(
        &mut self,
        start: Point,
        end: Point,
        surfaces: &mut SurfaceRegistry,
    ) -> Option<Command> {
        if let Some(stroke) = self.active_stroke.as_mut() {
            if stroke.try_extend(start, end, surfaces) {
                return None;
            }
        }

        let finished = self.finish_stroke();
        let id = self.allocate_id();
        let stroke = StrokeCommand::new(
            id,
            self.surface,
            self.color,
            self.width,
            Segment::new(start, end),
        );
        if let Err(e) = stroke.execute(surfaces) {
            log::warn!("Stroke {} not started: {}", id, e);
        }
        self.active_stroke = Some(stroke);
        finished
    }

    fn shape_command(
        &mut self,
        instrument: Instrument,
        p0: Point,
        p1: Point,
        preview: bool,
    ) -> ShapeCommand {
        let id = self.allocate_id();
        ShapeCommand::new(
            id,
            self.surface,
            self.color,
            self.width,
            p0,
            p1,
            instrument,
            preview,
        )
    }

    fn stamp(&mut self, point: Point, surfaces: &mut SurfaceRegistry) {
        let Some(canvas) = surfaces.get_mut(self.surface) else {
            log::warn!("Brush stamp dropped: canvas is no longer bound");
            return;
        };
        let angle = self.brush.rng.range_f64(0.0, TAU);
        let path = heart_stamp_path(point, self.brush.stamp_size, angle);
        canvas.stamp(&path, &Style::new(self.color, self.width));
        self.brush.last_stamp = Some(point);
    }

    fn clear_preview(&self, surfaces: &mut SurfaceRegistry) {
        if let Some(canvas) = surfaces.get_mut(self.surface) {
            if canvas.clear_preview() {
                canvas.request_redraw();
            }
        }
    }

    fn drop_shape_drag(&mut self, surfaces: &mut SurfaceRegistry) {
        if self.shape_drag.take().is_some() {
            self.clear_preview(surfaces);
        }
    }
}
