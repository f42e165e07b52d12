//! Renderable layers produced by commands.

use kurbo::{BezPath, Point};

use crate::geometry::shape_paths;
use crate::render::RenderTarget;
use crate::style::Style;
use crate::tools::Instrument;

/// Layer identity. Equal to the id of the command that produced the layer.
pub type LayerId = u32;

/// A stroke outline and/or a fill region painted with one style.
///
/// A layer with neither path draws nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub stroke_path: Option<BezPath>,
    pub fill_path: Option<BezPath>,
    pub style: Style,
}

impl Layer {
    pub fn new(
        id: LayerId,
        stroke_path: Option<BezPath>,
        fill_path: Option<BezPath>,
        style: Style,
    ) -> Self {
        Self {
            id,
            stroke_path,
            fill_path,
            style,
        }
    }

    /// Layer for a freehand stroke outline.
    pub fn stroke(id: LayerId, path: BezPath, style: Style) -> Self {
        Self::new(id, Some(path), None, style)
    }

    /// Layer for a shape dragged from `p0` to `p1`.
    pub fn shape(id: LayerId, instrument: Instrument, p0: Point, p1: Point, style: Style) -> Self {
        let paths = shape_paths(instrument, p0, p1, style.width);
        Self::new(id, paths.stroke, paths.fill, style)
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.stroke_path.is_none() && self.fill_path.is_none()
    }

    /// Append a sub-path to the stroke outline, starting one if needed.
    pub(crate) fn extend_stroke(&mut self, sub_path: &BezPath) {
        self.stroke_path
            .get_or_insert_with(BezPath::new)
            .extend(sub_path.elements().iter().copied());
    }

    /// Paint the stroke, then the fill, into `target`.
    pub fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        let blend = self.style.blend();
        if let Some(path) = &self.stroke_path {
            target.stroke_path(path, &self.style, blend);
        }
        if let Some(path) = &self.fill_path {
            target.fill_path(path, &self.style, blend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Blend;
    use crate::render::testing::{DrawOp, RecordingTarget};
    use crate::style::ColorRgba;

    fn style(width: f64) -> Style {
        Style::new(ColorRgba::DENIM.into(), width)
    }

    #[test]
    fn test_empty_layer_draws_nothing() {
        let layer = Layer::new(1, None, None, style(2.0));
        let mut target = RecordingTarget::default();
        layer.draw(&mut target);

        assert!(layer.is_empty());
        assert!(target.ops.is_empty());
    }

    #[test]
    fn test_arrow_draws_stroke_then_fill() {
        let layer = Layer::shape(
            4,
            Instrument::Arrow,
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            style(3.0),
        );
        let mut target = RecordingTarget::default();
        layer.draw(&mut target);

        assert_eq!(
            target.ops,
            vec![
                DrawOp::Stroke { width: 3.0, blend: Blend::SourceOver },
                DrawOp::Fill { width: 3.0, blend: Blend::SourceOver },
            ]
        );
    }

    #[test]
    fn test_extend_stroke_appends() {
        let mut layer = Layer::new(1, None, None, style(2.0));
        let mut sub = BezPath::new();
        sub.move_to((0.0, 0.0));
        sub.quad_to((1.0, 1.0), (2.0, 2.0));

        layer.extend_stroke(&sub);
        layer.extend_stroke(&sub);
        assert_eq!(layer.stroke_path.as_ref().map(|p| p.elements().len()), Some(4));
    }

    #[test]
    fn test_eraser_layer_uses_copy() {
        let layer = Layer::shape(
            2,
            Instrument::Line,
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Style::new(ColorRgba::TRANSPARENT.into(), 10.0),
        );
        let mut target = RecordingTarget::default();
        layer.draw(&mut target);

        assert_eq!(target.ops, vec![DrawOp::Stroke { width: 10.0, blend: Blend::Copy }]);
    }
}
