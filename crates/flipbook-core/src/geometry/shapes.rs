//! Parametric shape outlines built from a drag's start and end points.

use kurbo::{Affine, BezPath, Circle, Point, Shape, Vec2};

use super::{angle_to, point_path};
use crate::tools::Instrument;

/// Flattening tolerance used when converting circles to Bézier paths.
const CIRCLE_TOLERANCE: f64 = 0.1;
/// Arrowhead half-width as a multiple of the stroke width.
const ARROW_HALF_WIDTH: f64 = 2.0;
/// Arrowhead half-height as a multiple of the stroke width.
const ARROW_HALF_HEIGHT: f64 = 1.5;

/// Stroke and fill outlines of a shape. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePaths {
    pub stroke: Option<BezPath>,
    pub fill: Option<BezPath>,
}

impl ShapePaths {
    fn stroke_only(path: BezPath) -> Self {
        Self {
            stroke: Some(path),
            fill: None,
        }
    }
}

/// Outlines for `instrument` dragged from `p0` to `p1`.
///
/// Freehand instruments have no parametric outline and yield empty paths.
pub fn shape_paths(instrument: Instrument, p0: Point, p1: Point, width: f64) -> ShapePaths {
    match instrument {
        Instrument::Pencil | Instrument::Brush => ShapePaths::default(),
        Instrument::Line => line_path(p0, p1, false, width),
        Instrument::Arrow => line_path(p0, p1, true, width),
        Instrument::Circle => ShapePaths::stroke_only(circle_path(p0, p1)),
        Instrument::Triangle => ShapePaths::stroke_only(triangle_path(p0, p1)),
        Instrument::Square => ShapePaths::stroke_only(square_path(p0, p1)),
    }
}

/// Straight line from `p0` to `p1`, optionally with a filled arrowhead at `p1`.
///
/// The head is an isosceles triangle built pointing down the y-axis around
/// the anchor, then rotated about the anchor so its apex follows `p0 -> p1`.
pub fn line_path(p0: Point, p1: Point, with_arrowhead: bool, width: f64) -> ShapePaths {
    let mut stroke = BezPath::new();
    stroke.move_to(p0);
    stroke.line_to(p1);

    let fill = with_arrowhead.then(|| {
        let delta = p1 - p0;
        let rotation = Affine::rotate_about((-delta.x).atan2(delta.y), p1);
        let half_w = width * ARROW_HALF_WIDTH;
        let half_h = width * ARROW_HALF_HEIGHT;

        let left = Point::new(p1.x - half_w, p1.y - half_h);
        let right = Point::new(p1.x + half_w, p1.y - half_h);
        let tip = Point::new(p1.x, p1.y + half_h);

        let mut head = BezPath::new();
        head.move_to(rotation * left);
        head.line_to(rotation * right);
        head.line_to(rotation * tip);
        head.close_path();
        head
    });

    ShapePaths {
        stroke: Some(stroke),
        fill,
    }
}

/// Circle with `p0` and `p1` on opposite ends of a diameter.
pub fn circle_path(p0: Point, p1: Point) -> BezPath {
    let center = p0.midpoint(p1);
    let radius = p0.distance(center);
    Circle::new(center, radius).to_path(CIRCLE_TOLERANCE)
}

/// Isosceles triangle of height `|p1 - p0|` hanging from `p0`, rotated about
/// its centre by the angle of `p0 -> p1`.
pub fn triangle_path(p0: Point, p1: Point) -> BezPath {
    let dist = p0.distance(p1);
    if dist < f64::EPSILON {
        return point_path(p0);
    }

    let mut path = BezPath::new();
    path.move_to((p0.x - dist / 2.0, p0.y));
    path.line_to((p0.x, p0.y + dist));
    path.line_to((p0.x + dist / 2.0, p0.y));
    path.close_path();

    let center = Point::new(p0.x, p0.y + dist / 2.0);
    path.apply_affine(Affine::rotate_about(angle_to(p0, p1), center));
    path
}

/// Square with `p0` and `p1` as opposite corners.
///
/// The remaining corners are the half-diagonal rotated by ±90° about the
/// centre.
pub fn square_path(p0: Point, p1: Point) -> BezPath {
    if p0 == p1 {
        return point_path(p0);
    }

    let center = p0.midpoint(p1);
    let half = (p0 - p1) / 2.0;
    let corner2 = center + Vec2::new(-half.y, half.x);
    let corner3 = center + Vec2::new(half.y, -half.x);

    let mut path = BezPath::new();
    path.move_to(p0);
    path.line_to(corner2);
    path.line_to(p1);
    path.line_to(corner3);
    path.close_path();
    path
}

/// Heart outline used by the brush stamp.
///
/// The bottom tip sits on `anchor`, the lobes extend `size` upwards, and the
/// whole stamp is rotated by `angle` radians about the anchor.
pub fn heart_stamp_path(anchor: Point, size: f64, angle: f64) -> BezPath {
    // Unit heart with its tip at the origin, lobes towards negative y.
    let mut heart = BezPath::new();
    heart.move_to((0.0, 0.0));
    heart.curve_to((-0.6, -0.4), (-0.55, -1.1), (0.0, -0.75));
    heart.curve_to((0.55, -1.1), (0.6, -0.4), (0.0, 0.0));
    heart.close_path();

    let transform = Affine::translate(anchor.to_vec2()) * Affine::rotate(angle) * Affine::scale(size);
    heart.apply_affine(transform);
    heart
}
