//! Geometry kernel: pure path construction for strokes, shapes and stamps.
//!
//! Nothing in here touches a canvas. Every function maps points to a
//! [`kurbo::BezPath`] deterministically, so callers can rebuild the same
//! outline as often as they like.

mod shapes;
mod stroke;

pub use shapes::{
    ShapePaths, circle_path, heart_stamp_path, line_path, shape_paths, square_path, triangle_path,
};
pub use stroke::{Segment, smoothed_segment_path, smoothed_stroke_path};

use kurbo::{BezPath, Point};

/// Midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Angle of the vector `from -> to`, in radians, measured from the x-axis.
pub fn angle_to(from: Point, to: Point) -> f64 {
    (to - from).atan2()
}

/// A path holding a single `MoveTo`, used for degenerate shapes.
pub(crate) fn point_path(point: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(point);
    path
}

/// All points mentioned by a path's elements, in order.
#[cfg(test)]
pub(crate) fn path_points(path: &BezPath) -> Vec<Point> {
    use kurbo::PathEl;

    path.elements()
        .iter()
        .flat_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![p],
            PathEl::QuadTo(c, p) => vec![c, p],
            PathEl::CurveTo(c1, c2, p) => vec![c1, c2, p],
            PathEl::ClosePath => vec![],
        })
        .collect()
}
