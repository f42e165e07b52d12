//! Freehand stroke smoothing.
//!
//! A stroke is recorded as a list of [`Segment`]s, one per pointer movement.
//! Each segment contributes one quadratic sub-path that starts at the middle
//! of the previous segment and ends halfway between the previous and the
//! current end point, with the previous end point as control point. Adjacent
//! sub-paths therefore share their end points and the outline stays smooth.

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// A single pointer movement from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// A zero-length segment, emitted when the pointer first touches down.
    pub fn dot(point: Point) -> Self {
        Self::new(point, point)
    }

    /// Whether a segment starting at `start` continues this one.
    ///
    /// Continuity is exact equality; the pointer layer hands back the very
    /// point it stored as the previous end.
    pub fn is_continued_by(&self, start: Point) -> bool {
        self.end == start
    }
}

/// Smoothed sub-path contributed by `segments[index]`.
///
/// The first segment has no predecessor and uses itself in that role, so a
/// lone dot collapses to a zero-length curve which round caps render as a
/// dot. Returns an empty path when `index` is out of range.
pub fn smoothed_segment_path(segments: &[Segment], index: usize) -> BezPath {
    let mut path = BezPath::new();
    let Some(current) = segments.get(index) else {
        return path;
    };
    let previous = match index.checked_sub(1) {
        Some(prev) => segments[prev],
        None => *current,
    };

    let mid0 = previous.start.midpoint(previous.end);
    let mid1 = current.end.midpoint(previous.end);

    path.move_to(mid0);
    path.quad_to(previous.end, mid1);
    path
}

/// Full smoothed outline of a stroke: the concatenation of every segment's
/// sub-path.
pub fn smoothed_stroke_path(segments: &[Segment]) -> BezPath {
    let mut path = BezPath::new();
    for index in 0..segments.len() {
        let sub = smoothed_segment_path(segments, index);
        path.extend(sub.elements().iter().copied());
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::path_points;
    use kurbo::PathEl;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_dot_is_zero_length_curve() {
        let segments = [Segment::dot(p(4.0, 4.0))];
        let path = smoothed_stroke_path(&segments);

        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(p(4.0, 4.0)), PathEl::QuadTo(p(4.0, 4.0), p(4.0, 4.0))]
        );
    }

    #[test]
    fn test_second_segment_uses_previous_end_as_control() {
        let segments = [
            Segment::new(p(0.0, 0.0), p(10.0, 0.0)),
            Segment::new(p(10.0, 0.0), p(10.0, 10.0)),
        ];
        let sub = smoothed_segment_path(&segments, 1);

        assert_eq!(
            sub.elements(),
            &[PathEl::MoveTo(p(5.0, 0.0)), PathEl::QuadTo(p(10.0, 0.0), p(10.0, 5.0))]
        );
    }

    #[test]
    fn test_sub_paths_are_joined_end_to_start() {
        let segments = [
            Segment::dot(p(0.0, 0.0)),
            Segment::new(p(0.0, 0.0), p(6.0, 0.0)),
            Segment::new(p(6.0, 0.0), p(6.0, 8.0)),
        ];
        for index in 1..segments.len() {
            let prev = path_points(&smoothed_segment_path(&segments, index - 1));
            let next = path_points(&smoothed_segment_path(&segments, index));
            assert_eq!(prev.last(), next.first());
        }
    }

    #[test]
    fn test_incremental_matches_full_rebuild() {
        let segments = [
            Segment::dot(p(1.0, 1.0)),
            Segment::new(p(1.0, 1.0), p(3.0, 2.0)),
            Segment::new(p(3.0, 2.0), p(7.0, 9.0)),
        ];
        let mut incremental = BezPath::new();
        for index in 0..segments.len() {
            incremental.extend(smoothed_segment_path(&segments, index).elements().iter().copied());
        }

        assert_eq!(incremental, smoothed_stroke_path(&segments));
        // Same input, same output.
        assert_eq!(smoothed_stroke_path(&segments), smoothed_stroke_path(&segments));
    }

    #[test]
    fn test_out_of_range_and_empty() {
        assert!(smoothed_segment_path(&[], 0).elements().is_empty());
        assert!(smoothed_stroke_path(&[]).elements().is_empty());
    }

    #[test]
    fn test_continuity_is_exact() {
        let segment = Segment::new(p(0.0, 0.0), p(2.0, 2.0));
        assert!(segment.is_continued_by(p(2.0, 2.0)));
        assert!(!segment.is_continued_by(p(2.0, 2.000001)));
    }
}
