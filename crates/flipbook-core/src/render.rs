//! Render targets and the tiny-skia rasterizer behind them.
//!
//! Compositing is expressed against the [`RenderTarget`] trait so that the
//! canvas can paint into a [`Pixmap`] for display and storage, or into a
//! recording target in tests.

use kurbo::{BezPath, PathEl};
use tiny_skia::{
    BlendMode, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::style::{LineCap, Style};

/// Pixel blending for a path draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Standard alpha blending.
    SourceOver,
    /// Overwrite the destination, including its alpha.
    Copy,
}

/// Something a canvas can be composited into.
pub trait RenderTarget {
    /// Draw a raster at the origin.
    fn draw_raster(&mut self, raster: &Pixmap);

    /// Stroke a path with the style's colour, width and cap.
    fn stroke_path(&mut self, path: &BezPath, style: &Style, blend: Blend);

    /// Fill a closed path with the style's colour.
    fn fill_path(&mut self, path: &BezPath, style: &Style, blend: Blend);
}

/// A fully transparent raster, or `None` for a zero-sized one.
pub fn blank_raster(width: u32, height: u32) -> Option<Pixmap> {
    Pixmap::new(width, height)
}

impl RenderTarget for Pixmap {
    fn draw_raster(&mut self, raster: &Pixmap) {
        self.draw_pixmap(
            0,
            0,
            raster.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn stroke_path(&mut self, path: &BezPath, style: &Style, blend: Blend) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        let stroke = Stroke {
            width: style.width as f32,
            line_cap: to_skia_cap(style.line_cap),
            line_join: tiny_skia::LineJoin::Round,
            ..Stroke::default()
        };
        Pixmap::stroke_path(
            self,
            &skia_path,
            &to_skia_paint(style, blend),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn fill_path(&mut self, path: &BezPath, style: &Style, blend: Blend) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        Pixmap::fill_path(
            self,
            &skia_path,
            &to_skia_paint(style, blend),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// Convert a kurbo path into a tiny-skia path.
///
/// Returns `None` for paths tiny-skia cannot represent, such as a lone
/// `MoveTo`.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn to_skia_paint(style: &Style, blend: Blend) -> Paint<'static> {
    let rgba = style.color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    paint.blend_mode = match blend {
        Blend::SourceOver => BlendMode::SourceOver,
        Blend::Copy => BlendMode::Source,
    };
    paint
}

fn to_skia_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
        LineCap::Butt => tiny_skia::LineCap::Butt,
    }
}

/// Recording render target for tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Raster { width: u32, height: u32 },
        Stroke { width: f64, blend: Blend },
        Fill { width: f64, blend: Blend },
    }

    #[derive(Debug, Default)]
    pub struct RecordingTarget {
        pub ops: Vec<DrawOp>,
    }

    impl RenderTarget for RecordingTarget {
        fn draw_raster(&mut self, raster: &Pixmap) {
            self.ops.push(DrawOp::Raster {
                width: raster.width(),
                height: raster.height(),
            });
        }

        fn stroke_path(&mut self, _path: &BezPath, style: &Style, blend: Blend) {
            self.ops.push(DrawOp::Stroke {
                width: style.width,
                blend,
            });
        }

        fn fill_path(&mut self, _path: &BezPath, style: &Style, blend: Blend) {
            self.ops.push(DrawOp::Fill {
                width: style.width,
                blend,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ColorRgba;
    use kurbo::Point;

    fn opaque(color: ColorRgba) -> Style {
        Style::new(color.into(), 4.0)
    }

    #[test]
    fn test_blank_raster() {
        let raster = blank_raster(4, 3).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 3));
        assert!(raster.pixels().iter().all(|p| p.alpha() == 0));
        assert!(blank_raster(0, 3).is_none());
    }

    #[test]
    fn test_lone_move_to_is_skipped() {
        let mut raster = blank_raster(8, 8).unwrap();
        let mut path = BezPath::new();
        path.move_to(Point::new(4.0, 4.0));

        RenderTarget::stroke_path(&mut raster, &path, &opaque(ColorRgba::BLACK), Blend::SourceOver);
        assert!(raster.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_fill_paints_interior() {
        let mut raster = blank_raster(10, 10).unwrap();
        let mut square = BezPath::new();
        square.move_to((1.0, 1.0));
        square.line_to((9.0, 1.0));
        square.line_to((9.0, 9.0));
        square.line_to((1.0, 9.0));
        square.close_path();

        RenderTarget::fill_path(&mut raster, &square, &opaque(ColorRgba::GREEN), Blend::SourceOver);
        let px = raster.pixel(5, 5).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (0, 255, 0, 255));
        assert_eq!(raster.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn test_draw_raster_copies_pixels() {
        let mut source = blank_raster(4, 4).unwrap();
        source.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        let mut target = blank_raster(4, 4).unwrap();

        target.draw_raster(&source);
        assert_eq!(target.pixel(2, 2).unwrap().red(), 255);
    }
}
