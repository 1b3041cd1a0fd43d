use crate::coords::{Rect, Vec2};

/// One path element. Coordinates are in the path's local space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathEl {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    Close,
}

/// Immutable vector path.
///
/// Paths are shared between fills (`Arc<Path>`) so glyph outlines used many
/// times are flattened once per scene build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    els: Vec<PathEl>,
}

impl Path {
    #[inline]
    pub fn elements(&self) -> &[PathEl] {
        &self.els
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.els.is_empty()
    }

    pub fn rect(rect: Rect) -> Path {
        let r = rect.normalized();
        let (min, max) = (r.min(), r.max());
        let mut b = PathBuilder::new();
        b.move_to(min.x, min.y);
        b.line_to(max.x, min.y);
        b.line_to(max.x, max.y);
        b.line_to(min.x, max.y);
        b.close();
        b.build()
    }

    /// Closed polygon through `points`. Fewer than 3 points yields an empty path.
    pub fn polygon(points: &[Vec2]) -> Path {
        let mut b = PathBuilder::new();
        if let [first, rest @ ..] = points {
            if rest.len() >= 2 {
                b.move_to(first.x, first.y);
                for p in rest {
                    b.line_to(p.x, p.y);
                }
                b.close();
            }
        }
        b.build()
    }

    /// Circle approximated by four cubic arcs.
    pub fn circle(center: Vec2, radius: f32) -> Path {
        // Control distance for a quarter arc.
        const K: f32 = 0.552_284_75;
        let r = radius.abs();
        let k = r * K;
        let (cx, cy) = (center.x, center.y);

        let mut b = PathBuilder::new();
        b.move_to(cx + r, cy);
        b.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        b.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        b.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        b.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        b.close();
        b.build()
    }
}

/// Incremental path construction.
///
/// Drawing commands issued before any `move_to` start a contour at the origin.
#[derive(Debug, Default)]
pub struct PathBuilder {
    els: Vec<PathEl>,
    in_contour: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.els.push(PathEl::MoveTo(Vec2::new(x, y)));
        self.in_contour = true;
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.ensure_contour();
        self.els.push(PathEl::LineTo(Vec2::new(x, y)));
        self
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.ensure_contour();
        self.els.push(PathEl::QuadTo(Vec2::new(cx, cy), Vec2::new(x, y)));
        self
    }

    pub fn cubic_to(&mut self, c0x: f32, c0y: f32, c1x: f32, c1y: f32, x: f32, y: f32) -> &mut Self {
        self.ensure_contour();
        self.els.push(PathEl::CubicTo(
            Vec2::new(c0x, c0y),
            Vec2::new(c1x, c1y),
            Vec2::new(x, y),
        ));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if self.in_contour {
            self.els.push(PathEl::Close);
            self.in_contour = false;
        }
        self
    }

    /// Finishes the path and leaves the builder empty for reuse.
    pub fn build(&mut self) -> Path {
        self.in_contour = false;
        Path {
            els: std::mem::take(&mut self.els),
        }
    }

    fn ensure_contour(&mut self) {
        if !self.in_contour {
            self.move_to(0.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_has_four_edges_and_close() {
        let p = Path::rect(Rect::new(0.0, 0.0, 2.0, 3.0));
        assert_eq!(p.elements().len(), 5);
        assert_eq!(p.elements()[0], PathEl::MoveTo(Vec2::new(0.0, 0.0)));
        assert_eq!(p.elements()[4], PathEl::Close);
    }

    #[test]
    fn polygon_needs_three_points() {
        assert!(Path::polygon(&[Vec2::zero(), Vec2::new(1.0, 0.0)]).is_empty());
        let tri = Path::polygon(&[Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
        assert_eq!(tri.elements().len(), 4);
    }

    #[test]
    fn line_without_move_starts_at_origin() {
        let mut b = PathBuilder::new();
        b.line_to(1.0, 1.0);
        let p = b.build();
        assert_eq!(p.elements()[0], PathEl::MoveTo(Vec2::zero()));
    }

    #[test]
    fn close_is_ignored_outside_contour() {
        let mut b = PathBuilder::new();
        b.close();
        b.move_to(1.0, 1.0).line_to(2.0, 2.0).close().close();
        let p = b.build();
        assert_eq!(p.elements().iter().filter(|e| **e == PathEl::Close).count(), 1);
    }
}
