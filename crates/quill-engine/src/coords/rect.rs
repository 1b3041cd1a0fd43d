use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
///
/// Used for path bounds, cover quads, glyph culling and scissor clips.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::from_origin_size(min, max - min)
    }

    /// Bounding box of a point set. `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Rect::from_min_max(min, max))
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x < (r.origin.x + r.size.x)
            && p.y < (r.origin.y + r.size.y)
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = (a.origin.x + a.size.x).min(b.origin.x + b.size.x);
        let y1 = (a.origin.y + a.size.y).min(b.origin.y + b.size.y);

        let w = x1 - x0;
        let h = y1 - y0;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, w, h))
        }
    }

    #[inline]
    pub fn intersects(self, other: Rect) -> bool {
        self.intersect(other).is_some()
    }

    /// Smallest rectangle containing both.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();
        Rect::from_min_max(a.min().min(b.min()), a.max().max(b.max()))
    }

    /// Expands to whole-pixel edges (floor of min, ceil of max).
    #[inline]
    pub fn round_out(self) -> Rect {
        let r = self.normalized();
        let min = r.min();
        let max = r.max();
        Rect::from_min_max(
            Vec2::new(min.x.floor(), min.y.floor()),
            Vec2::new(max.x.ceil(), max.y.ceil()),
        )
    }

    /// The two triangles covering this rectangle, counter-clockwise in a
    /// Y-up frame.
    pub fn triangles(self) -> [Vec2; 6] {
        let r = self.normalized();
        let (a, c) = (r.min(), r.max());
        let b = Vec2::new(c.x, a.y);
        let d = Vec2::new(a.x, c.y);
        [a, b, c, a, c, d]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn normalized_negative_extent() {
        let n = r(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, r(6.0, 7.0, 4.0, 3.0));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(5.0, 5.0)));
        assert!(!rect.contains(Vec2::new(10.0, 10.0)));
        assert!(!rect.contains(Vec2::new(-1.0, 5.0)));
    }

    #[test]
    fn intersect_overlapping() {
        let i = r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 10.0, 10.0));
        assert_eq!(i, Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersect(b).is_none());
        assert!(!a.intersects(b));
    }

    #[test]
    fn union_covers_both() {
        let u = r(0.0, 0.0, 2.0, 2.0).union(r(5.0, -1.0, 1.0, 1.0));
        assert_eq!(u, r(0.0, -1.0, 6.0, 3.0));
    }

    #[test]
    fn from_points_bounds() {
        let pts = [Vec2::new(3.0, 1.0), Vec2::new(-2.0, 4.0), Vec2::new(0.0, -5.0)];
        assert_eq!(Rect::from_points(pts), Some(r(-2.0, -5.0, 5.0, 9.0)));
        assert_eq!(Rect::from_points(std::iter::empty()), None);
    }

    #[test]
    fn round_out_expands_to_pixels() {
        assert_eq!(r(0.5, -0.25, 1.0, 1.0).round_out(), r(0.0, -1.0, 2.0, 2.0));
    }

    #[test]
    fn triangles_span_corners() {
        let t = r(1.0, 2.0, 3.0, 4.0).triangles();
        assert_eq!(t[0], Vec2::new(1.0, 2.0));
        assert_eq!(t[2], Vec2::new(4.0, 6.0));
        assert_eq!(t[5], Vec2::new(1.0, 6.0));
    }
}
