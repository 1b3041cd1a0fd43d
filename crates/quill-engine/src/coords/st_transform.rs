use super::Vec2;

/// Per-path "scale then translate" transform.
///
/// Stored in the transform data texture as one float4 texel laid out
/// `[scale.x, scale.y, translate.x, translate.y]`, which is exactly what the
/// vertex stage reads back (`position * st.xy + st.zw`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StTransform {
    pub scale: Vec2,
    pub translate: Vec2,
}

impl StTransform {
    pub const IDENTITY: StTransform = StTransform {
        scale: Vec2::new(1.0, 1.0),
        translate: Vec2::new(0.0, 0.0),
    };

    #[inline]
    pub const fn new(scale: Vec2, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    #[inline]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(1.0, 1.0), Vec2::new(x, y))
    }

    #[inline]
    pub const fn uniform_scale(s: f32) -> Self {
        Self::new(Vec2::new(s, s), Vec2::new(0.0, 0.0))
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        p.mul_elem(self.scale) + self.translate
    }

    /// Returns the transform equivalent to applying `self`, then `next`.
    #[inline]
    pub fn then(self, next: StTransform) -> StTransform {
        StTransform {
            scale: self.scale.mul_elem(next.scale),
            translate: self.translate.mul_elem(next.scale) + next.translate,
        }
    }

    #[inline]
    pub fn to_float4(self) -> [f32; 4] {
        [self.scale.x, self.scale.y, self.translate.x, self.translate.y]
    }

    #[inline]
    pub fn from_float4(v: [f32; 4]) -> Self {
        Self::new(Vec2::new(v[0], v[1]), Vec2::new(v[2], v[3]))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.scale.is_finite() && self.translate.is_finite()
    }
}

impl Default for StTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_scales_then_translates() {
        let st = StTransform::new(Vec2::new(2.0, -1.0), Vec2::new(10.0, 20.0));
        assert_eq!(st.apply(Vec2::new(3.0, 4.0)), Vec2::new(16.0, 16.0));
    }

    #[test]
    fn then_matches_sequential_application() {
        let a = StTransform::new(Vec2::new(2.0, 3.0), Vec2::new(1.0, -1.0));
        let b = StTransform::new(Vec2::new(0.5, -2.0), Vec2::new(4.0, 5.0));
        let p = Vec2::new(7.0, -3.0);
        assert_eq!(a.then(b).apply(p), b.apply(a.apply(p)));
    }

    #[test]
    fn float4_layout_is_scale_then_translate() {
        let st = StTransform::new(Vec2::new(1.5, 2.5), Vec2::new(-3.0, 4.0));
        assert_eq!(st.to_float4(), [1.5, 2.5, -3.0, 4.0]);
        assert_eq!(StTransform::from_float4(st.to_float4()), st);
    }
}
