use std::ops::Mul;

use super::Vec2;

/// Column-major 4x4 matrix; the global transform uniform of the path stage.
///
/// `cols[c][r]` is column `c`, row `r`, matching WGSL `mat4x4<f32>` memory
/// layout so the matrix uploads as-is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3][0] = x;
        m.cols[3][1] = y;
        m
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = sx;
        m.cols[1][1] = sy;
        m
    }

    /// Rotation about the Z axis by `radians`.
    ///
    /// In the Y-down screen convention a positive angle turns clockwise on
    /// screen.
    pub fn rotation_z(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        let mut m = Self::IDENTITY;
        m.cols[0][0] = c;
        m.cols[0][1] = s;
        m.cols[1][0] = -s;
        m.cols[1][1] = c;
        m
    }

    /// Rotation by `radians` around the screen point `pivot`.
    pub fn rotation_about(radians: f32, pivot: Vec2) -> Self {
        Self::translation(pivot.x, pivot.y)
            * Self::rotation_z(radians)
            * Self::translation(-pivot.x, -pivot.y)
    }

    /// Returns `(self * (x, y, 0, 1)).xy`. No perspective divide, same as the
    /// vertex stage.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let c = &self.cols;
        Vec2::new(
            c[0][0] * p.x + c[1][0] * p.y + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[3][1],
        )
    }

    #[inline]
    pub fn to_cols_array(&self) -> [[f32; 4]; 4] {
        self.cols
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, v) in col.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat4 { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_leaves_points() {
        let p = Vec2::new(3.0, -7.0);
        assert_eq!(Mat4::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn product_applies_right_first() {
        let m = Mat4::translation(10.0, 0.0) * Mat4::scale(2.0, 3.0);
        assert_eq!(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 3.0));
    }

    #[test]
    fn rotation_quarter_turn() {
        let m = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(approx(m.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn rotation_about_keeps_pivot() {
        let pivot = Vec2::new(50.0, 20.0);
        let m = Mat4::rotation_about(1.1, pivot);
        assert!(approx(m.transform_point(pivot), pivot));
    }
}
