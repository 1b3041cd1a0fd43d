use crate::coords::{Rect, Vec2};

use super::Contour;

/// Winding rule applied by the stencil pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Geometry for one stencil-then-cover fill, in path-local coordinates.
///
/// - `fan`: triangle list fanning each contour from its first point. Drawn
///   into the stencil buffer, it leaves the winding number (or its parity) of
///   every covered pixel.
/// - `bounds`: bounding box of all contour points; its quad is the cover
///   geometry that resolves the stencil into color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMesh {
    pub fan: Vec<Vec2>,
    pub bounds: Option<Rect>,
}

impl PathMesh {
    pub fn from_contours(contours: &[Contour]) -> Self {
        let tri_count: usize = contours.iter().map(|c| c.points.len().saturating_sub(2)).sum();
        let mut fan = Vec::with_capacity(tri_count * 3);

        for contour in contours {
            let Some((&pivot, rest)) = contour.points.split_first() else { continue };
            for pair in rest.windows(2) {
                fan.extend_from_slice(&[pivot, pair[0], pair[1]]);
            }
        }

        let bounds = Rect::from_points(contours.iter().flat_map(|c| c.points.iter().copied()));
        Self { fan, bounds }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fan.is_empty()
    }

    /// Cover quad as two triangles; `None` for an empty mesh.
    #[inline]
    pub fn cover(&self) -> Option<[Vec2; 6]> {
        if self.fan.is_empty() {
            return None;
        }
        self.bounds.map(Rect::triangles)
    }
}
