use std::ops::Range;

use crate::coords::Rect;
use crate::data_texture::DataTexture;
use crate::path::{FillRule, PathId};
use crate::vertex::PathVertex;

/// One stencil-then-cover fill, ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDraw {
    pub path_id: PathId,
    /// Fan triangles written to the stencil buffer.
    pub stencil: Range<u32>,
    /// Bounds quad resolving the stencil into color.
    pub cover: Range<u32>,
    pub fill_rule: FillRule,
    /// Scissor rect in screen pixels, `None` = whole target.
    pub clip: Option<Rect>,
    /// Fully opaque fills may be drawn front to back.
    pub opaque: bool,
}

/// Counters from a scene build, logged at debug level.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BuildStats {
    pub paths: usize,
    /// Distinct geometries flattened (shared `Arc<Path>`s count once).
    pub unique_meshes: usize,
    pub vertices: usize,
    /// Fills dropped for empty geometry, zero-area clips or bad transforms.
    pub skipped: usize,
}

/// GPU-ready output of [`Scene::build`](super::Scene::build).
///
/// `draws` is sorted by ascending path ID, which is paint order.
#[derive(Debug, Clone, Default)]
pub struct SceneBuffers {
    pub vertices: Vec<PathVertex>,
    pub draws: Vec<PathDraw>,
    /// Premultiplied color per path ID (texel 0 is transparent).
    pub colors: DataTexture,
    /// `StTransform` per path ID (texel 0 is identity).
    pub transforms: DataTexture,
    pub stats: BuildStats,
}

impl SceneBuffers {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Order in which to issue `draws`.
    ///
    /// Without `front_to_back_opaque` this is plain paint order. With it,
    /// opaque fills go first from the top down so the depth test rejects
    /// hidden pixels early, then translucent fills follow bottom-up. Depth is
    /// derived from the path ID, so the final image is the same either way.
    pub fn draw_order(&self, front_to_back_opaque: bool) -> Vec<usize> {
        if !front_to_back_opaque {
            return (0..self.draws.len()).collect();
        }
        let opaque = self.draws.iter().enumerate().rev().filter(|(_, d)| d.opaque);
        let translucent = self.draws.iter().enumerate().filter(|(_, d)| !d.opaque);
        opaque.chain(translucent).map(|(i, _)| i).collect()
    }

    /// Draw whose path carries `id`, if it was built.
    pub fn draw_for(&self, id: PathId) -> Option<&PathDraw> {
        self.draws
            .binary_search_by_key(&id, |d| d.path_id)
            .ok()
            .map(|i| &self.draws[i])
    }
}
