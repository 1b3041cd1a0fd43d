use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::coords::StTransform;
use crate::paint::Color;
use crate::path::{flatten, PathError, PathIdAllocator, PathMesh};
use crate::vertex::PathVertex;

use super::{BuildStats, PathDraw, Scene, SceneBuffers};

/// Scene build parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BuildOptions {
    /// Maximum flattening error in scene units (before the global render
    /// transform). Converted to each path's local units through its
    /// transform scale.
    pub tolerance: f32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { tolerance: 0.25 }
    }
}

impl Scene {
    /// Assigns path IDs in paint order and produces vertices, draws and data
    /// textures.
    ///
    /// Geometry shared through the same `Arc<Path>` at the same effective
    /// tolerance is flattened once.
    pub fn build(&mut self, options: &BuildOptions) -> Result<SceneBuffers, PathError> {
        if !options.tolerance.is_finite() || options.tolerance <= 0.0 {
            return Err(PathError::BadTolerance(options.tolerance));
        }

        self.ensure_sorted();

        let mut ids = PathIdAllocator::new();
        let mut out = SceneBuffers::default();
        let mut meshes: HashMap<(usize, u32), PathMesh> = HashMap::new();
        let mut stats = BuildStats::default();

        out.colors.set(0, Color::transparent().to_float4());
        out.transforms.set(0, StTransform::IDENTITY.to_float4());

        for &index in &self.sorted_indices {
            let item = &self.items[index];
            let fill = &item.fill;

            if item.clip_rect.is_some_and(|c| c.is_empty()) || !fill.transform.is_finite() {
                stats.skipped += 1;
                continue;
            }

            let tolerance = local_tolerance(options.tolerance, fill.transform);
            let key = (Arc::as_ptr(&fill.path) as usize, tolerance.to_bits());
            let mesh = match meshes.entry(key) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => e.insert(PathMesh::from_contours(&flatten(&fill.path, tolerance)?)),
            };
            let Some(cover) = mesh.cover() else {
                stats.skipped += 1;
                continue;
            };

            let id = ids.allocate()?;
            let id_attr = id.as_f32();

            let stencil_start = out.vertices.len() as u32;
            out.vertices.extend(mesh.fan.iter().map(|&p| PathVertex::new(p, id_attr)));
            let cover_start = out.vertices.len() as u32;
            out.vertices.extend(cover.iter().map(|&p| PathVertex::new(p, id_attr)));
            let cover_end = out.vertices.len() as u32;

            let color = fill.color.clamped();
            out.colors.set(id.index(), color.to_float4());
            out.transforms.set(id.index(), fill.transform.to_float4());

            out.draws.push(PathDraw {
                path_id: id,
                stencil: stencil_start..cover_start,
                cover: cover_start..cover_end,
                fill_rule: fill.fill_rule,
                clip: item.clip_rect,
                opaque: color.is_opaque(),
            });
        }

        stats.paths = out.draws.len();
        stats.unique_meshes = meshes.len();
        stats.vertices = out.vertices.len();
        out.stats = stats;

        log::debug!(
            "scene built: {} paths, {} meshes, {} vertices, {} skipped",
            stats.paths,
            stats.unique_meshes,
            stats.vertices,
            stats.skipped
        );

        Ok(out)
    }
}

/// Smallest tolerance handed to the flattener. Per-curve segment counts are
/// capped anyway, so anything finer only risks underflowing to zero.
const MIN_LOCAL_TOLERANCE: f32 = 1e-6;

/// Scene-unit tolerance expressed in the path's local units.
///
/// The global render transform is not known here; callers that scale the
/// whole scene (e.g. by the window scale factor) divide `tolerance` first.
fn local_tolerance(tolerance: f32, transform: StTransform) -> f32 {
    let scale = transform.scale.x.abs().max(transform.scale.y.abs());
    let local = if scale > f32::EPSILON { tolerance / scale } else { tolerance };
    local.max(MIN_LOCAL_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::path::{FillRule, Path, PathId};
    use crate::scene::ZIndex;

    fn square(size: f32) -> Arc<Path> {
        Arc::new(Path::rect(Rect::new(0.0, 0.0, size, size)))
    }

    fn id(v: u16) -> PathId {
        PathId::new(v).unwrap()
    }

    #[test]
    fn ids_follow_paint_order() {
        let mut scene = Scene::new();
        let red = Color::from_premul(1.0, 0.0, 0.0, 1.0);
        let blue = Color::from_premul(0.0, 0.0, 1.0, 1.0);
        scene.push_path(ZIndex(5), square(10.0), red);
        scene.push_path(ZIndex(1), square(10.0), blue);

        let out = scene.build(&BuildOptions::default()).unwrap();
        assert_eq!(out.draws.len(), 2);
        assert_eq!(out.draws[0].path_id, id(1));
        assert_eq!(out.draws[1].path_id, id(2));
        // The lower layer got the lower ID.
        assert_eq!(out.colors.fetch(1), blue.to_float4());
        assert_eq!(out.colors.fetch(2), red.to_float4());
    }

    #[test]
    fn texel_zero_is_background() {
        let mut scene = Scene::new();
        scene.push_path(ZIndex(0), square(1.0), Color::BLACK);
        let out = scene.build(&BuildOptions::default()).unwrap();
        assert_eq!(out.colors.fetch(0), [0.0; 4]);
        assert_eq!(out.transforms.fetch(0), StTransform::IDENTITY.to_float4());
    }

    #[test]
    fn vertices_carry_their_path_id() {
        let mut scene = Scene::new();
        scene.push_path(ZIndex(0), square(4.0), Color::BLACK);
        scene.push_path(ZIndex(0), square(8.0), Color::BLACK);
        let out = scene.build(&BuildOptions::default()).unwrap();

        for draw in &out.draws {
            let range = draw.stencil.start as usize..draw.cover.end as usize;
            assert!(out.vertices[range].iter().all(|v| v.path_id == draw.path_id.as_f32()));
            assert_eq!(draw.cover.len(), 6);
            assert_eq!(draw.stencil.len(), 6);
        }
        assert_eq!(out.draws[0].cover.end, out.draws[1].stencil.start);
    }

    #[test]
    fn empty_geometry_does_not_consume_an_id() {
        let mut scene = Scene::new();
        scene.push_path(ZIndex(0), Path::default(), Color::BLACK);
        scene.push_path(ZIndex(0), square(2.0), Color::BLACK);
        let out = scene.build(&BuildOptions::default()).unwrap();
        assert_eq!(out.draws.len(), 1);
        assert_eq!(out.draws[0].path_id, id(1));
        assert_eq!(out.stats.skipped, 1);
    }

    #[test]
    fn clipped_out_fills_are_skipped() {
        let mut scene = Scene::new();
        scene.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.push_clip(Rect::new(50.0, 50.0, 10.0, 10.0));
        scene.push_path(ZIndex(0), square(2.0), Color::BLACK);
        scene.pop_clip();
        scene.push_path(ZIndex(0), square(2.0), Color::BLACK);
        scene.pop_clip();

        let out = scene.build(&BuildOptions::default()).unwrap();
        assert_eq!(out.draws.len(), 1);
        assert_eq!(out.draws[0].clip, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn shared_geometry_is_flattened_once() {
        let glyph = Arc::new(Path::circle(Vec2::zero(), 10.0));
        let mut scene = Scene::new();
        for i in 0..5 {
            scene.push_fill(
                ZIndex(0),
                Arc::clone(&glyph),
                Color::BLACK,
                StTransform::translation(i as f32 * 30.0, 0.0),
                FillRule::NonZero,
            );
        }
        let out = scene.build(&BuildOptions::default()).unwrap();
        assert_eq!(out.stats.paths, 5);
        assert_eq!(out.stats.unique_meshes, 1);
        assert_eq!(out.transforms.fetch(3), StTransform::translation(60.0, 0.0).to_float4());
    }

    #[test]
    fn scaled_paths_flatten_in_screen_units() {
        let circle = Arc::new(Path::circle(Vec2::zero(), 1.0));
        let mut small = Scene::new();
        small.push_path(ZIndex(0), Arc::clone(&circle), Color::BLACK);
        let mut big = Scene::new();
        big.push_fill(ZIndex(0), circle, Color::BLACK, StTransform::uniform_scale(100.0), FillRule::NonZero);

        let opts = BuildOptions::default();
        let small_n = small.build(&opts).unwrap().vertices.len();
        let big_n = big.build(&opts).unwrap().vertices.len();
        assert!(big_n > small_n, "{big_n} <= {small_n}");
    }

    #[test]
    fn huge_scale_keeps_a_usable_tolerance() {
        assert!(local_tolerance(1e-10, StTransform::uniform_scale(1e38)) > 0.0);

        let mut scene = Scene::new();
        scene.push_fill(
            ZIndex(0),
            Arc::new(Path::circle(Vec2::zero(), 1.0)),
            Color::BLACK,
            StTransform::uniform_scale(1e38),
            FillRule::NonZero,
        );
        let out = scene.build(&BuildOptions { tolerance: 1e-10 }).unwrap();
        assert_eq!(out.draws.len(), 1);
    }

    #[test]
    fn bad_tolerance_is_rejected() {
        let mut scene = Scene::new();
        assert!(scene.build(&BuildOptions { tolerance: -1.0 }).is_err());
    }

    #[test]
    fn front_to_back_puts_opaque_first_descending() {
        let mut scene = Scene::new();
        let half = Color::BLACK.with_opacity(0.5);
        scene.push_path(ZIndex(0), square(1.0), Color::BLACK); // 1 opaque
        scene.push_path(ZIndex(0), square(1.0), half); // 2 translucent
        scene.push_path(ZIndex(0), square(1.0), Color::WHITE); // 3 opaque
        scene.push_path(ZIndex(0), square(1.0), half); // 4 translucent
        let out = scene.build(&BuildOptions::default()).unwrap();

        assert_eq!(out.draw_order(false), vec![0, 1, 2, 3]);
        assert_eq!(out.draw_order(true), vec![2, 0, 1, 3]);
    }

    #[test]
    fn draw_lookup_by_id() {
        let mut scene = Scene::new();
        scene.push_path(ZIndex(0), square(1.0), Color::BLACK);
        scene.push_path(ZIndex(0), square(2.0), Color::BLACK);
        let out = scene.build(&BuildOptions::default()).unwrap();
        assert_eq!(out.draw_for(id(2)).map(|d| d.path_id), Some(id(2)));
        assert!(out.draw_for(id(9)).is_none());
    }
}
