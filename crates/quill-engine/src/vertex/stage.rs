use bytemuck::{Pod, Zeroable};

use crate::coords::{Mat4, Vec2};
use crate::data_texture::fetch_float4;
use crate::path::pack_path_index;

use super::PathUniforms;

/// Divisor mapping a path index to depth. One past the largest ID keeps every
/// valid path strictly in front of the cleared far plane.
pub const PATH_DEPTH_SCALE: f32 = 65536.0;

/// Per-vertex input: local position plus the owning path's ID as a float.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PathVertex {
    pub position: [f32; 2],
    pub path_id: f32,
}

impl PathVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32    // path_id
    ];

    #[inline]
    pub fn new(position: Vec2, path_id: f32) -> Self {
        Self {
            position: position.to_array(),
            path_id,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PathVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// What the stage hands to the rasterizer and fragment stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexOutput {
    pub clip_position: [f32; 4],
    pub color: [f32; 4],
    pub packed_path_id: [f32; 2],
}

/// `position * st.xy + st.zw`
#[inline]
pub fn transform_vertex_position_st(position: Vec2, st: [f32; 4]) -> Vec2 {
    Vec2::new(position.x * st[0] + st[2], position.y * st[1] + st[3])
}

/// `(transform * vec4(position, 0, 1)).xy`
#[inline]
pub fn transform_vertex_position(position: Vec2, transform: &Mat4) -> Vec2 {
    transform.transform_point(position)
}

/// Screen pixels (top-left origin, +Y down) to clip space (+Y up).
#[inline]
pub fn convert_screen_to_clip_space(position: Vec2, framebuffer_size: [i32; 2]) -> Vec2 {
    let w = framebuffer_size[0].max(1) as f32;
    let h = framebuffer_size[1].max(1) as f32;
    Vec2::new(position.x / w * 2.0 - 1.0, 1.0 - position.y / h * 2.0)
}

/// Depth for a path index: higher indices sit nearer the viewer.
#[inline]
pub fn path_index_to_depth(index: i32) -> f32 {
    1.0 - index as f32 / PATH_DEPTH_SCALE
}

/// CPU reference of `vs_main` in `shaders/path.wgsl`.
pub fn shade_vertex(
    uniforms: &PathUniforms,
    path_colors: &[[f32; 4]],
    path_transforms: &[[f32; 4]],
    vertex: PathVertex,
) -> VertexOutput {
    let gpu = uniforms.to_gpu();
    let path_index = vertex.path_id as i32;

    let st = fetch_float4(path_transforms, path_index, gpu.path_transforms_dimensions);
    let position = Vec2::new(vertex.position[0], vertex.position[1]);
    let position = transform_vertex_position_st(position, st);
    let position = transform_vertex_position(position, &uniforms.transform);
    let position = convert_screen_to_clip_space(position, gpu.framebuffer_size);
    let depth = path_index_to_depth(path_index);

    VertexOutput {
        clip_position: [position.x, position.y, depth, 1.0],
        color: fetch_float4(path_colors, path_index, gpu.path_colors_dimensions),
        packed_path_id: pack_path_index(path_index.max(0) as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{FramebufferSize, StTransform};
    use crate::data_texture::DataTexture;
    use crate::paint::Color;
    use crate::path::PathId;

    fn uniforms(colors: &DataTexture, transforms: &DataTexture) -> PathUniforms {
        PathUniforms {
            transform: Mat4::IDENTITY,
            framebuffer_size: FramebufferSize::new(200, 100),
            path_colors: colors.layout(),
            path_transforms: transforms.layout(),
        }
    }

    #[test]
    fn screen_corners_map_to_clip_corners() {
        let fb = [200, 100];
        assert_eq!(convert_screen_to_clip_space(Vec2::new(0.0, 0.0), fb), Vec2::new(-1.0, 1.0));
        assert_eq!(convert_screen_to_clip_space(Vec2::new(200.0, 100.0), fb), Vec2::new(1.0, -1.0));
        assert_eq!(convert_screen_to_clip_space(Vec2::new(100.0, 50.0), fb), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn depth_decreases_with_index_and_stays_in_range() {
        assert_eq!(path_index_to_depth(0), 1.0);
        let mut prev = path_index_to_depth(0);
        for i in [1, 2, 1000, 65534, 65535] {
            let d = path_index_to_depth(i);
            assert!(d < prev && d > 0.0, "index {i} depth {d}");
            prev = d;
        }
    }

    #[test]
    fn st_transform_applies_scale_then_offset() {
        let p = transform_vertex_position_st(Vec2::new(2.0, 3.0), [10.0, -1.0, 5.0, 7.0]);
        assert_eq!(p, Vec2::new(25.0, 4.0));
    }

    #[test]
    fn shade_fetches_path_records() {
        let id = PathId::new(3).unwrap();
        let color = Color::from_premul(0.5, 0.0, 0.0, 0.5);

        let mut colors = DataTexture::new();
        let mut transforms = DataTexture::new();
        colors.set(id.index(), color.to_float4());
        transforms.set(id.index(), StTransform::translation(100.0, 50.0).to_float4());

        let out = shade_vertex(
            &uniforms(&colors, &transforms),
            colors.texels(),
            transforms.texels(),
            PathVertex::new(Vec2::new(0.0, 0.0), id.as_f32()),
        );

        assert_eq!(out.clip_position, [0.0, 0.0, path_index_to_depth(3), 1.0]);
        assert_eq!(out.color, color.to_float4());
        assert_eq!(out.packed_path_id, id.pack());
    }

    #[test]
    fn global_transform_runs_after_path_transform() {
        let mut colors = DataTexture::new();
        let mut transforms = DataTexture::new();
        colors.set(1, Color::WHITE.to_float4());
        transforms.set(1, StTransform::uniform_scale(2.0).to_float4());

        let mut u = uniforms(&colors, &transforms);
        u.transform = Mat4::translation(-20.0, 0.0);

        let out = shade_vertex(
            &u,
            colors.texels(),
            transforms.texels(),
            PathVertex::new(Vec2::new(60.0, 25.0), 1.0),
        );
        // (60, 25) * 2 = (120, 50), then -20 in x = (100, 50): the center.
        assert_eq!(&out.clip_position[..2], &[0.0, 0.0]);
    }

    #[test]
    fn fractional_id_truncates() {
        let mut colors = DataTexture::new();
        let transforms = DataTexture::with_len(3);
        colors.set(2, [0.0, 1.0, 0.0, 1.0]);
        let out = shade_vertex(
            &uniforms(&colors, &transforms),
            colors.texels(),
            transforms.texels(),
            PathVertex::new(Vec2::zero(), 2.9),
        );
        assert_eq!(out.color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_path_reads_zero_records() {
        let colors = DataTexture::with_len(2);
        let transforms = DataTexture::with_len(2);
        let out = shade_vertex(
            &uniforms(&colors, &transforms),
            colors.texels(),
            transforms.texels(),
            PathVertex::new(Vec2::new(10.0, 10.0), 40.0),
        );
        assert_eq!(out.color, [0.0; 4]);
        // A zero ST transform collapses geometry onto the origin.
        assert_eq!(&out.clip_position[..2], &[-1.0, 1.0]);
    }
}
