use bytemuck::{Pod, Zeroable};

use crate::coords::{FramebufferSize, Mat4};
use crate::data_texture::DataTextureLayout;

/// Uniform inputs of the path vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathUniforms {
    /// Global transform applied after the per-path ST transform.
    pub transform: Mat4,
    pub framebuffer_size: FramebufferSize,
    pub path_colors: DataTextureLayout,
    pub path_transforms: DataTextureLayout,
}

impl PathUniforms {
    pub fn to_gpu(&self) -> PathUniformsGpu {
        PathUniformsGpu {
            transform: self.transform.to_cols_array(),
            framebuffer_size: self.framebuffer_size.to_ivec2(),
            path_colors_dimensions: self.path_colors.to_ivec2(),
            path_transforms_dimensions: self.path_transforms.to_ivec2(),
            _pad: [0; 2],
        }
    }
}

/// GPU layout of the uniform block (96 bytes):
///
///  offset  0  transform                   mat4x4<f32>
///  offset 64  framebuffer_size            vec2<i32>
///  offset 72  path_colors_dimensions      vec2<i32>
///  offset 80  path_transforms_dimensions  vec2<i32>
///  offset 88  _pad                        vec2<i32>
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct PathUniformsGpu {
    pub transform: [[f32; 4]; 4],
    pub framebuffer_size: [i32; 2],
    pub path_colors_dimensions: [i32; 2],
    pub path_transforms_dimensions: [i32; 2],
    pub _pad: [i32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_96_bytes() {
        assert_eq!(std::mem::size_of::<PathUniformsGpu>(), 96);
    }

    #[test]
    fn to_gpu_copies_dimensions() {
        let u = PathUniforms {
            transform: Mat4::translation(3.0, 4.0),
            framebuffer_size: FramebufferSize::new(800, 600),
            path_colors: DataTextureLayout { width: 12, height: 1 },
            path_transforms: DataTextureLayout { width: 256, height: 2 },
        };
        let g = u.to_gpu();
        assert_eq!(g.framebuffer_size, [800, 600]);
        assert_eq!(g.path_colors_dimensions, [12, 1]);
        assert_eq!(g.path_transforms_dimensions, [256, 2]);
        assert_eq!(g.transform[3], [3.0, 4.0, 0.0, 1.0]);
    }
}
