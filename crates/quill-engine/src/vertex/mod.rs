//! The path vertex stage.
//!
//! `shaders/path.wgsl` runs this stage on the GPU. This module carries the
//! vertex format, the uniform block layout, and a CPU reference of every step
//! the shader takes, so the mapping from (position, path ID) to clip space,
//! depth, color and packed ID can be checked without a device.

mod stage;
mod uniforms;

pub use stage::{
    convert_screen_to_clip_space, path_index_to_depth, shade_vertex,
    transform_vertex_position, transform_vertex_position_st, PathVertex, VertexOutput,
    PATH_DEPTH_SCALE,
};
pub use uniforms::{PathUniforms, PathUniformsGpu};
