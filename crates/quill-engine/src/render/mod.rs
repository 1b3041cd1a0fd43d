//! GPU rendering subsystem.
//!
//! The path renderer consumes built [`SceneBuffers`](crate::scene::SceneBuffers)
//! and issues stencil-then-cover draws via wgpu. It owns its GPU resources
//! (pipelines, buffers, data textures).
//!
//! Convention:
//! - scene coordinates reach framebuffer pixels through the per-path ST
//!   transform and then [`RenderOptions::transform`] (top-left origin, +Y down)
//! - depth and stencil share one `Depth24PlusStencil8` attachment; depth is
//!   cleared to 1.0 and stencil to 0 once per frame

mod common;
mod ctx;
mod data_texture;
mod depth;
mod path;
mod readback;

pub use ctx::{RenderCtx, RenderTarget};
pub use data_texture::GpuDataTexture;
pub use depth::{DepthStencil, DEPTH_STENCIL_FORMAT};
pub use path::{PathRenderer, RenderOptions};
pub use readback::{PathIdBuffer, PATH_ID_FORMAT};
