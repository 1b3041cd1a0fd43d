use crate::coords::FramebufferSize;

/// Renderer-facing context (device/queue + surface format + framebuffer size).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Physical pixels; scene coordinates map onto this through the uniform
    /// transform.
    pub framebuffer_size: FramebufferSize,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        framebuffer_size: FramebufferSize,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            framebuffer_size,
        }
    }
}

/// Target for drawing (encoder + color view + depth/stencil view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_stencil_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_stencil_view: &'a wgpu::TextureView,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_stencil_view,
        }
    }
}
