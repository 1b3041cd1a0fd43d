use crate::coords::FramebufferSize;

/// Depth for path ordering plus 8 stencil bits for winding.
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Depth/stencil attachment sized to a framebuffer.
///
/// Call [`ensure`](Self::ensure) every frame; the texture is only re-created
/// when the size changes.
#[derive(Default)]
pub struct DepthStencil {
    size: Option<FramebufferSize>,
    view: Option<wgpu::TextureView>,
}

impl DepthStencil {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure(&mut self, device: &wgpu::Device, size: FramebufferSize) -> &wgpu::TextureView {
        if self.size != Some(size) {
            self.view = None;
            self.size = Some(size);
        }
        self.view.get_or_insert_with(|| {
            log::debug!("depth/stencil target {}x{}", size.width, size.height);
            create_depth_stencil_view(device, size, "quill depth/stencil")
        })
    }
}

pub(super) fn create_depth_stencil_view(
    device: &wgpu::Device,
    size: FramebufferSize,
    label: &str,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_STENCIL_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
