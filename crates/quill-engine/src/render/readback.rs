use anyhow::{Context, Result};

use crate::coords::FramebufferSize;
use crate::path::PathId;

use super::depth::create_depth_stencil_view;

/// Color format of the path ID target: low byte in R, high byte in G.
pub const PATH_ID_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg8Unorm;

/// Buffer copies need rows aligned to this many bytes.
const ROW_ALIGNMENT: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Offscreen target holding the topmost path ID per pixel, for picking.
///
/// Filled by [`PathRenderer::render_ids`](super::PathRenderer::render_ids).
#[derive(Default)]
pub struct PathIdBuffer {
    size: FramebufferSize,
    texture: Option<wgpu::Texture>,
    color_view: Option<wgpu::TextureView>,
    depth_stencil_view: Option<wgpu::TextureView>,
    staging: Option<wgpu::Buffer>,
}

impl PathIdBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn size(&self) -> FramebufferSize {
        self.size
    }

    #[inline]
    pub fn color_view(&self) -> Option<&wgpu::TextureView> {
        self.color_view.as_ref()
    }

    #[inline]
    pub fn depth_stencil_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_stencil_view.as_ref()
    }

    /// (Re)creates the targets when `size` changes.
    pub fn ensure(&mut self, device: &wgpu::Device, size: FramebufferSize) {
        if self.texture.is_some() && self.size == size {
            return;
        }

        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quill path id target"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PATH_ID_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        self.color_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.depth_stencil_view = Some(create_depth_stencil_view(device, size, "quill path id depth/stencil"));
        self.texture = Some(texture);
        self.size = size;
    }

    /// Reads back the path covering pixel `(x, y)`.
    ///
    /// Blocks until the GPU has finished all submitted work. Returns
    /// `Ok(None)` for background pixels and coordinates outside the target.
    pub fn pick(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, x: u32, y: u32) -> Result<Option<PathId>> {
        if !in_bounds(self.size, x, y) {
            return Ok(None);
        }
        let Some(texture) = self.texture.as_ref() else {
            return Ok(None);
        };

        let staging = self.staging.get_or_insert_with(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("quill path id readback"),
                size: u64::from(ROW_ALIGNMENT),
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                mapped_at_creation: false,
            })
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quill path id pick"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(ROW_ALIGNMENT),
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        queue.submit([encoder.finish()]);

        let (tx, rx) = std::sync::mpsc::channel();
        staging
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let _ = tx.send(result);
            });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed to wait for path id readback")?;
        rx.recv()
            .context("path id readback callback dropped")?
            .context("failed to map path id readback buffer")?;

        let texel = {
            let data = staging.slice(..).get_mapped_range();
            [data[0], data[1]]
        };
        staging.unmap();

        Ok(PathId::unpack(texel))
    }
}

fn in_bounds(size: FramebufferSize, x: u32, y: u32) -> bool {
    x < size.width && y < size.height
}
