use crate::data_texture::{DataTexture, DataTextureLayout};

/// GPU copy of a [`DataTexture`]: an `Rgba32Float` texture read with
/// `textureLoad` in the vertex stage.
///
/// The texture is re-created when the CPU layout changes; `generation`
/// increments each time so bind groups referencing the old view can be
/// rebuilt.
pub struct GpuDataTexture {
    label: &'static str,
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    layout: DataTextureLayout,
    generation: u64,
}

impl GpuDataTexture {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            texture: None,
            view: None,
            layout: DataTextureLayout { width: 0, height: 0 },
            generation: 0,
        }
    }

    #[inline]
    pub fn layout(&self) -> DataTextureLayout {
        self.layout
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    /// Uploads every texel of `data`, growing the texture if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &DataTexture) {
        let layout = data.layout();
        if layout.area() == 0 {
            return;
        }

        if self.texture.is_none() || self.layout != layout {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(self.label),
                size: wgpu::Extent3d {
                    width: layout.width,
                    height: layout.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba32Float,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.texture = Some(texture);
            self.layout = layout;
            self.generation = self.generation.wrapping_add(1);
            log::debug!("{}: {}x{} texels", self.label, layout.width, layout.height);
        }

        let Some(texture) = self.texture.as_ref() else { return };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(layout.width * TEXEL_BYTES),
                rows_per_image: Some(layout.height),
            },
            wgpu::Extent3d {
                width: layout.width,
                height: layout.height,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// Bytes per `Rgba32Float` texel.
const TEXEL_BYTES: u32 = 16;

/// Bind group layout entry for a data texture at `binding`.
pub(super) fn data_texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Texture {
            // Rgba32Float is not filterable without an extra feature; only
            // textureLoad is used.
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}
