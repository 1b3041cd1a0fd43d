use crate::coords::{FramebufferSize, Mat4};
use crate::path::FillRule;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::SceneBuffers;
use crate::vertex::{PathUniforms, PathVertex};

use super::common::{
    clip_to_scissor, cover_step_state, path_ubo_min_binding_size, premul_alpha_blend,
    stencil_step_state,
};
use super::data_texture::{data_texture_layout_entry, GpuDataTexture};
use super::readback::{PathIdBuffer, PATH_ID_FORMAT};

/// Per-frame render parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderOptions {
    /// Applied to every vertex after its path's ST transform, mapping scene
    /// coordinates to framebuffer pixels.
    pub transform: Mat4,
    /// Draw opaque paths front to back before translucent ones so the depth
    /// test rejects hidden pixels early. The image is unchanged.
    pub front_to_back_opaque: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            front_to_back_opaque: false,
        }
    }
}

/// Pipelines for one color target format.
struct PipelineSet {
    format: wgpu::TextureFormat,
    stencil_non_zero: wgpu::RenderPipeline,
    stencil_even_odd: wgpu::RenderPipeline,
    cover: wgpu::RenderPipeline,
}

impl PipelineSet {
    fn stencil(&self, rule: FillRule) -> &wgpu::RenderPipeline {
        match rule {
            FillRule::NonZero => &self.stencil_non_zero,
            FillRule::EvenOdd => &self.stencil_even_odd,
        }
    }
}

/// Stencil-then-cover path renderer.
///
/// Consumes [`SceneBuffers`]: one vertex buffer for the whole scene, plus the
/// per-path color and transform data textures the vertex stage reads by ID.
/// Each path is drawn in two steps sharing one render pass:
///
/// 1. its fan triangles accumulate winding into the stencil buffer;
/// 2. its bounds quad shades pixels with non-zero stencil and clears them.
///
/// Depth is derived from the path ID, so draw order only affects overdraw.
#[derive(Default)]
pub struct PathRenderer {
    shader: Option<wgpu::ShaderModule>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: Option<wgpu::PipelineLayout>,

    color_pipelines: Option<PipelineSet>,
    id_pipelines: Option<PipelineSet>,

    uniform_ubo: Option<wgpu::Buffer>,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    colors: Option<GpuDataTexture>,
    transforms: Option<GpuDataTexture>,

    bind_group: Option<wgpu::BindGroup>,
    bound_generations: (u64, u64),

    warned_zero_framebuffer: bool,
}

impl PathRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `buffers` into the target's color attachment.
    ///
    /// The target is loaded, not cleared; depth must start at 1.0 and
    /// stencil at 0 for the frame.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        buffers: &SceneBuffers,
        options: &RenderOptions,
    ) {
        if !self.prepare(ctx, ctx.framebuffer_size, buffers, options) {
            return;
        }
        self.ensure_pipelines(ctx.device, ctx.surface_format, false);

        let Some(pipelines) = self.color_pipelines.as_ref() else { return };
        let attachments = PassAttachments {
            label: "quill path pass",
            color: target.color_view,
            depth_stencil: target.depth_stencil_view,
            clear: false,
        };
        self.encode(target.encoder, attachments, pipelines, ctx.framebuffer_size, buffers, options);
    }

    /// Draws packed path IDs into `ids`, clearing it first. Background
    /// pixels read back as "no path".
    pub fn render_ids(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        ids: &mut PathIdBuffer,
        buffers: &SceneBuffers,
        options: &RenderOptions,
    ) {
        ids.ensure(ctx.device, ctx.framebuffer_size);
        // Even an empty scene clears the ID target.
        let prepared = self.prepare(ctx, ids.size(), buffers, options);
        self.ensure_pipelines(ctx.device, PATH_ID_FORMAT, true);

        let (Some(color), Some(depth_stencil)) = (ids.color_view(), ids.depth_stencil_view()) else {
            return;
        };
        let attachments = PassAttachments {
            label: "quill path id pass",
            color,
            depth_stencil,
            clear: true,
        };

        if !prepared {
            begin_pass(encoder, &attachments);
            return;
        }
        let Some(pipelines) = self.id_pipelines.as_ref() else { return };
        self.encode(encoder, attachments, pipelines, ids.size(), buffers, options);
    }

    /// Uploads vertices, data textures and uniforms. Returns `false` when
    /// there is nothing to draw.
    fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        framebuffer: FramebufferSize,
        buffers: &SceneBuffers,
        options: &RenderOptions,
    ) -> bool {
        if !framebuffer.is_valid() {
            if !self.warned_zero_framebuffer {
                log::debug!("PathRenderer: zero-sized framebuffer; skipping");
                self.warned_zero_framebuffer = true;
            }
            return false;
        }
        if buffers.is_empty() {
            return false;
        }

        self.ensure_shared(ctx.device);
        self.ensure_vertex_capacity(ctx.device, buffers.vertices.len());

        let Some(vbo) = self.vertex_vbo.as_ref() else { return false };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&buffers.vertices));

        let colors = self.colors.get_or_insert_with(|| GpuDataTexture::new("quill path colors"));
        colors.upload(ctx.device, ctx.queue, &buffers.colors);
        let transforms = self
            .transforms
            .get_or_insert_with(|| GpuDataTexture::new("quill path transforms"));
        transforms.upload(ctx.device, ctx.queue, &buffers.transforms);

        let uniforms = PathUniforms {
            transform: options.transform,
            framebuffer_size: framebuffer,
            path_colors: colors.layout(),
            path_transforms: transforms.layout(),
        };
        let Some(ubo) = self.uniform_ubo.as_ref() else { return false };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniforms.to_gpu()));

        self.ensure_bind_group(ctx.device);
        self.bind_group.is_some()
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        attachments: PassAttachments<'_>,
        pipelines: &PipelineSet,
        framebuffer: FramebufferSize,
        buffers: &SceneBuffers,
        options: &RenderOptions,
    ) {
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vertex_vbo.as_ref() else { return };

        let mut rpass = begin_pass(encoder, &attachments);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_stencil_reference(0);

        for index in buffers.draw_order(options.front_to_back_opaque) {
            let draw = &buffers.draws[index];
            let Some((sx, sy, sw, sh)) = clip_to_scissor(draw.clip, &options.transform, framebuffer) else {
                continue;
            };
            rpass.set_scissor_rect(sx, sy, sw, sh);

            rpass.set_pipeline(pipelines.stencil(draw.fill_rule));
            rpass.draw(draw.stencil.clone(), 0..1);

            rpass.set_pipeline(&pipelines.cover);
            rpass.draw(draw.cover.clone(), 0..1);
        }
    }

    fn ensure_shared(&mut self, device: &wgpu::Device) {
        if self.shader.is_none() {
            self.shader = Some(device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("quill path shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/path.wgsl").into()),
            }));
        }

        if self.bind_group_layout.is_none() {
            let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quill path bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(path_ubo_min_binding_size()),
                        },
                        count: None,
                    },
                    data_texture_layout_entry(1),
                    data_texture_layout_entry(2),
                ],
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("quill path pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

            self.bind_group_layout = Some(bgl);
            self.pipeline_layout = Some(pipeline_layout);
            self.color_pipelines = None;
            self.id_pipelines = None;
            self.bind_group = None;
        }

        if self.uniform_ubo.is_none() {
            self.uniform_ubo = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("quill path ubo"),
                size: path_ubo_min_binding_size().get(),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.bind_group = None;
        }
    }

    fn ensure_pipelines(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat, ids: bool) {
        let slot = if ids { &self.id_pipelines } else { &self.color_pipelines };
        if slot.as_ref().is_some_and(|p| p.format == format) {
            return;
        }
        let (Some(shader), Some(layout)) = (self.shader.as_ref(), self.pipeline_layout.as_ref()) else {
            return;
        };

        let (fs_entry, blend) = if ids {
            ("fs_path_id", None)
        } else {
            ("fs_color", Some(premul_alpha_blend()))
        };

        let build = |label: &str, depth_stencil, write_mask| {
            create_pipeline(device, shader, layout, label, format, fs_entry, blend, write_mask, depth_stencil)
        };

        let set = PipelineSet {
            format,
            stencil_non_zero: build(
                "quill path stencil (non-zero)",
                stencil_step_state(FillRule::NonZero),
                wgpu::ColorWrites::empty(),
            ),
            stencil_even_odd: build(
                "quill path stencil (even-odd)",
                stencil_step_state(FillRule::EvenOdd),
                wgpu::ColorWrites::empty(),
            ),
            cover: build("quill path cover", cover_step_state(), wgpu::ColorWrites::ALL),
        };

        log::debug!("PathRenderer: built pipelines for {format:?}");
        if ids {
            self.id_pipelines = Some(set);
        } else {
            self.color_pipelines = Some(set);
        }
    }

    fn ensure_bind_group(&mut self, device: &wgpu::Device) {
        let (Some(colors), Some(transforms)) = (self.colors.as_ref(), self.transforms.as_ref()) else {
            return;
        };
        let generations = (colors.generation(), transforms.generation());
        if self.bind_group.is_some() && self.bound_generations == generations {
            return;
        }

        let (Some(bgl), Some(ubo)) = (self.bind_group_layout.as_ref(), self.uniform_ubo.as_ref()) else {
            return;
        };
        let (Some(colors_view), Some(transforms_view)) = (colors.view(), transforms.view()) else {
            return;
        };

        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quill path bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(colors_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(transforms_view),
                },
            ],
        }));
        self.bound_generations = generations;
    }

    fn ensure_vertex_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.vertex_capacity && self.vertex_vbo.is_some() {
            return;
        }

        let new_cap = vertex_capacity_for(required);
        let new_size = (new_cap * std::mem::size_of::<PathVertex>()) as u64;

        self.vertex_vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quill path vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
    }
}

/// Vertex buffer capacity: next power of two, at least 256.
fn vertex_capacity_for(required: usize) -> usize {
    required.next_power_of_two().max(256)
}

struct PassAttachments<'a> {
    label: &'static str,
    color: &'a wgpu::TextureView,
    depth_stencil: &'a wgpu::TextureView,
    clear: bool,
}

fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    attachments: &PassAttachments<'_>,
) -> wgpu::RenderPass<'e> {
    let (color_load, depth_load, stencil_load) = if attachments.clear {
        (
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            wgpu::LoadOp::Clear(1.0),
            wgpu::LoadOp::Clear(0),
        )
    } else {
        (wgpu::LoadOp::Load, wgpu::LoadOp::Load, wgpu::LoadOp::Load)
    };

    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(attachments.label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: attachments.color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: color_load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: attachments.depth_stencil,
            depth_ops: Some(wgpu::Operations {
                load: depth_load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: Some(wgpu::Operations {
                load: stencil_load,
                store: wgpu::StoreOp::Store,
            }),
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    label: &str,
    format: wgpu::TextureFormat,
    fs_entry: &str,
    blend: Option<wgpu::BlendState>,
    write_mask: wgpu::ColorWrites,
    depth_stencil: wgpu::DepthStencilState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[PathVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Winding needs both faces.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_capacity_grows_by_powers_of_two() {
        assert_eq!(vertex_capacity_for(0), 256);
        assert_eq!(vertex_capacity_for(256), 256);
        assert_eq!(vertex_capacity_for(257), 512);
        assert_eq!(vertex_capacity_for(5000), 8192);
    }

    #[test]
    fn default_options_draw_in_paint_order() {
        let o = RenderOptions::default();
        assert_eq!(o.transform, Mat4::IDENTITY);
        assert!(!o.front_to_back_opaque);
    }
}
