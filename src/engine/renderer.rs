// wgpu renderer for the orrery scene.
//
// One shader module, six pipelines (opaque / translucent / double-sided
// translucent triangles, lines, additive star points, glow sprite).
// Every drawable entity owns a small uniform slot with its model matrix and
// color; the frame uniform carries the camera.
//
// Draw order: opaque → stars → translucent → sprites.

use log::{debug, info};
use std::sync::Arc;
use wgpu::util::DeviceExt;

use super::components::{Blend, Drawable, Material, MeshId, Transform};
use super::geometry;
use super::mesh::{GpuVertex, PointCloud, PointInstance, Primitive, RenderMesh};
use super::scene::{MeshRegistry, SceneContext, Viewport};
use crate::error::OrreryError;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.012, g: 0.014, b: 0.035, a: 1.0 };

// ============================================================================
// UNIFORMS
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    /// x = point quad width in world units, yzw unused.
    params: [f32; 4],
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

// ============================================================================
// GPU MESHES
// ============================================================================

struct IndexedBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

enum GpuMesh {
    Triangles(IndexedBuffers),
    Lines(IndexedBuffers),
    /// Instanced over the shared billboard quad.
    Points { instance_buffer: wgpu::Buffer, count: u32, size: f32 },
    Sprite { quad: IndexedBuffers, texture_bind_group: wgpu::BindGroup },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Pass {
    Opaque,
    Points,
    Translucent,
    Sprite,
}

struct Pipelines {
    opaque: wgpu::RenderPipeline,
    translucent: wgpu::RenderPipeline,
    translucent_double: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
    points: wgpu::RenderPipeline,
    sprite: wgpu::RenderPipeline,
}

/// A frame being recorded. Pass the encoder to other passes (the overlay)
/// before handing it back to `Renderer::finish`.
pub struct Frame {
    output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

// ============================================================================
// RENDERER
// ============================================================================

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sample_count: u32,

    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: Pipelines,

    quad: IndexedBuffers,
    meshes: Vec<GpuMesh>,
    objects: Vec<ObjectSlot>,
}

impl Renderer {
    /// Create a surface on `window` sized to `viewport`.
    pub async fn new(
        window: Arc<winit::window::Window>,
        viewport: Viewport,
        msaa: bool,
    ) -> Result<Self, OrreryError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(OrreryError::Adapter)?;

        let info = adapter.get_info();
        info!("adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("orrery device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            // Vsync: present() is what paces the animation loop.
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if msaa
            && adapter
                .get_texture_format_features(surface_format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            1
        };
        info!("surface: {:?}, {}x msaa", surface_format, sample_count);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("orrery.wgsl").into()),
        });

        let frame_layout = uniform_layout(&device, "frame_layout", wgpu::ShaderStages::VERTEX);
        let object_layout = uniform_layout(
            &device,
            "object_layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh pipeline layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let sprite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite pipeline layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let factory = PipelineFactory {
            device: &device,
            shader: &shader,
            format: surface_format,
            sample_count,
        };
        let pipelines = Pipelines {
            opaque: factory.build(&PipelineDesc {
                label: "opaque",
                layout: &mesh_layout,
                vs: "vs_mesh",
                fs: "fs_flat",
                instanced: false,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull: Some(wgpu::Face::Back),
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
            }),
            translucent: factory.build(&PipelineDesc {
                label: "translucent",
                layout: &mesh_layout,
                vs: "vs_mesh",
                fs: "fs_flat",
                instanced: false,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull: Some(wgpu::Face::Back),
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
            }),
            translucent_double: factory.build(&PipelineDesc {
                label: "translucent double-sided",
                layout: &mesh_layout,
                vs: "vs_mesh",
                fs: "fs_flat",
                instanced: false,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull: None,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
            }),
            lines: factory.build(&PipelineDesc {
                label: "lines",
                layout: &mesh_layout,
                vs: "vs_mesh",
                fs: "fs_flat",
                instanced: false,
                topology: wgpu::PrimitiveTopology::LineStrip,
                cull: None,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
            }),
            points: factory.build(&PipelineDesc {
                label: "points",
                layout: &mesh_layout,
                vs: "vs_point",
                fs: "fs_flat",
                instanced: true,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull: None,
                blend: ADDITIVE,
                depth_write: false,
            }),
            sprite: factory.build(&PipelineDesc {
                label: "sprite",
                layout: &sprite_layout,
                vs: "vs_sprite",
                fs: "fs_sprite",
                instanced: false,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull: None,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
            }),
        };

        let quad = upload_indexed(&device, &geometry::billboard_quad());
        let (depth_view, msaa_view) = create_attachments(&device, &config, sample_count);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            depth_view,
            msaa_view,
            frame_buffer,
            frame_bind_group,
            object_layout,
            texture_layout,
            sampler,
            pipelines,
            quad,
            meshes: Vec::new(),
            objects: Vec::new(),
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Resize the backing surface. Zero-sized requests are ignored.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }
        if (viewport.width, viewport.height) == self.size() {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.reconfigure();
        debug!("renderer resized to {}x{}", viewport.width, viewport.height);
    }

    /// Re-apply the current configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        let (depth_view, msaa_view) = create_attachments(&self.device, &self.config, self.sample_count);
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }

    pub fn begin_frame(&self) -> Result<Frame, wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        Ok(Frame { output, view, encoder })
    }

    /// Record the scene (or just the background when there is none) into
    /// `frame`. Returns the number of draw calls issued.
    pub fn draw_scene(&mut self, frame: &mut Frame, scene: Option<&mut SceneContext>) -> u32 {
        let mut draws: Vec<(Pass, Blend, MeshId, usize)> = Vec::new();

        if let Some(scene) = scene {
            // Camera uniforms
            let view = scene.controller.view_matrix();
            let uniforms = FrameUniforms {
                view_proj: scene.view_projection().to_cols_array_2d(),
                camera_right: view.row(0).truncate().extend(0.0).to_array(),
                camera_up: view.row(1).truncate().extend(0.0).to_array(),
            };
            self.queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[uniforms]));
            let point_scale = scene.camera.point_scale();

            // Per-object uniforms, written BEFORE the render pass
            let mut query = scene.world.query::<(&Transform, &Drawable, &Material)>();
            for (transform, drawable, material) in query.iter(&scene.world) {
                let Some(mesh) = self.meshes.get(drawable.mesh.0) else {
                    continue;
                };
                let Some(slot) = self.objects.get(drawable.slot) else {
                    continue;
                };

                let size = match mesh {
                    GpuMesh::Points { size, .. } => *size * point_scale,
                    _ => 0.0,
                };
                let object = ObjectUniforms {
                    model: transform.matrix().to_cols_array_2d(),
                    color: material.color.to_array(material.opacity),
                    params: [size, 0.0, 0.0, 0.0],
                };
                self.queue.write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&[object]));

                draws.push((pass_for(mesh, material.blend), material.blend, drawable.mesh, drawable.slot));
            }
        }
        draws.sort_by_key(|(pass, ..)| *pass);

        let (target, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&frame.view)),
            None => (&frame.view, None),
        };

        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        let mut draw_calls = 0;
        for (_, blend, mesh_id, slot) in draws {
            let mesh = &self.meshes[mesh_id.0];
            render_pass.set_bind_group(1, &self.objects[slot].bind_group, &[]);

            match mesh {
                GpuMesh::Triangles(buffers) => {
                    let pipeline = match blend {
                        Blend::Translucent { double_sided: true } => &self.pipelines.translucent_double,
                        Blend::Translucent { double_sided: false } => &self.pipelines.translucent,
                        _ => &self.pipelines.opaque,
                    };
                    render_pass.set_pipeline(pipeline);
                    draw_indexed(&mut render_pass, buffers, 1);
                }
                GpuMesh::Lines(buffers) => {
                    render_pass.set_pipeline(&self.pipelines.lines);
                    draw_indexed(&mut render_pass, buffers, 1);
                }
                GpuMesh::Points { instance_buffer, count, .. } => {
                    render_pass.set_pipeline(&self.pipelines.points);
                    render_pass.set_vertex_buffer(1, instance_buffer.slice(..));
                    draw_indexed(&mut render_pass, &self.quad, *count);
                }
                GpuMesh::Sprite { quad, texture_bind_group } => {
                    render_pass.set_pipeline(&self.pipelines.sprite);
                    render_pass.set_bind_group(2, texture_bind_group, &[]);
                    draw_indexed(&mut render_pass, quad, 1);
                }
            }
            draw_calls += 1;
        }

        draw_calls
    }

    pub fn finish(&self, frame: Frame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.output.present();
    }
}

impl MeshRegistry for Renderer {
    fn register_mesh(&mut self, mesh: &RenderMesh) -> MeshId {
        let buffers = upload_indexed(&self.device, mesh);
        self.meshes.push(match mesh.primitive {
            Primitive::Triangles => GpuMesh::Triangles(buffers),
            Primitive::LineLoop => GpuMesh::Lines(buffers),
        });
        MeshId(self.meshes.len() - 1)
    }

    fn register_points(&mut self, points: &PointCloud) -> MeshId {
        let instances: Vec<PointInstance> = points.instances();
        let instance_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Instance Buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.meshes.push(GpuMesh::Points {
            instance_buffer,
            count: instances.len() as u32,
            size: points.size,
        });
        MeshId(self.meshes.len() - 1)
    }

    fn register_sprite(&mut self, quad: &RenderMesh, rgba: &[u8], size: u32) -> MeshId {
        let extent = wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 1 };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Sprite Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * size),
                rows_per_image: Some(size),
            },
            extent,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let texture_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
            ],
        });

        self.meshes.push(GpuMesh::Sprite {
            quad: upload_indexed(&self.device, quad),
            texture_bind_group,
        });
        MeshId(self.meshes.len() - 1)
    }

    fn allocate_slot(&mut self) -> usize {
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: std::mem::size_of::<ObjectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        self.objects.push(ObjectSlot { buffer, bind_group });
        self.objects.len() - 1
    }
}

// ============================================================================
// HELPERS
// ============================================================================

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

fn pass_for(mesh: &GpuMesh, blend: Blend) -> Pass {
    match (mesh, blend) {
        (GpuMesh::Points { .. }, _) | (_, Blend::Additive) => Pass::Points,
        (GpuMesh::Sprite { .. }, _) | (_, Blend::Sprite) => Pass::Sprite,
        (_, Blend::Opaque) => Pass::Opaque,
        (_, Blend::Translucent { .. }) => Pass::Translucent,
    }
}

fn draw_indexed(render_pass: &mut wgpu::RenderPass<'_>, buffers: &IndexedBuffers, instances: u32) {
    render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
    render_pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    render_pass.draw_indexed(0..buffers.index_count, 0, 0..instances);
}

fn upload_indexed(device: &wgpu::Device, mesh: &RenderMesh) -> IndexedBuffers {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Vertex Buffer"),
        contents: mesh.vertex_bytes(),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Index Buffer"),
        contents: mesh.index_bytes(),
        usage: wgpu::BufferUsages::INDEX,
    });
    IndexedBuffers {
        vertex_buffer,
        index_buffer,
        index_count: mesh.index_count() as u32,
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

fn create_attachments(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
    let size = wgpu::Extent3d {
        width: config.width,
        height: config.height,
        depth_or_array_layers: 1,
    };

    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size,
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let msaa = (sample_count > 1).then(|| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("MSAA Color Texture"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: config.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    });

    (depth.create_view(&wgpu::TextureViewDescriptor::default()), msaa)
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    vs: &'a str,
    fs: &'a str,
    instanced: bool,
    topology: wgpu::PrimitiveTopology,
    cull: Option<wgpu::Face>,
    blend: wgpu::BlendState,
    depth_write: bool,
}

struct PipelineFactory<'a> {
    device: &'a wgpu::Device,
    shader: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl PipelineFactory<'_> {
    fn build(&self, desc: &PipelineDesc<'_>) -> wgpu::RenderPipeline {
        let mut vertex_layouts = vec![GpuVertex::desc()];
        if desc.instanced {
            vertex_layouts.push(PointInstance::desc());
        }

        let strip_index_format = match desc.topology {
            wgpu::PrimitiveTopology::LineStrip | wgpu::PrimitiveTopology::TriangleStrip => {
                Some(wgpu::IndexFormat::Uint32)
            }
            _ => None,
        };

        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(desc.layout),
            vertex: wgpu::VertexState {
                module: self.shader,
                entry_point: Some(desc.vs),
                buffers: &vertex_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: self.shader,
                entry_point: Some(desc.fs),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(desc.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: desc.depth_write,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: self.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_blocks_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 96);
    }

    #[test]
    fn passes_order_opaque_before_blended() {
        assert!(Pass::Opaque < Pass::Points);
        assert!(Pass::Points < Pass::Translucent);
        assert!(Pass::Translucent < Pass::Sprite);
    }
}
