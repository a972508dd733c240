//! # GPU Chunk Backend
//!
//! wgpu implementation of `RenderBackend`.
//!
//! ## Architecture
//!
//! Every chunk owns two GPU buffers:
//! - a vertex buffer of `PackedVertex` words, recreated with `create_buffer_init`
//!   each time the chunk is remeshed
//! - a one-element instance buffer holding the chunk's `ChunkOrigin`
//!
//! Handles handed to the world are slot indices into `slots`. During a frame the
//! backend only records which slots to draw; `encode` replays those draws into a
//! render pass supplied by the caller, which owns the surface or offscreen target.
//!
//! ## Performance Considerations
//!
//! - One draw call per visible, non-empty chunk
//! - Empty meshes free their vertex buffer instead of keeping a zero-sized one
//! - The camera uniform is written once per frame in `begin_frame`

use cgmath::{Matrix4, Point3};
use wgpu::util::DeviceExt;
use wgpu::{Device, Queue, RenderPipeline, TextureFormat};

use super::backend::RenderBackend;
use super::vertex::{ChunkOrigin, PackedVertex};

/// Depth format shared by the chunk pipeline and the targets it renders into.
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

const CHUNK_SHADER: &str = include_str!("../../../assets/shaders/chunk.wgsl");

/// Camera data laid out for the chunk shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath matrices are not Pod, so the matrix travels as a plain array
    view_projection: [[f32; 4]; 4],
    eye: [f32; 4],
}

impl CameraUniform {
    /// Builds the uniform from a view-projection matrix and eye position.
    pub fn new(view_projection: Matrix4<f32>, eye: Point3<f32>) -> Self {
        CameraUniform {
            view_projection: view_projection.into(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

struct ChunkBuffers {
    vertices: Option<wgpu::Buffer>,
    origin: wgpu::Buffer,
}

/// Renders chunk meshes with wgpu.
pub struct GpuChunkBackend {
    device: Device,
    queue: Queue,
    pipeline: RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    slots: Vec<Option<ChunkBuffers>>,
    frame_draws: Vec<(usize, u32)>,
}

impl GpuChunkBackend {
    /// Creates the chunk pipeline and camera resources.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for buffer writes
    /// * `color_format` - Format of the colour attachment the pipeline renders into
    pub fn new(device: Device, queue: Queue, color_format: TextureFormat) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chunk Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::new(
                Matrix4::from_scale(1.0),
                Point3::new(0.0, 0.0, 0.0),
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Chunk Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Chunk Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Chunk Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Chunk Shader"),
            source: wgpu::ShaderSource::Wgsl(CHUNK_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Chunk Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PackedVertex::desc(), ChunkOrigin::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        log::info!("Chunk pipeline created for {:?}", color_format);

        GpuChunkBackend {
            device,
            queue,
            pipeline,
            camera_buffer,
            camera_bind_group,
            slots: Vec::new(),
            frame_draws: Vec::new(),
        }
    }

    /// The device the backend allocates on.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The queue the backend writes through.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Number of draws recorded for the current frame.
    pub fn pending_draws(&self) -> usize {
        self.frame_draws.len()
    }

    /// Replays the current frame's draws into a render pass.
    ///
    /// The pass must target a colour attachment in the format given to `new` and
    /// a depth attachment in `DEPTH_FORMAT`.
    pub fn encode(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for &(slot, vertex_count) in &self.frame_draws {
            let Some(Some(buffers)) = self.slots.get(slot) else {
                continue;
            };
            let Some(vertices) = buffers.vertices.as_ref() else {
                continue;
            };
            render_pass.set_vertex_buffer(0, vertices.slice(..));
            render_pass.set_vertex_buffer(1, buffers.origin.slice(..));
            render_pass.draw(0..vertex_count, 0..1);
        }
    }
}

impl RenderBackend for GpuChunkBackend {
    type Buffer = usize;

    fn begin_frame(&mut self, view_projection: Matrix4<f32>, eye: Point3<f32>) {
        self.frame_draws.clear();
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(view_projection, eye)]),
        );
    }

    fn create_buffer(&mut self, origin: Point3<i32>) -> usize {
        let origin = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Origin Buffer"),
                contents: bytemuck::cast_slice(&[ChunkOrigin::from(origin)]),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let buffers = ChunkBuffers {
            vertices: None,
            origin,
        };

        // reuse the first released slot
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(buffers);
                slot
            }
            None => {
                self.slots.push(Some(buffers));
                self.slots.len() - 1
            }
        }
    }

    fn replace_vertices(&mut self, buffer: &mut usize, vertices: &[PackedVertex]) {
        let Some(Some(buffers)) = self.slots.get_mut(*buffer) else {
            return;
        };
        if let Some(old) = buffers.vertices.take() {
            old.destroy();
        }
        if vertices.is_empty() {
            return;
        }
        buffers.vertices = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    fn draw(&mut self, buffer: &usize, vertex_count: u32) {
        self.frame_draws.push((*buffer, vertex_count));
    }

    fn release(&mut self, buffer: usize) {
        if let Some(slot) = self.slots.get_mut(buffer) {
            if let Some(buffers) = slot.take() {
                if let Some(vertices) = buffers.vertices {
                    vertices.destroy();
                }
                buffers.origin.destroy();
            }
        }
    }
}

/// Colour and depth textures for rendering without a window.
pub struct OffscreenTarget {
    /// Colour attachment view
    pub color_view: wgpu::TextureView,
    /// Depth attachment view
    pub depth_view: wgpu::TextureView,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl OffscreenTarget {
    /// Colour format of offscreen targets.
    pub const COLOR_FORMAT: TextureFormat = TextureFormat::Rgba8UnormSrgb;

    /// Allocates colour and depth textures of the given size.
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Colour Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        OffscreenTarget {
            color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            width,
            height,
        }
    }

    /// Encodes the backend's recorded draws into a pass over this target and submits it.
    pub fn submit_frame(&self, backend: &GpuChunkBackend) {
        let mut encoder = backend
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Frame Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Offscreen Chunk Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.6,
                            g: 0.75,
                            b: 0.95,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            backend.encode(&mut render_pass);
        }
        backend.queue().submit(std::iter::once(encoder.finish()));
        log::trace!(
            "Submitted {} chunk draws to {}x{} target",
            backend.pending_draws(),
            self.width,
            self.height
        );
    }
}
