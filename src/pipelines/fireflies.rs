//! The firefly particle pipeline.
//!
//! wgpu has no point-size primitive, so each firefly is an instanced
//! camera-facing quad whose clip-space corner offsets reproduce the pixel
//! point-size math of a classic point sprite, perspective attenuation
//! included. Additive blend, depth tested but not written.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{fireflies::FireflyField, mesh::Vertex},
    pipelines::{mk_render_pipeline, uniform_layout},
};

/// Uniform block of the firefly material. `resolution` is needed to turn a
/// pixel size into a clip-space offset; it tracks the surface size.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FirefliesUniform {
    pub time: f32,
    pub pixel_ratio: f32,
    pub size: f32,
    pub _pad0: f32,
    pub resolution: [f32; 2],
    pub _pad1: [f32; 2],
}

impl FirefliesUniform {
    pub fn new(pixel_ratio: f32, size: f32, resolution: [f32; 2]) -> Self {
        Self {
            time: 0.0,
            pixel_ratio,
            size,
            _pad0: 0.0,
            resolution,
            _pad1: [0.0; 2],
        }
    }
}

/// One quad corner; the same four corners are shared by every firefly.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteVertex {
    corner: [f32; 2],
}

impl Vertex for SpriteVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

const QUAD_CORNERS: [SpriteVertex; 4] = [
    SpriteVertex { corner: [-0.5, -0.5] },
    SpriteVertex { corner: [0.5, -0.5] },
    SpriteVertex { corner: [0.5, 0.5] },
    SpriteVertex { corner: [-0.5, 0.5] },
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Per-firefly data: resting position and size weight.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FireflyInstance {
    position: [f32; 3],
    scale: f32,
}

impl Vertex for FireflyInstance {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FireflyInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// GPU resources for the firefly field: the shared quad, one instance per
/// particle and the uniform block.
#[derive(Debug)]
pub struct FirefliesResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    count: u32,
}

impl FirefliesResources {
    pub fn new(device: &wgpu::Device, field: &FireflyField, uniform: &FirefliesUniform) -> Self {
        let instances: Vec<FireflyInstance> = field
            .positions
            .iter()
            .zip(field.scales.iter())
            .map(|(&position, &scale)| FireflyInstance { position, scale })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Instance Buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fireflies Buffer"),
            contents: bytemuck::cast_slice(&[*uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_layout(device, "fireflies_bind_group_layout"),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("fireflies_bind_group"),
        });

        Self {
            buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            count: instances.len() as u32,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: &FirefliesUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..self.count);
    }
}

pub fn mk_fireflies_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Fireflies Pipeline Layout"),
            bind_group_layouts: &[
                camera_bind_group_layout,
                &uniform_layout(device, "fireflies_bind_group_layout"),
            ],
            push_constant_ranges: &[],
        });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Fireflies Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("fireflies.wgsl").into()),
    };

    // Additive glow: colour accumulates, depth stays untouched so sprites
    // never punch holes in each other.
    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        }),
        false,
        None,
        &[SpriteVertex::desc(), FireflyInstance::desc()],
        shader,
    )
}
