//! Flat emissive material shared by the two pole lights.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::mesh::{InstanceRaw, MeshVertex, Vertex},
    pipelines::{mk_render_pipeline, uniform_layout},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EmissiveUniform {
    pub color: [f32; 3],
    // Uniforms require 16 byte (4 float) spacing, hence the padding field
    pub _padding: u32,
}

/// The emissive colour block with its buffer and bind group. One instance
/// serves both pole lights; the colour never changes at runtime.
#[derive(Debug)]
pub struct EmissiveResources {
    pub uniform: EmissiveUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl EmissiveResources {
    pub fn new(device: &wgpu::Device, color: [f32; 3]) -> Self {
        let uniform = EmissiveUniform { color, _padding: 0 };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Emissive Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_layout(device, "emissive_bind_group_layout"),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("emissive_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
        }
    }
}

pub fn mk_emissive_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Emissive Pipeline Layout"),
            bind_group_layouts: &[
                camera_bind_group_layout,
                &uniform_layout(device, "emissive_bind_group_layout"),
            ],
            push_constant_ranges: &[],
        });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Emissive Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("emissive.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        true,
        Some(wgpu::Face::Back),
        &[MeshVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
