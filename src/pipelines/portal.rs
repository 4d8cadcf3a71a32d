//! The animated portal surface.
//!
//! A perlin-noise gradient between two designer-tunable colours, driven by
//! the elapsed-time uniform. Alpha blended and double sided so the vortex
//! reads from both sides of the gate.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::mesh::{InstanceRaw, MeshVertex, Vertex},
    pipelines::{mk_render_pipeline, uniform_layout},
};

/// Uniform block of the portal material. Field order and padding mirror the
/// WGSL struct (vec3 members align to 16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PortalUniform {
    pub time: f32,
    pub _pad0: [f32; 3],
    pub color_start: [f32; 3],
    pub _pad1: f32,
    pub color_end: [f32; 3],
    pub _pad2: f32,
}

impl PortalUniform {
    pub fn new(color_start: [f32; 3], color_end: [f32; 3]) -> Self {
        Self {
            time: 0.0,
            _pad0: [0.0; 3],
            color_start,
            _pad1: 0.0,
            color_end,
            _pad2: 0.0,
        }
    }
}

/// GPU-side half of the portal material.
#[derive(Debug)]
pub struct PortalResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl PortalResources {
    pub fn new(device: &wgpu::Device, uniform: &PortalUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Portal Buffer"),
            contents: bytemuck::cast_slice(&[*uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_layout(device, "portal_bind_group_layout"),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("portal_bind_group"),
        });

        Self { buffer, bind_group }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: &PortalUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }
}

pub fn mk_portal_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Portal Pipeline Layout"),
            bind_group_layouts: &[
                camera_bind_group_layout,
                &uniform_layout(device, "portal_bind_group_layout"),
            ],
            push_constant_ranges: &[],
        });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Portal Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("portal.wgsl").into()),
    };

    // Double sided: the gate is visible from inside and outside the arch.
    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        true,
        None,
        &[MeshVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
