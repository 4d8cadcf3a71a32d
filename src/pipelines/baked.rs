//! Textured static material for the baked environment mesh.
//!
//! All lighting in the scene was pre-computed into the lightmap, so the
//! fragment stage is a plain texture lookup.

use crate::{
    data_structures::mesh::{InstanceRaw, MeshVertex, Vertex},
    pipelines::mk_render_pipeline,
};

/// Layout for the lightmap texture and its sampler.
pub fn lightmap_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        label: Some("lightmap_bind_group_layout"),
    })
}

pub fn mk_baked_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Baked Pipeline Layout"),
            bind_group_layouts: &[camera_bind_group_layout, &lightmap_layout(device)],
            push_constant_ranges: &[],
        });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Baked Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("baked.wgsl").into()),
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
