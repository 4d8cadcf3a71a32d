//! Render pipelines for the four scene materials.
//!
//! - `baked`: textured static material for the environment mesh
//! - `emissive`: flat-colour material shared by both pole lights
//! - `portal`: animated perlin gradient, alpha blended, double sided
//! - `fireflies`: instanced quad sprites, additive blend, no depth write
//!
//! All pipelines share bind group 0 (camera) and the construction helper
//! below; each module owns its uniform block and WGSL source.

pub mod baked;
pub mod emissive;
pub mod fireflies;
pub mod portal;

use crate::data_structures::texture::Texture;

/// Layout for a single uniform buffer visible to both shader stages.
pub fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some(label),
    })
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_write_enabled: bool,
    cull_mode: Option<wgpu::Face>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

/// The four pipelines, built once at context creation and reused per frame.
#[derive(Debug)]
pub struct ScenePipelines {
    pub baked: wgpu::RenderPipeline,
    pub emissive: wgpu::RenderPipeline,
    pub portal: wgpu::RenderPipeline,
    pub fireflies: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            baked: baked::mk_baked_pipeline(device, config, camera_bind_group_layout),
            emissive: emissive::mk_emissive_pipeline(device, config, camera_bind_group_layout),
            portal: portal::mk_portal_pipeline(device, config, camera_bind_group_layout),
            fireflies: fireflies::mk_fireflies_pipeline(device, config, camera_bind_group_layout),
        }
    }
}
