//! The central GPU and window context.
//!
//! Owns the surface, device/queue, surface configuration, camera resources
//! and the four scene pipelines. Constructed once at startup and passed by
//! reference everywhere; there is no global state.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{self, CameraResources, CameraUniform, Projection},
    data_structures::texture,
    pipelines::ScenePipelines,
};

/// Upper bound on the device pixel ratio fed into rendering, bounding
/// fragment cost on high-density displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// The pixel ratio actually used for rendering: `min(scale_factor, 2)`.
pub fn clamped_pixel_ratio(scale_factor: f64) -> f32 {
    scale_factor.min(MAX_PIXEL_RATIO) as f32
}

#[derive(Debug)]
pub enum MouseButtonState {
    Left,
    Right,
    None,
}

#[derive(Debug)]
pub struct MouseState {
    pub coords: winit::dpi::PhysicalPosition<f64>,
    pub pressed: MouseButtonState,
}

#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub pipelines: ScenePipelines,
    pub depth_texture: texture::Texture,
    pub clear_colour: wgpu::Color,
    pub mouse: MouseState,
    pub pixel_ratio: f32,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("no suitable GPU adapter found");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so for the
                // web target some limits have to be lowered.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The baked lightmap and the panel colours assume an sRGB surface;
        // a linear surface would leave the whole scene gamma-shifted.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // Eye up on the hill, looking into the clearing.
        let camera = camera::Camera::new((4.0, 2.0, 4.0), (0.0, 0.0, 0.0));
        let projection =
            camera::Projection::new(config.width, config.height, cgmath::Deg(45.0), 0.1, 100.0);
        let mut camera_controller = camera::OrbitController::new(0.02, 0.05);
        camera_controller.sync(&camera);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
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
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let pipelines = ScenePipelines::new(&device, &config, &camera_bind_group_layout);

        let camera = CameraResources {
            camera,
            controller: camera_controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let pixel_ratio = clamped_pixel_ratio(window.scale_factor());

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            pipelines,
            depth_texture,
            clear_colour: wgpu::Color::BLACK,
            mouse: MouseState {
                coords: (0.0, 0.0).into(),
                pressed: MouseButtonState::None,
            },
            pixel_ratio,
        })
    }
}
