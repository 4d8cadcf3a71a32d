//! Application state and the event loop.
//!
//! One window, one scene, one steady running state. Each frame tick runs in
//! a fixed order: read the elapsed clock, push it into the time uniforms,
//! advance the camera damping, upload uniform buffers, render the scene,
//! paint the panel, present, then request the next tick — so ticks never
//! overlap. The loop exits on window close or an [`AppEvent::Exit`].

use std::{iter, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, MouseButtonState, clamped_pixel_ratio},
    data_structures::{fireflies::FireflyField, texture::Texture},
    panel::{DebugPanel, Tweaks},
    pipelines::fireflies::FirefliesResources,
    scene::{PortalModel, SceneUniforms},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// User events multiplexed into the winit loop.
pub enum AppEvent {
    /// Async init finished (WASM path; native init blocks instead).
    #[allow(dead_code)]
    Initialized(Box<AppState>),
    /// The environment finished loading and can be attached to the scene.
    #[allow(dead_code)]
    SceneLoaded(Box<PortalModel>),
    /// Stop signal the host can assert during teardown.
    #[allow(dead_code)]
    Exit,
}

/// Everything the frame loop touches, constructed once.
pub struct AppState {
    pub ctx: Context,
    panel: DebugPanel,
    tweaks: Tweaks,
    uniforms: SceneUniforms,
    fireflies: FirefliesResources,
    /// Absent until the async load completes; the loop renders the rest of
    /// the scene in the meantime.
    model: Option<PortalModel>,
    started: Instant,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> Self {
        let ctx = Context::new(window).await;
        let mut ctx = match ctx {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };

        let tweaks = Tweaks::default();
        let mut uniforms = SceneUniforms::new(
            ctx.pixel_ratio,
            [ctx.config.width as f32, ctx.config.height as f32],
        );
        tweaks.apply(&mut uniforms);
        ctx.clear_colour = tweaks.clear_color();

        let field = FireflyField::scatter();
        let fireflies = FirefliesResources::new(&ctx.device, &field, &uniforms.fireflies);
        let panel = DebugPanel::new(&ctx.window, &ctx.device, ctx.config.format);

        Self {
            ctx,
            panel,
            tweaks,
            uniforms,
            fireflies,
            model: None,
            started: Instant::now(),
            is_surface_configured: false,
        }
    }

    fn attach_model(&mut self, model: PortalModel) {
        self.model = Some(model);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
            self.ctx.pixel_ratio = clamped_pixel_ratio(self.ctx.window.scale_factor());
            self.uniforms
                .set_viewport(self.ctx.pixel_ratio, [width as f32, height as f32]);
        }
    }

    fn render(&mut self, dt: Duration) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        // Tick order: clock, time uniforms, camera damping, buffer uploads.
        let elapsed = self.started.elapsed().as_secs_f32();
        self.uniforms.advance(elapsed);

        let ctx = &mut self.ctx;
        ctx.camera.controller.update(&mut ctx.camera.camera, dt);
        ctx.camera
            .uniform
            .update_view_proj(&ctx.camera.camera, &ctx.projection);
        ctx.queue.write_buffer(
            &ctx.camera.buffer,
            0,
            bytemuck::cast_slice(&[ctx.camera.uniform]),
        );
        self.fireflies.write(&ctx.queue, &self.uniforms.fireflies);
        if let Some(model) = &self.model {
            model.portal.write(&ctx.queue, &self.uniforms.portal);
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
            if let Some(model) = &self.model {
                model.draw(&mut render_pass, &self.ctx.pipelines);
            }
            render_pass.set_pipeline(&self.ctx.pipelines.fireflies);
            self.fireflies.draw(&mut render_pass);
        }

        let changed = self.panel.draw(
            &self.ctx.window,
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &view,
            [self.ctx.config.width, self.ctx.config.height],
            &mut self.tweaks,
        );
        if changed {
            self.tweaks.apply(&mut self.uniforms);
            self.ctx.clear_colour = self.tweaks.clear_color();
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();

        // Schedule the next tick only now that this one fully completed, so
        // render calls never overlap.
        self.ctx.window.request_redraw();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    // Only the WASM init path sends through the proxy; native init blocks.
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<AppEvent>,
    state: Option<AppState>,
    last_time: Instant,
    running: bool,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            last_time: Instant::now(),
            running: true,
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("glowgate");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut state = self.async_runtime.block_on(AppState::new(window));
            let load = PortalModel::load(&state.ctx.device, &state.ctx.queue, &state.uniforms);
            match self.async_runtime.block_on(load) {
                Ok(model) => state.attach_model(model),
                Err(e) => log::error!("failed to load the portal scene: {e:#}"),
            }
            let size = state.ctx.window.inner_size();
            state.resize(size.width, size.height);
            state.ctx.window.request_redraw();
            self.state = Some(state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = AppState::new(window).await;
                assert!(
                    proxy
                        .send_event(AppEvent::Initialized(Box::new(state)))
                        .is_ok()
                );
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(state) => {
                self.state = Some(*state);
                let state = self.state.as_mut().unwrap();
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();

                // Kick off the environment fetch; the scene attaches via
                // SceneLoaded whenever it completes, possibly a few frames
                // in. Rendering without the model until then is fine.
                #[cfg(target_arch = "wasm32")]
                {
                    let device = state.ctx.device.clone();
                    let queue = state.ctx.queue.clone();
                    let uniforms = state.uniforms;
                    let proxy = self.proxy.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        match PortalModel::load(&device, &queue, &uniforms).await {
                            Ok(model) => assert!(
                                proxy
                                    .send_event(AppEvent::SceneLoaded(Box::new(model)))
                                    .is_ok()
                            ),
                            Err(e) => log::error!("failed to load the portal scene: {e:#}"),
                        }
                    });
                }
            }
            AppEvent::SceneLoaded(model) => {
                if let Some(state) = &mut self.state {
                    state.attach_model(*model);
                    state.ctx.window.request_redraw();
                }
            }
            AppEvent::Exit => {
                self.running = false;
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let MouseButtonState::Left = state.ctx.mouse.pressed {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        // The panel sees every event first; what it consumes (typing,
        // scrolling over the overlay) must not also steer the camera.
        let consumed = state.panel.on_window_event(&state.ctx.window, &event);
        if !consumed {
            state.ctx.camera.controller.handle_window_events(&event);
        }

        if let WindowEvent::CursorMoved { position, .. } = event {
            state.ctx.mouse.coords = position;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if !self.running {
                    return;
                }
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(dt) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                        state.ctx.window.request_redraw();
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                        state.ctx.window.request_redraw();
                    }
                }
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => match (button, button_state.is_pressed()) {
                (MouseButton::Left, true) => {
                    if !consumed && !state.panel.wants_pointer() {
                        state.ctx.mouse.pressed = MouseButtonState::Left;
                    }
                }
                (MouseButton::Right, true) => {
                    state.ctx.mouse.pressed = MouseButtonState::Right;
                }
                (_, false) => state.ctx.mouse.pressed = MouseButtonState::None,
                _ => (),
            },
            _ => {}
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop);

    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    run().expect("event loop failed to start");
}
