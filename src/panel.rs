//! The live tweak panel.
//!
//! An egui overlay exposing the handful of designer-tunable parameters:
//! portal gradient colours, firefly point size and the background clear
//! colour. Edits land in [`Tweaks`] (sRGB, as shown in the widgets) and are
//! converted to linear on application.

use egui_wgpu::ScreenDescriptor;
use winit::window::Window;

use crate::scene::{
    CLEAR_COLOR, PORTAL_COLOR_END, PORTAL_COLOR_START, SceneUniforms, srgb_to_linear,
    srgb_to_linear_rgb,
};

/// Panel width in logical units.
const PANEL_WIDTH: f32 = 400.0;

/// The live-tunable parameters, in the sRGB values the widgets display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tweaks {
    pub portal_color_start: [f32; 3],
    pub portal_color_end: [f32; 3],
    pub firefly_size: f32,
    pub clear_color: [f32; 3],
}

impl Default for Tweaks {
    fn default() -> Self {
        Self {
            portal_color_start: PORTAL_COLOR_START,
            portal_color_end: PORTAL_COLOR_END,
            firefly_size: 100.0,
            clear_color: CLEAR_COLOR,
        }
    }
}

impl Tweaks {
    /// Write the tweakable fields into the uniform state. Only the fields a
    /// tweak owns are touched; time and viewport values stay as they are.
    pub fn apply(&self, uniforms: &mut SceneUniforms) {
        uniforms.portal.color_start = srgb_to_linear_rgb(self.portal_color_start);
        uniforms.portal.color_end = srgb_to_linear_rgb(self.portal_color_end);
        uniforms.fireflies.size = self.firefly_size.clamp(0.0, 100.0);
    }

    /// The background colour as the renderer's linear clear value.
    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: srgb_to_linear(self.clear_color[0]) as f64,
            g: srgb_to_linear(self.clear_color[1]) as f64,
            b: srgb_to_linear(self.clear_color[2]) as f64,
            a: 1.0,
        }
    }
}

/// egui context, winit bridge and wgpu renderer for the overlay.
pub struct DebugPanel {
    context: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl DebugPanel {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let context = egui::Context::default();
        let winit_state = egui_winit::State::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );
        // The overlay draws in its own pass without a depth attachment.
        let renderer = egui_wgpu::Renderer::new(device, format, None, 1, false);

        Self {
            context,
            winit_state,
            renderer,
        }
    }

    /// Feed a window event to egui. Returns true when egui consumed it and
    /// the scene should not react (e.g. scrolling over the panel).
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// True while the pointer hovers the panel; camera drags are suppressed.
    pub fn wants_pointer(&self) -> bool {
        self.context.wants_pointer_input()
    }

    /// Run the panel UI and paint it over the frame.
    ///
    /// Returns true when any control changed this frame.
    pub fn draw(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        tweaks: &mut Tweaks,
    ) -> bool {
        let mut changed = false;

        let raw_input = self.winit_state.take_egui_input(window);
        let full_output = self.context.run(raw_input, |ctx| {
            egui::Window::new("portal")
                .default_width(PANEL_WIDTH)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        changed |= ui
                            .color_edit_button_rgb(&mut tweaks.portal_color_start)
                            .changed();
                        ui.label("portal start");
                    });
                    ui.horizontal(|ui| {
                        changed |= ui
                            .color_edit_button_rgb(&mut tweaks.portal_color_end)
                            .changed();
                        ui.label("portal end");
                    });
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut tweaks.firefly_size, 0.0..=100.0)
                                .text("firefly size"),
                        )
                        .changed();
                    ui.horizontal(|ui| {
                        changed |= ui.color_edit_button_rgb(&mut tweaks.clear_color).changed();
                        ui.label("background");
                    });
                });
        });
        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Panel Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        changed
    }
}
