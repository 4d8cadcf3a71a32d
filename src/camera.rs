//! Camera, projection and the damped orbit controller.
//!
//! The camera orbits a fixed target (the centre of the clearing). Dragging
//! adds angular velocity; each frame the controller integrates that velocity
//! and decays it, so motion eases out instead of stopping dead.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, SquareMatrix, perspective};
use instant::Duration;
use winit::event::{MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Eye position and look-at target.
#[derive(Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, cgmath::Vector3::unit_y())
    }
}

/// Perspective projection tracking the surface aspect ratio.
#[derive(Debug)]
pub struct Projection {
    pub aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Keeps `aspect == width / height`; called from the resize handler.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera data as the shaders see it.
///
/// View and projection stay separate because the firefly shader needs
/// view-space depth for its size attenuation.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view = camera.calc_matrix().into();
        self.proj = projection.calc_matrix().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Orbit controller with inertial damping.
#[derive(Debug)]
pub struct OrbitController {
    distance: f32,
    yaw: f32,
    pitch: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    damping: f32,
}

impl OrbitController {
    /// `rotate_speed` scales mouse deltas into angular velocity; `damping`
    /// is the per-frame decay factor at a 60 Hz reference rate, in (0, 1).
    pub fn new(rotate_speed: f32, damping: f32) -> Self {
        Self {
            distance: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            rotate_speed,
            zoom_speed: 0.5,
            damping,
        }
    }

    /// Derive the orbit state (distance, yaw, pitch) from the camera's
    /// current position so the first drag doesn't snap.
    pub fn sync(&mut self, camera: &Camera) {
        let offset = camera.position - camera.target;
        self.distance = offset.magnitude().max(0.001);
        self.yaw = offset.z.atan2(offset.x);
        self.pitch = (offset.y / self.distance).asin();
    }

    /// Accumulate angular velocity from a mouse drag delta.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.yaw_velocity += dx as f32 * self.rotate_speed;
        self.pitch_velocity += dy as f32 * self.rotate_speed;
    }

    /// Scroll wheel feeds the zoom velocity.
    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            let amount = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
            };
            self.zoom_velocity -= amount * self.zoom_speed;
        }
    }

    /// Advance the orbit by one step: integrate velocities, decay them and
    /// place the camera on the new spherical position.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        self.yaw += self.yaw_velocity * dt;
        self.pitch = (self.pitch + self.pitch_velocity * dt)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
        self.distance = (self.distance + self.zoom_velocity * self.distance * dt).clamp(1.0, 30.0);

        // Exponential decay, normalized so `damping` reads as the per-frame
        // factor at 60 Hz regardless of the actual frame rate.
        let decay = (1.0 - self.damping).powf(dt * 60.0);
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;

        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        camera.position = camera.target
            + cgmath::Vector3::new(
                self.distance * cos_pitch * cos_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * sin_yaw,
            );
    }

    /// Magnitude of the current angular velocity; eases toward zero after
    /// input stops.
    pub fn angular_speed(&self) -> f32 {
        (self.yaw_velocity.powi(2) + self.pitch_velocity.powi(2)).sqrt()
    }
}

/// Camera state bundled with its GPU resources.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
