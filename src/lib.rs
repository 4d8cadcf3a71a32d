//! glowgate
//!
//! A single-scene interactive demo: a baked-lighting "portal" environment
//! loaded from a binary glTF container, rendered with custom WGSL materials
//! (an animated portal surface, emissive pole lights, a firefly particle
//! field) behind an orbit camera and a live tweak panel. Runs natively and
//! on the web from the same code path.
//!
//! High-level modules
//! - `app`: window/event loop, frame ticks, resize handling, stop signal
//! - `camera`: camera, projection and orbit controller with damped inertia
//! - `context`: central GPU context owning device/queue/pipelines
//! - `data_structures`: meshes, instances, textures, the firefly field
//! - `panel`: egui overlay exposing the live-tunable scene parameters
//! - `pipelines`: the four render pipelines and their uniform blocks
//! - `resources`: asset loading (glb scene, baked lightmap)
//! - `scene`: node table, material bindings and the assembled portal scene
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod panel;
pub mod pipelines;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
