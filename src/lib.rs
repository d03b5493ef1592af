//! mesh-ngin
//!
//! A small wgpu renderer that loads a static mesh and draws it into a window
//! through a fixed perspective camera. Start-up is one parameterized routine
//! (see [`settings::Settings`]) covering three stages: a clip-space triangle,
//! a loaded mesh, and an indexed mesh seen through the camera.
//!
//! High-level modules
//! - `camera`: look-at camera, perspective projection and the camera uniform
//! - `context`: device context that owns surface, device, queue and scene resources
//! - `data_structures`: vertex layout and CPU-side meshes
//! - `flow`: the window event loop and frame-failure policy
//! - `pipelines`: the render pipeline shared by all stages
//! - `resources`: model (OBJ, glTF) and shader loading
//! - `render`: per-frame draw submission
//! - `settings`: start-up configuration and stage presets
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod settings;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Rad};
pub use wgpu::Color;
