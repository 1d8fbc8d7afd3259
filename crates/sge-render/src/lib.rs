//! Rendering interfaces for the scene: a fly camera with picking, model
//! handles, and a collect-then-flush instance renderer.
//!
//! No GPU work happens here. A [`RenderBackend`] receives one instanced draw
//! per model when a frame is flushed.

pub mod camera;
pub mod instance_renderer;
pub mod model_library;

pub use camera::{Camera3D, screen_to_world_ray};
pub use instance_renderer::{DrawInstance, HeadlessBackend, InstanceRenderer, RenderBackend};
pub use model_library::{ModelHandle, ModelLibrary};
