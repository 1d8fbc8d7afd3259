//! Core ECS components, per-frame resources, deferred entity queues and the
//! world factory used by scenes.

mod components;
mod input;
mod lifecycle;
mod time;
mod world;

pub use components::{
    CameraComponent, MeshRenderer, SkinnedMeshRenderer, Tag, TransformComponent,
};
pub use input::InputState;
pub use lifecycle::{DestroyQueue, SpawnQueue, flush_spawn_queue};
pub use time::{TimeRes, TimeStep};
pub use world::{create_world, register_core_resources};
