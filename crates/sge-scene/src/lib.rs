//! Scenes: an ECS world plus a play/pause state machine that drives native
//! scripts, physics, camera updates, draw submission and deferred entity
//! changes once per frame.

mod error;
mod registry;
mod scene;
mod script;
pub mod serializer;
mod systems;

pub use error::SceneError;
pub use registry::{ScriptFactory, ScriptRegistry};
pub use scene::{Scene, SceneData, SceneRenderers, SceneState, duplicate_entity};
pub use script::{AsAny, NativeScript, ScriptContext, ScriptableEntity};
pub use serializer::{SceneFile, SceneSerializer};
