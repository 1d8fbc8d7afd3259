//! Native scripts of the DNA simulation.

mod board;
mod camera_controller;
mod food;
mod unit;

pub use board::Board;
pub use camera_controller::CameraController;
pub use food::{Food, FoodProperties};
pub use unit::{Unit, UnitAction};

use bevy_ecs::world::Mut;
use sge_scene::{Scene, ScriptContext};

use crate::resources::GameRng;

/// Register every DNA script kind with `scene`.
pub fn register_scripts(scene: &mut Scene) {
    scene.register_script::<Unit>();
    scene.register_script::<Food>();
    scene.register_script::<Board>();
    scene.register_script::<CameraController>();
}

/// The scene's [`GameRng`], inserted with the default seed if missing.
pub(crate) fn rng<'a>(ctx: &'a mut ScriptContext<'_>) -> Mut<'a, GameRng> {
    ctx.world_mut()
        .get_resource_or_insert_with(GameRng::default)
}

#[cfg(test)]
#[path = "scripts_tests.rs"]
mod tests;
