//! World factory and core resource registration.

use bevy_ecs::prelude::*;

use crate::{DestroyQueue, InputState, SpawnQueue, TimeRes};

/// Insert the resources every scene world relies on.
pub fn register_core_resources(world: &mut World) {
    world.insert_resource(TimeRes::default());
    world.insert_resource(InputState::default());
    world.insert_resource(SpawnQueue::default());
    world.insert_resource(DestroyQueue::default());
}

/// A world with [`TimeRes`], [`InputState`], [`SpawnQueue`] and
/// [`DestroyQueue`] pre-inserted.
pub fn create_world() -> World {
    let mut world = World::new();
    register_core_resources(&mut world);
    world
}
