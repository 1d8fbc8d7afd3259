//! Food pellets that respawn somewhere else when eaten.

use bevy_ecs::prelude::*;
use glam::Vec3;
use sge_ecs::TransformComponent;
use sge_physics::RigidBody;
use sge_scene::{ScriptContext, ScriptableEntity};

pub const DEFAULT_HEALTH_REGEN: f32 = 10.0;
pub const DEFAULT_SPAWN_RANGE: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodProperties {
    pub health_regen: f32,
}

#[derive(Debug, Clone)]
pub struct Food {
    properties: FoodProperties,
    spawn_range: i32,
    times_eaten: u32,
}

impl Default for Food {
    fn default() -> Self {
        Self {
            properties: FoodProperties {
                health_regen: DEFAULT_HEALTH_REGEN,
            },
            spawn_range: DEFAULT_SPAWN_RANGE,
            times_eaten: 0,
        }
    }
}

impl Food {
    pub fn properties(&self) -> FoodProperties {
        self.properties
    }

    pub fn spawn_range(&self) -> i32 {
        self.spawn_range
    }

    pub fn times_eaten(&self) -> u32 {
        self.times_eaten
    }

    /// Consume the pellet. The caller moves it with [`Food::respawn`].
    pub fn eat(&mut self) -> FoodProperties {
        self.times_eaten += 1;
        self.properties
    }

    /// Move `entity` to a random spot on the ground within `range`.
    pub fn respawn(ctx: &mut ScriptContext<'_>, entity: Entity, range: i32) {
        let position = {
            let mut rng = super::rng(ctx);
            Vec3::new(rng.offset(range), 0.0, rng.offset(range))
        };
        if let Some(mut rb) = ctx.get_mut::<RigidBody>(entity) {
            rb.set_position(position);
        }
        if let Some(mut transform) = ctx.get_mut::<TransformComponent>(entity) {
            transform.position = position;
        }
        tracing::trace!("Food {:?} respawned at {}", entity, position);
    }
}

impl ScriptableEntity for Food {
    fn kind(&self) -> &'static str {
        "Food"
    }

    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        let entity = ctx.entity();
        Self::respawn(ctx, entity, self.spawn_range);
    }
}
