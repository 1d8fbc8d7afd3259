//! The board: left click selects the unit under the cursor.

use bevy_ecs::prelude::*;
use sge_ecs::{Tag, TimeStep};
use sge_input::MouseButton;
use sge_scene::{ScriptContext, ScriptableEntity};

use super::{CameraController, Unit};

pub const SELECT_RAYCAST_DISTANCE: f32 = 10_000.0;

#[derive(Debug, Clone, Default)]
pub struct Board {
    selected: Vec<Entity>,
}

impl Board {
    pub fn selected(&self) -> &[Entity] {
        &self.selected
    }

    fn deselect_all(&mut self, ctx: &mut ScriptContext<'_>) {
        for entity in self.selected.drain(..) {
            if let Some(unit) = ctx.script_mut::<Unit>(entity) {
                unit.deselect();
            }
        }
    }

    fn process_input(&mut self, ctx: &mut ScriptContext<'_>) {
        if !ctx.input().mouse_button_just_pressed(MouseButton::Left) {
            return;
        }
        let Some((entity, _)) = CameraController::pick(ctx, SELECT_RAYCAST_DISTANCE) else {
            return;
        };

        self.deselect_all(ctx);
        tracing::debug!(
            "Board hit {}",
            ctx.get::<Tag>(entity).map_or("<untagged>", Tag::as_str)
        );

        if let Some(unit) = ctx.script_mut::<Unit>(entity) {
            unit.select();
            self.selected.push(entity);
        }
    }
}

impl ScriptableEntity for Board {
    fn kind(&self) -> &'static str {
        "Board"
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, _ts: TimeStep) {
        self.process_input(ctx);
    }
}
