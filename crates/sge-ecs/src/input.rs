//! Aggregated input state resource for the current frame.

use bevy_ecs::prelude::*;
use glam::Vec2;
use sge_input::{KeyCode, KeyboardState, MouseButton, MouseState};

/// Keyboard and mouse state shared with scripts. Fed by the platform layer
/// (or a test) before the scene update, cleared after it.
#[derive(Resource, Clone, Debug, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keyboard.is_pressed(key)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse.is_button_pressed(button)
    }

    pub fn mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse.just_button_pressed(button)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse.position()
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse.delta()
    }

    pub fn clear_transients(&mut self) {
        self.keyboard.clear_transients();
        self.mouse.clear_transients();
    }
}
