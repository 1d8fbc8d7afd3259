//! Frame-coherent keyboard state tracker.
//!
//! Keys are tracked by physical [`KeyCode`] so camera movement stays on WASD
//! regardless of layout. Events carrying an unidentified physical key are
//! dropped.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: KeyCode,
    pub state: ElementState,
    pub repeat: bool,
}

impl RawKeyEvent {
    pub fn pressed(key: KeyCode) -> Self {
        Self {
            key,
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn released(key: KeyCode) -> Self {
        Self {
            key,
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Tracks held keys plus the keys that changed this frame.
///
/// Call [`clear_transients`](Self::clear_transients) once per frame after
/// scripts have polled.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
    just_released: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key) = event.physical_key {
            self.process_raw(RawKeyEvent {
                key,
                state: event.state,
                repeat: event.repeat,
            });
        }
    }

    /// Processes a [`RawKeyEvent`]. Repeats are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.pressed.remove(&event.key) {
                    self.just_released.insert(event.key);
                }
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.just_released.contains(&key)
    }

    /// Clears the per-frame sets.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_no_keys_pressed() {
        let kb = KeyboardState::new();
        for key in [KeyCode::KeyW, KeyCode::Space, KeyCode::ControlLeft] {
            assert!(!kb.is_pressed(key));
            assert!(!kb.just_pressed(key));
            assert!(!kb.just_released(key));
        }
    }

    #[test]
    fn test_press_then_release() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));
        assert!(kb.is_pressed(KeyCode::KeyW));
        assert!(kb.just_pressed(KeyCode::KeyW));

        kb.clear_transients();
        assert!(kb.is_pressed(KeyCode::KeyW));
        assert!(!kb.just_pressed(KeyCode::KeyW));

        kb.process_raw(RawKeyEvent::released(KeyCode::KeyW));
        assert!(!kb.is_pressed(KeyCode::KeyW));
        assert!(kb.just_released(KeyCode::KeyW));
    }

    #[test]
    fn test_repeat_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent {
            repeat: true,
            ..RawKeyEvent::pressed(KeyCode::KeyA)
        });
        assert!(!kb.is_pressed(KeyCode::KeyA));
    }

    #[test]
    fn test_held_key_does_not_retrigger() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyD));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyD));
        assert!(!kb.just_pressed(KeyCode::KeyD));
    }
}
