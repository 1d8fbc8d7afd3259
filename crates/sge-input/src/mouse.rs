//! Frame-coherent mouse state tracker.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

fn button_index(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        MouseButton::Back => 3,
        MouseButton::Forward | MouseButton::Other(_) => 4,
    }
}

/// Cursor position, per-frame motion, buttons and scroll.
///
/// Positions are window pixels with the origin in the top-left corner.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    buttons: [ButtonFrame; 5],
    scroll: f32,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        self.delta += new_pos - self.position;
        self.position = new_pos;
    }

    /// Process a `MouseInput` event.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let frame = &mut self.buttons[button_index(button)];
        match state {
            ElementState::Pressed => {
                frame.pressed = true;
                frame.just_pressed = true;
            }
            ElementState::Released => {
                frame.pressed = false;
                frame.just_released = true;
            }
        }
    }

    /// Process a `MouseWheel` event.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => self.scroll += y,
            // ~40 pixels per line
            MouseScrollDelta::PixelDelta(pos) => self.scroll += (pos.y / 40.0) as f32,
        }
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
    }

    /// Clears delta, scroll and the just-pressed/released flags.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
        for b in &mut self.buttons {
            b.just_pressed = false;
            b.just_released = false;
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Movement since the last [`clear_transients`](Self::clear_transients).
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].pressed
    }

    #[must_use]
    pub fn just_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_pressed
    }

    #[must_use]
    pub fn just_button_released(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_released
    }

    /// Positive is away from the user.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_motion_accumulates_delta() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(10.0, 20.0);
        mouse.on_cursor_moved(15.0, 18.0);
        assert_eq!(mouse.position(), Vec2::new(15.0, 18.0));
        assert_eq!(mouse.delta(), Vec2::new(15.0, 18.0));

        mouse.clear_transients();
        assert_eq!(mouse.delta(), Vec2::ZERO);
        mouse.on_cursor_moved(16.0, 18.0);
        assert_eq!(mouse.delta(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_button_lifecycle() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Right, ElementState::Pressed);
        assert!(mouse.is_button_pressed(MouseButton::Right));
        assert!(mouse.just_button_pressed(MouseButton::Right));
        assert!(!mouse.is_button_pressed(MouseButton::Left));

        mouse.clear_transients();
        assert!(!mouse.just_button_pressed(MouseButton::Right));

        mouse.on_button(MouseButton::Right, ElementState::Released);
        assert!(!mouse.is_button_pressed(MouseButton::Right));
        assert!(mouse.just_button_released(MouseButton::Right));
    }

    #[test]
    fn test_scroll_line_delta() {
        let mut mouse = MouseState::new();
        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        assert_eq!(mouse.scroll(), 2.0);
        mouse.clear_transients();
        assert_eq!(mouse.scroll(), 0.0);
    }

    #[test]
    fn test_cursor_enter_leave() {
        let mut mouse = MouseState::new();
        assert!(!mouse.cursor_in_window());
        mouse.on_cursor_entered();
        assert!(mouse.cursor_in_window());
        mouse.on_cursor_left();
        assert!(!mouse.cursor_in_window());
    }
}
