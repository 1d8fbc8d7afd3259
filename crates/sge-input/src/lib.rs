//! Frame-coherent keyboard and mouse state fed from winit events.

pub mod keyboard;
pub mod mouse;

pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
