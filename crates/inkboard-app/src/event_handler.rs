//! Translation of window events into whiteboard input.

use inkboard_core::{KeyEvent, Modifiers, MouseButton, PointerEvent};
use kurbo::Point;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton};
use winit::keyboard::{Key, ModifiersState};

/// Tracks the pointer position and modifier keys between window events.
///
/// Button and key events from the window carry no position or modifier
/// state of their own, so both are remembered from earlier events.
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    cursor: Point,
    modifiers: Modifiers,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in physical pixels.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Current modifier keys.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Record a modifier change.
    pub fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        };
    }

    /// Handle cursor movement.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> PointerEvent {
        self.cursor = Point::new(position.x, position.y);
        PointerEvent::Move {
            position: self.cursor,
        }
    }

    /// Handle a mouse button change at the last known position.
    /// Returns None for buttons the whiteboard does not use.
    pub fn mouse_input(&self, state: ElementState, button: WinitButton) -> Option<PointerEvent> {
        let button = map_button(button)?;
        let position = self.cursor;
        Some(match state {
            ElementState::Pressed => PointerEvent::Down { position, button },
            ElementState::Released => PointerEvent::Up { position, button },
        })
    }

    /// Handle a keyboard event. Only character keys are forwarded.
    pub fn key_input(&self, key: &Key, state: ElementState) -> Option<KeyEvent> {
        let Key::Character(text) = key else {
            return None;
        };
        let text = text.to_string();
        Some(match state {
            ElementState::Pressed => KeyEvent::Pressed(text),
            ElementState::Released => KeyEvent::Released(text),
        })
    }
}

fn map_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}
