use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Pixels of touchpad scrolling that count as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Buttons that went down since last reset
    just_pressed: Vec<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    scroll_delta: f32,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pressed_vec: Vec::new(),
            just_pressed: Vec::new(),
            mouse_position: None,
            mouse_delta: (0.0, 0.0),
            scroll_delta: 0.0,
        }
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_button(button, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    self.set_button(btn, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
            }
            // Releases that happen while unfocused never arrive
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(button) {
                    self.pressed_vec.push(button);
                    self.just_pressed.push(button);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&button) {
                    self.pressed_vec.retain(|&b| b != button);
                }
            }
        }
    }

    fn move_cursor(&mut self, x: f32, y: f32) {
        if let Some(old_pos) = self.mouse_position {
            self.mouse_delta.0 += x - old_pos.0;
            self.mouse_delta.1 += y - old_pos.1;
        }
        self.mouse_position = Some((x, y));
    }

    fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.pressed_vec.clear();
    }

    /// Reset per-frame state (mouse delta, scroll, new presses)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
        self.just_pressed.clear();
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyH => Some(Button::KeyH),
            KeyCode::KeyR => Some(Button::KeyR),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            MouseButton::Middle => Some(Button::MouseMiddle),
            _ => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }

    fn was_pressed(&self, button: Button) -> bool {
        self.just_pressed.contains(&button)
    }

    fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit keyboard events can't be built outside winit, so state is driven
    // through the private helpers the event handler uses.

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(!controller.is_down(Button::MouseLeft));
        assert_eq!(controller.get_down_keys().len(), 0);
        assert_eq!(controller.mouse_position(), None);
        assert_eq!(controller.mouse_delta(), (0.0, 0.0));
        assert_eq!(controller.scroll_delta(), 0.0);
    }

    #[test]
    fn test_press_and_release_tracks_order() {
        let mut controller = WinitController::new();
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        controller.set_button(Button::MouseRight, ElementState::Pressed);
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        assert_eq!(controller.get_down_keys(), &[Button::MouseLeft, Button::MouseRight]);

        controller.set_button(Button::MouseLeft, ElementState::Released);
        assert!(!controller.is_down(Button::MouseLeft));
        assert_eq!(controller.get_down_keys(), &[Button::MouseRight]);
    }

    #[test]
    fn test_cursor_accumulates_delta() {
        let mut controller = WinitController::new();
        controller.move_cursor(10.0, 10.0);
        assert_eq!(controller.mouse_delta(), (0.0, 0.0));
        controller.move_cursor(15.0, 8.0);
        controller.move_cursor(20.0, 9.0);
        assert_eq!(controller.mouse_delta(), (10.0, -1.0));
        assert_eq!(controller.mouse_position(), Some((20.0, 9.0)));
    }

    #[test]
    fn test_delta_reset() {
        let mut controller = WinitController::new();
        controller.mouse_delta = (10.0, 5.0);
        controller.scroll_delta = 2.0;
        controller.mouse_position = Some((100.0, 200.0));

        controller.reset_deltas();
        assert_eq!(controller.mouse_delta(), (0.0, 0.0));
        assert_eq!(controller.scroll_delta(), 0.0);
        // Position should remain
        assert_eq!(controller.mouse_position(), Some((100.0, 200.0)));
    }

    #[test]
    fn test_was_pressed_until_reset() {
        let mut controller = WinitController::new();
        controller.set_button(Button::KeyH, ElementState::Pressed);
        // key repeat does not count as a new press
        controller.set_button(Button::KeyH, ElementState::Pressed);
        assert!(controller.was_pressed(Button::KeyH));
        assert_eq!(controller.just_pressed.len(), 1);

        controller.reset_deltas();
        assert!(!controller.was_pressed(Button::KeyH));
        assert!(controller.is_down(Button::KeyH));
    }

    #[test]
    fn test_release_all_on_focus_loss() {
        let mut controller = WinitController::new();
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        controller.process_event(&WindowEvent::Focused(false));
        assert!(controller.get_down_keys().is_empty());
    }
}
