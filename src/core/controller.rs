/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Toggle the debug panels
    KeyH,
    /// Put the camera back to its start position
    KeyR,
    Escape,
    MouseLeft,
    MouseRight,
    MouseMiddle,
}

/// Controller - handles button and pointer state
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];

    /// Button went down since the last reset
    fn was_pressed(&self, button: Button) -> bool;

    /// Cursor position in physical pixels, if the cursor is inside the window
    fn mouse_position(&self) -> Option<(f32, f32)>;

    /// Cursor movement since the last reset
    fn mouse_delta(&self) -> (f32, f32);

    /// Wheel movement in lines since the last reset, positive away from the user
    fn scroll_delta(&self) -> f32;
}
