// Device polling backend: the thin capability boundary the engine consumes

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::gamepad::{GamepadAxis, GamepadButton};

/// A raw touch point identifier assigned by the platform.
pub type TouchId = u64;

/// The per-frame device polling capability consumed by
/// [`InputSystem`](crate::InputSystem).
///
/// Implementations report only the *current* raw device state; the system
/// snapshots it once per update and derives previous-frame sets and edges
/// itself. An implementation typically wraps a windowing event loop
/// (accumulating winit events between frames) plus a gamepad polling
/// library.
///
/// The system never calls a method of a device family that was not enabled
/// in its configuration.
pub trait DeviceBackend {
    /// Append every currently pressed keyboard key to `dst`.
    fn append_pressed_keys(&mut self, dst: &mut Vec<KeyCode>);

    /// Whether a mouse button is currently held.
    fn is_mouse_button_pressed(&mut self, button: MouseButton) -> bool;

    /// Current cursor position in screen coordinates.
    fn cursor_pos(&mut self) -> Vec2;

    /// Wheel movement of the current frame (a per-frame delta, not an
    /// accumulated offset).
    fn wheel_delta(&mut self) -> Vec2;

    /// Append the id of every connected gamepad to `dst`.
    /// Ids are expected to be stable, 0-based slot numbers.
    fn append_gamepad_ids(&mut self, dst: &mut Vec<usize>);

    /// The hardware name the gamepad reports (used for model detection).
    fn gamepad_name(&mut self, id: usize) -> String;

    /// Whether a standard layout mapping is available for this gamepad.
    fn has_standard_layout(&mut self, id: usize) -> bool;

    /// Number of raw axes of this gamepad.
    fn gamepad_axis_count(&mut self, id: usize) -> usize;

    /// Raw axis value in [-1, 1].
    fn gamepad_axis_value(&mut self, id: usize, axis: usize) -> f32;

    /// Standard-layout axis value in [-1, 1].
    /// Only called for gamepads with a standard layout.
    fn standard_axis_value(&mut self, id: usize, axis: GamepadAxis) -> f32;

    /// Whether a raw (physical) gamepad button is currently held.
    fn is_gamepad_button_pressed(&mut self, id: usize, code: usize) -> bool;

    /// Whether a standard-layout button is currently held.
    /// Only called for gamepads with a standard layout.
    fn is_standard_button_pressed(&mut self, id: usize, button: GamepadButton) -> bool;

    /// Append the id of every currently active touch point to `dst`.
    fn append_touch_ids(&mut self, dst: &mut Vec<TouchId>);

    /// Current position of a touch point.
    fn touch_pos(&mut self, id: TouchId) -> Vec2;
}
