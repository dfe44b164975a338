// Gamepad model detection and physical-to-logical layout remapping

use glam::Vec2;

use crate::backend::DeviceBackend;

/// Maximum number of gamepad slots tracked by the system.
pub(crate) const MAX_GAMEPADS: usize = 8;
/// Maximum number of raw axes sampled per gamepad.
pub(crate) const MAX_AXES: usize = 8;
/// Maximum number of raw (physical) buttons sampled per gamepad.
pub(crate) const MAX_RAW_BUTTONS: usize = 16;

/// A button of the standard logical gamepad layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    L1,
    L2,
    R1,
    R2,
    Select,
    Start,
    Middle,
    DpadUp,
    DpadRight,
    DpadDown,
    DpadLeft,
}

pub(crate) const GAMEPAD_BUTTON_COUNT: usize = 15;

pub(crate) const ALL_BUTTONS: [GamepadButton; GAMEPAD_BUTTON_COUNT] = [
    GamepadButton::A,
    GamepadButton::B,
    GamepadButton::X,
    GamepadButton::Y,
    GamepadButton::L1,
    GamepadButton::L2,
    GamepadButton::R1,
    GamepadButton::R2,
    GamepadButton::Select,
    GamepadButton::Start,
    GamepadButton::Middle,
    GamepadButton::DpadUp,
    GamepadButton::DpadRight,
    GamepadButton::DpadDown,
    GamepadButton::DpadLeft,
];

impl GamepadButton {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// An axis of the standard logical gamepad layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

pub(crate) const STANDARD_AXES: [GamepadAxis; 4] = [
    GamepadAxis::LeftStickX,
    GamepadAxis::LeftStickY,
    GamepadAxis::RightStickX,
    GamepadAxis::RightStickY,
];

impl GamepadAxis {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// The detected hardware layout of a connected gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum GamepadModel {
    /// Conforms to the standard logical layout; buttons map one-to-one.
    Standard,
    /// XInput-class pads reported without a standard mapping (seen in
    /// browsers that expose them generically). D-pad and triggers live
    /// on axes.
    XInput,
    /// The Micront pad: true buttons only, shuffled physical codes.
    Micront,
    /// Best-effort passthrough: logical code == physical code.
    #[default]
    Unknown,
}

// Hardware name fragments identifying XInput-class pads.
const XINPUT_NAME_PATTERNS: &[&str] = &[
    // Generic keys.
    "xinput",
    "x-input",
    "x_input",
    "xbox",
    "x-box",
    "x_box",
    // Specific models whose names carry no xinput key.
    "logitech gamepad f310",
];

/// Classify a gamepad by its reported hardware name.
/// Only consulted when no standard layout mapping is available.
pub(crate) fn guess_model(name: &str) -> GamepadModel {
    let name = name.to_ascii_lowercase();
    if name.contains("micront") {
        return GamepadModel::Micront;
    }
    if XINPUT_NAME_PATTERNS.iter().any(|p| name.contains(p)) {
        return GamepadModel::XInput;
    }
    GamepadModel::Unknown
}

// Raw axis layout of XInput-class pads.
const XINPUT_AXIS_LEFT_X: usize = 0;
const XINPUT_AXIS_LEFT_Y: usize = 1;
const XINPUT_AXIS_LEFT_TRIGGER: usize = 2;
const XINPUT_AXIS_RIGHT_X: usize = 3;
const XINPUT_AXIS_RIGHT_Y: usize = 4;
const XINPUT_AXIS_RIGHT_TRIGGER: usize = 5;
const XINPUT_AXIS_DPAD_X: usize = 6;
const XINPUT_AXIS_DPAD_Y: usize = 7;

// Analog trigger axes act as buttons past this value.
const TRIGGER_ACTIVATION: f32 = 0.9;
// D-pad axes report exactly +-1; the slack absorbs float conversion noise.
const DPAD_AXIS_THRESHOLD: f32 = 0.99;

fn xinput_raw_index(b: GamepadButton) -> usize {
    match b {
        GamepadButton::A => 0,
        GamepadButton::B => 1,
        GamepadButton::X => 2,
        GamepadButton::Y => 3,
        GamepadButton::L1 => 4,
        GamepadButton::R1 => 5,
        GamepadButton::Select => 6,
        GamepadButton::Start => 7,
        GamepadButton::Middle => 8,
        _ => b.index(),
    }
}

fn micront_raw_index(b: GamepadButton) -> usize {
    match b {
        GamepadButton::Y => 0,
        GamepadButton::B => 1,
        GamepadButton::A => 2,
        GamepadButton::X => 3,
        GamepadButton::DpadUp => 12,
        GamepadButton::DpadRight => 13,
        GamepadButton::DpadDown => 14,
        GamepadButton::DpadLeft => 15,
        _ => b.index(),
    }
}

/// Per-slot gamepad snapshot: detected model plus current and previous
/// frame axis/button values for edge detection.
#[derive(Debug, Clone)]
pub(crate) struct GamepadState {
    pub model: GamepadModel,
    model_name: String,
    axis_count: usize,
    axis_values: [f32; MAX_AXES],
    prev_axis_values: [f32; MAX_AXES],
    // Standard-layout button snapshots (Standard model only).
    buttons: [bool; GAMEPAD_BUTTON_COUNT],
    prev_buttons: [bool; GAMEPAD_BUTTON_COUNT],
    // Physical button snapshots (nonstandard models).
    raw_buttons: [bool; MAX_RAW_BUTTONS],
    prev_raw_buttons: [bool; MAX_RAW_BUTTONS],
}

impl GamepadState {
    pub(crate) fn new() -> Self {
        Self {
            model: GamepadModel::Unknown,
            model_name: String::new(),
            axis_count: 0,
            axis_values: [0.0; MAX_AXES],
            prev_axis_values: [0.0; MAX_AXES],
            buttons: [false; GAMEPAD_BUTTON_COUNT],
            prev_buttons: [false; GAMEPAD_BUTTON_COUNT],
            raw_buttons: [false; MAX_RAW_BUTTONS],
            prev_raw_buttons: [false; MAX_RAW_BUTTONS],
        }
    }

    /// Refresh the snapshot for the connected gamepad `id`.
    /// Model detection reruns only when the reported hardware name changes.
    pub(crate) fn refresh(&mut self, backend: &mut dyn DeviceBackend, id: usize) {
        let model_name = backend.gamepad_name(id);
        if model_name != self.model_name {
            self.model = if backend.has_standard_layout(id) {
                GamepadModel::Standard
            } else {
                guess_model(&model_name)
            };
            log::debug!(
                "gamepad {} reported as {:?}, classified as {:?}",
                id,
                model_name,
                self.model
            );
            self.model_name = model_name;
        }

        self.prev_axis_values = self.axis_values;
        match self.model {
            GamepadModel::Standard => {
                for axis in STANDARD_AXES {
                    self.axis_values[axis.index()] = backend.standard_axis_value(id, axis);
                }
                self.prev_buttons = self.buttons;
                for button in ALL_BUTTONS {
                    self.buttons[button.index()] =
                        backend.is_standard_button_pressed(id, button);
                }
            }
            _ => {
                self.axis_count = backend.gamepad_axis_count(id).min(MAX_AXES);
                for axis in 0..self.axis_count {
                    self.axis_values[axis] = backend.gamepad_axis_value(id, axis);
                }
                self.prev_raw_buttons = self.raw_buttons;
                for code in 0..MAX_RAW_BUTTONS {
                    self.raw_buttons[code] = backend.is_gamepad_button_pressed(id, code);
                }
            }
        }
    }

    /// Whether a logical button reads as pressed in the current
    /// (`current = true`) or previous frame snapshot. Emulated buttons
    /// (D-pad and triggers on axes) derive from the matching axis array,
    /// which makes edge detection uniform across real and derived buttons.
    pub(crate) fn button_pressed(&self, button: GamepadButton, current: bool) -> bool {
        let axes = if current {
            &self.axis_values
        } else {
            &self.prev_axis_values
        };
        match self.model {
            GamepadModel::Standard => {
                let buttons = if current { &self.buttons } else { &self.prev_buttons };
                buttons[button.index()]
            }
            GamepadModel::XInput => {
                let raw = if current {
                    &self.raw_buttons
                } else {
                    &self.prev_raw_buttons
                };
                match button {
                    GamepadButton::DpadUp => axes[XINPUT_AXIS_DPAD_Y] <= -DPAD_AXIS_THRESHOLD,
                    GamepadButton::DpadDown => axes[XINPUT_AXIS_DPAD_Y] >= DPAD_AXIS_THRESHOLD,
                    GamepadButton::DpadLeft => axes[XINPUT_AXIS_DPAD_X] <= -DPAD_AXIS_THRESHOLD,
                    GamepadButton::DpadRight => axes[XINPUT_AXIS_DPAD_X] >= DPAD_AXIS_THRESHOLD,
                    GamepadButton::L2 => axes[XINPUT_AXIS_LEFT_TRIGGER] > TRIGGER_ACTIVATION,
                    GamepadButton::R2 => axes[XINPUT_AXIS_RIGHT_TRIGGER] > TRIGGER_ACTIVATION,
                    _ => raw[xinput_raw_index(button)],
                }
            }
            GamepadModel::Micront => {
                let raw = if current {
                    &self.raw_buttons
                } else {
                    &self.prev_raw_buttons
                };
                raw[micront_raw_index(button)]
            }
            GamepadModel::Unknown => {
                let raw = if current {
                    &self.raw_buttons
                } else {
                    &self.prev_raw_buttons
                };
                raw[button.index()]
            }
        }
    }

    /// The left or right stick vector, if the model exposes sticks.
    pub(crate) fn stick_vec(&self, left: bool, current: bool) -> Option<Vec2> {
        let axes = if current {
            &self.axis_values
        } else {
            &self.prev_axis_values
        };
        match self.model {
            GamepadModel::Standard => {
                let (x, y) = if left {
                    (GamepadAxis::LeftStickX, GamepadAxis::LeftStickY)
                } else {
                    (GamepadAxis::RightStickX, GamepadAxis::RightStickY)
                };
                Some(Vec2::new(axes[x.index()], axes[y.index()]))
            }
            GamepadModel::XInput => {
                let (x, y) = if left {
                    (XINPUT_AXIS_LEFT_X, XINPUT_AXIS_LEFT_Y)
                } else {
                    (XINPUT_AXIS_RIGHT_X, XINPUT_AXIS_RIGHT_Y)
                };
                Some(Vec2::new(axes[x], axes[y]))
            }
            // Stick layouts of the remaining models are unmapped.
            GamepadModel::Micront | GamepadModel::Unknown => None,
        }
    }
}
