// Key descriptors: typed, named input methods that can activate an action

use std::fmt;

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::action::DeviceKind;
use crate::gamepad::GamepadButton;

/// The device-family + modifier-composition tag of a key descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum KeyKind {
    Keyboard,
    KeyboardWithCtrl,
    KeyboardWithShift,
    KeyboardWithCtrlShift,
    Mouse,
    MouseWithCtrl,
    MouseWithShift,
    MouseWithCtrlShift,
    MouseDrag,
    Gamepad,
    GamepadLeftStick,
    GamepadRightStick,
    GamepadLeftStickMotion,
    GamepadRightStickMotion,
    Wheel,
    Touch,
    TouchDrag,
    /// Synthetic kind used by `Handler::emit_event`; the code carries the
    /// raw `Action` value, so it can never collide with real key codes.
    Simulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum StickCode {
    Up,
    Right,
    Down,
    Left,
    Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum WheelCode {
    Up,
    Down,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TouchCode {
    Tap,
    LongTap,
    Drag,
}

/// The raw device code behind a key descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RawCode {
    Keyboard(KeyCode),
    Mouse(MouseButton),
    GamepadButton(GamepadButton),
    Stick(StickCode),
    Wheel(WheelCode),
    Touch(TouchCode),
    Action(u32),
}

/// A modifier that can be attached to keyboard and mouse keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyModifier {
    Control,
    Shift,
    ControlShift,
}

/// An input method that can be used to activate an [`Action`](crate::Action).
///
/// A key could be a keyboard key, a gamepad button, a mouse button,
/// a stick direction, a wheel direction or a touch gesture.
/// Use the predefined constants from the [`keys`] module to build a
/// [`Keymap`](crate::Keymap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub(crate) code: RawCode,
    pub(crate) kind: KeyKind,
    pub(crate) name: &'static str,
}

impl Key {
    /// The key display name without any modifier prefix, e.g. `"left"`
    /// or `"gamepad_a"`. Use the `Display` impl to render the full
    /// spec form (`"ctrl+shift+left"`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Compose this key with a modifier.
    ///
    /// Only keyboard and mouse button keys accept modifiers.
    ///
    /// # Panics
    ///
    /// Panics for any other key kind: attaching a modifier to, say, a
    /// gamepad button is a keymap-construction bug, not a runtime condition.
    pub fn with_modifier(self, modifier: KeyModifier) -> Key {
        let kind = match (self.kind, modifier) {
            (KeyKind::Keyboard, KeyModifier::Control) => KeyKind::KeyboardWithCtrl,
            (KeyKind::Keyboard, KeyModifier::Shift) => KeyKind::KeyboardWithShift,
            (KeyKind::Keyboard, KeyModifier::ControlShift) => KeyKind::KeyboardWithCtrlShift,
            (KeyKind::Mouse, KeyModifier::Control) => KeyKind::MouseWithCtrl,
            (KeyKind::Mouse, KeyModifier::Shift) => KeyKind::MouseWithShift,
            (KeyKind::Mouse, KeyModifier::ControlShift) => KeyKind::MouseWithCtrlShift,
            _ => panic!("key {:?} doesn't support modifiers", self.name),
        };
        Key { kind, ..self }
    }

    /// The modifier attached to this key, if any.
    pub fn modifier(&self) -> Option<KeyModifier> {
        match self.kind {
            KeyKind::KeyboardWithCtrl | KeyKind::MouseWithCtrl => Some(KeyModifier::Control),
            KeyKind::KeyboardWithShift | KeyKind::MouseWithShift => Some(KeyModifier::Shift),
            KeyKind::KeyboardWithCtrlShift | KeyKind::MouseWithCtrlShift => {
                Some(KeyModifier::ControlShift)
            }
            _ => None,
        }
    }

    /// The device families this key reads from.
    /// A modifier-composed mouse key reports both mouse and keyboard.
    pub fn device_kind(&self) -> DeviceKind {
        kind_info(self.kind).device
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.modifier() {
            Some(KeyModifier::Control) => "ctrl+",
            Some(KeyModifier::Shift) => "shift+",
            Some(KeyModifier::ControlShift) => "ctrl+shift+",
            None => "",
        };
        write!(f, "{}{}", prefix, self.name)
    }
}

/// Static per-kind behavior flags, looked up instead of switching on the
/// kind at every call site.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KindInfo {
    /// The event carries a screen position (cursor, tap, drag, wheel or
    /// stick vector).
    pub has_pos: bool,
    /// Events of this kind are visible only to the handler whose player id
    /// matches; other kinds mirror real hardware and are globally visible.
    pub needs_player_id: bool,
    /// The event carries a press duration in frames.
    pub has_duration: bool,
    pub device: DeviceKind,
}

pub(crate) fn kind_info(kind: KeyKind) -> KindInfo {
    let info = |has_pos, needs_player_id, has_duration, device| KindInfo {
        has_pos,
        needs_player_id,
        has_duration,
        device,
    };
    match kind {
        KeyKind::Keyboard
        | KeyKind::KeyboardWithCtrl
        | KeyKind::KeyboardWithShift
        | KeyKind::KeyboardWithCtrlShift => info(false, false, true, DeviceKind::KEYBOARD),
        KeyKind::Mouse => info(true, false, false, DeviceKind::MOUSE),
        KeyKind::MouseWithCtrl | KeyKind::MouseWithShift | KeyKind::MouseWithCtrlShift => {
            info(true, false, false, DeviceKind::MOUSE | DeviceKind::KEYBOARD)
        }
        KeyKind::MouseDrag => info(true, false, false, DeviceKind::MOUSE),
        KeyKind::Gamepad => info(false, true, false, DeviceKind::GAMEPAD),
        KeyKind::GamepadLeftStick
        | KeyKind::GamepadRightStick
        | KeyKind::GamepadLeftStickMotion
        | KeyKind::GamepadRightStickMotion => info(true, true, false, DeviceKind::GAMEPAD),
        KeyKind::Wheel => info(true, false, false, DeviceKind::MOUSE),
        KeyKind::Touch | KeyKind::TouchDrag => info(true, false, false, DeviceKind::TOUCH),
        KeyKind::Simulated => info(false, true, false, DeviceKind::empty()),
    }
}

/// Whether this kind can report a just-released edge.
/// Gesture- and axis-derived kinds intentionally never fire a release.
pub(crate) fn kind_supports_release(kind: KeyKind) -> bool {
    matches!(
        kind,
        KeyKind::Keyboard
            | KeyKind::KeyboardWithCtrl
            | KeyKind::KeyboardWithShift
            | KeyKind::KeyboardWithCtrlShift
            | KeyKind::Mouse
            | KeyKind::MouseWithCtrl
            | KeyKind::MouseWithShift
            | KeyKind::MouseWithCtrlShift
            | KeyKind::Gamepad
    )
}

/// The predefined key constants.
///
/// Every constant here is registered by [`KeyCatalog::standard`](crate::KeyCatalog::standard)
/// and can be produced from its display name via key-spec parsing.
pub mod keys {
    use super::*;

    macro_rules! keyboard_key {
        ($const_name:ident, $code:ident, $name:literal) => {
            pub const $const_name: Key = Key {
                code: RawCode::Keyboard(KeyCode::$code),
                kind: KeyKind::Keyboard,
                name: $name,
            };
        };
    }

    macro_rules! gamepad_key {
        ($const_name:ident, $code:ident, $name:literal) => {
            pub const $const_name: Key = Key {
                code: RawCode::GamepadButton(GamepadButton::$code),
                kind: KeyKind::Gamepad,
                name: $name,
            };
        };
    }

    macro_rules! stick_key {
        ($const_name:ident, $code:ident, $kind:ident, $name:literal) => {
            pub const $const_name: Key = Key {
                code: RawCode::Stick(StickCode::$code),
                kind: KeyKind::$kind,
                name: $name,
            };
        };
    }

    // Mouse keys.
    pub const MOUSE_LEFT: Key = Key {
        code: RawCode::Mouse(MouseButton::Left),
        kind: KeyKind::Mouse,
        name: "mouse_left_button",
    };
    pub const MOUSE_RIGHT: Key = Key {
        code: RawCode::Mouse(MouseButton::Right),
        kind: KeyKind::Mouse,
        name: "mouse_right_button",
    };
    pub const MOUSE_MIDDLE: Key = Key {
        code: RawCode::Mouse(MouseButton::Middle),
        kind: KeyKind::Mouse,
        name: "mouse_middle_button",
    };
    pub const MOUSE_DRAG: Key = Key {
        code: RawCode::Mouse(MouseButton::Left),
        kind: KeyKind::MouseDrag,
        name: "mouse_drag",
    };

    // Touch gesture keys.
    pub const TOUCH_TAP: Key = Key {
        code: RawCode::Touch(TouchCode::Tap),
        kind: KeyKind::Touch,
        name: "screen_tap",
    };
    pub const TOUCH_LONG_TAP: Key = Key {
        code: RawCode::Touch(TouchCode::LongTap),
        kind: KeyKind::Touch,
        name: "screen_long_tap",
    };
    pub const TOUCH_DRAG: Key = Key {
        code: RawCode::Touch(TouchCode::Drag),
        kind: KeyKind::TouchDrag,
        name: "screen_drag",
    };

    // Wheel keys.
    pub const WHEEL_UP: Key = Key {
        code: RawCode::Wheel(WheelCode::Up),
        kind: KeyKind::Wheel,
        name: "wheel_up",
    };
    pub const WHEEL_DOWN: Key = Key {
        code: RawCode::Wheel(WheelCode::Down),
        kind: KeyKind::Wheel,
        name: "wheel_down",
    };
    pub const WHEEL_VERTICAL: Key = Key {
        code: RawCode::Wheel(WheelCode::Vertical),
        kind: KeyKind::Wheel,
        name: "wheel_vertical",
    };

    // Keyboard keys.
    keyboard_key!(LEFT, ArrowLeft, "left");
    keyboard_key!(RIGHT, ArrowRight, "right");
    keyboard_key!(UP, ArrowUp, "up");
    keyboard_key!(DOWN, ArrowDown, "down");

    keyboard_key!(TAB, Tab, "tab");

    keyboard_key!(DIGIT_0, Digit0, "0");
    keyboard_key!(DIGIT_1, Digit1, "1");
    keyboard_key!(DIGIT_2, Digit2, "2");
    keyboard_key!(DIGIT_3, Digit3, "3");
    keyboard_key!(DIGIT_4, Digit4, "4");
    keyboard_key!(DIGIT_5, Digit5, "5");
    keyboard_key!(DIGIT_6, Digit6, "6");
    keyboard_key!(DIGIT_7, Digit7, "7");
    keyboard_key!(DIGIT_8, Digit8, "8");
    keyboard_key!(DIGIT_9, Digit9, "9");

    keyboard_key!(A, KeyA, "a");
    keyboard_key!(B, KeyB, "b");
    keyboard_key!(C, KeyC, "c");
    keyboard_key!(D, KeyD, "d");
    keyboard_key!(E, KeyE, "e");
    keyboard_key!(F, KeyF, "f");
    keyboard_key!(G, KeyG, "g");
    keyboard_key!(H, KeyH, "h");
    keyboard_key!(I, KeyI, "i");
    keyboard_key!(J, KeyJ, "j");
    keyboard_key!(K, KeyK, "k");
    keyboard_key!(L, KeyL, "l");
    keyboard_key!(M, KeyM, "m");
    keyboard_key!(N, KeyN, "n");
    keyboard_key!(O, KeyO, "o");
    keyboard_key!(P, KeyP, "p");
    keyboard_key!(Q, KeyQ, "q");
    keyboard_key!(R, KeyR, "r");
    keyboard_key!(S, KeyS, "s");
    keyboard_key!(T, KeyT, "t");
    keyboard_key!(U, KeyU, "u");
    keyboard_key!(V, KeyV, "v");
    keyboard_key!(W, KeyW, "w");
    keyboard_key!(X, KeyX, "x");
    keyboard_key!(Y, KeyY, "y");
    keyboard_key!(Z, KeyZ, "z");

    keyboard_key!(ESCAPE, Escape, "escape");
    keyboard_key!(ENTER, Enter, "enter");
    keyboard_key!(SPACE, Space, "space");

    keyboard_key!(CTRL_LEFT, ControlLeft, "ctrl_left");
    keyboard_key!(CTRL_RIGHT, ControlRight, "ctrl_right");
    keyboard_key!(SHIFT_LEFT, ShiftLeft, "shift_left");
    keyboard_key!(SHIFT_RIGHT, ShiftRight, "shift_right");

    // Gamepad keys.
    gamepad_key!(GAMEPAD_START, Start, "gamepad_start");
    gamepad_key!(GAMEPAD_SELECT, Select, "gamepad_select");
    gamepad_key!(GAMEPAD_MIDDLE, Middle, "gamepad_middle");

    gamepad_key!(GAMEPAD_UP, DpadUp, "gamepad_up");
    gamepad_key!(GAMEPAD_RIGHT, DpadRight, "gamepad_right");
    gamepad_key!(GAMEPAD_DOWN, DpadDown, "gamepad_down");
    gamepad_key!(GAMEPAD_LEFT, DpadLeft, "gamepad_left");

    gamepad_key!(GAMEPAD_A, A, "gamepad_a");
    gamepad_key!(GAMEPAD_B, B, "gamepad_b");
    gamepad_key!(GAMEPAD_X, X, "gamepad_x");
    gamepad_key!(GAMEPAD_Y, Y, "gamepad_y");

    gamepad_key!(GAMEPAD_L1, L1, "gamepad_l1");
    gamepad_key!(GAMEPAD_L2, L2, "gamepad_l2");
    gamepad_key!(GAMEPAD_R1, R1, "gamepad_r1");
    gamepad_key!(GAMEPAD_R2, R2, "gamepad_r2");

    stick_key!(GAMEPAD_LSTICK_UP, Up, GamepadLeftStick, "gamepad_lstick_up");
    stick_key!(
        GAMEPAD_LSTICK_RIGHT,
        Right,
        GamepadLeftStick,
        "gamepad_lstick_right"
    );
    stick_key!(
        GAMEPAD_LSTICK_DOWN,
        Down,
        GamepadLeftStick,
        "gamepad_lstick_down"
    );
    stick_key!(
        GAMEPAD_LSTICK_LEFT,
        Left,
        GamepadLeftStick,
        "gamepad_lstick_left"
    );
    stick_key!(GAMEPAD_RSTICK_UP, Up, GamepadRightStick, "gamepad_rstick_up");
    stick_key!(
        GAMEPAD_RSTICK_RIGHT,
        Right,
        GamepadRightStick,
        "gamepad_rstick_right"
    );
    stick_key!(
        GAMEPAD_RSTICK_DOWN,
        Down,
        GamepadRightStick,
        "gamepad_rstick_down"
    );
    stick_key!(
        GAMEPAD_RSTICK_LEFT,
        Left,
        GamepadRightStick,
        "gamepad_rstick_left"
    );

    stick_key!(
        GAMEPAD_LSTICK_MOTION,
        Motion,
        GamepadLeftStickMotion,
        "gamepad_lstick_motion"
    );
    stick_key!(
        GAMEPAD_RSTICK_MOTION,
        Motion,
        GamepadRightStickMotion,
        "gamepad_rstick_motion"
    );

    /// Every predefined key, in declaration order.
    /// [`KeyCatalog::standard`](crate::KeyCatalog::standard) registers all of these.
    pub(crate) const ALL: &[Key] = &[
        MOUSE_LEFT,
        MOUSE_RIGHT,
        MOUSE_MIDDLE,
        MOUSE_DRAG,
        TOUCH_TAP,
        TOUCH_LONG_TAP,
        TOUCH_DRAG,
        WHEEL_UP,
        WHEEL_DOWN,
        WHEEL_VERTICAL,
        LEFT,
        RIGHT,
        UP,
        DOWN,
        TAB,
        DIGIT_0,
        DIGIT_1,
        DIGIT_2,
        DIGIT_3,
        DIGIT_4,
        DIGIT_5,
        DIGIT_6,
        DIGIT_7,
        DIGIT_8,
        DIGIT_9,
        A,
        B,
        C,
        D,
        E,
        F,
        G,
        H,
        I,
        J,
        K,
        L,
        M,
        N,
        O,
        P,
        Q,
        R,
        S,
        T,
        U,
        V,
        W,
        X,
        Y,
        Z,
        ESCAPE,
        ENTER,
        SPACE,
        CTRL_LEFT,
        CTRL_RIGHT,
        SHIFT_LEFT,
        SHIFT_RIGHT,
        GAMEPAD_START,
        GAMEPAD_SELECT,
        GAMEPAD_MIDDLE,
        GAMEPAD_UP,
        GAMEPAD_RIGHT,
        GAMEPAD_DOWN,
        GAMEPAD_LEFT,
        GAMEPAD_A,
        GAMEPAD_B,
        GAMEPAD_X,
        GAMEPAD_Y,
        GAMEPAD_L1,
        GAMEPAD_L2,
        GAMEPAD_R1,
        GAMEPAD_R2,
        GAMEPAD_LSTICK_UP,
        GAMEPAD_LSTICK_RIGHT,
        GAMEPAD_LSTICK_DOWN,
        GAMEPAD_LSTICK_LEFT,
        GAMEPAD_RSTICK_UP,
        GAMEPAD_RSTICK_RIGHT,
        GAMEPAD_RSTICK_DOWN,
        GAMEPAD_RSTICK_LEFT,
        GAMEPAD_LSTICK_MOTION,
        GAMEPAD_RSTICK_MOTION,
    ];
}
