//! An input abstraction layer that maps raw device events to logical
//! game actions.
//!
//! Instead of asking "is space pressed?" the game asks "is the jump
//! action active?"; which keys, buttons and gestures activate it is
//! data, not code:
//!
//! ```
//! use input_actions::{keys, Action, Keymap};
//!
//! const ACTION_JUMP: Action = Action(1);
//! const ACTION_FIRE: Action = Action(2);
//!
//! let mut keymap = Keymap::new();
//! keymap.set(ACTION_JUMP, vec![keys::SPACE, keys::GAMEPAD_A]);
//! keymap.set(ACTION_FIRE, vec![keys::MOUSE_LEFT, keys::GAMEPAD_R1]);
//! ```
//!
//! An [`InputSystem`] owns the per-frame device snapshots and is updated
//! once at the top of every frame; [`Handler`]s created from it answer
//! pressed / just-pressed / just-released queries per player. Keyboard,
//! mouse, gamepads (with model-specific layout remapping) and touch
//! gestures all feed the same action vocabulary, and the simulated event
//! channel lets UI code inject virtual presses that are indistinguishable
//! from real ones.
//!
//! The raw devices are polled through the [`DeviceBackend`] trait, so the
//! engine stays independent from any particular windowing or gamepad
//! library.

mod action;
mod backend;
mod catalog;
mod gamepad;
mod gesture;
mod handler;
mod key;
mod math;
mod resolve;
mod scanner;
mod simulated;
mod system;

pub use action::{Action, DeviceKind, Keymap};
pub use backend::{DeviceBackend, TouchId};
pub use catalog::{CatalogError, KeyCatalog, KeyCatalogBuilder, ParseKeyError};
pub use gamepad::{GamepadAxis, GamepadButton};
pub use handler::{EventInfo, Handler, MultiHandler};
pub use key::{keys, Key, KeyModifier};
pub use scanner::{KeyScanner, KeyScanStatus};
pub use simulated::SimulatedKeyEvent;
pub use system::{InputSystem, SystemConfig, DEFAULT_TIMESTEP};
