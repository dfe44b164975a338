// Key scanning for user-driven keybind remapping

use std::cell::RefCell;
use std::rc::Rc;

use winit::keyboard::KeyCode;

use crate::catalog::KeyCatalog;
use crate::handler::Handler;
use crate::key::{keys, Key, KeyKind, KeyModifier, RawCode};
use crate::system::SystemState;

/// The result of a [`KeyScanner::scan`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScanStatus {
    /// Nothing changed since the previous scan.
    Unchanged,
    /// The candidate key changed; update the prompt shown to the user.
    Changed,
    /// The user released the combination; the returned key is the final
    /// binding.
    Completed,
}

/// Reads the held keyboard keys frame by frame and maps them to a [`Key`]
/// usable in a [`Keymap`](crate::Keymap).
///
/// Call [`scan`](Self::scan) every frame while the remap prompt is open.
/// A scanner can be reused across remaps. Scanning currently covers the
/// keyboard only.
pub struct KeyScanner {
    state: Rc<RefCell<SystemState>>,
    catalog: KeyCatalog,
    last_num_keys: usize,
    can_scan: bool,
    key: Option<Key>,
}

impl KeyScanner {
    /// A scanner resolving against the standard key catalog.
    pub fn new(handler: &Handler) -> Self {
        Self::with_catalog(handler, KeyCatalog::standard())
    }

    pub fn with_catalog(handler: &Handler, catalog: KeyCatalog) -> Self {
        Self {
            state: handler.shared_state(),
            catalog,
            last_num_keys: 0,
            can_scan: false,
            key: None,
        }
    }

    /// Read the current keyboard state and advance the scan.
    ///
    /// Scanning arms only once every key is released, so keys still held
    /// from before the prompt opened are not picked up. While the user
    /// holds a growing combination the candidate key is refined; releasing
    /// any key confirms the last candidate.
    pub fn scan(&mut self) -> (Option<Key>, KeyScanStatus) {
        let mut pressed = Vec::with_capacity(4);
        self.state.borrow().append_pressed_key_codes(&mut pressed);

        if !self.can_scan {
            if !pressed.is_empty() {
                return (None, KeyScanStatus::Unchanged);
            }
            self.can_scan = true;
        }

        if pressed.len() == self.last_num_keys {
            // Either nothing is held or the combination did not grow.
            return (None, KeyScanStatus::Unchanged);
        }

        if pressed.len() < self.last_num_keys {
            let result = self.key.take();
            self.last_num_keys = 0;
            self.can_scan = false;
            return (result, KeyScanStatus::Completed);
        }

        self.last_num_keys = pressed.len();
        match scan_key(&pressed, &self.catalog) {
            Some(key) => {
                self.key = Some(key);
                (Some(key), KeyScanStatus::Changed)
            }
            None => (None, KeyScanStatus::Unchanged),
        }
    }
}

/// Map a held key combination to a single bindable key.
///
/// Modifier keys are stripped first; the first catalog keyboard key found
/// among the remaining codes becomes the base. A combination of only
/// modifiers resolves to the modifier key itself (ctrl wins over shift).
pub(crate) fn scan_key(pressed: &[KeyCode], catalog: &KeyCatalog) -> Option<Key> {
    if pressed.is_empty() {
        return None;
    }

    let mut ctrl_key = None;
    let mut shift_key = None;
    let mut remainder = Vec::with_capacity(pressed.len());
    for &code in pressed {
        match code {
            KeyCode::ControlLeft => ctrl_key = Some(keys::CTRL_LEFT),
            KeyCode::ControlRight => ctrl_key = Some(keys::CTRL_RIGHT),
            KeyCode::ShiftLeft => shift_key = Some(keys::SHIFT_LEFT),
            KeyCode::ShiftRight => shift_key = Some(keys::SHIFT_RIGHT),
            _ => remainder.push(code),
        }
    }

    let mapped = catalog
        .keys()
        .iter()
        .find(|key| {
            key.kind == KeyKind::Keyboard
                && matches!(key.code, RawCode::Keyboard(code) if remainder.contains(&code))
        })
        .copied();

    let Some(key) = mapped else {
        return ctrl_key.or(shift_key);
    };

    let modifier = match (ctrl_key.is_some(), shift_key.is_some()) {
        (true, true) => Some(KeyModifier::ControlShift),
        (true, false) => Some(KeyModifier::Control),
        (false, true) => Some(KeyModifier::Shift),
        (false, false) => None,
    };
    Some(match modifier {
        Some(modifier) => key.with_modifier(modifier),
        None => key,
    })
}
