// Actions, device masks and keymaps

use std::collections::HashMap;
use std::fmt;

use crate::key::Key;

/// An application-defined logical input identifier (e.g. "jump").
///
/// Actions carry no behavior of their own; they are lookup keys into a
/// [`Keymap`]. Define them as constants in your game code:
///
/// ```
/// use input_actions::Action;
///
/// const ACTION_JUMP: Action = Action(1);
/// const ACTION_FIRE: Action = Action(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action(pub u32);

bitflags::bitflags! {
    /// A bit mask selecting input device families.
    ///
    /// Combine entries like `DeviceKind::KEYBOARD | DeviceKind::GAMEPAD`.
    /// Use [`DeviceKind::ANY`] to cover all devices.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceKind: u8 {
        const KEYBOARD = 1 << 0;
        const GAMEPAD = 1 << 1;
        const MOUSE = 1 << 2;
        const TOUCH = 1 << 3;

        /// All input devices.
        const ANY = Self::KEYBOARD.bits()
            | Self::GAMEPAD.bits()
            | Self::MOUSE.bits()
            | Self::TOUCH.bits();
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<empty>");
        }
        let mut parts = Vec::with_capacity(4);
        if self.contains(DeviceKind::KEYBOARD) {
            parts.push("keyboard");
        }
        if self.contains(DeviceKind::GAMEPAD) {
            parts.push("gamepad");
        }
        if self.contains(DeviceKind::MOUSE) {
            parts.push("mouse");
        }
        if self.contains(DeviceKind::TOUCH) {
            parts.push("touch");
        }
        f.write_str(&parts.join("|"))
    }
}

/// Associates a list of keys with an action.
///
/// Any of the keys from the list can activate the action.
/// The list order is the evaluation priority: for queries that return
/// extra event information, the first matching key wins.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<Action, Vec<Key>>,
}

impl Keymap {
    /// Create an empty keymap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a list of keys to an action, replacing any previous binding.
    pub fn set(&mut self, action: Action, keys: Vec<Key>) {
        self.bindings.insert(action, keys);
    }

    /// Get the keys bound to an action.
    /// Unbound actions yield an empty slice.
    pub fn keys_for(&self, action: Action) -> &[Key] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Check whether an action has any bound keys.
    pub fn is_bound(&self, action: Action) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|keys| !keys.is_empty())
    }

    /// Number of actions with bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check whether the keymap has no bindings at all.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Merge two keymaps into a new one.
    ///
    /// For every action the result holds this keymap's keys followed by the
    /// other keymap's keys that were not already present. Order is preserved
    /// and duplicates are removed.
    pub fn merge(&self, other: &Keymap) -> Keymap {
        let mut merged = self.clone();
        for (&action, keys) in &other.bindings {
            merged
                .bindings
                .entry(action)
                .or_default()
                .extend_from_slice(keys);
        }
        for keys in merged.bindings.values_mut() {
            dedup_keys(keys);
        }
        merged
    }
}

impl FromIterator<(Action, Vec<Key>)> for Keymap {
    fn from_iter<T: IntoIterator<Item = (Action, Vec<Key>)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(Action, Vec<Key>); N]> for Keymap {
    fn from(bindings: [(Action, Vec<Key>); N]) -> Self {
        bindings.into_iter().collect()
    }
}

/// Remove duplicate keys in place, keeping the first occurrence of each.
pub(crate) fn dedup_keys(keys: &mut Vec<Key>) {
    let mut seen = Vec::with_capacity(keys.len());
    keys.retain(|k| {
        if seen.contains(k) {
            false
        } else {
            seen.push(*k);
            true
        }
    });
}
