// Key catalog: a read-only registry of named key descriptors

use crate::key::{keys, Key, KeyModifier};

/// A textual key spec could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKeyError {
    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("unknown key modifier: {0}")]
    UnknownModifier(String),
}

/// Catalog construction failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate key name: {0}")]
    DuplicateName(&'static str),
}

/// An immutable registry of key descriptors, indexed by display name.
///
/// The catalog is read-only after construction; name lookups are a binary
/// search over the sorted key list.
#[derive(Debug, Clone)]
pub struct KeyCatalog {
    // Sorted by name.
    keys: Vec<Key>,
}

impl KeyCatalog {
    /// A catalog holding every predefined key from the [`keys`] module.
    pub fn standard() -> Self {
        let mut keys = keys::ALL.to_vec();
        // Predefined names are unique (checked by a test), so a plain
        // sort yields a valid index.
        keys.sort_by(|a, b| a.name.cmp(b.name));
        Self { keys }
    }

    /// Start building a custom catalog.
    pub fn builder() -> KeyCatalogBuilder {
        KeyCatalogBuilder { keys: Vec::new() }
    }

    /// Find a key by its exact display name.
    pub fn key_by_name(&self, name: &str) -> Option<Key> {
        self.keys
            .binary_search_by(|k| k.name.cmp(name))
            .ok()
            .map(|i| self.keys[i])
    }

    /// Construct a key from its textual spec.
    ///
    /// The format is one of:
    ///
    /// - `keyname`
    /// - `mod+keyname`
    /// - `mod+mod+keyname`
    ///
    /// Some valid inputs: `"gamepad_left"`, `"left"`, `"ctrl+left"`,
    /// `"ctrl+shift+left"`, `"shift+ctrl+left"`.
    ///
    /// Unknown key names and unknown modifiers are distinct error variants.
    ///
    /// # Panics
    ///
    /// Panics when the modifier prefix targets a key that does not accept
    /// modifiers, e.g. `"ctrl+gamepad_a"`, same as [`Key::with_modifier`].
    /// Key specs are keymap-construction data; validate them before
    /// accepting arbitrary user text.
    pub fn parse_key(&self, s: &str) -> Result<Key, ParseKeyError> {
        let Some(plus_pos) = s.rfind('+') else {
            return self
                .key_by_name(s)
                .ok_or_else(|| ParseKeyError::UnknownKey(s.to_string()));
        };
        let mod_name = &s[..plus_pos];
        let key_name = &s[plus_pos + 1..];
        let modifier = modifier_by_name(mod_name)
            .ok_or_else(|| ParseKeyError::UnknownModifier(mod_name.to_string()))?;
        let key = self
            .key_by_name(key_name)
            .ok_or_else(|| ParseKeyError::UnknownKey(key_name.to_string()))?;
        Ok(key.with_modifier(modifier))
    }

    /// All registered keys, sorted by name.
    pub(crate) fn keys(&self) -> &[Key] {
        &self.keys
    }
}

/// Builds a [`KeyCatalog`], rejecting duplicate display names.
#[derive(Debug)]
pub struct KeyCatalogBuilder {
    keys: Vec<Key>,
}

impl KeyCatalogBuilder {
    /// Register a single key.
    pub fn register(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    /// Register a list of keys.
    pub fn register_all(mut self, keys: &[Key]) -> Self {
        self.keys.extend_from_slice(keys);
        self
    }

    /// Sort the name index and produce the catalog.
    pub fn build(mut self) -> Result<KeyCatalog, CatalogError> {
        self.keys.sort_by(|a, b| a.name.cmp(b.name));
        for pair in self.keys.windows(2) {
            if pair[0].name == pair[1].name {
                return Err(CatalogError::DuplicateName(pair[0].name));
            }
        }
        Ok(KeyCatalog { keys: self.keys })
    }
}

fn modifier_by_name(name: &str) -> Option<KeyModifier> {
    match name {
        "ctrl" => Some(KeyModifier::Control),
        "shift" => Some(KeyModifier::Shift),
        "ctrl+shift" | "shift+ctrl" => Some(KeyModifier::ControlShift),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_by_name() {
        let catalog = KeyCatalog::standard();
        assert_eq!(catalog.key_by_name("left"), Some(keys::LEFT));
        assert_eq!(catalog.key_by_name("gamepad_left"), Some(keys::GAMEPAD_LEFT));
        assert_eq!(catalog.key_by_name("wheel_vertical"), Some(keys::WHEEL_VERTICAL));
        assert_eq!(catalog.key_by_name("screen_tap"), Some(keys::TOUCH_TAP));
        assert_eq!(catalog.key_by_name("no_such_key"), None);
        assert_eq!(catalog.key_by_name(""), None);
    }

    #[test]
    fn test_parse_plain_keys() {
        let catalog = KeyCatalog::standard();
        assert_eq!(catalog.parse_key("left"), Ok(keys::LEFT));
        assert_eq!(catalog.parse_key("gamepad_a"), Ok(keys::GAMEPAD_A));
        assert_eq!(catalog.parse_key("mouse_left_button"), Ok(keys::MOUSE_LEFT));
    }

    #[test]
    fn test_parse_with_modifiers() {
        let catalog = KeyCatalog::standard();
        assert_eq!(
            catalog.parse_key("ctrl+left"),
            Ok(keys::LEFT.with_modifier(KeyModifier::Control))
        );
        assert_eq!(
            catalog.parse_key("shift+left"),
            Ok(keys::LEFT.with_modifier(KeyModifier::Shift))
        );
        // Equivalent to composing the base key directly, either spelling.
        assert_eq!(
            catalog.parse_key("ctrl+shift+left"),
            Ok(keys::LEFT.with_modifier(KeyModifier::ControlShift))
        );
        assert_eq!(
            catalog.parse_key("shift+ctrl+left"),
            Ok(keys::LEFT.with_modifier(KeyModifier::ControlShift))
        );
    }

    #[test]
    fn test_parse_errors_are_distinct() {
        let catalog = KeyCatalog::standard();
        assert_eq!(
            catalog.parse_key("no_such_key"),
            Err(ParseKeyError::UnknownKey("no_such_key".to_string()))
        );
        assert_eq!(
            catalog.parse_key("alt+left"),
            Err(ParseKeyError::UnknownModifier("alt".to_string()))
        );
        assert_eq!(
            catalog.parse_key("ctrl+no_such_key"),
            Err(ParseKeyError::UnknownKey("no_such_key".to_string()))
        );
    }

    #[test]
    #[should_panic(expected = "doesn't support modifiers")]
    fn test_parse_rejects_modifier_on_gamepad_key() {
        let catalog = KeyCatalog::standard();
        let _ = catalog.parse_key("ctrl+gamepad_a");
    }

    #[test]
    fn test_builder_rejects_duplicate_names() {
        let result = KeyCatalog::builder()
            .register(keys::LEFT)
            .register(keys::RIGHT)
            .register(keys::LEFT)
            .build();
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateName("left"));
    }

    #[test]
    fn test_builder_custom_catalog() {
        let catalog = KeyCatalog::builder()
            .register_all(&[keys::SPACE, keys::GAMEPAD_A])
            .build()
            .unwrap();
        assert_eq!(catalog.key_by_name("space"), Some(keys::SPACE));
        assert_eq!(catalog.key_by_name("gamepad_a"), Some(keys::GAMEPAD_A));
        assert_eq!(catalog.key_by_name("left"), None);
    }
}
