// Handlers: the per-player action query surface

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::action::{Action, DeviceKind, Keymap};
use crate::key::{kind_info, kind_supports_release, Key, KeyKind, KeyModifier, RawCode};
use crate::resolve::{resolver_for, ResolveContext};
use crate::simulated::{simulated_action_key, SimulatedEvent, SimulatedKeyEvent};
use crate::system::{SystemState, DEFAULT_GAMEPAD_DEADZONE};

/// Metadata attached to an activated action, reported by the `*_action_info`
/// query variants.
#[derive(Debug, Clone, Copy)]
pub struct EventInfo {
    kind: KeyKind,

    /// Where the event happened, for keys that carry a position: the cursor
    /// for mouse buttons, the tap or drag point for gestures, the delta
    /// vector for wheel and stick motion.
    pub pos: Option<Vec2>,
    /// Where the drag started, for drag keys only.
    pub start_pos: Option<Vec2>,
    /// How many frames the key has been held, for keyboard keys only.
    /// A modifier-composed key reports the minimum across the base key
    /// and its modifiers.
    pub duration_frames: Option<u32>,
}

impl EventInfo {
    pub fn has_pos(&self) -> bool {
        self.pos.is_some()
    }

    /// The device families the activating key reads from.
    pub fn device_kind(&self) -> DeviceKind {
        kind_info(self.kind).device
    }

    pub fn is_keyboard_event(&self) -> bool {
        self.device_kind().contains(DeviceKind::KEYBOARD)
    }

    pub fn is_mouse_event(&self) -> bool {
        self.device_kind().contains(DeviceKind::MOUSE)
    }

    pub fn is_gamepad_event(&self) -> bool {
        self.device_kind().contains(DeviceKind::GAMEPAD)
    }

    pub fn is_touch_event(&self) -> bool {
        self.device_kind().contains(DeviceKind::TOUCH)
    }
}

/// A per-player view over the shared input state.
///
/// Created by [`InputSystem::new_handler`](crate::InputSystem::new_handler).
/// The player id selects the gamepad slot; keyboard, mouse and touch
/// queries read the same shared devices from every handler.
pub struct Handler {
    id: u8,
    keymap: Keymap,
    gamepad_deadzone: f32,
    state: Rc<RefCell<SystemState>>,
}

impl Handler {
    pub(crate) fn new(id: u8, keymap: Keymap, state: Rc<RefCell<SystemState>>) -> Self {
        Self {
            id,
            keymap,
            gamepad_deadzone: DEFAULT_GAMEPAD_DEADZONE,
            state,
        }
    }

    /// The player slot this handler is bound to.
    pub fn player_id(&self) -> u8 {
        self.id
    }

    /// Adjust the stick-motion deadzone of this handler's gamepad.
    /// Worn sticks may need a larger value.
    pub fn set_gamepad_deadzone(&mut self, deadzone: f32) {
        self.gamepad_deadzone = deadzone;
    }

    pub fn gamepad_deadzone(&self) -> f32 {
        self.gamepad_deadzone
    }

    /// Whether this player's gamepad is connected right now.
    pub fn gamepad_connected(&self) -> bool {
        self.state.borrow().gamepad_connected(self.id)
    }

    /// Whether the system samples touch input at all.
    pub fn touch_events_enabled(&self) -> bool {
        self.state.borrow().touch_enabled()
    }

    /// The position of the last completed tap, if one finished this frame.
    pub fn tap_pos(&self) -> Option<Vec2> {
        let state = self.state.borrow();
        let tracker = state.touch_tracker();
        tracker.has_tap().then(|| tracker.tap_pos())
    }

    /// The mouse cursor position of the current frame.
    pub fn cursor_pos(&self) -> Vec2 {
        self.state.borrow().cursor_pos()
    }

    /// A device mask matching what this player is most likely using:
    /// the gamepad when one is connected, keyboard plus mouse otherwise.
    /// Useful as the default argument for [`action_key_names`](Self::action_key_names).
    pub fn default_input_mask(&self) -> DeviceKind {
        if self.gamepad_connected() {
            DeviceKind::GAMEPAD
        } else {
            DeviceKind::KEYBOARD | DeviceKind::MOUSE
        }
    }

    /// The display names of the keys bound to an action, filtered down to
    /// the devices in `mask` that are actually usable right now: gamepad
    /// keys require a connected gamepad, touch keys require touch sampling.
    /// Intended for "press [space] to jump" style UI hints.
    pub fn action_key_names(&self, action: Action, mask: DeviceKind) -> Vec<String> {
        let state = self.state.borrow();
        self.keymap
            .keys_for(action)
            .iter()
            .filter(|key| {
                let device = key.device_kind();
                if !device.intersects(mask) {
                    return false;
                }
                if device.contains(DeviceKind::GAMEPAD) && !state.gamepad_connected(self.id) {
                    return false;
                }
                if device.contains(DeviceKind::TOUCH) && !state.touch_enabled() {
                    return false;
                }
                true
            })
            .map(|key| key.to_string())
            .collect()
    }

    /// Inject a virtual key event. It becomes visible to every matching
    /// query after the next [`InputSystem::update`](crate::InputSystem::update),
    /// for one frame.
    pub fn emit_key_event(&self, event: SimulatedKeyEvent) {
        self.state.borrow_mut().simulated_mut().push(SimulatedEvent {
            key: event.key,
            player_id: self.id,
            pos: event.pos,
            start_pos: event.start_pos,
        });
    }

    /// Activate an action directly, without going through any key.
    /// Visible after the next update, only to handlers of this player,
    /// and works even when the action has no bound keys.
    pub fn emit_event(&self, action: Action) {
        self.state.borrow_mut().simulated_mut().push(SimulatedEvent {
            key: simulated_action_key(action),
            player_id: self.id,
            pos: Vec2::ZERO,
            start_pos: Vec2::ZERO,
        });
    }

    /// Whether any key bound to the action is currently held.
    /// Unbound actions report false.
    pub fn action_is_pressed(&self, action: Action) -> bool {
        let state = self.state.borrow();
        let ctx = self.context(&state);
        if self.action_event(&state, action).is_some() {
            return true;
        }
        self.keymap
            .keys_for(action)
            .iter()
            .any(|&key| key_is_pressed(&ctx, key))
    }

    /// Whether any key bound to the action transitioned to held this frame.
    pub fn action_is_just_pressed(&self, action: Action) -> bool {
        let state = self.state.borrow();
        let ctx = self.context(&state);
        if self.action_event(&state, action).is_some() {
            let key = simulated_action_key(action);
            if state.simulated().find_previous(key, self.id).is_none() {
                return true;
            }
            // The direct-action event is merely held; a bound key can
            // still land a fresh edge this frame.
        }
        self.keymap
            .keys_for(action)
            .iter()
            .any(|&key| key_is_just_pressed(&ctx, key))
    }

    /// Whether any key bound to the action was released this frame.
    /// Gesture and axis-derived keys never report a release.
    pub fn action_is_just_released(&self, action: Action) -> bool {
        let state = self.state.borrow();
        let ctx = self.context(&state);
        self.keymap
            .keys_for(action)
            .iter()
            .any(|&key| key_is_just_released(&ctx, key))
    }

    /// Like [`action_is_just_pressed`](Self::action_is_just_pressed), but
    /// reports the activating key's metadata.
    pub fn just_pressed_action_info(&self, action: Action) -> Option<EventInfo> {
        let state = self.state.borrow();
        let ctx = self.context(&state);
        if let Some(event) = self.action_event(&state, action) {
            let key = simulated_action_key(action);
            if state.simulated().find_previous(key, self.id).is_none() {
                return Some(simulated_info(event));
            }
        }
        self.keymap
            .keys_for(action)
            .iter()
            .find(|&&key| key_is_just_pressed(&ctx, key))
            .map(|&key| self.device_info(&ctx, key))
    }

    /// Like [`action_is_pressed`](Self::action_is_pressed), but reports the
    /// activating key's metadata.
    pub fn pressed_action_info(&self, action: Action) -> Option<EventInfo> {
        let state = self.state.borrow();
        let ctx = self.context(&state);
        if let Some(event) = self.action_event(&state, action) {
            return Some(simulated_info(event));
        }
        self.keymap
            .keys_for(action)
            .iter()
            .find(|&&key| key_is_pressed(&ctx, key))
            .map(|&key| self.device_info(&ctx, key))
    }

    /// Like [`action_is_just_released`](Self::action_is_just_released), but
    /// reports the releasing key's metadata.
    pub fn just_released_action_info(&self, action: Action) -> Option<EventInfo> {
        let state = self.state.borrow();
        let ctx = self.context(&state);
        self.keymap
            .keys_for(action)
            .iter()
            .find(|&&key| key_is_just_released(&ctx, key))
            .map(|&key| self.device_info(&ctx, key))
    }

    pub(crate) fn shared_state(&self) -> Rc<RefCell<SystemState>> {
        Rc::clone(&self.state)
    }

    fn context<'a>(&self, state: &'a SystemState) -> ResolveContext<'a> {
        ResolveContext {
            state,
            player_id: self.id,
            deadzone: self.gamepad_deadzone,
        }
    }

    /// A direct-action event for this action in the current buffer, if any.
    fn action_event<'a>(
        &self,
        state: &'a SystemState,
        action: Action,
    ) -> Option<&'a SimulatedEvent> {
        if !state.simulated().has_action_events() {
            return None;
        }
        state
            .simulated()
            .find_current(simulated_action_key(action), self.id)
    }

    fn device_info(&self, ctx: &ResolveContext, key: Key) -> EventInfo {
        // A simulated event for this key takes priority over the device
        // snapshot, so its payload wins too.
        if let Some(event) = ctx.state.simulated().find_current(key, self.id) {
            return simulated_info(event);
        }
        let resolver = resolver_for(key.kind);
        EventInfo {
            kind: key.kind,
            pos: resolver.position(ctx, key),
            start_pos: resolver.start_position(ctx, key),
            duration_frames: key_duration(ctx.state, key),
        }
    }
}

fn simulated_info(event: &SimulatedEvent) -> EventInfo {
    let info = kind_info(event.key.kind);
    EventInfo {
        kind: event.key.kind,
        pos: info.has_pos.then_some(event.pos),
        start_pos: is_drag_kind(event.key.kind).then_some(event.start_pos),
        duration_frames: None,
    }
}

fn is_drag_kind(kind: KeyKind) -> bool {
    matches!(kind, KeyKind::MouseDrag | KeyKind::TouchDrag)
}

// Single-key resolution. The simulated channel overlays the device state:
// a current-buffer hit forces the key active, a previous-buffer hit marks
// the edge as already consumed.

fn key_is_pressed(ctx: &ResolveContext, key: Key) -> bool {
    if ctx.state.simulated().find_current(key, ctx.player_id).is_some() {
        return true;
    }
    resolver_for(key.kind).is_pressed(ctx, key)
}

fn key_is_just_pressed(ctx: &ResolveContext, key: Key) -> bool {
    let simulated = ctx.state.simulated();
    if simulated.find_current(key, ctx.player_id).is_some() {
        return simulated.find_previous(key, ctx.player_id).is_none();
    }
    if simulated.find_previous(key, ctx.player_id).is_some() {
        // The simulated press from the last frame already delivered this
        // edge; a device press landing now must not double-fire.
        return false;
    }
    resolver_for(key.kind).is_just_pressed(ctx, key)
}

fn key_is_just_released(ctx: &ResolveContext, key: Key) -> bool {
    if !kind_supports_release(key.kind) {
        return false;
    }
    let simulated = ctx.state.simulated();
    if simulated.find_current(key, ctx.player_id).is_some() {
        return false;
    }
    if simulated.find_previous(key, ctx.player_id).is_some() {
        return true;
    }
    resolver_for(key.kind).is_just_released(ctx, key)
}

/// Press duration in frames, for keyboard keys. A composed key reports the
/// minimum across the base key and every required modifier, counting
/// whichever physical variant of a modifier is held the longest.
fn key_duration(state: &SystemState, key: Key) -> Option<u32> {
    if !kind_info(key.kind).has_duration {
        return None;
    }
    let RawCode::Keyboard(code) = key.code else {
        return None;
    };
    let mut frames = state.key_hold_frames(code);
    let ctrl = |state: &SystemState| {
        state
            .key_hold_frames(KeyCode::ControlLeft)
            .max(state.key_hold_frames(KeyCode::ControlRight))
    };
    let shift = |state: &SystemState| {
        state
            .key_hold_frames(KeyCode::ShiftLeft)
            .max(state.key_hold_frames(KeyCode::ShiftRight))
    };
    match key.modifier() {
        None => {}
        Some(KeyModifier::Control) => frames = frames.min(ctrl(state)),
        Some(KeyModifier::Shift) => frames = frames.min(shift(state)),
        Some(KeyModifier::ControlShift) => {
            frames = frames.min(ctrl(state)).min(shift(state));
        }
    }
    Some(frames)
}

/// Queries several handlers as one. Useful for "any player can press
/// start" screens.
#[derive(Default)]
pub struct MultiHandler {
    handlers: Vec<Handler>,
}

impl MultiHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    /// True if the action is pressed for any of the handlers.
    pub fn action_is_pressed(&self, action: Action) -> bool {
        self.handlers.iter().any(|h| h.action_is_pressed(action))
    }

    /// True if the action was just pressed for any of the handlers.
    pub fn action_is_just_pressed(&self, action: Action) -> bool {
        self.handlers
            .iter()
            .any(|h| h.action_is_just_pressed(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{FakeBackend, FakeDevices, FakeGamepad};
    use crate::gamepad::{GamepadAxis, GamepadButton};
    use crate::key::keys;
    use crate::system::{InputSystem, SystemConfig};

    const JUMP: Action = Action(1);
    const FIRE: Action = Action(2);
    const UNBOUND: Action = Action(99);

    fn new_system(devices: DeviceKind) -> (InputSystem, Rc<RefCell<FakeDevices>>) {
        let (backend, devices_state) = FakeBackend::new();
        let system = InputSystem::new(SystemConfig {
            devices_enabled: devices,
            backend: Box::new(backend),
        });
        (system, devices_state)
    }

    fn keymap(entries: &[(Action, Vec<Key>)]) -> Keymap {
        let mut keymap = Keymap::new();
        for (action, keys) in entries {
            keymap.set(*action, keys.clone());
        }
        keymap
    }

    #[test]
    fn test_keyboard_action_edges() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::SPACE])]));

        system.update();
        assert!(!handler.action_is_pressed(JUMP));

        devices.borrow_mut().keys.push(KeyCode::Space);
        system.update();
        assert!(handler.action_is_pressed(JUMP));
        assert!(handler.action_is_just_pressed(JUMP));
        assert!(!handler.action_is_just_released(JUMP));

        system.update();
        assert!(handler.action_is_pressed(JUMP));
        assert!(!handler.action_is_just_pressed(JUMP));

        devices.borrow_mut().keys.clear();
        system.update();
        assert!(!handler.action_is_pressed(JUMP));
        assert!(handler.action_is_just_released(JUMP));

        system.update();
        assert!(!handler.action_is_just_released(JUMP));
    }

    #[test]
    fn test_unbound_action_is_silent() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let handler = system.new_handler(0, Keymap::new());
        devices.borrow_mut().keys.push(KeyCode::Space);
        system.update();
        assert!(!handler.action_is_pressed(UNBOUND));
        assert!(!handler.action_is_just_pressed(UNBOUND));
        assert!(handler.pressed_action_info(UNBOUND).is_none());
    }

    #[test]
    fn test_any_bound_key_activates() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::SPACE, keys::W])]));

        devices.borrow_mut().keys.push(KeyCode::KeyW);
        system.update();
        assert!(handler.action_is_pressed(JUMP));
    }

    #[test]
    fn test_modifier_semantics() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let ctrl_a = keys::A.with_modifier(KeyModifier::Control);
        let handler = system.new_handler(0, keymap(&[(FIRE, vec![ctrl_a])]));

        // Holding ctrl first, then pressing the base key fires the edge.
        devices.borrow_mut().keys.push(KeyCode::ControlLeft);
        system.update();
        assert!(!handler.action_is_just_pressed(FIRE));

        devices.borrow_mut().keys.push(KeyCode::KeyA);
        system.update();
        assert!(handler.action_is_just_pressed(FIRE));
        assert!(handler.action_is_pressed(FIRE));

        // The base key alone is not enough.
        devices.borrow_mut().keys.clear();
        devices.borrow_mut().keys.push(KeyCode::KeyA);
        system.update();
        assert!(!handler.action_is_pressed(FIRE));
    }

    #[test]
    fn test_modifier_right_variant_accepted() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let ctrl_a = keys::A.with_modifier(KeyModifier::Control);
        let handler = system.new_handler(0, keymap(&[(FIRE, vec![ctrl_a])]));

        devices.borrow_mut().keys.push(KeyCode::ControlRight);
        devices.borrow_mut().keys.push(KeyCode::KeyA);
        system.update();
        assert!(handler.action_is_just_pressed(FIRE));
    }

    #[test]
    fn test_modifier_release_grace() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let ctrl_a = keys::A.with_modifier(KeyModifier::Control);
        let handler = system.new_handler(0, keymap(&[(FIRE, vec![ctrl_a])]));

        devices.borrow_mut().keys.push(KeyCode::ControlLeft);
        devices.borrow_mut().keys.push(KeyCode::KeyA);
        system.update();
        assert!(handler.action_is_pressed(FIRE));

        // Both released in the same frame: the release still registers.
        devices.borrow_mut().keys.clear();
        system.update();
        assert!(handler.action_is_just_released(FIRE));
    }

    #[test]
    fn test_simulated_event_timeline() {
        let (mut system, _devices) = new_system(DeviceKind::KEYBOARD);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::SPACE])]));

        handler.emit_key_event(SimulatedKeyEvent {
            key: keys::SPACE,
            pos: Vec2::ZERO,
            start_pos: Vec2::ZERO,
        });
        // Not visible until the next update.
        assert!(!handler.action_is_pressed(JUMP));

        system.update();
        assert!(handler.action_is_pressed(JUMP));
        assert!(handler.action_is_just_pressed(JUMP));

        // Re-emitting keeps it held without re-firing the edge.
        handler.emit_key_event(SimulatedKeyEvent {
            key: keys::SPACE,
            pos: Vec2::ZERO,
            start_pos: Vec2::ZERO,
        });
        system.update();
        assert!(handler.action_is_pressed(JUMP));
        assert!(!handler.action_is_just_pressed(JUMP));

        // No further emission: released.
        system.update();
        assert!(!handler.action_is_pressed(JUMP));
        assert!(handler.action_is_just_released(JUMP));
    }

    #[test]
    fn test_simulated_press_suppresses_device_edge() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::SPACE])]));

        handler.emit_key_event(SimulatedKeyEvent {
            key: keys::SPACE,
            pos: Vec2::ZERO,
            start_pos: Vec2::ZERO,
        });
        system.update();
        assert!(handler.action_is_just_pressed(JUMP));

        // The device press lands one frame after the simulated one; the
        // edge was already delivered.
        devices.borrow_mut().keys.push(KeyCode::Space);
        system.update();
        assert!(handler.action_is_pressed(JUMP));
        assert!(!handler.action_is_just_pressed(JUMP));
    }

    #[test]
    fn test_emit_event_is_per_player_and_needs_no_binding() {
        let (mut system, _devices) = new_system(DeviceKind::KEYBOARD);
        let player0 = system.new_handler(0, Keymap::new());
        let player1 = system.new_handler(1, Keymap::new());

        player0.emit_event(UNBOUND);
        system.update();
        assert!(player0.action_is_pressed(UNBOUND));
        assert!(player0.action_is_just_pressed(UNBOUND));
        assert!(!player1.action_is_pressed(UNBOUND));

        let info = player0.pressed_action_info(UNBOUND).unwrap();
        assert!(!info.has_pos());
        assert!(info.device_kind().is_empty());

        system.update();
        assert!(!player0.action_is_pressed(UNBOUND));
    }

    #[test]
    fn test_device_edge_fires_while_action_event_is_held() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::SPACE])]));

        handler.emit_event(JUMP);
        system.update();
        assert!(handler.action_is_just_pressed(JUMP));

        // The direct-action event is re-emitted (held), and the bound key
        // lands its own edge in the same frame: the edge must not be lost.
        handler.emit_event(JUMP);
        devices.borrow_mut().keys.push(KeyCode::Space);
        system.update();
        assert!(handler.action_is_just_pressed(JUMP));
        let info = handler.just_pressed_action_info(JUMP).unwrap();
        assert!(info.is_keyboard_event());
        assert_eq!(info.duration_frames, Some(1));
    }

    #[test]
    fn test_xinput_pad_resolved_through_updates() {
        const UP: Action = Action(10);
        const SELECT: Action = Action(11);
        const A_BUTTON: Action = Action(12);

        let (mut system, devices) = new_system(DeviceKind::GAMEPAD);
        let handler = system.new_handler(
            0,
            keymap(&[
                (UP, vec![keys::GAMEPAD_UP]),
                (FIRE, vec![keys::GAMEPAD_L2]),
                (SELECT, vec![keys::GAMEPAD_SELECT]),
                (A_BUTTON, vec![keys::GAMEPAD_A]),
            ]),
        );

        // A pad with no standard layout, classified from its reported name.
        devices.borrow_mut().gamepads.push(FakeGamepad::nonstandard(
            0,
            "Xbox 360 Controller (XInput STANDARD GAMEPAD)",
        ));
        system.update();
        assert!(handler.gamepad_connected());
        assert!(!handler.action_is_pressed(UP));

        // D-pad from axis 7, the left trigger from axis 2, select from the
        // physical button 6.
        {
            let mut devices = devices.borrow_mut();
            devices.gamepads[0].axes[7] = -1.0;
            devices.gamepads[0].axes[2] = 0.95;
            devices.gamepads[0].raw_buttons.push(6);
        }
        system.update();
        assert!(handler.action_is_just_pressed(UP));
        assert!(handler.action_is_just_pressed(FIRE));
        assert!(handler.action_is_just_pressed(SELECT));
        assert!(!handler.action_is_pressed(A_BUTTON));

        // Held, not an edge anymore.
        system.update();
        assert!(handler.action_is_pressed(UP));
        assert!(!handler.action_is_just_pressed(UP));
        assert!(handler.action_is_pressed(FIRE));
        assert!(!handler.action_is_just_pressed(FIRE));

        // The backend reports a different pad in the same slot: the model
        // is re-detected and the physical codes change meaning. Code 2 is
        // the A button on this pad, not a select-style button.
        {
            let mut devices = devices.borrow_mut();
            devices.gamepads[0].name = "Micront Controller".to_string();
            devices.gamepads[0].axes = vec![0.0; 8];
            devices.gamepads[0].raw_buttons = vec![2];
        }
        system.update();
        assert!(handler.action_is_just_pressed(A_BUTTON));
        assert!(!handler.action_is_pressed(SELECT));
        assert!(!handler.action_is_pressed(UP));
    }

    #[test]
    fn test_gamepad_action_and_player_isolation() {
        let (mut system, devices) = new_system(DeviceKind::GAMEPAD);
        let player0 = system.new_handler(0, keymap(&[(FIRE, vec![keys::GAMEPAD_A])]));
        let player1 = system.new_handler(1, keymap(&[(FIRE, vec![keys::GAMEPAD_A])]));

        devices.borrow_mut().gamepads.push(FakeGamepad::standard(0));
        system.update();
        assert!(player0.gamepad_connected());
        assert!(!player1.gamepad_connected());

        devices.borrow_mut().gamepads[0].buttons.push(GamepadButton::A);
        system.update();
        assert!(player0.action_is_just_pressed(FIRE));
        assert!(!player1.action_is_pressed(FIRE));

        devices.borrow_mut().gamepads[0].buttons.clear();
        system.update();
        assert!(player0.action_is_just_released(FIRE));
    }

    #[test]
    fn test_stick_motion_deadzone() {
        let (mut system, devices) = new_system(DeviceKind::GAMEPAD);
        let mut handler =
            system.new_handler(0, keymap(&[(JUMP, vec![keys::GAMEPAD_LSTICK_MOTION])]));

        devices.borrow_mut().gamepads.push(FakeGamepad::standard(0));
        devices.borrow_mut().gamepads[0].standard_axes[GamepadAxis::LeftStickX.index()] = 0.02;
        devices.borrow_mut().gamepads[0].standard_axes[GamepadAxis::LeftStickY.index()] = 0.02;
        system.update();
        // Manhattan sum 0.04 stays under the default 0.055 deadzone.
        assert!(!handler.action_is_pressed(JUMP));

        devices.borrow_mut().gamepads[0].standard_axes[GamepadAxis::LeftStickX.index()] = 0.05;
        system.update();
        assert!(handler.action_is_pressed(JUMP));

        handler.set_gamepad_deadzone(0.2);
        assert!(!handler.action_is_pressed(JUMP));
    }

    #[test]
    fn test_stick_direction_action() {
        let (mut system, devices) = new_system(DeviceKind::GAMEPAD);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::GAMEPAD_LSTICK_UP])]));

        devices.borrow_mut().gamepads.push(FakeGamepad::standard(0));
        system.update();
        assert!(!handler.action_is_pressed(JUMP));

        // Up in screen coordinates is negative y.
        devices.borrow_mut().gamepads[0].standard_axes[GamepadAxis::LeftStickY.index()] = -1.0;
        system.update();
        assert!(handler.action_is_just_pressed(JUMP));

        system.update();
        assert!(handler.action_is_pressed(JUMP));
        assert!(!handler.action_is_just_pressed(JUMP));
        // Stick directions have no release edge.
        devices.borrow_mut().gamepads[0].standard_axes[GamepadAxis::LeftStickY.index()] = 0.0;
        system.update();
        assert!(!handler.action_is_just_released(JUMP));
    }

    #[test]
    fn test_wheel_action() {
        let (mut system, devices) = new_system(DeviceKind::MOUSE);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::WHEEL_UP])]));

        devices.borrow_mut().wheel = Vec2::new(0.0, 1.0);
        system.update();
        assert!(handler.action_is_just_pressed(JUMP));
        let info = handler.pressed_action_info(JUMP).unwrap();
        assert_eq!(info.pos, Some(Vec2::new(0.0, 1.0)));

        devices.borrow_mut().wheel = Vec2::ZERO;
        system.update();
        assert!(!handler.action_is_pressed(JUMP));
    }

    #[test]
    fn test_ctrl_click_info_reports_both_devices() {
        let (mut system, devices) =
            new_system(DeviceKind::KEYBOARD | DeviceKind::MOUSE);
        let ctrl_click = keys::MOUSE_LEFT.with_modifier(KeyModifier::Control);
        let handler = system.new_handler(0, keymap(&[(FIRE, vec![ctrl_click])]));

        {
            let mut devices = devices.borrow_mut();
            devices.keys.push(KeyCode::ControlLeft);
            devices.mouse_buttons.push(winit::event::MouseButton::Left);
            devices.cursor_pos = Vec2::new(120.0, 80.0);
        }
        system.update();

        let info = handler.just_pressed_action_info(FIRE).unwrap();
        assert!(info.is_mouse_event());
        assert!(info.is_keyboard_event());
        assert!(!info.is_gamepad_event());
        assert_eq!(info.pos, Some(Vec2::new(120.0, 80.0)));
        assert_eq!(info.duration_frames, None);
    }

    #[test]
    fn test_keyboard_duration_is_min_over_modifiers() {
        let (mut system, devices) = new_system(DeviceKind::KEYBOARD);
        let ctrl_a = keys::A.with_modifier(KeyModifier::Control);
        let handler = system.new_handler(0, keymap(&[(FIRE, vec![ctrl_a])]));

        // Ctrl held for three frames before the base key joins.
        devices.borrow_mut().keys.push(KeyCode::ControlLeft);
        system.update();
        system.update();
        system.update();
        devices.borrow_mut().keys.push(KeyCode::KeyA);
        system.update();

        let info = handler.pressed_action_info(FIRE).unwrap();
        assert_eq!(info.duration_frames, Some(1));

        system.update();
        let info = handler.pressed_action_info(FIRE).unwrap();
        assert_eq!(info.duration_frames, Some(2));
    }

    #[test]
    fn test_touch_drag_info() {
        let (mut system, devices) = new_system(DeviceKind::TOUCH);
        let handler = system.new_handler(0, keymap(&[(JUMP, vec![keys::TOUCH_DRAG])]));

        devices.borrow_mut().touches.push((1, Vec2::ZERO));
        system.update();
        devices.borrow_mut().touches[0].1 = Vec2::new(20.0, 0.0);
        system.update();

        assert!(handler.action_is_just_pressed(JUMP));
        let info = handler.pressed_action_info(JUMP).unwrap();
        assert!(info.is_touch_event());
        assert_eq!(info.pos, Some(Vec2::new(20.0, 0.0)));
        assert_eq!(info.start_pos, Some(Vec2::ZERO));
    }

    #[test]
    fn test_action_key_names_filtering() {
        let (mut system, devices) = new_system(DeviceKind::ANY);
        let ctrl_a = keys::A.with_modifier(KeyModifier::Control);
        let handler = system.new_handler(
            0,
            keymap(&[(FIRE, vec![ctrl_a, keys::GAMEPAD_A, keys::TOUCH_TAP])]),
        );
        system.update();

        // No gamepad connected: its keys are hidden even under a full mask.
        assert_eq!(
            handler.action_key_names(FIRE, DeviceKind::ANY),
            vec!["ctrl+a".to_string(), "screen_tap".to_string()]
        );
        assert_eq!(
            handler.action_key_names(FIRE, DeviceKind::KEYBOARD),
            vec!["ctrl+a".to_string()]
        );

        devices.borrow_mut().gamepads.push(FakeGamepad::standard(0));
        system.update();
        assert_eq!(
            handler.action_key_names(FIRE, DeviceKind::GAMEPAD),
            vec!["gamepad_a".to_string()]
        );
        assert_eq!(handler.default_input_mask(), DeviceKind::GAMEPAD);
    }

    #[test]
    fn test_multi_handler_combines_players() {
        let (mut system, devices) = new_system(DeviceKind::GAMEPAD);
        let mut multi = MultiHandler::new();
        multi.add_handler(system.new_handler(0, keymap(&[(FIRE, vec![keys::GAMEPAD_A])])));
        multi.add_handler(system.new_handler(1, keymap(&[(FIRE, vec![keys::GAMEPAD_A])])));

        devices.borrow_mut().gamepads.push(FakeGamepad::standard(1));
        devices.borrow_mut().gamepads[0].buttons.push(GamepadButton::A);
        system.update();

        // Only player 1's gamepad is connected, the multi-handler still fires.
        assert!(multi.action_is_pressed(FIRE));
        assert!(multi.action_is_just_pressed(FIRE));
    }
}
