// Input system: per-frame device snapshots shared by all handlers

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::action::{DeviceKind, Keymap};
use crate::backend::{DeviceBackend, TouchId};
use crate::gamepad::{GamepadState, MAX_GAMEPADS};
use crate::gesture::{PointerTracker, MOUSE_DRAG_THRESHOLD, TOUCH_DRAG_THRESHOLD};
use crate::handler::Handler;
use crate::simulated::SimulatedChannel;

/// The assumed frame time of [`InputSystem::update`].
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// Gamepad stick motion below this Manhattan magnitude is ignored.
/// Per-handler, adjustable via [`Handler::set_gamepad_deadzone`].
pub(crate) const DEFAULT_GAMEPAD_DEADZONE: f32 = 0.055;

pub(crate) const MOUSE_BUTTON_COUNT: usize = 5;

/// Maps a winit mouse button to its snapshot slot.
pub(crate) fn mouse_button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::Back => Some(3),
        MouseButton::Forward => Some(4),
        MouseButton::Other(_) => None,
    }
}

/// Initial [`InputSystem`] settings.
pub struct SystemConfig {
    /// The device families the system samples. Disabled families read as
    /// fully released forever.
    pub devices_enabled: DeviceKind,
    /// The raw device poller.
    pub backend: Box<dyn DeviceBackend>,
}

/// The root object of the input layer.
///
/// Owns the device snapshots and refreshes them once per frame via
/// [`update`](Self::update); [`Handler`]s created from it resolve action
/// queries against the shared snapshot. Single-threaded by design: call
/// `update` at the top of the frame, query from the game logic afterwards.
pub struct InputSystem {
    state: Rc<RefCell<SystemState>>,
}

impl InputSystem {
    pub fn new(config: SystemConfig) -> Self {
        log::info!("input system started, devices: {}", config.devices_enabled);
        Self {
            state: Rc::new(RefCell::new(SystemState::new(
                config.backend,
                config.devices_enabled,
            ))),
        }
    }

    /// Refresh all device snapshots assuming the default 60 Hz timestep.
    pub fn update(&mut self) {
        self.update_with_delta(DEFAULT_TIMESTEP);
    }

    /// Refresh all device snapshots with an explicit frame time in seconds.
    /// Call exactly once per frame, before any handler query.
    pub fn update_with_delta(&mut self, delta: f32) {
        self.state.borrow_mut().refresh(delta);
    }

    /// Create a handler bound to a player slot.
    ///
    /// The player id selects which gamepad the handler reads
    /// (player 0 reads gamepad 0) and scopes simulated per-player events.
    /// Keyboard, mouse and touch are shared across all handlers.
    pub fn new_handler(&self, player_id: u8, keymap: Keymap) -> Handler {
        Handler::new(player_id, keymap, Rc::clone(&self.state))
    }
}

/// The shared per-frame snapshot of every sampled device.
pub(crate) struct SystemState {
    backend: Box<dyn DeviceBackend>,
    enabled: DeviceKind,

    // Keyboard.
    keys: HashSet<KeyCode>,
    prev_keys: HashSet<KeyCode>,
    key_hold_frames: HashMap<KeyCode, u32>,
    scratch_keys: Vec<KeyCode>,

    // Mouse.
    mouse_buttons: [bool; MOUSE_BUTTON_COUNT],
    prev_mouse_buttons: [bool; MOUSE_BUTTON_COUNT],
    cursor: Vec2,
    wheel: Vec2,
    prev_wheel: Vec2,
    mouse_tracker: PointerTracker,

    // Touch. One gesture at a time: the first touch to appear drives the
    // tracker until it is released.
    touch_tracker: PointerTracker,
    active_touch: Option<TouchId>,
    scratch_touches: Vec<TouchId>,

    // Gamepads, indexed by backend slot id.
    gamepads: Vec<GamepadState>,
    connected: [bool; MAX_GAMEPADS],
    scratch_gamepad_ids: Vec<usize>,

    simulated: SimulatedChannel,
}

impl SystemState {
    fn new(backend: Box<dyn DeviceBackend>, enabled: DeviceKind) -> Self {
        Self {
            backend,
            enabled,
            keys: HashSet::new(),
            prev_keys: HashSet::new(),
            key_hold_frames: HashMap::new(),
            scratch_keys: Vec::new(),
            mouse_buttons: [false; MOUSE_BUTTON_COUNT],
            prev_mouse_buttons: [false; MOUSE_BUTTON_COUNT],
            cursor: Vec2::ZERO,
            wheel: Vec2::ZERO,
            prev_wheel: Vec2::ZERO,
            mouse_tracker: PointerTracker::new(MOUSE_DRAG_THRESHOLD),
            touch_tracker: PointerTracker::new(TOUCH_DRAG_THRESHOLD),
            active_touch: None,
            scratch_touches: Vec::new(),
            gamepads: (0..MAX_GAMEPADS).map(|_| GamepadState::new()).collect(),
            connected: [false; MAX_GAMEPADS],
            scratch_gamepad_ids: Vec::new(),
            simulated: SimulatedChannel::default(),
        }
    }

    fn refresh(&mut self, delta: f32) {
        // Rotate the simulated buffers before touching the hardware, so
        // events queued during the previous frame become visible together
        // with this frame's device state.
        self.simulated.rotate();

        if self.enabled.contains(DeviceKind::GAMEPAD) {
            self.refresh_gamepads();
        }
        if self.enabled.contains(DeviceKind::TOUCH) {
            self.refresh_touch(delta);
        }
        if self.enabled.contains(DeviceKind::MOUSE) {
            self.refresh_mouse(delta);
        }
        if self.enabled.contains(DeviceKind::KEYBOARD) {
            self.refresh_keyboard();
        }
    }

    fn refresh_gamepads(&mut self) {
        self.scratch_gamepad_ids.clear();
        self.backend.append_gamepad_ids(&mut self.scratch_gamepad_ids);
        let prev_connected = self.connected;
        self.connected = [false; MAX_GAMEPADS];
        for i in 0..self.scratch_gamepad_ids.len() {
            let id = self.scratch_gamepad_ids[i];
            if id >= MAX_GAMEPADS {
                continue;
            }
            self.connected[id] = true;
            if !prev_connected[id] {
                log::info!("gamepad {id} connected");
            }
            self.gamepads[id].refresh(self.backend.as_mut(), id);
        }
        for id in 0..MAX_GAMEPADS {
            if prev_connected[id] && !self.connected[id] {
                log::info!("gamepad {id} disconnected");
            }
        }
    }

    fn refresh_touch(&mut self, delta: f32) {
        self.scratch_touches.clear();
        self.backend.append_touch_ids(&mut self.scratch_touches);

        let still_active = self
            .active_touch
            .filter(|id| self.scratch_touches.contains(id));
        let active = still_active.or_else(|| {
            if self.active_touch.is_some() {
                // The driving touch lifted this frame; extra touches that
                // appeared during the gesture never take over mid-flight.
                None
            } else {
                self.scratch_touches.first().copied()
            }
        });
        if self.active_touch.is_some() && active.is_none() {
            self.active_touch = None;
        } else if active.is_some() {
            self.active_touch = active;
        }

        let pointer = active.map(|id| self.backend.touch_pos(id));
        self.touch_tracker.update(pointer, delta);
    }

    fn refresh_mouse(&mut self, delta: f32) {
        self.prev_mouse_buttons = self.mouse_buttons;
        self.mouse_buttons = [
            self.backend.is_mouse_button_pressed(MouseButton::Left),
            self.backend.is_mouse_button_pressed(MouseButton::Right),
            self.backend.is_mouse_button_pressed(MouseButton::Middle),
            self.backend.is_mouse_button_pressed(MouseButton::Back),
            self.backend.is_mouse_button_pressed(MouseButton::Forward),
        ];
        self.cursor = self.backend.cursor_pos();
        self.prev_wheel = self.wheel;
        self.wheel = self.backend.wheel_delta();

        let pointer = self.mouse_buttons[0].then_some(self.cursor);
        self.mouse_tracker.update(pointer, delta);
    }

    fn refresh_keyboard(&mut self) {
        std::mem::swap(&mut self.prev_keys, &mut self.keys);
        self.keys.clear();
        self.scratch_keys.clear();
        self.backend.append_pressed_keys(&mut self.scratch_keys);
        self.keys.extend(self.scratch_keys.iter().copied());

        let keys = &self.keys;
        self.key_hold_frames.retain(|code, _| keys.contains(code));
        for &code in &self.keys {
            *self.key_hold_frames.entry(code).or_insert(0) += 1;
        }
    }

    // Query surface consumed by the key resolvers and handlers.

    /// Append every key of the current keyboard snapshot to `dst`.
    /// The order is unspecified.
    pub(crate) fn append_pressed_key_codes(&self, dst: &mut Vec<KeyCode>) {
        dst.extend(self.keys.iter().copied());
    }

    pub(crate) fn key_pressed(&self, code: KeyCode) -> bool {
        self.keys.contains(&code)
    }

    pub(crate) fn key_was_pressed(&self, code: KeyCode) -> bool {
        self.prev_keys.contains(&code)
    }

    pub(crate) fn key_hold_frames(&self, code: KeyCode) -> u32 {
        self.key_hold_frames.get(&code).copied().unwrap_or(0)
    }

    pub(crate) fn mouse_pressed(&self, button: MouseButton) -> bool {
        mouse_button_index(button).is_some_and(|i| self.mouse_buttons[i])
    }

    pub(crate) fn mouse_was_pressed(&self, button: MouseButton) -> bool {
        mouse_button_index(button).is_some_and(|i| self.prev_mouse_buttons[i])
    }

    pub(crate) fn cursor_pos(&self) -> Vec2 {
        self.cursor
    }

    pub(crate) fn wheel_delta(&self) -> Vec2 {
        self.wheel
    }

    pub(crate) fn prev_wheel_delta(&self) -> Vec2 {
        self.prev_wheel
    }

    pub(crate) fn mouse_tracker(&self) -> &PointerTracker {
        &self.mouse_tracker
    }

    pub(crate) fn touch_tracker(&self) -> &PointerTracker {
        &self.touch_tracker
    }

    pub(crate) fn touch_enabled(&self) -> bool {
        self.enabled.contains(DeviceKind::TOUCH)
    }

    /// The gamepad snapshot of a player slot, if that gamepad is connected.
    pub(crate) fn gamepad(&self, player_id: u8) -> Option<&GamepadState> {
        let id = player_id as usize;
        (id < MAX_GAMEPADS && self.connected[id]).then(|| &self.gamepads[id])
    }

    pub(crate) fn gamepad_connected(&self, player_id: u8) -> bool {
        let id = player_id as usize;
        id < MAX_GAMEPADS && self.connected[id]
    }

    pub(crate) fn simulated(&self) -> &SimulatedChannel {
        &self.simulated
    }

    pub(crate) fn simulated_mut(&mut self) -> &mut SimulatedChannel {
        &mut self.simulated
    }
}
