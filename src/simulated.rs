// Simulated event channel: programmatically injected input

use glam::Vec2;

use crate::key::{kind_info, Key, KeyKind, RawCode};
use crate::Action;

/// A virtual input event that can be sent down the stream via
/// [`Handler::emit_key_event`](crate::Handler::emit_key_event).
///
/// The event keeps its device flavor: a simulated mouse click still
/// reports as a mouse event to consumers.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedKeyEvent {
    pub key: Key,
    /// Event position, for kinds that carry one.
    pub pos: Vec2,
    /// Drag origin, for drag kinds.
    pub start_pos: Vec2,
}

/// An event stored in the channel, tagged with the emitting player.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimulatedEvent {
    pub key: Key,
    pub player_id: u8,
    pub pos: Vec2,
    pub start_pos: Vec2,
}

/// The synthetic key used to look up direct-action events.
/// It carries the raw action value as its code, so it can never collide
/// with a real key code.
pub(crate) fn simulated_action_key(action: Action) -> Key {
    Key {
        code: RawCode::Action(action.0),
        kind: KeyKind::Simulated,
        name: "$simulated_action",
    }
}

/// Double-buffered queue of simulated events.
///
/// Events are written into the pending buffer and become visible to
/// queries only after the next system update. The previous buffer is kept
/// one more frame to suppress duplicate just-pressed detection.
#[derive(Debug, Default)]
pub(crate) struct SimulatedChannel {
    pending: Vec<SimulatedEvent>,
    current: Vec<SimulatedEvent>,
    previous: Vec<SimulatedEvent>,
    has_action_events: bool,
}

impl SimulatedChannel {
    /// Queue an event for the next frame.
    pub(crate) fn push(&mut self, event: SimulatedEvent) {
        self.pending.push(event);
    }

    /// Rotate the buffers: pending becomes current, current becomes
    /// previous, and the previous buffer's storage is reused for new
    /// pending events. Runs exactly once per update, before any device
    /// refresh, and never allocates.
    pub(crate) fn rotate(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
        std::mem::swap(&mut self.current, &mut self.pending);
        self.pending.clear();
        self.has_action_events = self
            .current
            .iter()
            .any(|e| e.key.kind == KeyKind::Simulated);
    }

    /// Whether the current buffer holds any direct-action events.
    /// Cheap gate so queries skip the lookup in the common case.
    pub(crate) fn has_action_events(&self) -> bool {
        self.has_action_events
    }

    pub(crate) fn find_current(&self, key: Key, player_id: u8) -> Option<&SimulatedEvent> {
        find_in(&self.current, key, player_id)
    }

    pub(crate) fn find_previous(&self, key: Key, player_id: u8) -> Option<&SimulatedEvent> {
        find_in(&self.previous, key, player_id)
    }
}

/// Find an event matching a key. Kinds that require player isolation
/// (gamepad family, direct actions) match only the emitting player;
/// the rest mirror real hardware and are visible globally.
fn find_in(events: &[SimulatedEvent], key: Key, player_id: u8) -> Option<&SimulatedEvent> {
    let per_player = kind_info(key.kind).needs_player_id;
    events.iter().find(|e| {
        e.key.code == key.code
            && e.key.kind == key.kind
            && (!per_player || e.player_id == player_id)
    })
}
