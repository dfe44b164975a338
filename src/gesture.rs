// Tap, long-tap and drag recognition for a single pointer

use glam::Vec2;

/// Held time after which a release produces a long tap instead of a tap.
const LONG_TAP_SECONDS: f32 = 0.5;

/// Drag displacement threshold for touch pointers.
pub(crate) const TOUCH_DRAG_THRESHOLD: f32 = 5.0;
/// Drag displacement threshold for the mouse pointer.
/// A mouse is more precise than a finger, hence the tighter value.
pub(crate) const MOUSE_DRAG_THRESHOLD: f32 = 3.0;

/// A per-pointer gesture state machine: Idle -> Pressed -> (Tap | LongTap |
/// Dragging).
///
/// Pulses (tap, long tap, just-started-drag) are valid for exactly one
/// update; dragging re-emits with an updated position every frame.
/// A gesture that entered drag mode never produces a tap on release.
#[derive(Debug, Clone)]
pub(crate) struct PointerTracker {
    drag_threshold: f32,

    pressed: bool,
    dragging: bool,
    hold_time: f32,

    start_pos: Vec2,
    drag_pos: Vec2,
    tap_pos: Vec2,

    has_tap: bool,
    has_long_tap: bool,
    has_drag: bool,
    just_started_drag: bool,
}

impl PointerTracker {
    pub(crate) fn new(drag_threshold: f32) -> Self {
        Self {
            drag_threshold,
            pressed: false,
            dragging: false,
            hold_time: 0.0,
            start_pos: Vec2::ZERO,
            drag_pos: Vec2::ZERO,
            tap_pos: Vec2::ZERO,
            has_tap: false,
            has_long_tap: false,
            has_drag: false,
            just_started_drag: false,
        }
    }

    /// Advance the state machine by one frame.
    /// `pointer` is the pointer position while it is down, `None` otherwise.
    pub(crate) fn update(&mut self, pointer: Option<Vec2>, delta: f32) {
        self.has_tap = false;
        self.has_long_tap = false;
        self.has_drag = false;
        self.just_started_drag = false;

        let Some(pos) = pointer else {
            if self.pressed {
                if !self.dragging {
                    if self.hold_time >= LONG_TAP_SECONDS {
                        self.has_long_tap = true;
                    } else {
                        self.has_tap = true;
                    }
                    self.tap_pos = self.start_pos;
                }
                self.pressed = false;
                self.dragging = false;
            }
            return;
        };

        if !self.pressed {
            self.pressed = true;
            self.start_pos = pos;
            self.hold_time = 0.0;
        } else if self.dragging {
            self.has_drag = true;
            self.drag_pos = pos;
        } else {
            self.hold_time += delta;
            if self.start_pos.distance(pos) > self.drag_threshold {
                self.dragging = true;
                self.just_started_drag = true;
                self.has_drag = true;
                self.drag_pos = pos;
            }
        }
    }

    pub(crate) fn has_tap(&self) -> bool {
        self.has_tap
    }

    pub(crate) fn has_long_tap(&self) -> bool {
        self.has_long_tap
    }

    pub(crate) fn has_drag(&self) -> bool {
        self.has_drag
    }

    pub(crate) fn just_started_drag(&self) -> bool {
        self.just_started_drag
    }

    pub(crate) fn tap_pos(&self) -> Vec2 {
        self.tap_pos
    }

    pub(crate) fn drag_pos(&self) -> Vec2 {
        self.drag_pos
    }

    pub(crate) fn start_pos(&self) -> Vec2 {
        self.start_pos
    }
}
