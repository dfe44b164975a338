// Per-kind key resolvers: one strategy object per device family

use std::f32::consts::PI;

use glam::Vec2;

use crate::gamepad::GamepadState;
use crate::key::{Key, KeyKind, KeyModifier, RawCode, StickCode, TouchCode, WheelCode};
use crate::math::{manhattan_len, vec_angle};
use crate::system::SystemState;

/// Everything a resolver needs to answer a query for one handler.
pub(crate) struct ResolveContext<'a> {
    pub state: &'a SystemState,
    pub player_id: u8,
    pub deadzone: f32,
}

/// A per-key-kind resolution strategy.
///
/// Release and position reporting are opt-in: gesture- and axis-derived
/// kinds have no meaningful release edge, and most kinds carry no position.
pub(crate) trait KeyResolver {
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool;
    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool;

    fn is_just_released(&self, _ctx: &ResolveContext, _key: Key) -> bool {
        false
    }

    fn position(&self, _ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        None
    }

    fn start_position(&self, _ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        None
    }
}

/// Select the strategy for a key kind.
pub(crate) fn resolver_for(kind: KeyKind) -> &'static dyn KeyResolver {
    match kind {
        KeyKind::Keyboard
        | KeyKind::KeyboardWithCtrl
        | KeyKind::KeyboardWithShift
        | KeyKind::KeyboardWithCtrlShift => &KeyboardResolver,
        KeyKind::Mouse
        | KeyKind::MouseWithCtrl
        | KeyKind::MouseWithShift
        | KeyKind::MouseWithCtrlShift => &MouseButtonResolver,
        KeyKind::MouseDrag => &MouseDragResolver,
        KeyKind::Gamepad => &GamepadButtonResolver,
        KeyKind::GamepadLeftStick | KeyKind::GamepadRightStick => &StickDirectionResolver,
        KeyKind::GamepadLeftStickMotion | KeyKind::GamepadRightStickMotion => &StickMotionResolver,
        KeyKind::Wheel => &WheelResolver,
        KeyKind::Touch => &TouchResolver,
        KeyKind::TouchDrag => &TouchDragResolver,
        // Direct-action keys exist only in the simulated channel; they
        // have no device state to resolve.
        KeyKind::Simulated => &NeverResolver,
    }
}

// Modifier checks accept either physical variant.

fn ctrl_held(state: &SystemState, current: bool) -> bool {
    use winit::keyboard::KeyCode::{ControlLeft, ControlRight};
    if current {
        state.key_pressed(ControlLeft) || state.key_pressed(ControlRight)
    } else {
        state.key_was_pressed(ControlLeft) || state.key_was_pressed(ControlRight)
    }
}

fn shift_held(state: &SystemState, current: bool) -> bool {
    use winit::keyboard::KeyCode::{ShiftLeft, ShiftRight};
    if current {
        state.key_pressed(ShiftLeft) || state.key_pressed(ShiftRight)
    } else {
        state.key_was_pressed(ShiftLeft) || state.key_was_pressed(ShiftRight)
    }
}

fn modifiers_held(state: &SystemState, modifier: Option<KeyModifier>, current: bool) -> bool {
    match modifier {
        None => true,
        Some(KeyModifier::Control) => ctrl_held(state, current),
        Some(KeyModifier::Shift) => shift_held(state, current),
        Some(KeyModifier::ControlShift) => {
            ctrl_held(state, current) && shift_held(state, current)
        }
    }
}

/// Modifier gate for a release edge: a modifier that was let go in the same
/// frame as the base key still counts.
fn modifiers_allow_release(state: &SystemState, modifier: Option<KeyModifier>) -> bool {
    modifiers_held(state, modifier, true) || modifiers_held(state, modifier, false)
}

struct KeyboardResolver;

impl KeyboardResolver {
    fn code(key: Key) -> winit::keyboard::KeyCode {
        match key.code {
            RawCode::Keyboard(code) => code,
            _ => unreachable!("keyboard resolver got non-keyboard key"),
        }
    }
}

impl KeyResolver for KeyboardResolver {
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        ctx.state.key_pressed(Self::code(key)) && modifiers_held(ctx.state, key.modifier(), true)
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        let code = Self::code(key);
        // The base key must transition this frame; the modifiers may
        // already have been held.
        ctx.state.key_pressed(code)
            && !ctx.state.key_was_pressed(code)
            && modifiers_held(ctx.state, key.modifier(), true)
    }

    fn is_just_released(&self, ctx: &ResolveContext, key: Key) -> bool {
        let code = Self::code(key);
        !ctx.state.key_pressed(code)
            && ctx.state.key_was_pressed(code)
            && modifiers_allow_release(ctx.state, key.modifier())
    }
}

struct MouseButtonResolver;

impl MouseButtonResolver {
    fn button(key: Key) -> winit::event::MouseButton {
        match key.code {
            RawCode::Mouse(button) => button,
            _ => unreachable!("mouse resolver got non-mouse key"),
        }
    }
}

impl KeyResolver for MouseButtonResolver {
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        ctx.state.mouse_pressed(Self::button(key))
            && modifiers_held(ctx.state, key.modifier(), true)
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        let button = Self::button(key);
        ctx.state.mouse_pressed(button)
            && !ctx.state.mouse_was_pressed(button)
            && modifiers_held(ctx.state, key.modifier(), true)
    }

    fn is_just_released(&self, ctx: &ResolveContext, key: Key) -> bool {
        let button = Self::button(key);
        !ctx.state.mouse_pressed(button)
            && ctx.state.mouse_was_pressed(button)
            && modifiers_allow_release(ctx.state, key.modifier())
    }

    fn position(&self, ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        Some(ctx.state.cursor_pos())
    }
}

struct MouseDragResolver;

impl KeyResolver for MouseDragResolver {
    fn is_pressed(&self, ctx: &ResolveContext, _key: Key) -> bool {
        ctx.state.mouse_tracker().has_drag()
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, _key: Key) -> bool {
        ctx.state.mouse_tracker().just_started_drag()
    }

    fn position(&self, ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        Some(ctx.state.mouse_tracker().drag_pos())
    }

    fn start_position(&self, ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        Some(ctx.state.mouse_tracker().start_pos())
    }
}

struct GamepadButtonResolver;

impl GamepadButtonResolver {
    fn button(key: Key) -> crate::gamepad::GamepadButton {
        match key.code {
            RawCode::GamepadButton(button) => button,
            _ => unreachable!("gamepad resolver got non-gamepad key"),
        }
    }
}

impl KeyResolver for GamepadButtonResolver {
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        ctx.state
            .gamepad(ctx.player_id)
            .is_some_and(|pad| pad.button_pressed(Self::button(key), true))
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        ctx.state.gamepad(ctx.player_id).is_some_and(|pad| {
            let button = Self::button(key);
            pad.button_pressed(button, true) && !pad.button_pressed(button, false)
        })
    }

    fn is_just_released(&self, ctx: &ResolveContext, key: Key) -> bool {
        ctx.state.gamepad(ctx.player_id).is_some_and(|pad| {
            let button = Self::button(key);
            !pad.button_pressed(button, true) && pad.button_pressed(button, false)
        })
    }
}

// Stick sector geometry. Angles are normalized into [0, 2pi) with y growing
// downwards, so "up" occupies the sector around 3pi/2. Each direction owns a
// 90 degree sector widened by an overlap window on both sides, letting two
// adjacent directions register together near a diagonal, like a D-pad
// dual-direction press.
const STICK_MIN_MAGNITUDE: f32 = 0.5;
const SECTOR_OVERLAP: f32 = PI / 7.0;

fn stick_direction_active(vec: Vec2, code: StickCode) -> bool {
    if vec.length() < STICK_MIN_MAGNITUDE {
        return false;
    }
    let angle = vec_angle(vec);
    match code {
        StickCode::Up => {
            angle > (PI + PI / 4.0) - SECTOR_OVERLAP
                && angle <= (2.0 * PI - PI / 4.0) + SECTOR_OVERLAP
        }
        StickCode::Right => {
            angle <= (PI / 4.0) + SECTOR_OVERLAP
                || angle > (2.0 * PI - PI / 4.0) - SECTOR_OVERLAP
        }
        StickCode::Down => {
            angle > (PI / 4.0) - SECTOR_OVERLAP && angle <= (PI - PI / 4.0) + SECTOR_OVERLAP
        }
        StickCode::Left => {
            angle > (PI - PI / 4.0) - SECTOR_OVERLAP
                && angle <= (PI + PI / 4.0) + SECTOR_OVERLAP
        }
        StickCode::Motion => false,
    }
}

fn is_left_stick(kind: KeyKind) -> bool {
    matches!(
        kind,
        KeyKind::GamepadLeftStick | KeyKind::GamepadLeftStickMotion
    )
}

fn stick_code(key: Key) -> StickCode {
    match key.code {
        RawCode::Stick(code) => code,
        _ => unreachable!("stick resolver got non-stick key"),
    }
}

fn stick_vec(pad: &GamepadState, kind: KeyKind, current: bool) -> Option<Vec2> {
    pad.stick_vec(is_left_stick(kind), current)
}

struct StickDirectionResolver;

impl KeyResolver for StickDirectionResolver {
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        ctx.state.gamepad(ctx.player_id).is_some_and(|pad| {
            stick_vec(pad, key.kind, true)
                .is_some_and(|vec| stick_direction_active(vec, stick_code(key)))
        })
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        ctx.state.gamepad(ctx.player_id).is_some_and(|pad| {
            let code = stick_code(key);
            let now = stick_vec(pad, key.kind, true)
                .is_some_and(|vec| stick_direction_active(vec, code));
            let before = stick_vec(pad, key.kind, false)
                .is_some_and(|vec| stick_direction_active(vec, code));
            now && !before
        })
    }

    fn position(&self, ctx: &ResolveContext, key: Key) -> Option<Vec2> {
        let pad = ctx.state.gamepad(ctx.player_id)?;
        stick_vec(pad, key.kind, true)
    }
}

struct StickMotionResolver;

impl StickMotionResolver {
    fn active(ctx: &ResolveContext, key: Key, current: bool) -> bool {
        ctx.state.gamepad(ctx.player_id).is_some_and(|pad| {
            stick_vec(pad, key.kind, current)
                .is_some_and(|vec| manhattan_len(vec) > ctx.deadzone)
        })
    }
}

impl KeyResolver for StickMotionResolver {
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        Self::active(ctx, key, true)
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        Self::active(ctx, key, true) && !Self::active(ctx, key, false)
    }

    fn position(&self, ctx: &ResolveContext, key: Key) -> Option<Vec2> {
        let pad = ctx.state.gamepad(ctx.player_id)?;
        stick_vec(pad, key.kind, true)
    }
}

struct WheelResolver;

impl WheelResolver {
    fn scrolled(delta: Vec2, code: WheelCode) -> bool {
        match code {
            WheelCode::Up => delta.y > 0.0,
            WheelCode::Down => delta.y < 0.0,
            WheelCode::Vertical => delta.y != 0.0,
        }
    }

    fn code(key: Key) -> WheelCode {
        match key.code {
            RawCode::Wheel(code) => code,
            _ => unreachable!("wheel resolver got non-wheel key"),
        }
    }
}

impl KeyResolver for WheelResolver {
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        Self::scrolled(ctx.state.wheel_delta(), Self::code(key))
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        let code = Self::code(key);
        Self::scrolled(ctx.state.wheel_delta(), code)
            && !Self::scrolled(ctx.state.prev_wheel_delta(), code)
    }

    fn position(&self, ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        Some(ctx.state.wheel_delta())
    }
}

struct TouchResolver;

impl KeyResolver for TouchResolver {
    // Taps are one-frame pulses: pressed and just-pressed coincide.
    fn is_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        self.is_just_pressed(ctx, key)
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, key: Key) -> bool {
        let tracker = ctx.state.touch_tracker();
        match key.code {
            RawCode::Touch(TouchCode::Tap) => tracker.has_tap(),
            RawCode::Touch(TouchCode::LongTap) => tracker.has_long_tap(),
            _ => false,
        }
    }

    fn position(&self, ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        Some(ctx.state.touch_tracker().tap_pos())
    }
}

struct TouchDragResolver;

impl KeyResolver for TouchDragResolver {
    fn is_pressed(&self, ctx: &ResolveContext, _key: Key) -> bool {
        ctx.state.touch_tracker().has_drag()
    }

    fn is_just_pressed(&self, ctx: &ResolveContext, _key: Key) -> bool {
        ctx.state.touch_tracker().just_started_drag()
    }

    fn position(&self, ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        Some(ctx.state.touch_tracker().drag_pos())
    }

    fn start_position(&self, ctx: &ResolveContext, _key: Key) -> Option<Vec2> {
        Some(ctx.state.touch_tracker().start_pos())
    }
}

struct NeverResolver;

impl KeyResolver for NeverResolver {
    fn is_pressed(&self, _ctx: &ResolveContext, _key: Key) -> bool {
        false
    }

    fn is_just_pressed(&self, _ctx: &ResolveContext, _key: Key) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_center_is_never_active() {
        let directions = [
            StickCode::Up,
            StickCode::Right,
            StickCode::Down,
            StickCode::Left,
        ];
        for angle_deg in (0..360).step_by(15) {
            let angle = (angle_deg as f32).to_radians();
            let vec = Vec2::new(angle.cos(), angle.sin()) * 0.49;
            for code in directions {
                assert!(
                    !stick_direction_active(vec, code),
                    "magnitude 0.49 at {angle_deg} deg should be inactive"
                );
            }
        }
    }

    #[test]
    fn test_cardinal_directions() {
        // Screen coordinates: y grows downwards.
        assert!(stick_direction_active(Vec2::new(1.0, 0.0), StickCode::Right));
        assert!(!stick_direction_active(Vec2::new(1.0, 0.0), StickCode::Left));
        assert!(!stick_direction_active(Vec2::new(1.0, 0.0), StickCode::Up));
        assert!(!stick_direction_active(Vec2::new(1.0, 0.0), StickCode::Down));

        assert!(stick_direction_active(Vec2::new(-1.0, 0.0), StickCode::Left));
        assert!(stick_direction_active(Vec2::new(0.0, -1.0), StickCode::Up));
        assert!(stick_direction_active(Vec2::new(0.0, 1.0), StickCode::Down));
    }

    #[test]
    fn test_diagonal_hits_both_sectors() {
        // An exact up-right diagonal lands in both overlap windows.
        let vec = Vec2::new(1.0, -1.0);
        assert!(stick_direction_active(vec, StickCode::Up));
        assert!(stick_direction_active(vec, StickCode::Right));
        assert!(!stick_direction_active(vec, StickCode::Down));
        assert!(!stick_direction_active(vec, StickCode::Left));
    }

    #[test]
    fn test_sector_core_excludes_neighbors() {
        // 10 degrees below the x axis: right only, outside every overlap.
        let angle = 10.0f32.to_radians();
        let vec = Vec2::new(angle.cos(), angle.sin());
        assert!(stick_direction_active(vec, StickCode::Right));
        assert!(!stick_direction_active(vec, StickCode::Down));
        assert!(!stick_direction_active(vec, StickCode::Up));
    }

    #[test]
    fn test_motion_code_is_not_a_direction() {
        assert!(!stick_direction_active(Vec2::new(1.0, 0.0), StickCode::Motion));
    }
}
