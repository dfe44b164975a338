// Math helpers for stick vector evaluation

use glam::Vec2;
use std::f32::consts::TAU;

/// Normalize an angle in radians into the [0, 2*pi) range.
pub(crate) fn normalize_angle(radians: f32) -> f32 {
    radians - (radians / TAU).floor() * TAU
}

/// Angle of a vector in screen coordinates (y grows downwards),
/// normalized into [0, 2*pi).
pub(crate) fn vec_angle(v: Vec2) -> f32 {
    normalize_angle(v.y.atan2(v.x))
}

/// Manhattan magnitude of a vector, used for stick motion deadzones.
pub(crate) fn manhattan_len(v: Vec2) -> f32 {
    v.x.abs() + v.y.abs()
}
