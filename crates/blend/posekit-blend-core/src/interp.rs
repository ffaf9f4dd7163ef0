//! Scalar interpolation helpers for the blend loop.

/// Linear interpolation of scalars.
///
/// Intentionally unclamped: weights outside [0, 1] extrapolate past the
/// captured endpoints, which is how overshoot sliders are expected to behave.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
