//! Coordinate helpers shared by the action layer.

pub mod safe_cast;

use safe_cast::{f64_to_i32_clamp, u32_to_i32};

/// Clamp a pixel coordinate onto an axis of `extent` pixels (`0..extent`).
///
/// NaN and negative infinity pin to 0, positive infinity to the last pixel.
#[must_use]
pub fn clamp_to_axis(pixel: f64, extent: u32) -> i32 {
    let max = u32_to_i32(extent.saturating_sub(1)).unwrap_or(i32::MAX);
    f64_to_i32_clamp(pixel, 0, max)
}
