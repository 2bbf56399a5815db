//! Pointer smoothing filters.
//!
//! Filters run in the action layer on screen-space pointer positions, so
//! gesture decisions always carry the raw fingertip position.

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::{constants::DEFAULT_MOVING_AVERAGE_WINDOW, Result};

/// Trait for all pointer filters
pub trait PositionFilter: Send + Sync {
    /// Apply filter to a new position
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl PositionFilter for NoFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a pointer filter by type name.
///
/// `smoothing_factor` is the exponential filter's weight on new input.
///
/// # Errors
///
/// Returns `FilterError` for unknown names or an out-of-range factor
pub fn create_filter(filter_type: &str, smoothing_factor: f64) -> Result<Box<dyn PositionFilter>> {
    match filter_type.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "moving_average" | "movingaverage" => Ok(Box::new(moving_average::MovingAverageFilter::new(
            DEFAULT_MOVING_AVERAGE_WINDOW,
        )?)),
        "exponential" => Ok(Box::new(exponential::ExponentialFilter::new(smoothing_factor)?)),
        _ => Err(crate::Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}
