use super::PositionFilter;
use crate::{Error, Result};
use std::collections::VecDeque;

/// Mean of the last `window_size` positions
#[derive(Debug)]
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<(f64, f64)>,
}

impl MovingAverageFilter {
    /// # Errors
    ///
    /// Returns `FilterError` for a zero window
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::FilterError("Window size must be greater than 0".to_string()));
        }
        Ok(Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        })
    }
}

impl PositionFilter for MovingAverageFilter {
    #[allow(clippy::cast_precision_loss)]
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back((x, y));

        let n = self.buffer.len() as f64;
        let (sx, sy) = self
            .buffer
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
        (sx / n, sy / n)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}
