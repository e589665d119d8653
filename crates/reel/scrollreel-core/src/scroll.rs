//! Scroll tracking and smoothing.
//!
//! `target` and `viewport_height` are plain assignments from the host's
//! scroll/resize handlers; only the latest value matters. `current` is owned
//! by the render step, which pulls it toward `target` once per tick.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    current: f64,
    target: f64,
    viewport_height: f64,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            viewport_height: 1.0,
        }
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Latest document scroll offset in pixels. Non-finite values are dropped.
    pub fn set_target(&mut self, scroll_y: f64) {
        if scroll_y.is_finite() {
            self.target = scroll_y;
        }
    }

    /// Latest viewport height; zero, negative or non-finite heights become 1.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = if height.is_finite() && height > 0.0 {
            height
        } else {
            1.0
        };
    }

    /// One smoothing step: `current += (target - current) * damping`.
    #[inline]
    pub fn advance(&mut self, damping: f64) -> f64 {
        let delta = self.target - self.current;
        self.current += delta * damping;
        self.current
    }

    /// Unclamped section under `current`.
    #[inline]
    pub fn raw_section(&self) -> i64 {
        (self.current / self.viewport_height).floor() as i64
    }
}
