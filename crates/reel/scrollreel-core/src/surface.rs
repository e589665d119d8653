//! Drawing surface seam and device-pixel-ratio sizing.
//!
//! Hosts size the backing store at `display size × device pixel ratio` and
//! scale their context by the same ratio, so the engine always draws in
//! logical (CSS) pixels.

use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// Surface size in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

/// Full-viewport target the render step paints frames onto.
pub trait Surface<F> {
    fn logical_size(&self) -> LogicalSize;

    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Draw `frame` stretched over `size`, anchored at the origin.
    fn draw_frame(&mut self, frame: &F, size: LogicalSize) -> Result<(), SurfaceError>;
}

/// Backing-store dimensions and context scale for one display size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackingStore {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

impl BackingStore {
    pub fn for_display(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        let scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width: to_pixels(css_width * scale),
            height: to_pixels(css_height * scale),
            scale,
        }
    }

    /// Backing-store size mapped back into logical pixels.
    pub fn logical_size(&self) -> LogicalSize {
        LogicalSize {
            width: f64::from(self.width) / self.scale,
            height: f64::from(self.height) / self.scale,
        }
    }
}

fn to_pixels(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
