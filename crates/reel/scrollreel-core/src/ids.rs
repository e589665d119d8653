//! Frame identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-based position of one still image in the sequence.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Accept a raw (possibly negative) index only when it lies in `[0, frame_count)`.
    #[inline]
    pub fn checked(raw: i64, frame_count: u32) -> Option<Self> {
        if raw < 0 || raw >= i64::from(frame_count) {
            None
        } else {
            Some(FrameIndex(raw as u32))
        }
    }

    /// Clamp a raw section into `[0, frame_count - 1]`. `frame_count` must be non-zero.
    #[inline]
    pub fn clamped(raw: i64, frame_count: u32) -> Self {
        let last = i64::from(frame_count.saturating_sub(1));
        FrameIndex(raw.clamp(0, last) as u32)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
