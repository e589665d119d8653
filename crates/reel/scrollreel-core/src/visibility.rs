//! Overlay visibility policy.

/// The overlay stays visible while the raw scroll offset is within the first
/// `threshold` viewport heights.
#[inline]
pub fn overlay_visible(target: f64, viewport_height: f64, threshold: f64) -> bool {
    target < viewport_height * threshold
}

/// Remembers the last published value so callers only publish edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityLatch {
    published: bool,
}

impl Default for VisibilityLatch {
    // Page chrome starts out shown.
    fn default() -> Self {
        Self { published: true }
    }
}

impl VisibilityLatch {
    pub fn new(initial: bool) -> Self {
        Self { published: initial }
    }

    #[inline]
    pub fn published(&self) -> bool {
        self.published
    }

    /// Returns `Some(value)` only when `value` differs from the last published one.
    pub fn update(&mut self, value: bool) -> Option<bool> {
        if value == self.published {
            return None;
        }
        self.published = value;
        Some(value)
    }
}
