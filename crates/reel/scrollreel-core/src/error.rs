//! Error types for the scrollreel core.

use thiserror::Error;

use crate::ids::FrameIndex;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("frame_count must be at least 1")]
    EmptySequence,
    #[error("cache_capacity must be at least 1")]
    ZeroCapacity,
    #[error("parallel_loads must be at least 1")]
    ZeroParallelLoads,
    #[error("{field} must be at least 1")]
    ZeroInterval { field: &'static str },
    #[error("damping must be in (0, 1], got {0}")]
    Damping(f64),
    #[error("visibility_threshold must be finite and non-negative, got {0}")]
    VisibilityThreshold(f64),
    #[error("frame source extension must not be empty")]
    EmptyExtension,
}

/// A frame load that settled without producing a drawable frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("frame {index} failed to load: {reason}")]
    Failed { index: FrameIndex, reason: String },
    #[error("frame {index} resolved but is not complete")]
    Incomplete { index: FrameIndex },
}

impl LoadError {
    pub fn failed(index: FrameIndex, reason: impl Into<String>) -> Self {
        LoadError::Failed {
            index,
            reason: reason.into(),
        }
    }

    pub fn index(&self) -> FrameIndex {
        match self {
            LoadError::Failed { index, .. } | LoadError::Incomplete { index } => *index,
        }
    }
}

/// Drawing surface failures. The render step logs these and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("drawing surface unavailable")]
    Unavailable,
    #[error("draw failed: {0}")]
    Draw(String),
}
