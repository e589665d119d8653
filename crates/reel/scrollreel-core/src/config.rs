//! Core configuration for scrollreel-core.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::source::FrameSource;

/// Tuning for the frame store, prefetch scheduler, smoothing and overlay policy.
///
/// Built once and handed to [`Engine::new`](crate::Engine::new); the engine
/// never mutates it. Missing JSON fields fall back to [`Config::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Total number of frames in the sequence.
    pub frame_count: u32,
    /// Maximum number of resident frames in the store.
    pub cache_capacity: usize,
    /// Frames requested ahead of the current section (current included).
    pub preload_ahead: u32,
    /// Frames requested behind the current section.
    pub preload_behind: u32,
    /// Loads per staggered group within one request batch.
    pub parallel_loads: usize,
    /// Delay added per group, in milliseconds.
    pub stagger_ms: u32,
    /// Exponential smoothing factor applied each tick.
    pub damping: f64,
    /// Run the prefetch selection every N ticks.
    pub preload_throttle: u32,
    /// Recompute overlay visibility every N ticks.
    pub visibility_check_interval: u32,
    /// Overlay stays visible within this many viewport heights of the top.
    pub visibility_threshold: f64,
    /// Startup full-range prefetch delay when the host has no idle signal.
    pub idle_fallback_ms: u32,
    /// Where frames are fetched from.
    pub source: FrameSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_count: 281,
            cache_capacity: 120,
            preload_ahead: 90,
            preload_behind: 20,
            parallel_loads: 40,
            stagger_ms: 2,
            damping: 0.15,
            preload_throttle: 5,
            visibility_check_interval: 10,
            visibility_threshold: 10.0,
            idle_fallback_ms: 500,
            source: FrameSource::default(),
        }
    }
}

impl Config {
    /// Parse a JSON object (partial objects allowed) and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Config =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_count == 0 {
            return Err(ConfigError::EmptySequence);
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.parallel_loads == 0 {
            return Err(ConfigError::ZeroParallelLoads);
        }
        if self.preload_throttle == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "preload_throttle",
            });
        }
        if self.visibility_check_interval == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "visibility_check_interval",
            });
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Damping(self.damping));
        }
        if !self.visibility_threshold.is_finite() || self.visibility_threshold < 0.0 {
            return Err(ConfigError::VisibilityThreshold(self.visibility_threshold));
        }
        self.source.validate()
    }
}
