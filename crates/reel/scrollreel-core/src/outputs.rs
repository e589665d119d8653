//! Output contracts from the core engine.
//!
//! A tick reports what happened to the surface, the loads the host should
//! start, and an overlay visibility edge if one occurred. Adapters dispatch
//! the loads and forward the edge to the page chrome.

use serde::{Deserialize, Serialize};

use crate::ids::FrameIndex;
use crate::prefetch::{LoadRequest, SchedulerStats};
use crate::store::StoreStats;

/// What the render step did with the surface this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOutcome {
    /// Section unchanged since the last tick; no surface calls.
    Unchanged,
    /// The frame for `section` was resident and drawn.
    Drew { section: FrameIndex },
    /// `section` is not resident yet; the last drawn frame was repainted.
    Fallback {
        section: FrameIndex,
        shown: FrameIndex,
    },
    /// Nothing has ever been drawn and `section` is not resident.
    Skipped { section: FrameIndex },
    /// The surface rejected the draw.
    Failed { section: FrameIndex },
    /// The engine has been torn down.
    Idle,
}

impl DrawOutcome {
    /// Whether the surface was written to.
    pub fn painted(&self) -> bool {
        matches!(self, DrawOutcome::Drew { .. } | DrawOutcome::Fallback { .. })
    }
}

/// Result of one [`Engine::tick`](crate::Engine::tick).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    /// Clamped section under the smoothed position, if the engine is live.
    pub section: Option<FrameIndex>,
    pub draw: DrawOutcome,
    #[serde(default)]
    pub loads: Vec<LoadRequest>,
    /// New overlay visibility, present only on the tick it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<bool>,
}

impl TickOutput {
    pub fn idle() -> Self {
        Self {
            section: None,
            draw: DrawOutcome::Idle,
            loads: Vec::new(),
            visibility: None,
        }
    }
}

/// How a reported load was absorbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Frame became resident; `evicted` names the frame it displaced.
    Stored { evicted: Option<FrameIndex> },
    /// Load failed or resolved incomplete; the index is no longer pending.
    Failed,
    /// The index was not pending (duplicate report or torn-down engine).
    Ignored,
}

/// Snapshot of engine counters for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub ticks: u64,
    pub section: Option<FrameIndex>,
    pub last_drawn: Option<FrameIndex>,
    pub overlay_visible: bool,
    pub current: f64,
    pub target: f64,
    pub store: StoreStats,
    pub scheduler: SchedulerStats,
}
