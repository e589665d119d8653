//! ScrollReel Core (host-agnostic)
//!
//! Scroll-scrubbed image sequence engine: a bounded frame store, a prefetch
//! scheduler that batches and staggers loads, a scroll tracker with
//! exponential smoothing, and a per-tick render step that draws the frame for
//! the current scroll section (falling back to the last drawn frame while the
//! real one is still loading).
//!
//! The core performs no I/O. Hosts (see `scrollreel-wasm`) feed it scroll and
//! resize signals, call [`Engine::tick`] once per display refresh with a
//! [`Surface`], dispatch the [`LoadRequest`]s it returns, and report each load
//! back through [`Engine::complete_load`].

pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod outputs;
pub mod prefetch;
pub mod scroll;
pub mod source;
pub mod store;
pub mod surface;
pub mod visibility;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use engine::Engine;
pub use error::{ConfigError, LoadError, SurfaceError};
pub use ids::FrameIndex;
pub use outputs::{DrawOutcome, EngineStats, Settlement, TickOutput};
pub use prefetch::{prefetch_window, LoadRequest, PrefetchScheduler, SchedulerStats};
pub use scroll::ScrollState;
pub use source::FrameSource;
pub use store::{Frame, FrameStore, StoreStats};
pub use surface::{BackingStore, LogicalSize, Surface};
pub use visibility::{overlay_visible, VisibilityLatch};
