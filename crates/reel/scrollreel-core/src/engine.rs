//! Engine: owns the render state and runs one render step per display refresh.
//!
//! Methods:
//! - new, on_scroll, on_resize (host signals)
//! - tick (smooth → map to section → draw/fallback → prefetch → visibility)
//! - request, request_all, complete_load (prefetch plumbing)
//! - teardown

use crate::config::Config;
use crate::error::{ConfigError, LoadError, SurfaceError};
use crate::ids::FrameIndex;
use crate::outputs::{DrawOutcome, EngineStats, Settlement, TickOutput};
use crate::prefetch::{prefetch_window, LoadRequest, PrefetchScheduler};
use crate::scroll::ScrollState;
use crate::store::{Frame, FrameStore};
use crate::surface::{LogicalSize, Surface};
use crate::visibility::{overlay_visible, VisibilityLatch};

/// Scroll-scrubbing engine over host frame handles `F`.
///
/// All state lives here and is mutated from a single logical thread: the
/// host's scroll/resize handlers, its per-refresh `tick` call, and its load
/// completion callbacks. Completions may arrive in any order.
#[derive(Debug)]
pub struct Engine<F> {
    cfg: Config,
    scroll: ScrollState,
    store: FrameStore<F>,
    scheduler: PrefetchScheduler,
    latch: VisibilityLatch,
    ticks: u64,
    last_section: Option<FrameIndex>,
    last_drawn: Option<(FrameIndex, F)>,
    torn_down: bool,
}

impl<F: Frame> Engine<F> {
    /// Create a new engine with the given config.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            store: FrameStore::new(cfg.cache_capacity),
            scheduler: PrefetchScheduler::new(cfg.frame_count, cfg.parallel_loads, cfg.stagger_ms),
            scroll: ScrollState::new(),
            latch: VisibilityLatch::default(),
            ticks: 0,
            last_section: None,
            last_drawn: None,
            torn_down: false,
            cfg,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn store(&self) -> &FrameStore<F> {
        &self.store
    }

    pub fn scheduler(&self) -> &PrefetchScheduler {
        &self.scheduler
    }

    /// Document scroll offset changed.
    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.scroll.set_target(scroll_y);
    }

    /// Viewport height changed.
    pub fn on_resize(&mut self, viewport_height: f64) {
        self.scroll.set_viewport_height(viewport_height);
    }

    /// Forget the last drawn section so the next tick paints again.
    /// Hosts call this after anything that wipes the surface, such as a resize.
    pub fn invalidate(&mut self) {
        self.last_section = None;
    }

    /// Run one render step against `surface`.
    pub fn tick<S>(&mut self, surface: &mut S) -> TickOutput
    where
        S: Surface<F> + ?Sized,
    {
        if self.torn_down {
            return TickOutput::idle();
        }
        self.ticks += 1;

        // 1) Pull the smoothed position toward the target
        self.scroll.advance(self.cfg.damping);

        // 2) Map it to a frame
        let section = FrameIndex::clamped(self.scroll.raw_section(), self.cfg.frame_count);

        // 3) Paint only when the section moved
        let draw = if self.last_section == Some(section) {
            DrawOutcome::Unchanged
        } else {
            self.last_section = Some(section);
            let draw = self.paint(section, surface);
            if let DrawOutcome::Failed { .. } = draw {
                // The surface may already be cleared; retry on the next tick.
                self.last_section = None;
            }
            draw
        };

        // 4) Throttled prefetch around the current position
        let loads = if self.ticks % u64::from(self.cfg.preload_throttle) == 0 {
            self.request_window(self.scroll.raw_section())
        } else {
            Vec::new()
        };

        // 5) Throttled, edge-triggered overlay visibility
        let visibility = if self.ticks % u64::from(self.cfg.visibility_check_interval) == 0 {
            let visible = overlay_visible(
                self.scroll.target(),
                self.scroll.viewport_height(),
                self.cfg.visibility_threshold,
            );
            self.latch.update(visible)
        } else {
            None
        };

        TickOutput {
            section: Some(section),
            draw,
            loads,
            visibility,
        }
    }

    fn paint<S>(&mut self, section: FrameIndex, surface: &mut S) -> DrawOutcome
    where
        S: Surface<F> + ?Sized,
    {
        let size = surface.logical_size();

        let resident = self
            .store
            .get(section)
            .filter(|frame| frame.is_complete())
            .cloned();
        if let Some(frame) = resident {
            return match repaint(surface, &frame, size) {
                Ok(()) => {
                    self.last_drawn = Some((section, frame));
                    DrawOutcome::Drew { section }
                }
                Err(err) => {
                    log::warn!("render: frame {section}: {err}");
                    DrawOutcome::Failed { section }
                }
            };
        }

        match &self.last_drawn {
            Some((shown, frame)) => match repaint(surface, frame, size) {
                Ok(()) => DrawOutcome::Fallback {
                    section,
                    shown: *shown,
                },
                Err(err) => {
                    log::warn!("render: fallback frame {shown}: {err}");
                    DrawOutcome::Failed { section }
                }
            },
            None => DrawOutcome::Skipped { section },
        }
    }

    /// Request a batch of raw indices (out-of-range entries are dropped).
    pub fn request<I>(&mut self, indices: I) -> Vec<LoadRequest>
    where
        I: IntoIterator<Item = i64>,
    {
        if self.torn_down {
            return Vec::new();
        }
        self.scheduler.request(indices, &self.store)
    }

    /// Request the prefetch window around `section`.
    pub fn request_window(&mut self, section: i64) -> Vec<LoadRequest> {
        let window = prefetch_window(
            section,
            self.cfg.frame_count,
            self.cfg.preload_ahead,
            self.cfg.preload_behind,
        );
        self.request(window)
    }

    /// Request the whole sequence; hosts call this once when idle after startup.
    pub fn request_all(&mut self) -> Vec<LoadRequest> {
        let loads = self.request(0..i64::from(self.cfg.frame_count));
        log::info!("prefetch: full-range request issued {} loads", loads.len());
        loads
    }

    /// Report the outcome of a load previously returned by this engine.
    pub fn complete_load(
        &mut self,
        index: FrameIndex,
        result: Result<F, LoadError>,
    ) -> Settlement {
        self.scheduler.settle(index, result, &mut self.store)
    }

    pub fn frame_url(&self, index: FrameIndex) -> String {
        self.cfg.source.url(index)
    }

    /// Last published overlay visibility.
    pub fn overlay_visible(&self) -> bool {
        self.latch.published()
    }

    /// Clamped section under the smoothed position.
    pub fn section(&self) -> FrameIndex {
        FrameIndex::clamped(self.scroll.raw_section(), self.cfg.frame_count)
    }

    /// Scrollable height in pixels: one viewport per frame.
    pub fn scroll_extent(&self) -> f64 {
        f64::from(self.cfg.frame_count) * self.scroll.viewport_height()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            ticks: self.ticks,
            section: self.last_section,
            last_drawn: self.last_drawn.as_ref().map(|(index, _)| *index),
            overlay_visible: self.latch.published(),
            current: self.scroll.current(),
            target: self.scroll.target(),
            store: self.store.stats(),
            scheduler: self.scheduler.stats(),
        }
    }

    /// Drop all frames and pending loads. Later ticks do nothing and later
    /// load completions are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        log::info!(
            "engine: teardown after {} ticks ({} resident, {} pending)",
            self.ticks,
            self.store.len(),
            self.scheduler.pending_len()
        );
        self.store.clear();
        self.scheduler.clear();
        self.last_drawn = None;
        self.last_section = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

fn repaint<F, S>(surface: &mut S, frame: &F, size: LogicalSize) -> Result<(), SurfaceError>
where
    S: Surface<F> + ?Sized,
{
    surface.clear()?;
    surface.draw_frame(frame, size)
}
