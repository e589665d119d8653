#![allow(dead_code)]
//! Test doubles shared by the scrollreel-core integration tests.

use scrollreel_core::{
    Config, Engine, Frame, FrameIndex, LoadRequest, LogicalSize, Settlement, Surface,
    SurfaceError,
};

/// Frame handle carrying the index it was loaded for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StubFrame {
    pub id: u32,
    pub complete: bool,
}

impl Frame for StubFrame {
    fn is_complete(&self) -> bool {
        self.complete
    }
}

pub fn stub(id: u32) -> StubFrame {
    StubFrame { id, complete: true }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Clear,
    Draw { id: u32, size: LogicalSize },
}

/// Surface that records every call instead of painting.
#[derive(Debug)]
pub struct RecordingSurface {
    pub size: LogicalSize,
    pub calls: Vec<SurfaceCall>,
    pub fail_draws: bool,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: LogicalSize { width, height },
            calls: Vec::new(),
            fail_draws: false,
        }
    }

    pub fn draws(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Draw { id, .. } => Some(*id),
                SurfaceCall::Clear => None,
            })
            .collect()
    }
}

impl Surface<StubFrame> for RecordingSurface {
    fn logical_size(&self) -> LogicalSize {
        self.size
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::Clear);
        Ok(())
    }

    fn draw_frame(&mut self, frame: &StubFrame, size: LogicalSize) -> Result<(), SurfaceError> {
        if self.fail_draws {
            return Err(SurfaceError::Draw("context lost".into()));
        }
        self.calls.push(SurfaceCall::Draw { id: frame.id, size });
        Ok(())
    }
}

/// Small sequence whose every check runs each tick.
pub fn compact_config() -> Config {
    Config {
        frame_count: 12,
        cache_capacity: 4,
        preload_ahead: 3,
        preload_behind: 1,
        parallel_loads: 2,
        stagger_ms: 5,
        damping: 0.5,
        preload_throttle: 1,
        visibility_check_interval: 1,
        visibility_threshold: 2.0,
        ..Config::default()
    }
}

/// Resolve every request successfully, in the order given.
pub fn resolve_all(engine: &mut Engine<StubFrame>, loads: &[LoadRequest]) -> Vec<Settlement> {
    loads
        .iter()
        .map(|load| engine.complete_load(load.index, Ok(stub(load.index.get()))))
        .collect()
}

/// Make `indices` resident through the normal request/settle path.
pub fn make_resident(engine: &mut Engine<StubFrame>, indices: &[u32]) {
    let loads = engine.request(indices.iter().map(|&i| i64::from(i)));
    resolve_all(engine, &loads);
    for &i in indices {
        assert!(engine.store().has(FrameIndex(i)), "frame {i} should be resident");
    }
}

pub fn indices(loads: &[LoadRequest]) -> Vec<u32> {
    loads.iter().map(|l| l.index.get()).collect()
}
