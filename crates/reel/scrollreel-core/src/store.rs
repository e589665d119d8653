//! Frame store: bounded, insertion-ordered cache of loaded frames.
//!
//! Eviction is by insertion order only. Reading a frame does not refresh it,
//! so a frame shown over and over is still the first to go once it is the
//! oldest insertion. An evicted index can be requested again later.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::FrameIndex;

/// A decoded, render-ready frame handle supplied by the host.
///
/// Handles are cloned when the engine keeps the last drawn frame, so they
/// should be cheap to clone (a reference-counted or JS object handle).
pub trait Frame: Clone {
    /// Whether the platform reports the image as fully decoded.
    fn is_complete(&self) -> bool;
}

/// Counters describing store usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub resident: usize,
    pub capacity: usize,
    pub inserted: u64,
    pub evicted: u64,
}

#[derive(Debug)]
pub struct FrameStore<F> {
    frames: IndexMap<FrameIndex, F>,
    capacity: usize,
    inserted: u64,
    evicted: u64,
}

impl<F> FrameStore<F> {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: IndexMap::new(),
            capacity,
            inserted: 0,
            evicted: 0,
        }
    }

    #[inline]
    pub fn get(&self, index: FrameIndex) -> Option<&F> {
        self.frames.get(&index)
    }

    #[inline]
    pub fn has(&self, index: FrameIndex) -> bool {
        self.frames.contains_key(&index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `frame` unless `index` is already resident.
    ///
    /// Returns the evicted index when the insertion pushed the store over
    /// capacity. The victim is the oldest insertion other than `index`.
    pub fn insert(&mut self, index: FrameIndex, frame: F) -> Option<FrameIndex> {
        if self.frames.contains_key(&index) {
            return None;
        }
        self.frames.insert(index, frame);
        self.inserted += 1;

        if self.frames.len() <= self.capacity {
            return None;
        }
        let victim = self.frames.keys().position(|&k| k != index)?;
        let (evicted, _) = self.frames.shift_remove_index(victim)?;
        self.evicted += 1;
        Some(evicted)
    }

    /// Resident indices, oldest insertion first.
    pub fn indices(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.frames.keys().copied()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            resident: self.frames.len(),
            capacity: self.capacity,
            inserted: self.inserted,
            evicted: self.evicted,
        }
    }
}
