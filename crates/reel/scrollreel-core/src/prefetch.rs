//! Prefetch scheduler and window selection.
//!
//! `request` turns a batch of raw indices into staggered [`LoadRequest`]s and
//! tracks them in the pending set until the host reports the outcome through
//! `settle`. An index is never both pending and resident: it is skipped while
//! resident, and leaves the pending set before it enters the store.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::ids::FrameIndex;
use crate::outputs::Settlement;
use crate::store::{Frame, FrameStore};

/// One load the host should start after `delay_ms` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub index: FrameIndex,
    pub delay_ms: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub pending: usize,
    pub dispatched: u64,
    pub loaded: u64,
    pub failed: u64,
    pub ignored: u64,
}

#[derive(Debug)]
pub struct PrefetchScheduler {
    frame_count: u32,
    parallel_loads: usize,
    stagger_ms: u32,
    pending: HashSet<FrameIndex>,
    dispatched: u64,
    loaded: u64,
    failed: u64,
    ignored: u64,
}

impl PrefetchScheduler {
    pub fn new(frame_count: u32, parallel_loads: usize, stagger_ms: u32) -> Self {
        Self {
            frame_count,
            parallel_loads: parallel_loads.max(1),
            stagger_ms,
            pending: HashSet::new(),
            dispatched: 0,
            loaded: 0,
            failed: 0,
            ignored: 0,
        }
    }

    /// Mark every new, in-range, non-resident index pending and return the loads to issue.
    ///
    /// The batch is deduplicated and sorted ascending first. Loads are grouped
    /// `parallel_loads` at a time by their position in that sorted batch, each
    /// group waiting `stagger_ms` longer than the one before it.
    pub fn request<F, I>(&mut self, indices: I, store: &FrameStore<F>) -> Vec<LoadRequest>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut batch: Vec<i64> = indices.into_iter().collect();
        batch.sort_unstable();
        batch.dedup();

        let mut loads = Vec::new();
        for (position, raw) in batch.into_iter().enumerate() {
            let Some(index) = FrameIndex::checked(raw, self.frame_count) else {
                log::trace!("prefetch: index {raw} outside [0, {})", self.frame_count);
                continue;
            };
            if store.has(index) || self.pending.contains(&index) {
                continue;
            }
            self.pending.insert(index);
            let group = u32::try_from(position / self.parallel_loads).unwrap_or(u32::MAX);
            loads.push(LoadRequest {
                index,
                delay_ms: group.saturating_mul(self.stagger_ms),
            });
        }
        self.dispatched += loads.len() as u64;
        loads
    }

    /// Record the outcome of a load issued by `request`.
    ///
    /// Successful, complete frames move from the pending set into the store.
    /// Failures only leave the pending set; nothing is retried. Outcomes for
    /// indices that are not pending (for example after `clear`) are ignored.
    pub fn settle<F: Frame>(
        &mut self,
        index: FrameIndex,
        result: Result<F, LoadError>,
        store: &mut FrameStore<F>,
    ) -> Settlement {
        if !self.pending.remove(&index) {
            self.ignored += 1;
            log::debug!("prefetch: ignoring settlement for frame {index} (not pending)");
            return Settlement::Ignored;
        }

        let result = result.and_then(|frame| {
            if frame.is_complete() {
                Ok(frame)
            } else {
                Err(LoadError::Incomplete { index })
            }
        });

        match result {
            Ok(frame) => {
                self.loaded += 1;
                let evicted = store.insert(index, frame);
                if let Some(old) = evicted {
                    log::debug!("prefetch: frame {index} stored, evicted {old}");
                }
                Settlement::Stored { evicted }
            }
            Err(err) => {
                self.failed += 1;
                log::debug!("prefetch: {err}");
                Settlement::Failed
            }
        }
    }

    #[inline]
    pub fn is_pending(&self, index: FrameIndex) -> bool {
        self.pending.contains(&index)
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Forget every in-flight index; their later settlements are ignored.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            pending: self.pending.len(),
            dispatched: self.dispatched,
            loaded: self.loaded,
            failed: self.failed,
            ignored: self.ignored,
        }
    }
}

/// Raw indices around `section`: `ahead` frames forward starting at `section`,
/// then `behind` frames backward starting at `section - 1`, each clamped into
/// `[0, frame_count - 1]`. Clamping produces duplicates near the ends; the
/// scheduler removes them.
pub fn prefetch_window(section: i64, frame_count: u32, ahead: u32, behind: u32) -> Vec<i64> {
    let last = i64::from(frame_count.saturating_sub(1));
    let forward = (0..i64::from(ahead)).map(|i| (section + i).clamp(0, last));
    let backward = (1..=i64::from(behind)).map(|i| (section - i).clamp(0, last));
    forward.chain(backward).collect()
}
