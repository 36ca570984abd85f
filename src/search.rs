//! Interpolation search with adaptive local correction.
//!
//! A lookup runs in three steps:
//!
//! 1. The [`RangeModel`] is refreshed if a mutation has invalidated it.
//! 2. The estimator turns the projected query key into a candidate index,
//!    shifted by the offset carried over from previous lookups.
//! 3. The corrector walks linearly from the candidate to the answer and folds
//!    the distance it walked back into the carried offset.
//!
//! Consecutive queries on time-ordered data tend to need similar corrections,
//! so the carried offset usually lands the next guess on or near its target.

use log::trace;

use crate::project::KeyProjector;
use crate::range::RangeModel;
use crate::stats::Stats;

/// Drift estimate carried between lookups within one clean epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Adaptive {
    pub(crate) offset: i64,
    pub(crate) avg_diff: f64,
}

impl Adaptive {
    /// Fold a correction of `final_pos - candidate` into the drift estimate.
    ///
    /// `resync` is the number of corrections counted before this one and
    /// weights the running average.
    fn correct(&mut self, candidate: usize, final_pos: usize, resync: u64) {
        let diff = final_pos as i64 - candidate as i64;
        let weight = resync as f64;
        self.avg_diff = (self.avg_diff * weight + diff as f64) / (weight + 1.0);
        self.offset = self
            .offset
            .saturating_add(diff)
            .saturating_add(self.avg_diff.round() as i64);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    index: usize,
    /// The raw guess fell outside `0..count` and was clamped to a boundary.
    clamped: bool,
}

/// Turn a projected query key into a candidate index.
fn estimate(range: &RangeModel, projected: f64, offset: i64) -> Candidate {
    debug_assert!(!range.is_empty());

    let Some(element_range) = range.element_range else {
        return Candidate {
            index: range.front,
            clamped: false,
        };
    };

    let guess = ((projected - range.origin) / element_range).floor();
    if !guess.is_finite() {
        let index = if guess == f64::INFINITY {
            range.back
        } else {
            range.front
        };
        return Candidate {
            index,
            clamped: true,
        };
    }

    // `as` saturates, so extreme guesses stay ordered.
    let idx = (guess as i64).saturating_add(offset);
    if idx < 0 {
        Candidate {
            index: range.front,
            clamped: true,
        }
    } else if (idx as u64) < range.count as u64 {
        Candidate {
            index: idx as usize,
            clamped: false,
        }
    } else {
        // Only a guess strictly past the count goes to the back; `idx == n`
        // restarts from the front.
        let index = if idx as u64 > range.count as u64 {
            range.back
        } else {
            range.front
        };
        Candidate {
            index,
            clamped: true,
        }
    }
}

/// Walk from `start` toward `key` without leaving `front..=back`.
///
/// Stops on the first entry not greater than `key` when walking down, and on
/// the first entry not less than `key` when walking up.
fn walk<K: PartialOrd, V>(entries: &[(K, V)], range: &RangeModel, key: &K, start: usize) -> usize {
    let mut pos = start;
    if entries[pos].0 > *key {
        while pos > range.front && entries[pos].0 > *key {
            pos -= 1;
        }
    } else {
        while pos < range.back && entries[pos].0 < *key {
            pos += 1;
        }
    }
    pos
}

/// Bookkeeping for one container: dirty flag, range model, drift and counters.
///
/// Lookups update this state even though they leave the entries untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SearchState {
    dirty: bool,
    range: RangeModel,
    adaptive: Adaptive,
    stats: Stats,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub(crate) fn new() -> Self {
        Self {
            dirty: true,
            range: RangeModel::default(),
            adaptive: Adaptive::default(),
            stats: Stats::default(),
        }
    }

    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear counters and drift, and force a recompute on the next lookup.
    pub(crate) fn reset(&mut self) {
        self.stats = Stats::default();
        self.adaptive = Adaptive::default();
        self.dirty = true;
    }

    #[inline]
    pub(crate) fn stats(&self) -> Stats {
        self.stats
    }

    #[inline]
    pub(crate) fn avg_diff(&self) -> f64 {
        self.adaptive.avg_diff
    }

    #[cfg(test)]
    pub(crate) fn range(&self) -> &RangeModel {
        &self.range
    }

    #[cfg(test)]
    pub(crate) fn adaptive(&self) -> &Adaptive {
        &self.adaptive
    }

    fn refresh<K, V, P>(&mut self, entries: &[(K, V)], projector: &P)
    where
        P: KeyProjector<K>,
    {
        if !self.dirty {
            debug_assert_eq!(self.range.count, entries.len());
            return;
        }
        self.range = RangeModel::compute(entries, projector);
        self.adaptive = Adaptive::default();
        self.dirty = false;
        self.stats.recompute += 1;
        trace!(
            "range recomputed: count={} total_range={} element_range={:?}",
            self.range.count,
            self.range.total_range,
            self.range.element_range
        );
    }

    /// Shared estimate-and-walk step; `None` only for an empty container.
    ///
    /// Only exact lookups return early on a matching candidate; successor
    /// lookups always walk and count a resync.
    fn seek<K, V, P>(
        &mut self,
        entries: &[(K, V)],
        projector: &P,
        key: &K,
        successor: bool,
    ) -> Option<usize>
    where
        K: PartialOrd,
        P: KeyProjector<K>,
    {
        self.refresh(entries, projector);
        if self.range.is_empty() {
            return None;
        }

        let candidate = estimate(&self.range, projector.project(key), self.adaptive.offset);
        if candidate.clamped {
            trace!(
                "interpolation out of bounds, clamped to index {}",
                candidate.index
            );
            self.adaptive.offset = 0;
            self.stats.out_of_bounds += 1;
        }

        let start = candidate.index;
        if !successor && entries[start].0 == *key {
            self.stats.hits += 1;
            return Some(start);
        }

        let mut pos = walk(entries, &self.range, key, start);
        if successor && entries[pos].0 < *key && pos < self.range.back {
            pos += 1;
        }

        self.adaptive.correct(start, pos, self.stats.resync);
        self.stats.resync += 1;
        Some(pos)
    }

    /// Index of the entry whose key equals `key`.
    pub(crate) fn find<K, V, P>(&mut self, entries: &[(K, V)], projector: &P, key: &K) -> Option<usize>
    where
        K: PartialOrd,
        P: KeyProjector<K>,
    {
        let pos = self.seek(entries, projector, key, false)?;
        (entries[pos].0 == *key).then_some(pos)
    }

    /// Index of the first entry whose key is not less than `key`, or
    /// `entries.len()` if there is none.
    pub(crate) fn lower_bound<K, V, P>(&mut self, entries: &[(K, V)], projector: &P, key: &K) -> usize
    where
        K: PartialOrd,
        P: KeyProjector<K>,
    {
        match self.seek(entries, projector, key, true) {
            Some(pos) if entries[pos].0 >= *key => pos,
            _ => entries.len(),
        }
    }
}
