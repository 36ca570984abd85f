//! The interpolation-searched container.

use std::cell::Cell;
use std::ops::{Index, RangeBounds};

use log::debug;

use crate::error::{Error, Result};
use crate::project::{KeyProjector, Numeric};
use crate::search::SearchState;
use crate::stats::Stats;
use crate::Config;

/// A sorted sequence of `(key, value)` entries with strictly increasing keys,
/// searched by interpolation instead of bisection.
///
/// Entries live in one contiguous `Vec`. Lookups project the query key onto
/// the real line with `P`, guess its position from the average key spacing,
/// and walk linearly from the guess to the answer. The walk distance is
/// remembered and used to shift the next guess.
///
/// # Interior mutability
///
/// Lookups take `&self` but update cached bookkeeping (range model, drift
/// estimate, [`Stats`]) through a [`Cell`]. The container is therefore never
/// `Sync`; share it across threads through [`SharedTupleVec`] or another
/// exclusive lock.
///
/// [`SharedTupleVec`]: crate::SharedTupleVec
///
/// # Ordering
///
/// Every mutation that places an entry checks that keys stay strictly
/// increasing, both by `PartialOrd` and by projection, and fails with
/// [`Error::InvalidOrdering`] otherwise. With [`Config::verify_ordering`]
/// turned off the check is skipped; lookups on out-of-order data then return
/// unspecified results but never panic.
#[derive(Clone)]
pub struct TupleVec<K, V, P = Numeric> {
    entries: Vec<(K, V)>,
    projector: P,
    verify_ordering: bool,
    state: Cell<SearchState>,
}

impl<K, V> TupleVec<K, V> {
    /// Create an empty container using the [`Numeric`] projector.
    pub fn new() -> Self {
        Self::with_config(Numeric, Config::default())
    }

    /// Create an empty container with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(
            Numeric,
            Config {
                initial_capacity: capacity,
                ..Config::default()
            },
        )
    }
}

impl<K, V> TupleVec<K, V>
where
    K: PartialOrd,
    Numeric: KeyProjector<K>,
{
    /// Take ownership of pre-sorted entries.
    pub fn from_sorted(entries: Vec<(K, V)>) -> Result<Self> {
        Self::from_sorted_with(Numeric, entries)
    }
}

impl<K, V, P> TupleVec<K, V, P> {
    /// Create an empty container using `projector`.
    pub fn with_projector(projector: P) -> Self {
        Self::with_config(projector, Config::default())
    }

    /// Create an empty container using `projector` and `config`.
    pub fn with_config(projector: P, config: Config) -> Self {
        Self {
            entries: Vec::with_capacity(config.initial_capacity),
            projector,
            verify_ordering: config.verify_ordering,
            state: Cell::new(SearchState::new()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }

    /// The projector supplied at construction.
    pub fn projector(&self) -> &P {
        &self.projector
    }

    pub fn first(&self) -> Option<&(K, V)> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&(K, V)> {
        self.entries.last()
    }

    pub fn as_slice(&self) -> &[(K, V)] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Values in key order. Keys stay immutable, so this keeps the range
    /// model valid.
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator + '_ {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn into_vec(self) -> Vec<(K, V)> {
        self.entries
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Snapshot of the lookup counters.
    pub fn stats(&self) -> Stats {
        self.state.get().stats()
    }

    pub fn hits(&self) -> u64 {
        self.stats().hits
    }

    pub fn out_of_bounds(&self) -> u64 {
        self.stats().out_of_bounds
    }

    pub fn resync(&self) -> u64 {
        self.stats().resync
    }

    pub fn recompute(&self) -> u64 {
        self.stats().recompute
    }

    /// Running average of correction distances in the current epoch.
    pub fn avg_diff(&self) -> f64 {
        self.state.get().avg_diff()
    }

    /// Clear the counters and drift estimate and force the range model to be
    /// recomputed on the next lookup. Content is untouched.
    pub fn reset(&self) {
        let mut state = self.state.get();
        debug!("resetting lookup state, discarding {:?}", state.stats());
        state.reset();
        self.state.set(state);
    }

    // =========================================================================
    // Unchecked mutations
    // =========================================================================

    #[inline]
    fn invalidate(&mut self) {
        self.state.get_mut().invalidate();
    }

    /// Remove the entry at `index`, or return `None` if it is past the end.
    pub fn remove_at(&mut self, index: usize) -> Option<(K, V)> {
        self.invalidate();
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Remove and yield the entries in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds, like [`Vec::drain`].
    pub fn drain<R>(&mut self, range: R) -> std::vec::Drain<'_, (K, V)>
    where
        R: RangeBounds<usize>,
    {
        self.invalidate();
        self.entries.drain(range)
    }

    pub fn pop(&mut self) -> Option<(K, V)> {
        self.invalidate();
        self.entries.pop()
    }

    pub fn truncate(&mut self, len: usize) {
        self.invalidate();
        self.entries.truncate(len);
    }

    pub fn clear(&mut self) {
        self.invalidate();
        self.entries.clear();
    }

    /// Keep only the entries for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.invalidate();
        self.entries.retain_mut(|entry| f(&entry.0, &mut entry.1));
    }

    /// Exchange contents with `other`. Each container keeps its own projector.
    pub fn swap(&mut self, other: &mut Self) {
        self.invalidate();
        other.invalidate();
        std::mem::swap(&mut self.entries, &mut other.entries);
    }
}

impl<K, V, P> TupleVec<K, V, P>
where
    K: PartialOrd,
    P: KeyProjector<K>,
{
    /// Take ownership of pre-sorted entries, projecting keys with `projector`.
    pub fn from_sorted_with(projector: P, entries: Vec<(K, V)>) -> Result<Self> {
        let mut tv = Self::with_projector(projector);
        tv.check_sorted(&entries)?;
        tv.entries = entries;
        Ok(tv)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    #[inline]
    fn with_state<R>(&self, f: impl FnOnce(&mut SearchState, &[(K, V)], &P) -> R) -> R {
        let mut state = self.state.get();
        let out = f(&mut state, &self.entries, &self.projector);
        self.state.set(state);
        out
    }

    /// Position of the entry whose key equals `key`.
    pub fn find_index(&self, key: &K) -> Option<usize> {
        self.with_state(|state, entries, projector| state.find(entries, projector, key))
    }

    /// The entry whose key equals `key`.
    pub fn find(&self, key: &K) -> Option<&(K, V)> {
        self.find_index(key).map(|i| &self.entries[i])
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find_index(key)?;
        Some(&mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Like [`get`](Self::get), but absence is an [`Error::NotFound`].
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::NotFound)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    /// Position of the first entry whose key is not less than `key`, or
    /// `len()` if every key is less.
    pub fn lower_bound_index(&self, key: &K) -> usize {
        self.with_state(|state, entries, projector| state.lower_bound(entries, projector, key))
    }

    /// The first entry whose key is not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Option<&(K, V)> {
        self.entries.get(self.lower_bound_index(key))
    }

    /// Entries with `start <= key < end`.
    pub fn range(&self, start: &K, end: &K) -> &[(K, V)] {
        if !(start < end) {
            return &[];
        }
        let lo = self.lower_bound_index(start);
        let hi = self.lower_bound_index(end);
        &self.entries[lo..hi.max(lo)]
    }

    // =========================================================================
    // Checked mutations
    // =========================================================================

    #[inline]
    fn precedes(&self, a: &K, b: &K) -> bool {
        a < b && self.projector.project(a) < self.projector.project(b)
    }

    /// Check that `key` fits between the entries around position `index`.
    fn check_slot(&self, index: usize, key: &K) -> Result<()> {
        if !self.verify_ordering {
            return Ok(());
        }
        let after_prev = index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map_or(true, |prev| self.precedes(&prev.0, key));
        let before_next = self
            .entries
            .get(index)
            .map_or(true, |next| self.precedes(key, &next.0));
        if after_prev && before_next {
            Ok(())
        } else {
            debug!("rejected out-of-order key at index {}", index);
            Err(Error::InvalidOrdering { index })
        }
    }

    fn check_sorted(&self, entries: &[(K, V)]) -> Result<()> {
        if !self.verify_ordering {
            return Ok(());
        }
        match entries
            .windows(2)
            .position(|w| !self.precedes(&w[0].0, &w[1].0))
        {
            None => Ok(()),
            Some(i) => {
                debug!("rejected out-of-order key at index {}", i + 1);
                Err(Error::InvalidOrdering { index: i + 1 })
            }
        }
    }

    /// Append an entry whose key is greater than every stored key.
    pub fn push(&mut self, key: K, value: V) -> Result<()> {
        self.invalidate();
        self.check_slot(self.entries.len(), &key)?;
        self.entries.push((key, value));
        Ok(())
    }

    /// Append entries in order. On failure the entries accepted before the
    /// offending one are kept.
    pub fn extend_sorted<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (key, value) in iter {
            self.push(key, value)?;
        }
        Ok(())
    }

    /// Insert an entry at `index`, shifting later entries up.
    pub fn insert(&mut self, index: usize, key: K, value: V) -> Result<()> {
        self.invalidate();
        let len = self.entries.len();
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        self.check_slot(index, &key)?;
        self.entries.insert(index, (key, value));
        Ok(())
    }

    /// Remove the entry with key `key` and return its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let found = self.find_index(key);
        self.invalidate();
        found.map(|i| self.entries.remove(i).1)
    }

    /// Replace the whole content. On failure the container is unchanged.
    pub fn assign<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.invalidate();
        let entries: Vec<(K, V)> = iter.into_iter().collect();
        self.check_sorted(&entries)?;
        self.entries = entries;
        Ok(())
    }

    /// Shrink to `new_len`, or grow by appending entries produced by `f`.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<()>
    where
        F: FnMut() -> (K, V),
    {
        self.invalidate();
        let len = self.entries.len();
        if new_len <= len {
            self.entries.truncate(new_len);
            return Ok(());
        }
        self.entries.reserve(new_len - len);
        while self.entries.len() < new_len {
            let (key, value) = f();
            self.push(key, value)?;
        }
        Ok(())
    }
}

impl<K, V> Default for TupleVec<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, P> std::fmt::Debug for TupleVec<K, V, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: PartialEq, V: PartialEq, P> PartialEq for TupleVec<K, V, P> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Exact-key indexing.
///
/// # Panics
///
/// Panics if no entry has key `key`. Use [`TupleVec::at`] for a fallible
/// lookup.
impl<K, V, P> Index<&K> for TupleVec<K, V, P>
where
    K: PartialOrd,
    P: KeyProjector<K>,
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K, V, P> TryFrom<Vec<(K, V)>> for TupleVec<K, V, P>
where
    K: PartialOrd,
    P: KeyProjector<K> + Default,
{
    type Error = Error;

    fn try_from(entries: Vec<(K, V)>) -> Result<Self> {
        Self::from_sorted_with(P::default(), entries)
    }
}

impl<K, V, P> IntoIterator for TupleVec<K, V, P> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V, P> IntoIterator for &'a TupleVec<K, V, P> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
