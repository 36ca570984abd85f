//! Thread-safe wrapper around [`TupleVec`].

use parking_lot::Mutex;

use crate::error::Result;
use crate::project::{KeyProjector, Numeric};
use crate::stats::Stats;
use crate::tuple_vec::TupleVec;

/// A [`TupleVec`] behind one exclusive lock.
///
/// Lookups update the container's bookkeeping, so readers need exclusive
/// access too; a read/write lock would not help. Values and keys are returned
/// by clone so that no reference outlives the lock.
pub struct SharedTupleVec<K, V, P = Numeric> {
    inner: Mutex<TupleVec<K, V, P>>,
}

impl<K, V> SharedTupleVec<K, V> {
    pub fn new() -> Self {
        Self::from(TupleVec::new())
    }
}

impl<K, V> Default for SharedTupleVec<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P> From<TupleVec<K, V, P>> for SharedTupleVec<K, V, P> {
    fn from(tv: TupleVec<K, V, P>) -> Self {
        Self {
            inner: Mutex::new(tv),
        }
    }
}

impl<K, V, P> SharedTupleVec<K, V, P> {
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn stats(&self) -> Stats {
        self.inner.lock().stats()
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut TupleVec<K, V, P>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn into_inner(self) -> TupleVec<K, V, P> {
        self.inner.into_inner()
    }
}

impl<K, V, P> SharedTupleVec<K, V, P>
where
    K: PartialOrd,
    P: KeyProjector<K>,
{
    pub fn push(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().push(key, value)
    }

    pub fn extend_sorted<I>(&self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.inner.lock().extend_sorted(iter)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().contains_key(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }
}

impl<K, V, P> SharedTupleVec<K, V, P>
where
    K: PartialOrd + Clone,
    V: Clone,
    P: KeyProjector<K>,
{
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// The first entry whose key is not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Option<(K, V)> {
        self.inner.lock().lower_bound(key).cloned()
    }
}
