//! Lookup diagnostics.

/// Counters describing how well interpolation matches the data.
///
/// Every lookup on a non-empty container counts as either a hit (the
/// interpolated guess was the answer) or a resync (the corrector walked), so
/// `hits + resync` is the number of such lookups since the last reset. Only
/// exact-key lookups can hit; a successor search always counts a resync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Lookups answered by the first interpolated guess.
    pub hits: u64,
    /// Guesses that fell outside the container and were clamped to a boundary.
    pub out_of_bounds: u64,
    /// Lookups that needed a linear walk from the guess.
    pub resync: u64,
    /// Range model recomputations.
    pub recompute: u64,
}

impl Stats {
    /// Lookups counted since the last reset.
    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hits + self.resync
    }

    /// Fraction of lookups answered without probing; `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}
