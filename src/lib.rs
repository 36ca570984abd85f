//! # tuple-vec
//!
//! A time-series container for strictly increasing keys, searched by
//! interpolation.
//!
//! Entries are kept in one contiguous `Vec`. Instead of bisecting, a lookup
//! maps the query key onto the real line, guesses its position from the
//! average key spacing, and walks linearly from the guess. The walk distance
//! is carried into the next lookup, so runs of nearby queries on time-ordered
//! data usually land on the answer directly.
//!
//! ## Example
//!
//! ```rust
//! use tuple_vec::TupleVec;
//!
//! let mut ts: TupleVec<u64, f64> = TupleVec::new();
//! for t in 0..1000u64 {
//!     ts.push(t * 60, t as f64).unwrap();
//! }
//!
//! assert_eq!(ts.get(&600), Some(&10.0));
//! assert_eq!(ts.get(&601), None);
//! assert_eq!(ts.lower_bound(&601), Some(&(660, 11.0)));
//! assert!(ts.push(0, 0.0).is_err());
//! ```
//!
//! Keys without a natural numeric value take a projector at construction:
//!
//! ```rust
//! use tuple_vec::TupleVec;
//!
//! // (day, minute) pairs
//! let mut ts = TupleVec::with_projector(|k: &(u32, u32)| k.0 as f64 * 1440.0 + k.1 as f64);
//! ts.push((1, 30), "a").unwrap();
//! ts.push((2, 0), "b").unwrap();
//! assert_eq!(ts.at(&(2, 0)), Ok(&"b"));
//! ```

#![deny(unsafe_code)]

mod error;
mod project;
mod range;
mod search;
mod shared;
mod stats;
mod tuple_vec;

pub use error::{Error, Result};
pub use project::{KeyProjector, Numeric, ToF64};
pub use shared::SharedTupleVec;
pub use stats::Stats;
pub use tuple_vec::TupleVec;

// =============================================================================
// Configuration
// =============================================================================

/// Construction options for [`TupleVec`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity reserved for entries up front.
    pub initial_capacity: usize,
    /// Reject mutations that would break the strictly increasing key order.
    ///
    /// When disabled, out-of-order input is stored as given and lookups on it
    /// return unspecified results.
    pub verify_ordering: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            verify_ordering: true,
        }
    }
}

#[cfg(test)]
mod proptests;
