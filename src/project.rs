//! Key projection: mapping keys onto the real line for interpolation.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Maps a key to a real number.
///
/// The mapping must be monotonic in key order: `a < b` implies
/// `project(a) < project(b)`. The closer it is to linear in the storage
/// position of keys, the shorter the walk a lookup needs.
///
/// Any closure `Fn(&K) -> f64` is a projector.
pub trait KeyProjector<K> {
    /// Project `key` onto the real line.
    fn project(&self, key: &K) -> f64;
}

impl<K, F> KeyProjector<K> for F
where
    F: Fn(&K) -> f64,
{
    #[inline]
    fn project(&self, key: &K) -> f64 {
        self(key)
    }
}

/// Lossy conversion of a key into `f64`.
pub trait ToF64 {
    /// Convert to `f64`, rounding where the type is wider than the mantissa.
    fn to_f64(&self) -> f64;
}

macro_rules! impl_to_f64 {
    ($($t:ty),*) => {
        $(
            impl ToF64 for $t {
                #[inline]
                fn to_f64(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_to_f64!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl ToF64 for Duration {
    #[inline]
    fn to_f64(&self) -> f64 {
        self.as_secs_f64()
    }
}

/// Signed seconds relative to the Unix epoch.
impl ToF64 for SystemTime {
    fn to_f64(&self) -> f64 {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        }
    }
}

/// Default projector for keys with a natural numeric value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Numeric;

impl<K: ToF64> KeyProjector<K> for Numeric {
    #[inline]
    fn project(&self, key: &K) -> f64 {
        key.to_f64()
    }
}
