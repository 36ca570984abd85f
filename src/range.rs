//! Range model: the cached linear summary of the backing sequence.

use crate::project::KeyProjector;

/// Summary of the backing sequence used to scale interpolation guesses.
///
/// Bounds are stored as indices so that reallocation of the backing `Vec`
/// never leaves the model pointing at stale storage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RangeModel {
    pub(crate) count: usize,
    /// `project(back) - project(front)`; zero for fewer than two entries.
    pub(crate) total_range: f64,
    /// Average projected distance between neighbours. `None` when `count <= 1`.
    pub(crate) element_range: Option<f64>,
    /// Projected key of the front entry.
    pub(crate) origin: f64,
    pub(crate) front: usize,
    pub(crate) back: usize,
}

impl RangeModel {
    pub(crate) fn compute<K, V, P>(entries: &[(K, V)], projector: &P) -> Self
    where
        P: KeyProjector<K>,
    {
        let count = entries.len();
        match (entries.first(), entries.last()) {
            (Some(front), Some(back)) if count > 1 => {
                let origin = projector.project(&front.0);
                let total_range = projector.project(&back.0) - origin;
                Self {
                    count,
                    total_range,
                    element_range: Some(total_range / (count - 1) as f64),
                    origin,
                    front: 0,
                    back: count - 1,
                }
            }
            (Some(front), _) => Self {
                count,
                total_range: 0.0,
                element_range: None,
                origin: projector.project(&front.0),
                front: 0,
                back: 0,
            },
            _ => Self::default(),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }
}
