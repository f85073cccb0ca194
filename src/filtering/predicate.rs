//! The callback seam between a graph search and a filter.
//!
//! A filtered traversal (ACORN-style two-hop expansion, plain beam search with
//! inline filtering, ...) evaluates the predicate once per visited candidate,
//! before spending a distance computation on it. It needs nothing else from the
//! filter, so engines should depend on [`FilterPredicate`] alone.

use super::PointId;

/// Accept/reject decision for a candidate point.
///
/// Called zero or more times per query, in whatever order the traversal visits
/// candidates, possibly from several search threads at once.
pub trait FilterPredicate: Sync {
    /// Check if a point passes the filter.
    fn matches(&self, point: PointId) -> bool;
}

/// Simple function-based filter.
pub struct FnFilter<F: Fn(PointId) -> bool + Sync>(pub F);

impl<F: Fn(PointId) -> bool + Sync> FilterPredicate for FnFilter<F> {
    fn matches(&self, point: PointId) -> bool {
        self.0(point)
    }
}

/// Always-pass filter (no filtering).
pub struct NoFilter;

impl FilterPredicate for NoFilter {
    fn matches(&self, _point: PointId) -> bool {
        true
    }
}

impl<T: FilterPredicate + ?Sized> FilterPredicate for &T {
    #[inline]
    fn matches(&self, point: PointId) -> bool {
        (**self).matches(point)
    }
}

impl<T: FilterPredicate + ?Sized> FilterPredicate for Box<T> {
    #[inline]
    fn matches(&self, point: PointId) -> bool {
        (**self).matches(point)
    }
}
