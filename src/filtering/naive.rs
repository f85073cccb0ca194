//! Exact-set backend: one hash set of attribute ids per point.
//!
//! Lookup cost is one hash probe per query attribute, independent of the
//! attribute universe. This is the correctness reference for the other
//! backends.

use std::collections::{HashMap, HashSet};
use std::mem;

use smallvec::SmallVec;

use super::stats::OpStats;
use super::{sorted_unique, AttrId, AttributeFilter, FilterKind, FilterPredicate, PointId};
use crate::error::Result;

/// Query sets are usually a handful of tags.
type QuerySet = SmallVec<[AttrId; 8]>;

/// Attribute filter backed by `HashMap<PointId, HashSet<AttrId>>`.
#[derive(Debug, Default)]
pub struct NaiveFilter {
    points: HashMap<PointId, HashSet<AttrId>>,
    query: QuerySet,
    stats: OpStats,
}

impl NaiveFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter whose predicate requires `attrs`.
    pub fn with_query_attributes(attrs: &[AttrId]) -> Self {
        Self {
            query: Self::query_set(attrs),
            ..Self::default()
        }
    }

    fn query_set(attrs: &[AttrId]) -> QuerySet {
        let mut query: QuerySet = attrs.iter().copied().collect();
        query.sort_unstable();
        query.dedup();
        query
    }

    fn contains_all(&self, point: PointId, attrs: &[AttrId]) -> bool {
        match self.points.get(&point) {
            Some(set) => attrs.iter().all(|attr| set.contains(attr)),
            None => attrs.is_empty(),
        }
    }
}

impl FilterPredicate for NaiveFilter {
    fn matches(&self, point: PointId) -> bool {
        self.stats.time(|| self.contains_all(point, &self.query))
    }
}

impl AttributeFilter for NaiveFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Naive
    }

    fn add_attribute(&mut self, point: PointId, attr: AttrId) -> Result<()> {
        let points = &mut self.points;
        self.stats.time(|| {
            points.entry(point).or_default().insert(attr);
        });
        Ok(())
    }

    fn remove_attribute(&mut self, point: PointId, attr: AttrId) -> Result<()> {
        let points = &mut self.points;
        self.stats.time(|| {
            if let Some(set) = points.get_mut(&point) {
                set.remove(&attr);
            }
        });
        Ok(())
    }

    fn has_attribute(&self, point: PointId, attr: AttrId) -> Result<bool> {
        Ok(self
            .stats
            .time(|| self.points.get(&point).is_some_and(|set| set.contains(&attr))))
    }

    fn has_attributes(&self, point: PointId, attrs: &[AttrId]) -> Result<bool> {
        Ok(self.stats.time(|| self.contains_all(point, attrs)))
    }

    fn set_query_attributes(&mut self, attrs: &[AttrId]) -> Result<()> {
        self.query = self.stats.time(|| Self::query_set(attrs));
        tracing::debug!(backend = "naive", query = ?self.query, "query attributes replaced");
        Ok(())
    }

    fn query_attributes(&self) -> Vec<AttrId> {
        sorted_unique(self.query.iter().copied())
    }

    fn num_attributes(&self, point: PointId) -> usize {
        self.points.get(&point).map_or(0, HashSet::len)
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn memory_usage(&self) -> usize {
        self.points
            .values()
            .map(|set| mem::size_of::<HashSet<AttrId>>() + set.capacity() * mem::size_of::<AttrId>())
            .sum()
    }

    fn op_stats(&self) -> &OpStats {
        &self.stats
    }
}
