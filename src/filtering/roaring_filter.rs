//! Compressed-bitmap backend: one `RoaringBitmap` per point.
//!
//! Roaring splits the `u32` id space into 2^16-wide chunks and stores each
//! chunk as a sorted array, a 8 KiB bitmap or a run list depending on local
//! density. The query set is held as a bitmap too and evaluation is
//! `query.is_subset(point)`, which merges container by container without
//! decompressing. Cost tracks the containers touched rather than the universe,
//! and memory tracks the attributes actually present.

use std::collections::HashMap;

use roaring::RoaringBitmap;

use super::stats::OpStats;
use super::{AttrId, AttributeFilter, FilterKind, FilterPredicate, PointId};
use crate::error::Result;

/// Attribute filter backed by `HashMap<PointId, RoaringBitmap>`.
#[derive(Debug, Default)]
pub struct RoaringFilter {
    points: HashMap<PointId, RoaringBitmap>,
    query: RoaringBitmap,
    stats: OpStats,
}

impl RoaringFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter whose predicate requires `attrs`.
    pub fn with_query_attributes(attrs: &[AttrId]) -> Self {
        Self {
            query: attrs.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn contains_all(&self, point: PointId, query: &RoaringBitmap) -> bool {
        match self.points.get(&point) {
            Some(bitmap) => query.is_subset(bitmap),
            None => query.is_empty(),
        }
    }

    /// Number of attributes in `point`'s bitmap (0 for unknown points).
    pub fn cardinality(&self, point: PointId) -> u64 {
        self.points.get(&point).map_or(0, RoaringBitmap::len)
    }

    /// Bitmap recorded for `point`, if it has an entry.
    pub fn point_bitmap(&self, point: PointId) -> Option<&RoaringBitmap> {
        self.points.get(&point)
    }
}

impl FilterPredicate for RoaringFilter {
    fn matches(&self, point: PointId) -> bool {
        self.stats.time(|| self.contains_all(point, &self.query))
    }
}

impl AttributeFilter for RoaringFilter {
    fn kind(&self) -> FilterKind {
        FilterKind::Roaring
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
            if let Some(bitmap) = points.get_mut(&point) {
                bitmap.remove(attr);
            }
        });
        Ok(())
    }

    fn has_attribute(&self, point: PointId, attr: AttrId) -> Result<bool> {
        Ok(self.stats.time(|| {
            self.points
                .get(&point)
                .is_some_and(|bitmap| bitmap.contains(attr))
        }))
    }

    fn has_attributes(&self, point: PointId, attrs: &[AttrId]) -> Result<bool> {
        Ok(self.stats.time(|| {
            let query: RoaringBitmap = attrs.iter().copied().collect();
            self.contains_all(point, &query)
        }))
    }

    fn set_query_attributes(&mut self, attrs: &[AttrId]) -> Result<()> {
        self.query = self.stats.time(|| attrs.iter().copied().collect());
        tracing::debug!(
            backend = "roaring",
            query_len = self.query.len(),
            "query attributes replaced"
        );
        Ok(())
    }

    fn query_attributes(&self) -> Vec<AttrId> {
        self.query.iter().collect()
    }

    fn num_attributes(&self, point: PointId) -> usize {
        self.cardinality(point) as usize
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Sum of the serialized sizes of all point bitmaps.
    fn memory_usage(&self) -> usize {
        self.points.values().map(RoaringBitmap::serialized_size).sum()
    }

    fn op_stats(&self) -> &OpStats {
        &self.stats
    }
}
