//! Attribute filters for filtered vector search.
//!
//! Each indexed point carries a set of discrete attributes (tenant, language,
//! category, ... encoded as integer ids). A filter holds the point→attributes
//! mapping plus one active *query set*, and answers "does this point carry every
//! attribute of the query set?" once per candidate visited by the graph search.
//!
//! Three backends implement the same contract:
//!
//! | Backend | Per-point storage | Lookup cost | Attribute range |
//! |---------|-------------------|-------------|-----------------|
//! | [`NaiveFilter`] | `HashSet<AttrId>` | O(query size) hash probes | any `u32` |
//! | [`BitsetFilter`] | `[u64; WORDS]` | O(WORDS), data-independent | `0..WORDS * 64` |
//! | [`RoaringFilter`] | `RoaringBitmap` | O(containers touched) | any `u32` |
//!
//! The naive backend is the reference; the other two must agree with it
//! call for call.
//!
//! # Empty query sets accept everything
//!
//! The empty set is a subset of every set, so with no query attributes
//! [`FilterPredicate::matches`] returns `true` for *every* point, including
//! points that never received an attribute. "No attributes selected" means
//! "no restriction", not "select nothing".

mod bitset;
mod config;
mod naive;
mod predicate;
mod roaring_filter;
mod stats;

use std::fmt;

use crate::error::Result;

pub use bitset::{AttributeBitset, BitsetFilter, DEFAULT_BITSET_WORDS, MAX_ATTRIBUTES};
pub use config::{FilterConfig, FilterKind, ParseFilterKindError};
pub use naive::NaiveFilter;
pub use predicate::{FilterPredicate, FnFilter, NoFilter};
pub use roaring_filter::RoaringFilter;
pub use stats::{FilterStats, OpStats};

/// Identifier of an indexed vector, assigned by the search engine.
pub type PointId = u64;

/// Identifier of a discrete attribute (tag).
pub type AttrId = u32;

/// Point-level attribute storage with membership queries.
///
/// Mutators take `&mut self` and queries take `&self`, so a populated filter
/// can be shared by any number of concurrent searches as long as nobody
/// mutates it. Timing counters are atomics and may be updated from `&self`.
///
/// Instrumented operations (each records one timing sample on success):
/// `add_attribute`, `remove_attribute`, `has_attribute`, `has_attributes`,
/// `set_query_attributes` and [`FilterPredicate::matches`]. Calls rejected with
/// an error are not counted.
///
/// Only bounded backends return errors, and only
/// [`FilterError::AttributeOutOfRange`](crate::FilterError::AttributeOutOfRange).
pub trait AttributeFilter: FilterPredicate + Send + fmt::Debug {
    /// Backend of this filter.
    fn kind(&self) -> FilterKind;

    /// Add `attr` to `point`. Adding a present attribute is a no-op.
    fn add_attribute(&mut self, point: PointId, attr: AttrId) -> Result<()>;

    /// Remove `attr` from `point`. Removing an absent attribute is a no-op.
    ///
    /// The point keeps its (possibly now empty) entry.
    fn remove_attribute(&mut self, point: PointId, attr: AttrId) -> Result<()>;

    fn has_attribute(&self, point: PointId, attr: AttrId) -> Result<bool>;

    /// True iff `point` carries every attribute in `attrs`.
    ///
    /// Vacuously true for an empty `attrs`, for every point. False for a point
    /// without any recorded attributes when `attrs` is non-empty.
    fn has_attributes(&self, point: PointId, attrs: &[AttrId]) -> Result<bool>;

    /// Replace the active query set used by [`FilterPredicate::matches`].
    ///
    /// Not additive: the previous set is discarded. On error the previous set
    /// stays in place.
    fn set_query_attributes(&mut self, attrs: &[AttrId]) -> Result<()>;

    /// Active query set, ascending and deduplicated.
    fn query_attributes(&self) -> Vec<AttrId>;

    /// Number of attributes recorded for `point` (0 for unknown points).
    fn num_attributes(&self, point: PointId) -> usize;

    /// Number of points with an entry, including entries emptied by removal.
    fn num_points(&self) -> usize;

    /// Approximate heap bytes held by per-point attribute storage.
    fn memory_usage(&self) -> usize;

    /// Timing counters of this instance.
    fn op_stats(&self) -> &OpStats;

    fn last_operation_time_ms(&self) -> f64 {
        self.op_stats().last_operation_time_ms()
    }

    fn total_operations(&self) -> u64 {
        self.op_stats().total_operations()
    }

    fn average_operation_time_ms(&self) -> f64 {
        self.op_stats().average_operation_time_ms()
    }

    fn stats(&self) -> FilterStats {
        self.op_stats().snapshot()
    }
}

/// Sort and deduplicate an attribute list for reporting.
fn sorted_unique(attrs: impl IntoIterator<Item = AttrId>) -> Vec<AttrId> {
    let mut out: Vec<AttrId> = attrs.into_iter().collect();
    out.sort_unstable();
    out.dedup();
    out
}
