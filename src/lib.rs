//! facetgate: attribute-filtered membership predicates for ANN graph search.
//!
//! A filtered HNSW/Vamana search asks one question per visited candidate:
//! "does this point carry every required attribute?". The answer is computed
//! once per candidate, so its cost multiplies into every query. This crate
//! provides three interchangeable answers to that question behind one trait:
//!
//! - [`NaiveFilter`]: hash set per point (reference semantics)
//! - [`BitsetFilter`]: fixed-width word array per point (bounded universe)
//! - [`RoaringFilter`]: compressed roaring bitmap per point
//!
//! Search engines only need [`FilterPredicate`]; everything else lives on
//! [`AttributeFilter`].
//!
//! # Choosing a Backend
//!
//! | Workload | Backend |
//! |----------|---------|
//! | ≤ 1024 attribute ids, many per point | bitset |
//! | large id space, few attributes per point | roaring |
//! | tiny data, debugging, cross-checking | naive |
//!
//! # Critical Nuances
//!
//! ## Empty Query Sets
//!
//! An empty required set is vacuously satisfied by every point, including
//! points that never received an attribute. Set a non-empty query before
//! searching if "nothing selected" should mean "no results".
//!
//! ## Timing Overhead
//!
//! Every operation, including each per-candidate predicate call, records its
//! wall-clock duration. The counters are relaxed atomics so concurrent readers
//! never contend on a lock, but the two clock reads still dominate for the
//! cheapest backends.
//!
//! # Example
//!
//! ```
//! use facetgate::{AttributeFilter, FilterPredicate, RoaringFilter};
//!
//! let mut filter = RoaringFilter::new();
//! filter.add_attribute(1, 100)?;
//! filter.add_attribute(1, 200)?;
//! filter.add_attribute(2, 100)?;
//!
//! filter.set_query_attributes(&[100, 200])?;
//! assert!(filter.matches(1));
//! assert!(!filter.matches(2));
//! # Ok::<(), facetgate::FilterError>(())
//! ```

pub mod error;
pub mod filtering;

// Re-exports
pub use error::{FilterError, Result};
pub use filtering::{
    AttrId, AttributeBitset, AttributeFilter, BitsetFilter, FilterConfig, FilterKind,
    FilterPredicate, FilterStats, FnFilter, NaiveFilter, NoFilter, OpStats, PointId,
    RoaringFilter, DEFAULT_BITSET_WORDS, MAX_ATTRIBUTES,
};
