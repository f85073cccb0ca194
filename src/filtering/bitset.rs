//! Dense-bitset backend: one fixed-width bit vector per point.
//!
//! Attribute `a` is bit `a % 64` of word `a / 64`. A query is materialised as
//! a mask and a point matches when `bits & mask == mask` holds for every word,
//! so evaluation costs `WORDS` AND/compare pairs regardless of how many
//! attributes are set or queried.
//!
//! # Trade-offs
//!
//! | Universe | Attributes per point | Verdict |
//! |----------|----------------------|---------|
//! | small (≤ a few thousand) | many | best lookup latency |
//! | large | few | wastes `WORDS * 8` bytes per point; prefer roaring |
//!
//! The universe is a compile-time constant (`WORDS * 64` ids). Any attribute
//! id at or beyond it is rejected with
//! [`FilterError::AttributeOutOfRange`]; nothing is ever clamped.

use std::collections::HashMap;
use std::fmt;
use std::mem;

use super::stats::OpStats;
use super::{AttrId, AttributeFilter, FilterKind, FilterPredicate, PointId};
use crate::error::{FilterError, Result};

/// Default attribute universe of [`BitsetFilter`].
pub const MAX_ATTRIBUTES: usize = 1024;

/// Words backing the default 1024-bit universe.
pub const DEFAULT_BITSET_WORDS: usize = MAX_ATTRIBUTES / WORD_BITS;

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-size bit vector of `WORDS * 64` bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeBitset<const WORDS: usize> {
    words: [u64; WORDS],
}

impl<const WORDS: usize> AttributeBitset<WORDS> {
    /// Number of addressable bits.
    pub const BITS: usize = WORDS * WORD_BITS;

    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    /// Set `bit`. Panics if `bit >= Self::BITS`.
    #[inline]
    pub fn set(&mut self, bit: usize) {
        self.words[bit / WORD_BITS] |= 1u64 << (bit % WORD_BITS);
    }

    /// Clear `bit`. Panics if `bit >= Self::BITS`.
    #[inline]
    pub fn clear(&mut self, bit: usize) {
        self.words[bit / WORD_BITS] &= !(1u64 << (bit % WORD_BITS));
    }

    /// Test `bit`. Panics if `bit >= Self::BITS`.
    #[inline]
    pub fn test(&self, bit: usize) -> bool {
        self.words[bit / WORD_BITS] & (1u64 << (bit % WORD_BITS)) != 0
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// True iff every bit set in `mask` is also set in `self`.
    #[inline]
    pub fn contains_all(&self, mask: &Self) -> bool {
        self.words
            .iter()
            .zip(mask.words.iter())
            .all(|(&w, &m)| w & m == m)
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }

    pub fn words(&self) -> &[u64; WORDS] {
        &self.words
    }
}

impl<const WORDS: usize> Default for AttributeBitset<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> fmt::Debug for AttributeBitset<WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

/// Attribute filter storing a `[u64; WORDS]` bit vector per point.
///
/// `BitsetFilter` (default parameter) covers attribute ids `0..1024`.
#[derive(Debug, Default)]
pub struct BitsetFilter<const WORDS: usize = DEFAULT_BITSET_WORDS> {
    points: HashMap<PointId, AttributeBitset<WORDS>>,
    query: AttributeBitset<WORDS>,
    stats: OpStats,
}

impl<const WORDS: usize> BitsetFilter<WORDS> {
    /// Size of the attribute universe: valid ids are `0..UNIVERSE`.
    pub const UNIVERSE: usize = AttributeBitset::<WORDS>::BITS;

    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
            query: AttributeBitset::new(),
            stats: OpStats::new(),
        }
    }

    /// Create a filter whose predicate requires `attrs`.
    pub fn with_query_attributes(attrs: &[AttrId]) -> Result<Self> {
        Ok(Self {
            query: Self::mask(attrs)?,
            ..Self::new()
        })
    }

    pub fn universe(&self) -> usize {
        Self::UNIVERSE
    }

    fn validate(attr: AttrId) -> Result<usize> {
        let bit = attr as usize;
        if bit >= Self::UNIVERSE {
            tracing::warn!(attr, universe = Self::UNIVERSE, "attribute id out of range");
            return Err(FilterError::AttributeOutOfRange {
                attr,
                universe: Self::UNIVERSE,
            });
        }
        Ok(bit)
    }

    /// Materialise `attrs` as a mask, rejecting the whole list on any bad id.
    fn mask(attrs: &[AttrId]) -> Result<AttributeBitset<WORDS>> {
        let mut mask = AttributeBitset::new();
        for &attr in attrs {
            mask.set(Self::validate(attr)?);
        }
        Ok(mask)
    }

    fn contains_all(&self, point: PointId, mask: &AttributeBitset<WORDS>) -> bool {
        match self.points.get(&point) {
            Some(bits) => bits.contains_all(mask),
            None => mask.is_empty(),
        }
    }

    /// Bit vector recorded for `point`, if it has an entry.
    pub fn point_bits(&self, point: PointId) -> Option<&AttributeBitset<WORDS>> {
        self.points.get(&point)
    }
}

impl<const WORDS: usize> FilterPredicate for BitsetFilter<WORDS> {
    fn matches(&self, point: PointId) -> bool {
        self.stats.time(|| self.contains_all(point, &self.query))
    }
}

impl<const WORDS: usize> AttributeFilter for BitsetFilter<WORDS> {
    fn kind(&self) -> FilterKind {
        FilterKind::Bitset
    }

    fn add_attribute(&mut self, point: PointId, attr: AttrId) -> Result<()> {
        let points = &mut self.points;
        self.stats.try_time(|| -> Result<()> {
            let bit = Self::validate(attr)?;
            points.entry(point).or_default().set(bit);
            Ok(())
        })
    }

    fn remove_attribute(&mut self, point: PointId, attr: AttrId) -> Result<()> {
        let points = &mut self.points;
        self.stats.try_time(|| -> Result<()> {
            let bit = Self::validate(attr)?;
            if let Some(bits) = points.get_mut(&point) {
                bits.clear(bit);
            }
            Ok(())
        })
    }

    fn has_attribute(&self, point: PointId, attr: AttrId) -> Result<bool> {
        self.stats.try_time(|| -> Result<bool> {
            let bit = Self::validate(attr)?;
            Ok(self.points.get(&point).is_some_and(|bits| bits.test(bit)))
        })
    }

    fn has_attributes(&self, point: PointId, attrs: &[AttrId]) -> Result<bool> {
        self.stats.try_time(|| -> Result<bool> {
            let mask = Self::mask(attrs)?;
            Ok(self.contains_all(point, &mask))
        })
    }

    fn set_query_attributes(&mut self, attrs: &[AttrId]) -> Result<()> {
        self.query = self.stats.try_time(|| Self::mask(attrs))?;
        tracing::debug!(backend = "bitset", query = ?self.query, "query attributes replaced");
        Ok(())
    }

    fn query_attributes(&self) -> Vec<AttrId> {
        // Bits are only ever set from AttrId values, so the cast is lossless.
        self.query.iter_ones().map(|bit| bit as AttrId).collect()
    }

    fn num_attributes(&self, point: PointId) -> usize {
        self.points.get(&point).map_or(0, AttributeBitset::count)
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn memory_usage(&self) -> usize {
        self.points.len() * mem::size_of::<AttributeBitset<WORDS>>()
    }

    fn op_stats(&self) -> &OpStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_word_ops() {
        let mut bits = AttributeBitset::<2>::new();
        assert_eq!(AttributeBitset::<2>::BITS, 128);
        assert!(bits.is_empty());

        bits.set(0);
        bits.set(63);
        bits.set(64);
        bits.set(127);
        assert_eq!(bits.count(), 4);
        assert!(bits.test(63) && bits.test(64));
        assert!(!bits.test(65));
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![0, 63, 64, 127]);

        bits.clear(63);
        bits.clear(63);
        assert_eq!(bits.count(), 3);
        assert_eq!(bits.words()[0], 1);
    }

    #[test]
    fn test_contains_all_across_words() {
        let mut point = AttributeBitset::<4>::new();
        let mut mask = AttributeBitset::<4>::new();
        point.set(3);
        point.set(130);
        mask.set(130);
        assert!(point.contains_all(&mask));
        mask.set(200);
        assert!(!point.contains_all(&mask));
        assert!(point.contains_all(&AttributeBitset::new()));
    }

    #[test]
    fn test_debug_lists_set_bits() {
        let mut bits = AttributeBitset::<1>::new();
        bits.set(5);
        bits.set(9);
        assert_eq!(format!("{bits:?}"), "{5, 9}");
    }

    #[test]
    fn test_default_universe() {
        let filter = BitsetFilter::<DEFAULT_BITSET_WORDS>::new();
        assert_eq!(filter.universe(), MAX_ATTRIBUTES);
        assert_eq!(BitsetFilter::<DEFAULT_BITSET_WORDS>::UNIVERSE, 1024);
    }

    #[test]
    fn test_invalid_attribute() {
        let mut filter = BitsetFilter::<DEFAULT_BITSET_WORDS>::new();
        let err = filter.add_attribute(1, MAX_ATTRIBUTES as AttrId + 1).unwrap_err();
        assert_eq!(
            err,
            FilterError::AttributeOutOfRange {
                attr: 1025,
                universe: 1024
            }
        );
        assert_eq!(filter.num_points(), 0);
        assert_eq!(filter.total_operations(), 0);
    }

    #[test]
    fn test_universe_boundary() {
        let mut filter = BitsetFilter::<1>::new();
        filter.add_attribute(1, 63).unwrap();
        assert!(filter.has_attribute(1, 63).unwrap());
        assert!(filter.add_attribute(1, 64).is_err());
        assert!(filter.remove_attribute(1, 64).is_err());
        assert!(filter.has_attribute(1, 64).is_err());
        assert!(filter.has_attributes(1, &[63, 64]).is_err());
        assert!(filter.set_query_attributes(&[64]).is_err());
    }

    #[test]
    fn test_rejected_query_keeps_previous_mask() {
        let mut filter = BitsetFilter::<1>::new();
        filter.add_attribute(1, 10).unwrap();
        filter.set_query_attributes(&[10]).unwrap();
        assert!(filter.set_query_attributes(&[11, 500]).is_err());
        assert_eq!(filter.query_attributes(), vec![10]);
        assert!(filter.matches(1));
    }

    #[test]
    fn test_rejected_remove_leaves_bits() {
        let mut filter = BitsetFilter::<1>::new();
        filter.add_attribute(2, 1).unwrap();
        let before = *filter.point_bits(2).unwrap();
        assert!(filter.remove_attribute(2, 99).is_err());
        assert_eq!(*filter.point_bits(2).unwrap(), before);
    }

    #[test]
    fn test_memory_is_fixed_per_point() {
        let mut filter = BitsetFilter::<DEFAULT_BITSET_WORDS>::new();
        filter.add_attribute(1, 0).unwrap();
        filter.add_attribute(2, 0).unwrap();
        filter.add_attribute(2, 1000).unwrap();
        assert_eq!(filter.memory_usage(), 2 * 128);
    }

    #[test]
    fn test_initial_query_validated() {
        assert!(BitsetFilter::<1>::with_query_attributes(&[64]).is_err());
        let filter = BitsetFilter::<1>::with_query_attributes(&[3, 3, 1]).unwrap();
        assert_eq!(filter.query_attributes(), vec![1, 3]);
    }
}
