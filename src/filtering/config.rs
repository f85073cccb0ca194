//! Backend selection and construction-time configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AttrId, AttributeFilter, BitsetFilter, NaiveFilter, RoaringFilter, DEFAULT_BITSET_WORDS};
use crate::error::Result;

/// Which storage backend a filter uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Hash set per point. Reference semantics, no range limit.
    Naive,
    /// Fixed-width word array per point over a bounded universe.
    Bitset,
    /// Roaring bitmap per point. Compact for large, sparse universes.
    #[default]
    Roaring,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::Naive, FilterKind::Bitset, FilterKind::Roaring];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Naive => "naive",
            FilterKind::Bitset => "bitset",
            FilterKind::Roaring => "roaring",
        }
    }

    /// Whether this backend restricts attribute ids to a fixed universe.
    pub fn is_bounded(self) -> bool {
        matches!(self, FilterKind::Bitset)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unrecognised backend name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter kind {0:?} (expected naive, bitset or roaring)")]
pub struct ParseFilterKindError(pub String);

impl FromStr for FilterKind {
    type Err = ParseFilterKindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" | "hash" | "exact" => Ok(FilterKind::Naive),
            "bitset" | "dense" => Ok(FilterKind::Bitset),
            "roaring" | "compressed" => Ok(FilterKind::Roaring),
            _ => Err(ParseFilterKindError(s.to_string())),
        }
    }
}

/// Construction-time filter configuration.
///
/// The bitset backend built from a config always uses the default
/// 1024-attribute universe; construct [`BitsetFilter`] directly for another
/// width.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub kind: FilterKind,
    /// Initial required attribute set for [`FilterPredicate::matches`](super::FilterPredicate::matches).
    pub query_attributes: Vec<AttrId>,
}

impl FilterConfig {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            query_attributes: Vec::new(),
        }
    }

    pub fn with_query_attributes(mut self, attrs: impl Into<Vec<AttrId>>) -> Self {
        self.query_attributes = attrs.into();
        self
    }

    /// Build an empty filter of the configured kind.
    ///
    /// Fails only if `query_attributes` holds an id outside a bounded
    /// backend's universe.
    pub fn build(&self) -> Result<Box<dyn AttributeFilter>> {
        tracing::debug!(
            kind = %self.kind,
            query_len = self.query_attributes.len(),
            "building attribute filter"
        );
        let filter: Box<dyn AttributeFilter> = match self.kind {
            FilterKind::Naive => Box::new(NaiveFilter::with_query_attributes(&self.query_attributes)),
            FilterKind::Bitset => Box::new(
                BitsetFilter::<DEFAULT_BITSET_WORDS>::with_query_attributes(&self.query_attributes)?,
            ),
            FilterKind::Roaring => Box::new(RoaringFilter::with_query_attributes(&self.query_attributes)),
        };
        Ok(filter)
    }
}
