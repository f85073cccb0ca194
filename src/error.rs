//! Error types for facetgate.

use thiserror::Error;

use crate::filtering::AttrId;

/// Errors raised by attribute filters.
///
/// Only bounded backends can fail; "point not found" and "attribute not
/// present" are ordinary `false` answers, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
    /// An attribute id at or beyond the backend's fixed universe.
    ///
    /// This signals a configuration mistake (universe too small for the data)
    /// and is never clamped or dropped: ignoring it would make a point appear
    /// to lack an attribute it was meant to carry.
    #[error("attribute id {attr} out of range: universe holds ids 0..{universe}")]
    AttributeOutOfRange { attr: AttrId, universe: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;
