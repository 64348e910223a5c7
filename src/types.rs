//! Core identifier and value types shared across the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Point in time used for every temporal comparison.
pub type Timestamp = DateTime<Utc>;

/// Free-form metadata attached to items, terms and variations.
///
/// Ordered so that anything derived from it iterates deterministically.
pub type MetaMap = BTreeMap<String, String>;

/// Content item identifier.
///
/// Zero is never a valid item; it is reserved as the "match nothing" sentinel.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Sentinel placed in an include list that must match no item at all.
    pub const NONE: ItemId = ItemId(0);

    pub fn is_sentinel(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        ItemId(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Taxonomy term identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u64);

impl From<u64> for TermId {
    fn from(value: u64) -> Self {
        TermId(value)
    }
}

/// Author identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub u64);

/// Returns the first non-blank value stored under any of `keys`, in key order.
pub fn first_meta_value<'a>(meta: &'a MetaMap, keys: &[String]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| meta.get(key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}
