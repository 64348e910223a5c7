//! Compiled query: the side-effect-free description of one fetch.
//!
//! Every collection in here is ordered so two specs compiled from the same inputs
//! serialize byte-for-byte identically.

use crate::types::{AuthorId, ItemId, TermId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which term attribute a filter matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermField {
    TermId,
    Slug,
}

/// Terms a filter restricts to, keyed by the field they are expressed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermSet {
    Ids(BTreeSet<TermId>),
    Slugs(BTreeSet<String>),
}

impl TermSet {
    pub fn is_empty(&self) -> bool {
        match self {
            TermSet::Ids(ids) => ids.is_empty(),
            TermSet::Slugs(slugs) => slugs.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TermSet::Ids(ids) => ids.len(),
            TermSet::Slugs(slugs) => slugs.len(),
        }
    }
}

/// How multiple terms inside one filter combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermOperator {
    /// Item carries at least one of the terms
    #[default]
    In,
    /// Item carries every term
    And,
    /// Item carries none of the terms
    NotIn,
}

/// Taxonomy restriction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFilter {
    pub taxonomy: String,
    pub terms: TermSet,
    pub operator: TermOperator,
}

impl TermFilter {
    pub fn by_ids(taxonomy: impl Into<String>, ids: impl IntoIterator<Item = TermId>) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            terms: TermSet::Ids(ids.into_iter().collect()),
            operator: TermOperator::In,
        }
    }

    pub fn by_slugs<S: Into<String>>(
        taxonomy: impl Into<String>,
        slugs: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            terms: TermSet::Slugs(slugs.into_iter().map(Into::into).collect()),
            operator: TermOperator::In,
        }
    }

    pub fn with_operator(mut self, operator: TermOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn field(&self) -> TermField {
        match self.terms {
            TermSet::Ids(_) => TermField::TermId,
            TermSet::Slugs(_) => TermField::Slug,
        }
    }
}

/// Declared type a meta value is compared as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Numeric,
    DateTime,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    Exists,
}

/// Operand of a meta filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaValue {
    Number(f64),
    Text(String),
    Time(Timestamp),
    /// Inclusive numeric range; a missing upper bound is open-ended
    Range { min: f64, max: Option<f64> },
    Present,
}

/// Restriction on an item's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFilter {
    pub key: String,
    pub comparator: Comparator,
    pub value: MetaValue,
    pub value_type: ValueType,
}

impl MetaFilter {
    pub fn new(
        key: impl Into<String>,
        comparator: Comparator,
        value: MetaValue,
        value_type: ValueType,
    ) -> Self {
        Self {
            key: key.into(),
            comparator,
            value,
            value_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Field the executor orders by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Date,
    Modified,
    Title,
    MenuOrder,
    CommentCount,
    Id,
    /// Pseudo-random but reproducible for a given seed
    Random { seed: u64 },
    /// Keep the order of `include_ids`
    IncludeOrder,
    Meta { key: String, value_type: ValueType },
    /// Event start or end date stored under `key`
    EventDate { key: String },
}

/// Number of items per page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    Limited(u32),
    Unbounded,
}

impl PageSize {
    pub fn limit(&self) -> Option<u32> {
        match self {
            PageSize::Limited(n) => Some(*n),
            PageSize::Unbounded => None,
        }
    }
}

/// Half-open publication-date window: `after <= date < before`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub after: Timestamp,
    pub before: Timestamp,
}

impl DateRange {
    pub fn contains(&self, at: Timestamp) -> bool {
        self.after <= at && at < self.before
    }
}

/// Compiled query handed to a [`crate::executor::QueryExecutor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub item_type: String,
    pub term_filters: Vec<TermFilter>,
    pub meta_filters: Vec<MetaFilter>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub author_ids: BTreeSet<AuthorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Restrict to these ids, in this order. `None` means unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_ids: Option<Vec<ItemId>>,
    /// Omitted entirely when empty; an empty list never means "exclude everything".
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_ids: BTreeSet<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub offset: u32,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub page_size: PageSize,
}

impl QuerySpec {
    /// Unfiltered first page of `item_type`, newest first.
    pub fn for_item_type(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            term_filters: Vec::new(),
            meta_filters: Vec::new(),
            author_ids: BTreeSet::new(),
            date_range: None,
            include_ids: None,
            exclude_ids: BTreeSet::new(),
            search: None,
            offset: 0,
            sort_key: SortKey::Date,
            sort_direction: SortDirection::Descending,
            page: 1,
            page_size: PageSize::Limited(10),
        }
    }

    /// True when the include list holds only the sentinel (or nothing at all).
    pub fn matches_nothing(&self) -> bool {
        match &self.include_ids {
            Some(ids) => ids.iter().all(ItemId::is_sentinel),
            None => false,
        }
    }

    /// Narrow the include list to `allowed`, preserving the current order.
    ///
    /// An empty intersection collapses to the sentinel so the query matches
    /// nothing instead of being read as unrestricted.
    pub fn restrict_to(&mut self, allowed: &BTreeSet<ItemId>) {
        let narrowed: Vec<ItemId> = match self.include_ids.take() {
            Some(current) => current
                .into_iter()
                .filter(|id| allowed.contains(id))
                .collect(),
            None => allowed.iter().copied().collect(),
        };
        self.include_ids = Some(if narrowed.is_empty() {
            vec![ItemId::NONE]
        } else {
            narrowed
        });
    }

    /// Canonical JSON form, used to compare specs and for debug logging.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
