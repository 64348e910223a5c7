//! In-memory executor over a fixed set of stored items.
//!
//! Reference backend for the [`QueryExecutor`] contract: small sites, previews and
//! tests run against it directly.

use super::{QueryExecutor, QueryResult};
use crate::error::ExecutorError;
use crate::query::{
    Comparator, MetaFilter, MetaValue, PageSize, QuerySpec, SortDirection, SortKey, TermFilter,
    TermOperator, TermSet, ValueType,
};
use crate::types::{AuthorId, ItemId, MetaMap, TermId, Timestamp};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Term attached to a stored item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTerm {
    pub id: TermId,
    pub slug: String,
}

/// Item record as the in-memory executor sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: ItemId,
    pub item_type: String,
    pub title: String,
    pub author: AuthorId,
    pub published: Timestamp,
    pub modified: Timestamp,
    #[serde(default)]
    pub menu_order: i64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<StoredTerm>>,
    #[serde(default)]
    pub meta: MetaMap,
}

impl StoredItem {
    pub fn new(
        id: impl Into<ItemId>,
        item_type: impl Into<String>,
        title: impl Into<String>,
        published: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
            title: title.into(),
            author: AuthorId(1),
            published,
            modified: published,
            menu_order: 0,
            comment_count: 0,
            terms: BTreeMap::new(),
            meta: MetaMap::new(),
        }
    }

    pub fn with_term(
        mut self,
        taxonomy: impl Into<String>,
        id: u64,
        slug: impl Into<String>,
    ) -> Self {
        self.terms.entry(taxonomy.into()).or_default().push(StoredTerm {
            id: TermId(id),
            slug: slug.into(),
        });
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn with_author(mut self, author: u64) -> Self {
        self.author = AuthorId(author);
        self
    }

    pub fn with_menu_order(mut self, order: i64) -> Self {
        self.menu_order = order;
        self
    }
}

/// Executor evaluating specs against a vector of items
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutor {
    items: Vec<StoredItem>,
}

impl InMemoryExecutor {
    pub fn new(items: Vec<StoredItem>) -> Self {
        Self { items }
    }

    pub fn insert(&mut self, item: StoredItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matches(&self, item: &StoredItem, spec: &QuerySpec) -> bool {
        if item.item_type != spec.item_type {
            return false;
        }
        if let Some(include) = &spec.include_ids {
            if !include.iter().any(|id| !id.is_sentinel() && *id == item.id) {
                return false;
            }
        }
        if spec.exclude_ids.contains(&item.id) {
            return false;
        }
        if !spec.author_ids.is_empty() && !spec.author_ids.contains(&item.author) {
            return false;
        }
        if let Some(range) = &spec.date_range {
            if !range.contains(item.published) {
                return false;
            }
        }
        if let Some(search) = &spec.search {
            if !matches_search(&item.title, search) {
                return false;
            }
        }
        spec.term_filters.iter().all(|f| matches_terms(item, f))
            && spec.meta_filters.iter().all(|f| matches_meta(item, f))
    }
}

impl QueryExecutor for InMemoryExecutor {
    fn execute(&self, spec: &QuerySpec) -> Result<QueryResult, ExecutorError> {
        if spec.matches_nothing() {
            return Ok(QueryResult::empty());
        }

        let mut matched: Vec<&StoredItem> = self
            .items
            .iter()
            .filter(|item| self.matches(item, spec))
            .collect();
        let total_matched = matched.len() as u64;

        sort_items(&mut matched, spec);

        let skip = match spec.page_size {
            PageSize::Unbounded => spec.offset as usize,
            PageSize::Limited(size) => {
                spec.offset as usize + (spec.page.max(1) as usize - 1) * size as usize
            }
        };
        let take = spec
            .page_size
            .limit()
            .map(|n| n as usize)
            .unwrap_or(usize::MAX);

        let ids = matched
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|item| item.id)
            .collect();
        Ok(QueryResult { ids, total_matched })
    }
}

fn matches_search(title: &str, search: &str) -> bool {
    let title = title.to_lowercase();
    search
        .to_lowercase()
        .split_whitespace()
        .all(|word| title.contains(word))
}

fn matches_terms(item: &StoredItem, filter: &TermFilter) -> bool {
    let attached = item
        .terms
        .get(&filter.taxonomy)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let (any, all) = match &filter.terms {
        TermSet::Ids(ids) => {
            let present = |id: &TermId| attached.iter().any(|t| t.id == *id);
            (ids.iter().any(present), ids.iter().all(present))
        }
        TermSet::Slugs(slugs) => {
            let present = |slug: &String| attached.iter().any(|t| t.slug == *slug);
            (slugs.iter().any(present), slugs.iter().all(present))
        }
    };
    match filter.operator {
        TermOperator::In => any,
        TermOperator::And => all,
        TermOperator::NotIn => !any,
    }
}

/// A meta value read as its declared type
#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum Typed {
    Number(f64),
    Time(Timestamp),
    Text(String),
}

fn read_typed(raw: &str, value_type: ValueType) -> Option<Typed> {
    let raw = raw.trim();
    match value_type {
        ValueType::Numeric => raw.parse::<f64>().ok().map(Typed::Number),
        ValueType::DateTime => parse_timestamp(raw).map(Typed::Time),
        ValueType::Text => Some(Typed::Text(raw.to_string())),
    }
}

fn operand_typed(value: &MetaValue, value_type: ValueType) -> Option<Typed> {
    match (value, value_type) {
        (MetaValue::Number(n), ValueType::Numeric) => Some(Typed::Number(*n)),
        (MetaValue::Number(n), ValueType::Text) => Some(Typed::Text(n.to_string())),
        (MetaValue::Time(t), ValueType::DateTime) => Some(Typed::Time(*t)),
        (MetaValue::Time(t), ValueType::Text) => Some(Typed::Text(t.to_rfc3339())),
        (MetaValue::Text(s), value_type) => read_typed(s, value_type),
        _ => None,
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` and unix seconds, all as UTC.
fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&parsed));
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

fn matches_meta(item: &StoredItem, filter: &MetaFilter) -> bool {
    let Some(raw) = item.meta.get(&filter.key) else {
        return false;
    };
    if filter.comparator == Comparator::Exists {
        return true;
    }
    let Some(actual) = read_typed(raw, filter.value_type) else {
        return false;
    };

    if filter.comparator == Comparator::Between {
        return match (&filter.value, &actual) {
            (MetaValue::Range { min, max }, Typed::Number(n)) => {
                *n >= *min && max.map_or(true, |max| *n <= max)
            }
            _ => false,
        };
    }

    let Some(expected) = operand_typed(&filter.value, filter.value_type) else {
        return false;
    };
    let Some(ordering) = actual.partial_cmp(&expected) else {
        return false;
    };
    match filter.comparator {
        Comparator::Eq => ordering == Ordering::Equal,
        Comparator::NotEq => ordering != Ordering::Equal,
        Comparator::Gt => ordering == Ordering::Greater,
        Comparator::Gte => ordering != Ordering::Less,
        Comparator::Lt => ordering == Ordering::Less,
        Comparator::Lte => ordering != Ordering::Greater,
        Comparator::Between | Comparator::Exists => false,
    }
}

/// Ties always fall back to ascending id so storage order never leaks into results.
fn sort_items(items: &mut [&StoredItem], spec: &QuerySpec) {
    let direction = |ordering: Ordering| match spec.sort_direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };

    match &spec.sort_key {
        SortKey::Date => {
            items.sort_by(|a, b| direction(a.published.cmp(&b.published)).then_with(|| by_id(a, b)))
        }
        SortKey::Modified => {
            items.sort_by(|a, b| direction(a.modified.cmp(&b.modified)).then_with(|| by_id(a, b)))
        }
        SortKey::Title => items.sort_by(|a, b| {
            direction(a.title.to_lowercase().cmp(&b.title.to_lowercase()))
                .then_with(|| by_id(a, b))
        }),
        SortKey::MenuOrder => items
            .sort_by(|a, b| direction(a.menu_order.cmp(&b.menu_order)).then_with(|| by_id(a, b))),
        SortKey::CommentCount => items.sort_by(|a, b| {
            direction(a.comment_count.cmp(&b.comment_count)).then_with(|| by_id(a, b))
        }),
        SortKey::Id => items.sort_by(|a, b| direction(by_id(a, b))),
        SortKey::Random { seed } => items.sort_by_key(|item| (shuffle_rank(*seed, item.id), item.id)),
        SortKey::IncludeOrder => {
            let positions: BTreeMap<ItemId, usize> = spec
                .include_ids
                .iter()
                .flatten()
                .enumerate()
                .map(|(pos, id)| (*id, pos))
                .collect();
            items.sort_by_key(|item| {
                (
                    positions.get(&item.id).copied().unwrap_or(usize::MAX),
                    item.id,
                )
            });
        }
        SortKey::Meta { key, value_type } => sort_by_meta(items, key, *value_type, direction),
        SortKey::EventDate { key } => sort_by_meta(items, key, ValueType::DateTime, direction),
    }
}

/// Items without a readable value sort after every item that has one.
fn sort_by_meta(
    items: &mut [&StoredItem],
    key: &str,
    value_type: ValueType,
    direction: impl Fn(Ordering) -> Ordering,
) {
    items.sort_by(|a, b| {
        let a_value = a.meta.get(key).and_then(|raw| read_typed(raw, value_type));
        let b_value = b.meta.get(key).and_then(|raw| read_typed(raw, value_type));
        let primary = match (a_value, b_value) {
            (Some(a), Some(b)) => direction(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        primary.then_with(|| by_id(a, b))
    });
}

fn by_id(a: &StoredItem, b: &StoredItem) -> Ordering {
    a.id.cmp(&b.id)
}

fn shuffle_rank(seed: u64, id: ItemId) -> [u8; 8] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(&id.0.to_le_bytes());
    let mut rank = [0u8; 8];
    rank.copy_from_slice(&hasher.finalize().as_bytes()[..8]);
    rank
}
