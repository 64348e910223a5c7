//! Request context: the ambient values a render request carries.
//!
//! Built once per request from a [`ContextProvider`] and passed explicitly to the
//! compiler, so compilation never reads global state.

use crate::query::DateRange;
use crate::types::{AuthorId, ItemId, TermId, Timestamp};
use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query-string keys that carry the requested page number, in priority order.
const PAGE_PARAMS: [&str; 2] = ["paged", "page"];

/// Date archive granularity: year, year+month or year+month+day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateParts {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: None,
        }
    }

    pub fn day(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    /// Half-open UTC range covering the archive period.
    ///
    /// Returns `None` for impossible dates (month 13, Feb 30) and for a day without
    /// a month.
    pub fn range(&self) -> Option<DateRange> {
        let (start, end) = match (self.month, self.day) {
            (None, None) => {
                let start = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(self.year + 1, 1, 1)?;
                (start, end)
            }
            (Some(month), None) => {
                let start = NaiveDate::from_ymd_opt(self.year, month, 1)?;
                let end = if month == 12 {
                    NaiveDate::from_ymd_opt(self.year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(self.year, month + 1, 1)?
                };
                (start, end)
            }
            (Some(month), Some(day)) => {
                let start = NaiveDate::from_ymd_opt(self.year, month, day)?;
                (start, start.succ_opt()?)
            }
            (None, Some(_)) => return None,
        };
        Some(DateRange {
            after: Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0)?),
            before: Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0)?),
        })
    }
}

/// What the current page already represents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveScope {
    Term { taxonomy: String, term_id: TermId },
    Author(AuthorId),
    Date(DateParts),
    /// Listing of every item of one type
    ItemType(String),
}

/// Inbound filter parameters: name to one or more values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryStringFacets(BTreeMap<String, Vec<String>>);

impl QueryStringFacets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string such as `category=a,b&filter_color=red&filter_color=blue`.
    ///
    /// Percent-escapes are decoded and `+` reads as a space. A leading `?` is ignored.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut facets = Self::new();
        for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            // PHP-style `name[]=` repetition
            let name = name.strip_suffix("[]").unwrap_or(name);
            facets.insert(name, value.into_owned());
        }
        facets
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut facets = Self::new();
        for (name, value) in pairs {
            facets.insert(name, value);
        }
        facets
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Every raw value given for `name`, in arrival order.
    pub fn values(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every value for `name`, with comma-separated entries split out and blanks dropped.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.values(name)
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// First non-blank value for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name)
            .iter()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }

    /// Whether `name` is present with a truthy value (`1`, `true`, `yes`, `on`).
    pub fn flag(&self, name: &str) -> bool {
        self.first(name).map(is_truthy).unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Read-only access to the ambient request
pub trait ContextProvider {
    fn current_item_id(&self) -> Option<ItemId>;
    fn archive_scope(&self) -> Option<ArchiveScope>;
    fn now(&self) -> Timestamp;
    fn query_string(&self) -> QueryStringFacets;

    /// Explicitly requested page, if the host routes it outside the query string.
    fn requested_page(&self) -> Option<u32> {
        None
    }
}

/// Ambient values for one render request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub current_item_id: Option<ItemId>,
    pub archive: Option<ArchiveScope>,
    pub now: Timestamp,
    pub query: QueryStringFacets,
    pub requested_page: Option<u32>,
}

impl RequestContext {
    pub fn new(now: Timestamp) -> Self {
        Self {
            current_item_id: None,
            archive: None,
            now,
            query: QueryStringFacets::new(),
            requested_page: None,
        }
    }

    /// Snapshot a provider into an owned context.
    pub fn capture(provider: &dyn ContextProvider) -> Self {
        Self {
            current_item_id: provider.current_item_id(),
            archive: provider.archive_scope(),
            now: provider.now(),
            query: provider.query_string(),
            requested_page: provider.requested_page(),
        }
    }

    pub fn with_current_item(mut self, id: impl Into<ItemId>) -> Self {
        self.current_item_id = Some(id.into());
        self
    }

    pub fn with_archive(mut self, scope: ArchiveScope) -> Self {
        self.archive = Some(scope);
        self
    }

    pub fn with_query(mut self, query: QueryStringFacets) -> Self {
        self.query = query;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.requested_page = Some(page);
        self
    }

    /// Requested page: the explicit value, else `paged`/`page` from the query string,
    /// else 1. Never below 1.
    pub fn page(&self) -> u32 {
        self.requested_page
            .or_else(|| {
                PAGE_PARAMS
                    .iter()
                    .find_map(|param| self.query.first(param)?.parse::<u32>().ok())
            })
            .unwrap_or(1)
            .max(1)
    }

    /// Calendar day of `now`, used to seed reproducible random orderings.
    pub fn day_stamp(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.now.year(),
            self.now.month(),
            self.now.day()
        )
    }
}

impl ContextProvider for RequestContext {
    fn current_item_id(&self) -> Option<ItemId> {
        self.current_item_id
    }

    fn archive_scope(&self) -> Option<ArchiveScope> {
        self.archive.clone()
    }

    fn now(&self) -> Timestamp {
        self.now
    }

    fn query_string(&self) -> QueryStringFacets {
        self.query.clone()
    }

    fn requested_page(&self) -> Option<u32> {
        self.requested_page
    }
}
