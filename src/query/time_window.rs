//! Time-Window Resolver for date-bounded items such as calendar events.
//!
//! `Upcoming` and `Past` partition the timeline at `now`: an item ending exactly at
//! `now` is still upcoming and not yet past.

use super::spec::{Comparator, MetaFilter, MetaValue, SortDirection, ValueType};
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Named date-based inclusion policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// Still running or not started: end-date >= now
    Upcoming,
    /// Already over: end-date < now
    Past,
    #[default]
    All,
}

impl TimeWindow {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upcoming" | "future" => Some(TimeWindow::Upcoming),
            "past" | "expired" => Some(TimeWindow::Past),
            "all" | "" => Some(TimeWindow::All),
            _ => None,
        }
    }

    /// Whether an item ending at `end` belongs to this window at `now`.
    pub fn admits(&self, end: Timestamp, now: Timestamp) -> bool {
        match self {
            TimeWindow::Upcoming => end >= now,
            TimeWindow::Past => end < now,
            TimeWindow::All => true,
        }
    }

    /// Direction used when the caller expressed no preference.
    pub fn default_direction(&self) -> Option<SortDirection> {
        match self {
            TimeWindow::Upcoming => Some(SortDirection::Ascending),
            TimeWindow::Past => Some(SortDirection::Descending),
            TimeWindow::All => None,
        }
    }
}

/// Which event date the listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDateField {
    #[default]
    Start,
    End,
}

/// Output of [`resolve_event_ordering`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOrdering {
    pub meta_filters: Vec<MetaFilter>,
    pub sort_direction: SortDirection,
}

/// Resolve the window filter and sort direction for an event listing.
///
/// `requested` is `None` when the caller never chose a direction; an explicit choice
/// always wins over the window's default. `fallback` applies to `All` without a choice.
pub fn resolve_event_ordering(
    mode: TimeWindow,
    now: Timestamp,
    requested: Option<SortDirection>,
    end_key: &str,
    fallback: SortDirection,
) -> EventOrdering {
    let meta_filters = match mode {
        TimeWindow::Upcoming => vec![end_bound(end_key, Comparator::Gte, now)],
        TimeWindow::Past => vec![end_bound(end_key, Comparator::Lt, now)],
        TimeWindow::All => Vec::new(),
    };

    let sort_direction = requested
        .or_else(|| mode.default_direction())
        .unwrap_or(fallback);

    EventOrdering {
        meta_filters,
        sort_direction,
    }
}

fn end_bound(end_key: &str, comparator: Comparator, now: Timestamp) -> MetaFilter {
    MetaFilter::new(end_key, comparator, MetaValue::Time(now), ValueType::DateTime)
}
