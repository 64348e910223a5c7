//! Normalization of raw widget settings into a [`FacetConfig`].
//!
//! Widget settings arrive as loosely-typed JSON: numbers as strings, booleans as
//! `"yes"`, id lists as comma-separated text. Anything missing or malformed is
//! replaced by its documented default; normalization never fails.

use super::{FacetConfig, OrderBy, SourceKind, TaxonomyFilter};
use crate::pagination::PaginationConfig;
use crate::query::{EventDateField, PageSize, SortDirection, TimeWindow};
use crate::types::{ItemId, TermId};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

impl FacetConfig {
    /// Build a facet configuration from raw widget settings.
    ///
    /// Recognized keys: `source`, `item_type` (or `post_type`), `manual_ids`,
    /// `taxonomy`, `terms`, `exclude_current`, `exclude_ids`, `offset`, `orderby`,
    /// `order`, `time_window`, `event_date_field`, `page_size` (or `posts_per_page`,
    /// where `-1` means unbounded), `pagination`, `pagination_window`.
    pub fn from_settings(settings: &Value, defaults: &PaginationConfig) -> FacetConfig {
        let get = |keys: &[&str]| keys.iter().find_map(|key| settings.get(*key));

        let source_kind = match get(&["source"]).and_then(Value::as_str) {
            None => SourceKind::default(),
            Some(raw) => parse_source(raw).unwrap_or_else(|| {
                warn!(value = raw, "Unknown content source, using repository");
                SourceKind::default()
            }),
        };

        let item_type = get(&["item_type", "post_type"])
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("post")
            .to_string();

        let manual_ids = get(&["manual_ids", "include_ids"])
            .map(id_list)
            .unwrap_or_default()
            .into_iter()
            .fold(Vec::new(), |mut ids, id| {
                let id = ItemId(id);
                if !ids.contains(&id) {
                    ids.push(id);
                }
                ids
            });

        let taxonomy_filter = get(&["taxonomy"])
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|taxonomy| TaxonomyFilter {
                taxonomy: taxonomy.to_string(),
                term_ids: get(&["terms", "term_ids"])
                    .map(id_list)
                    .unwrap_or_default()
                    .into_iter()
                    .map(TermId)
                    .collect(),
            });

        let exclude_current_item = get(&["exclude_current"]).map(as_bool).unwrap_or(false);
        let exclude_ids: BTreeSet<ItemId> = get(&["exclude_ids"])
            .map(id_list)
            .unwrap_or_default()
            .into_iter()
            .map(ItemId)
            .collect();

        let offset = match get(&["offset"]).map(as_int) {
            None | Some(None) => 0,
            Some(Some(n)) if n >= 0 => u32::try_from(n).unwrap_or(u32::MAX),
            Some(Some(n)) => {
                warn!(value = n, "Negative offset, using 0");
                0
            }
        };

        let order_by = match get(&["orderby", "order_by"]).and_then(Value::as_str) {
            None => OrderBy::default(),
            Some(raw) => parse_order_by(raw).unwrap_or_else(|| {
                warn!(value = raw, "Unknown ordering, using date");
                OrderBy::default()
            }),
        };

        let order_direction = get(&["order", "order_direction"])
            .and_then(Value::as_str)
            .and_then(SortDirection::parse);

        let time_window = get(&["time_window", "event_filter"])
            .and_then(Value::as_str)
            .and_then(TimeWindow::parse)
            .unwrap_or_default();

        let event_date_field = match get(&["event_date_field"]).and_then(Value::as_str) {
            Some(raw) if raw.trim().eq_ignore_ascii_case("end") => EventDateField::End,
            _ => EventDateField::Start,
        };

        let page_size = match get(&["page_size", "posts_per_page"]).map(as_int) {
            None | Some(None) => PageSize::Limited(defaults.default_page_size),
            Some(Some(-1)) => PageSize::Unbounded,
            Some(Some(n)) if n > 0 => {
                let capped = u32::try_from(n)
                    .unwrap_or(u32::MAX)
                    .min(defaults.max_page_size);
                PageSize::Limited(capped)
            }
            Some(Some(n)) => {
                warn!(value = n, "Invalid page size, using default");
                PageSize::Limited(defaults.default_page_size)
            }
        };

        let pagination_enabled = get(&["pagination"]).map(as_bool).unwrap_or(false);

        let pagination_window = match get(&["pagination_window", "page_numbers"]).map(as_int) {
            Some(Some(n)) if n > 0 => u32::try_from(n).unwrap_or(defaults.default_window),
            _ => defaults.default_window,
        };

        FacetConfig {
            source_kind,
            item_type,
            manual_ids,
            taxonomy_filter,
            exclude_current_item,
            exclude_ids,
            offset,
            order_by,
            order_direction,
            time_window,
            event_date_field,
            page_size,
            pagination_enabled,
            pagination_window,
        }
    }
}

fn parse_source(raw: &str) -> Option<SourceKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "manual" | "manual_selection" => Some(SourceKind::Manual),
        "" | "repository" | "recent" | "all" => Some(SourceKind::FromRepository),
        "archive" | "current_query" | "archive_context" => Some(SourceKind::FromArchiveContext),
        _ => None,
    }
}

fn parse_order_by(raw: &str) -> Option<OrderBy> {
    let order_by = match raw.trim().to_ascii_lowercase().as_str() {
        "" | "date" | "post_date" => OrderBy::Date,
        "modified" | "post_modified" => OrderBy::Modified,
        "title" | "post_title" => OrderBy::Title,
        "menu_order" => OrderBy::MenuOrder,
        "comment_count" => OrderBy::CommentCount,
        "id" => OrderBy::Id,
        "rand" | "random" => OrderBy::Random,
        "post__in" | "manual" | "manual_order" => OrderBy::ManualOrder,
        "price" => OrderBy::Price,
        "popularity" | "sales" => OrderBy::Popularity,
        "rating" => OrderBy::Rating,
        "event_date" => OrderBy::EventDate,
        _ => return None,
    };
    Some(order_by)
}

fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().map(|n| n != 0).unwrap_or(false),
        Value::String(s) => crate::context::is_truthy(s),
        _ => false,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Positive integer ids from an array or comma-separated string; invalid entries drop out.
fn id_list(value: &Value) -> Vec<u64> {
    let parse = |raw: &str| raw.trim().parse::<u64>().ok().filter(|id| *id > 0);
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => n.as_u64().filter(|id| *id > 0),
                Value::String(s) => parse(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').filter_map(parse).collect(),
        Value::Number(n) => n.as_u64().filter(|id| *id > 0).into_iter().collect(),
        _ => Vec::new(),
    }
}
