//! Shared fixtures for integration tests
//!
//! Provides a fixed clock, seeded in-memory catalogs and serialized access to
//! process environment variables.

use chrono::{Duration, TimeZone, Utc};
use facetry::executor::{InMemoryExecutor, StoredItem};
use facetry::types::Timestamp;
use std::sync::Mutex;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub fn fixed_now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Twelve posts, one per day of January 2024. Even ids are in `news` (term 5),
/// odd ids in `travel` (term 6). Authors: 1 for ids 1-6, 2 for the rest.
pub fn blog_executor() -> InMemoryExecutor {
    let items = (1..=12u64)
        .map(|i| {
            let published = Utc.with_ymd_and_hms(2024, 1, i as u32, 9, 0, 0).unwrap();
            let (term, slug) = if i % 2 == 0 { (5, "news") } else { (6, "travel") };
            StoredItem::new(i, "post", format!("Post {:02}", i), published)
                .with_term("category", term, slug)
                .with_author(if i <= 6 { 1 } else { 2 })
                .with_menu_order((12 - i) as i64)
        })
        .collect();
    InMemoryExecutor::new(items)
}

/// Small shop: prices, ratings, stock, sales and color attributes.
pub fn shop_executor() -> InMemoryExecutor {
    let day = |d: u32| Utc.with_ymd_and_hms(2024, 3, d, 8, 0, 0).unwrap();
    InMemoryExecutor::new(vec![
        StoredItem::new(101u64, "product", "Kemeja Batik", day(1))
            .with_term("product_cat", 11, "shirts")
            .with_term("pa_color", 21, "red")
            .with_meta("_price", "150000")
            .with_meta("_wc_average_rating", "4.5")
            .with_meta("_stock_status", "instock")
            .with_meta("total_sales", "40"),
        StoredItem::new(102u64, "product", "Kemeja Polos", day(2))
            .with_term("product_cat", 11, "shirts")
            .with_term("pa_color", 22, "blue")
            .with_meta("_price", "90000")
            .with_meta("_wc_average_rating", "3.8")
            .with_meta("_stock_status", "outofstock")
            .with_meta("total_sales", "75"),
        StoredItem::new(103u64, "product", "Celana Chino", day(3))
            .with_term("product_cat", 12, "trousers")
            .with_term("pa_color", 22, "blue")
            .with_term("pa_color", 21, "red")
            .with_meta("_price", "210000")
            .with_meta("_wc_average_rating", "4.9")
            .with_meta("_stock_status", "instock")
            .with_meta("total_sales", "12"),
        StoredItem::new(104u64, "product", "Topi Rajut", day(4))
            .with_term("product_cat", 13, "hats")
            .with_meta("_price", "45000")
            .with_meta("_stock_status", "instock")
            .with_meta("total_sales", "5"),
    ])
}

/// Events ending relative to [`fixed_now`]: id 201 ended a day ago, 202 ends exactly
/// now, 203 ends tomorrow, 204 ends in a week, 205 has no end date.
pub fn event_executor() -> InMemoryExecutor {
    let now = fixed_now();
    let event = |id: u64, start_offset: i64, end_offset: Option<i64>| {
        let start = now + Duration::days(start_offset);
        let mut item = StoredItem::new(id, "event", format!("Event {}", id), now - Duration::days(30))
            .with_meta("_event_start_date", start.to_rfc3339());
        if let Some(end) = end_offset {
            item = item.with_meta("_event_end_date", (now + Duration::days(end)).to_rfc3339());
        }
        item
    };
    InMemoryExecutor::new(vec![
        event(201, -3, Some(-1)),
        event(202, -2, Some(0)),
        event(203, 0, Some(1)),
        event(204, 5, Some(7)),
        event(205, 2, None),
    ])
}

/// Run `f` with the given environment variables set, restoring previous values after.
pub fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(name, _)| (name.to_string(), std::env::var(name).ok()))
        .collect();

    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    let result = f();

    for (name, value) in saved {
        match value {
            Some(value) => std::env::set_var(&name, value),
            None => std::env::remove_var(&name),
        }
    }

    result
}
